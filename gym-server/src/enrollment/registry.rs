//! Class Registry - read-only lookup of class capacity and start time
//!
//! The ledger only needs to know whether a class exists and how many
//! confirmed seats it has. Class CRUD lives in the `gym_class` repository.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use dashmap::DashMap;
use sqlx::SqlitePool;

use super::error::{LedgerError, LedgerResult};
use crate::db::repository::{RepoResult, gym_class};
use crate::utils::time::class_start;

/// What the ledger needs to know about a class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassInfo {
    pub id: i64,
    /// Maximum confirmed bookings (>= 0)
    pub capacity: i64,
    /// Local start time; `None` keeps the class open for bookings
    pub starts_at: Option<NaiveDateTime>,
}

impl ClassInfo {
    /// Bookings and cancellations close once the class has started
    pub fn ensure_not_started(&self, now: NaiveDateTime) -> LedgerResult<()> {
        match self.starts_at {
            Some(start) if start <= now => Err(LedgerError::ClassStarted { class_id: self.id }),
            _ => Ok(()),
        }
    }
}

/// Class capacity lookup
#[async_trait]
pub trait ClassRegistry: Send + Sync {
    /// `Ok(None)` when the class does not exist
    async fn get_class(&self, class_id: i64) -> RepoResult<Option<ClassInfo>>;
}

/// Registry backed by the `gym_class` table
#[derive(Clone)]
pub struct SqliteClassRegistry {
    pool: SqlitePool,
}

impl SqliteClassRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClassRegistry for SqliteClassRegistry {
    async fn get_class(&self, class_id: i64) -> RepoResult<Option<ClassInfo>> {
        let Some((capacity, date, time)) = gym_class::find_schedule(&self.pool, class_id).await?
        else {
            return Ok(None);
        };
        let starts_at = class_start(&date, &time);
        if starts_at.is_none() {
            tracing::warn!(class_id, %date, %time, "Unparseable class schedule");
        }
        Ok(Some(ClassInfo {
            id: class_id,
            capacity,
            starts_at,
        }))
    }
}

/// In-memory registry (tests and embedded use)
#[derive(Debug, Default)]
pub struct MemoryClassRegistry {
    classes: DashMap<i64, ClassInfo>,
}

impl MemoryClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, or change the capacity of an existing one
    pub fn set_class(&self, class_id: i64, capacity: i64) {
        self.classes
            .entry(class_id)
            .and_modify(|class| class.capacity = capacity.max(0))
            .or_insert(ClassInfo {
                id: class_id,
                capacity: capacity.max(0),
                starts_at: None,
            });
    }

    /// Set the start time of a registered class
    pub fn set_starts_at(&self, class_id: i64, starts_at: NaiveDateTime) {
        if let Some(mut class) = self.classes.get_mut(&class_id) {
            class.starts_at = Some(starts_at);
        }
    }

    pub fn remove_class(&self, class_id: i64) {
        self.classes.remove(&class_id);
    }
}

#[async_trait]
impl ClassRegistry for MemoryClassRegistry {
    async fn get_class(&self, class_id: i64) -> RepoResult<Option<ClassInfo>> {
        Ok(self.classes.get(&class_id).map(|entry| *entry.value()))
    }
}
