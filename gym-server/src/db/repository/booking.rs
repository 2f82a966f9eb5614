//! Class Booking Repository
//!
//! Rows are returned in insertion order (`booked_at`, then the autoincrement
//! `seq`), which is the order the enrollment ledger expects on reload.

use super::RepoResult;
use shared::models::Booking;
use sqlx::{Sqlite, SqlitePool, Transaction};

const BOOKING_SELECT: &str =
    "SELECT id, class_id, member_id, status, booked_at FROM class_booking";

pub async fn find_by_class(pool: &SqlitePool, class_id: i64) -> RepoResult<Vec<Booking>> {
    let sql = format!("{BOOKING_SELECT} WHERE class_id = ? ORDER BY booked_at, seq");
    let rows = sqlx::query_as::<_, Booking>(&sql)
        .bind(class_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Insert a booking, or update its status if the id already exists
pub async fn upsert(pool: &SqlitePool, booking: &Booking) -> RepoResult<()> {
    let mut tx = pool.begin().await?;
    upsert_tx(&mut tx, booking).await?;
    tx.commit().await?;
    Ok(())
}

/// Delete a booking by id; `false` if there was none
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    let deleted = delete_tx(&mut tx, id).await?;
    tx.commit().await?;
    Ok(deleted)
}

/// Persist a cancellation atomically: delete `removed`, confirm `promoted`
pub async fn apply_cancel(
    pool: &SqlitePool,
    removed: &Booking,
    promoted: Option<&Booking>,
) -> RepoResult<()> {
    let mut tx = pool.begin().await?;
    delete_tx(&mut tx, removed.id).await?;
    if let Some(promoted) = promoted {
        upsert_tx(&mut tx, promoted).await?;
    }
    tx.commit().await?;
    Ok(())
}

async fn upsert_tx(tx: &mut Transaction<'_, Sqlite>, booking: &Booking) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO class_booking (id, class_id, member_id, status, booked_at) VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT(id) DO UPDATE SET status = excluded.status",
    )
    .bind(booking.id)
    .bind(booking.class_id)
    .bind(&booking.member_id)
    .bind(booking.status)
    .bind(booking.booked_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn delete_tx(tx: &mut Transaction<'_, Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM class_booking WHERE id = ?")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() > 0)
}
