//! Gym Class Repository

use super::{RepoError, RepoResult};
use shared::models::{GymClass, GymClassCreate, GymClassUpdate};
use sqlx::SqlitePool;

const GYM_CLASS_SELECT: &str = "SELECT id, title, trainer_name, date, time, duration_minutes, capacity, description, created_at, updated_at FROM gym_class";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<GymClass>> {
    let sql = format!("{GYM_CLASS_SELECT} ORDER BY date, time, id");
    let rows = sqlx::query_as::<_, GymClass>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<GymClass>> {
    let sql = format!("{GYM_CLASS_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, GymClass>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// `(capacity, date, time)` of a class, or `None` if the class does not exist
pub async fn find_schedule(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<(i64, String, String)>> {
    let row = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT capacity, date, time FROM gym_class WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: GymClassCreate) -> RepoResult<GymClass> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO gym_class (id, title, trainer_name, date, time, duration_minutes, capacity, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(&data.title)
    .bind(&data.trainer_name)
    .bind(&data.date)
    .bind(&data.time)
    .bind(data.duration_minutes)
    .bind(data.capacity)
    .bind(&data.description)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create class".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: GymClassUpdate) -> RepoResult<GymClass> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE gym_class SET title = COALESCE(?1, title), trainer_name = COALESCE(?2, trainer_name), date = COALESCE(?3, date), time = COALESCE(?4, time), duration_minutes = COALESCE(?5, duration_minutes), capacity = COALESCE(?6, capacity), description = COALESCE(?7, description), updated_at = ?8 WHERE id = ?9",
    )
    .bind(&data.title)
    .bind(&data.trainer_name)
    .bind(&data.date)
    .bind(&data.time)
    .bind(data.duration_minutes)
    .bind(data.capacity)
    .bind(&data.description)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Class {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Class {id} not found")))
}

/// Delete a class; its bookings go with it (ON DELETE CASCADE)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM gym_class WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
