//! Gym Class API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{RepoError, gym_class};
use crate::utils::time::{parse_date, parse_time};
use crate::utils::validation::{
    MAX_CAPACITY, MAX_DURATION_MINUTES, MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text,
    validate_range, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{ClassDetail, ClassSummary, GymClass, GymClassCreate, GymClassUpdate};

fn validate_create(payload: &GymClassCreate) -> AppResult<()> {
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&payload.trainer_name, "trainer_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    parse_date(&payload.date)?;
    parse_time(&payload.time)?;
    validate_range(payload.duration_minutes, "duration_minutes", 1, MAX_DURATION_MINUTES)?;
    validate_range(payload.capacity, "capacity", 0, MAX_CAPACITY)?;
    Ok(())
}

fn validate_update(payload: &GymClassUpdate) -> AppResult<()> {
    if let Some(title) = &payload.title {
        validate_required_text(title, "title", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.trainer_name, "trainer_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(date) = &payload.date {
        parse_date(date)?;
    }
    if let Some(time) = &payload.time {
        parse_time(time)?;
    }
    if let Some(duration) = payload.duration_minutes {
        validate_range(duration, "duration_minutes", 1, MAX_DURATION_MINUTES)?;
    }
    if let Some(capacity) = payload.capacity {
        validate_range(capacity, "capacity", 0, MAX_CAPACITY)?;
    }
    Ok(())
}

async fn summarize(state: &ServerState, class: GymClass) -> AppResult<ClassSummary> {
    let counts = state.enrollment.counts(class.id).await?;
    Ok(ClassSummary::new(class, counts.confirmed, counts.waitlisted))
}

/// GET /api/classes - 获取所有课程 (按日期时间排序, 含预约人数)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ClassSummary>>> {
    let classes = gym_class::find_all(&state.pool).await?;
    let mut summaries = Vec::with_capacity(classes.len());
    for class in classes {
        summaries.push(summarize(&state, class).await?);
    }
    Ok(Json(summaries))
}

/// GET /api/classes/{id} - 获取单个课程 (含已确认名单和候补名单)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ClassDetail>> {
    let class = gym_class::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::class_not_found(id))?;

    let bookings = state.enrollment.list_by_class(id).await?;
    let (confirmed, waitlist): (Vec<_>, Vec<_>) =
        bookings.into_iter().partition(|b| b.is_confirmed());

    Ok(Json(ClassDetail {
        summary: ClassSummary::new(class, confirmed.len(), waitlist.len()),
        confirmed,
        waitlist,
    }))
}

/// POST /api/classes - 创建课程
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<GymClassCreate>,
) -> AppResult<Json<GymClass>> {
    validate_create(&payload)?;
    let class = gym_class::create(&state.pool, payload).await?;
    tracing::info!(class_id = class.id, title = %class.title, capacity = class.capacity, "Class created");
    Ok(Json(class))
}

/// PUT /api/classes/{id} - 更新课程
///
/// 容量不得低于当前已确认人数; 提高容量不会自动从候补名单补位
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<GymClassUpdate>,
) -> AppResult<Json<GymClass>> {
    validate_update(&payload)?;

    let class_error = move |e: RepoError| match e {
        RepoError::NotFound(_) => AppError::class_not_found(id),
        other => other.into(),
    };

    let class = match payload.capacity {
        // Hold bookings off while the new capacity is checked and written
        Some(capacity) => {
            let pool = state.pool.clone();
            state
                .enrollment
                .resize_class(id, capacity, async move {
                    gym_class::update(&pool, id, payload)
                        .await
                        .map_err(class_error)
                })
                .await?
        }
        None => gym_class::update(&state.pool, id, payload)
            .await
            .map_err(class_error)?,
    };

    tracing::info!(class_id = id, capacity = class.capacity, "Class updated");
    Ok(Json(class))
}

/// DELETE /api/classes/{id} - 删除课程 (连同其所有预约)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = gym_class::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::class_not_found(id));
    }
    state.enrollment.forget_class(id).await;
    tracing::info!(class_id = id, "Class deleted");
    Ok(Json(true))
}
