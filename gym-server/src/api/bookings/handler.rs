//! Class Booking API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{Booking, BookingCreate, CancelOutcome};

/// GET /api/classes/{id}/bookings - 预约列表 (已确认在前, 候补按先后顺序)
pub async fn list(
    State(state): State<ServerState>,
    Path(class_id): Path<i64>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state.enrollment.list_by_class(class_id).await?;
    Ok(Json(bookings))
}

/// POST /api/classes/{id}/bookings - 预约课程 (满员时进入候补)
pub async fn book(
    State(state): State<ServerState>,
    Path(class_id): Path<i64>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let booking = state.enrollment.book(class_id, &payload.member_id).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// DELETE /api/classes/{id}/bookings/{member_id} - 取消预约 (可能触发候补转正)
pub async fn cancel(
    State(state): State<ServerState>,
    Path((class_id, member_id)): Path<(i64, String)>,
) -> AppResult<Json<CancelOutcome>> {
    let outcome = state.enrollment.cancel(class_id, &member_id).await?;
    Ok(Json(outcome))
}
