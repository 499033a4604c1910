use crate::model::room::{
    AvailabilityRequest, AvailabilityResponse, CreateRoomRequest, CreatedRoomResponse,
    RoomResponse, RoomsResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::id::RoomId;
use kernel::model::window::BookingWindow;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_room(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateRoomRequest>,
) -> AppResult<(StatusCode, Json<CreatedRoomResponse>)> {
    req.validate(&())?;

    registry
        .room_repository()
        .create(req.into())
        .await
        .map(|id| (StatusCode::CREATED, Json(CreatedRoomResponse { id })))
}

pub async fn show_room_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomsResponse>> {
    registry
        .room_repository()
        .find_all()
        .await
        .map(RoomsResponse::from)
        .map(Json)
}

pub async fn show_room(
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomResponse>> {
    registry
        .room_repository()
        .find_by_id(room_id)
        .await
        .and_then(|room| match room {
            Some(room) => Ok(Json(room.into())),
            None => Err(AppError::EntityNotFound("room not found".into())),
        })
}

// A positive answer is advisory: only the booking transaction itself can
// reserve the slot.
pub async fn check_room_availability(
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<AvailabilityRequest>,
) -> AppResult<Json<AvailabilityResponse>> {
    let window = BookingWindow::new(req.start_time, req.end_time)?;

    registry
        .event_repository()
        .room_is_available(room_id, window)
        .await
        .map(|available| Json(AvailabilityResponse { available }))
}
