use crate::model::event::{
    CreateEventRequest, CreatedEventResponse, EventListQuery, EventResponse, EventsResponse,
    UpcomingEventsQuery,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::model::id::EventId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_event(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<CreatedEventResponse>)> {
    req.validate(&())?;

    registry
        .event_repository()
        .create(req.try_into()?)
        .await
        .map(|id| (StatusCode::CREATED, Json(CreatedEventResponse { id })))
}

pub async fn show_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventResponse>> {
    registry
        .event_repository()
        .find_by_id(event_id)
        .await
        .and_then(|event| match event {
            Some(event) => Ok(Json(event.into())),
            None => Err(AppError::EntityNotFound("event not found".into())),
        })
}

pub async fn delete_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .event_repository()
        .delete(event_id)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn show_event_list(
    Query(query): Query<EventListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventsResponse>> {
    let repo = registry.event_repository();
    let events = match (query.date, query.start_date, query.end_date) {
        (Some(date), None, None) => repo.find_for_user_on_date(query.user_id, date).await?,
        (None, Some(start_date), Some(end_date)) => {
            repo.find_for_user_in_range(query.user_id, start_date, end_date)
                .await?
        }
        (None, None, None) => repo.find_for_user(query.user_id).await?,
        _ => {
            return Err(AppError::UnprocessableEntity(
                "specify either date, or startDate and endDate together".into(),
            ))
        }
    };

    Ok(Json(events.into()))
}

pub async fn show_upcoming_event_list(
    Query(query): Query<UpcomingEventsQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventsResponse>> {
    registry
        .event_repository()
        .find_upcoming_for_user(query.user_id, Utc::now())
        .await
        .map(EventsResponse::from)
        .map(Json)
}
