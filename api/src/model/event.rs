use chrono::{DateTime, NaiveDate, Utc};
use garde::Validate;
use kernel::model::event::event::CreateEvent;
use kernel::model::event::Event;
use kernel::model::id::{EventId, RoomId, UserId};
use kernel::model::window::BookingWindow;
use serde::{Deserialize, Serialize};
use shared::error::AppError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
    #[garde(skip)]
    pub organizer_id: Option<UserId>,
    #[garde(length(min = 1))]
    pub room_ids: Vec<RoomId>,
    #[garde(skip)]
    #[serde(default)]
    pub attendee_ids: Vec<UserId>,
}

impl TryFrom<CreateEventRequest> for CreateEvent {
    type Error = AppError;

    fn try_from(value: CreateEventRequest) -> Result<Self, Self::Error> {
        let CreateEventRequest {
            name,
            description,
            start_time,
            end_time,
            organizer_id,
            room_ids,
            attendee_ids,
        } = value;
        let window = BookingWindow::new(start_time, end_time)?;
        Ok(CreateEvent::new(
            name,
            description,
            window,
            organizer_id,
            room_ids,
            attendee_ids,
        ))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEventResponse {
    pub id: EventId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer_id: Option<UserId>,
    pub room_ids: Vec<RoomId>,
    pub attendee_ids: Vec<UserId>,
}

impl From<Event> for EventResponse {
    fn from(value: Event) -> Self {
        let Event {
            id,
            name,
            description,
            start_time,
            end_time,
            organizer_id,
            room_ids,
            attendee_ids,
        } = value;
        Self {
            id,
            name,
            description,
            start_time,
            end_time,
            organizer_id,
            room_ids,
            attendee_ids,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    pub items: Vec<EventResponse>,
}

impl From<Vec<Event>> for EventsResponse {
    fn from(value: Vec<Event>) -> Self {
        Self {
            items: value.into_iter().map(EventResponse::from).collect(),
        }
    }
}

// Accepts `date` alone, `startDate`/`endDate` together, or neither.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    pub user_id: UserId,
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEventsQuery {
    pub user_id: UserId,
}
