use kernel::model::event::Event;
use kernel::model::id::{EventId, RoomId, UserId};
use sqlx::types::chrono::{DateTime, Utc};

// One row per event, with the room and attendee sets gathered from their
// join tables into arrays so a listing needs a single round trip.
#[derive(sqlx::FromRow)]
pub struct EventRow {
    pub id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer_id: Option<UserId>,
    pub room_ids: Vec<RoomId>,
    pub attendee_ids: Vec<UserId>,
}

impl From<EventRow> for Event {
    fn from(value: EventRow) -> Self {
        let EventRow {
            id,
            name,
            description,
            start_time,
            end_time,
            organizer_id,
            room_ids,
            attendee_ids,
        } = value;
        Event {
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
