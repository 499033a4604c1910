use chrono::{DateTime, Utc};

use crate::model::id::{EventId, RoomId, UserId};

pub mod event;

#[derive(Debug, Clone)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    // The organizer may be deleted without taking the event with them.
    pub organizer_id: Option<UserId>,
    pub room_ids: Vec<RoomId>,
    pub attendee_ids: Vec<UserId>,
}
