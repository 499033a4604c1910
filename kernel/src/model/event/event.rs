use derive_new::new;

use crate::model::id::{RoomId, UserId};
use crate::model::window::BookingWindow;

#[derive(new, Debug)]
pub struct CreateEvent {
    pub name: String,
    pub description: Option<String>,
    pub window: BookingWindow,
    pub organizer_id: Option<UserId>,
    pub room_ids: Vec<RoomId>,
    pub attendee_ids: Vec<UserId>,
}
