use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared::error::AppResult;

use crate::model::event::event::CreateEvent;
use crate::model::event::Event;
use crate::model::id::{EventId, RoomId, UserId};
use crate::model::window::BookingWindow;

#[async_trait]
pub trait EventRepository: Send + Sync {
    // Books the rooms and persists the event atomically; the same room must
    // never be claimed by two events with overlapping windows.
    async fn create(&self, event: CreateEvent) -> AppResult<EventId>;
    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>>;
    async fn delete(&self, event_id: EventId) -> AppResult<()>;
    // Advisory only: the answer can go stale as soon as it is returned.
    async fn room_is_available(&self, room_id: RoomId, window: BookingWindow) -> AppResult<bool>;
    // All events the user organizes or attends, earliest first.
    async fn find_for_user(&self, user_id: UserId) -> AppResult<Vec<Event>>;
    // Same membership rule, restricted to events touching the given day.
    async fn find_for_user_on_date(&self, user_id: UserId, date: NaiveDate)
        -> AppResult<Vec<Event>>;
    // Both dates inclusive; each qualifying event is returned exactly once.
    async fn find_for_user_in_range(
        &self,
        user_id: UserId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Vec<Event>>;
    async fn find_upcoming_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Event>>;
}
