use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::id::RoomId;
use crate::model::room::event::CreateRoom;
use crate::model::room::Room;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, event: CreateRoom) -> AppResult<RoomId>;
    async fn find_all(&self) -> AppResult<Vec<Room>>;
    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>>;
}
