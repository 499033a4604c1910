use crate::model::id::{CompanyId, RoomId};

pub mod event;

#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub company_id: CompanyId,
}
