use kernel::model::id::{CompanyId, RoomId};
use kernel::model::room::Room;

#[derive(sqlx::FromRow)]
pub struct RoomRow {
    pub id: RoomId,
    pub name: String,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub company_id: CompanyId,
}

impl From<RoomRow> for Room {
    fn from(value: RoomRow) -> Self {
        let RoomRow {
            id,
            name,
            capacity,
            location,
            company_id,
        } = value;
        Room {
            id,
            name,
            capacity,
            location,
            company_id,
        }
    }
}
