use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::id::{CompanyId, RoomId};
use kernel::model::room::event::CreateRoom;
use kernel::model::room::Room;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(range(min = 1))]
    pub capacity: Option<i32>,
    #[garde(skip)]
    pub location: Option<String>,
    #[garde(skip)]
    pub company_id: CompanyId,
}

impl From<CreateRoomRequest> for CreateRoom {
    fn from(value: CreateRoomRequest) -> Self {
        let CreateRoomRequest {
            name,
            capacity,
            location,
            company_id,
        } = value;
        CreateRoom {
            name,
            capacity,
            location,
            company_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRoomResponse {
    pub id: RoomId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: RoomId,
    pub name: String,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub company_id: CompanyId,
}

impl From<Room> for RoomResponse {
    fn from(value: Room) -> Self {
        let Room {
            id,
            name,
            capacity,
            location,
            company_id,
        } = value;
        Self {
            id,
            name,
            capacity,
            location,
            company_id,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsResponse {
    pub items: Vec<RoomResponse>,
}

impl From<Vec<Room>> for RoomsResponse {
    fn from(value: Vec<Room>) -> Self {
        Self {
            items: value.into_iter().map(RoomResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
}
