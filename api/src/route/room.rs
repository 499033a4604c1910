use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::room::{check_room_availability, register_room, show_room, show_room_list};

pub fn build_room_routers() -> Router<AppRegistry> {
    let room_routers = Router::new()
        .route("/", post(register_room))
        .route("/", get(show_room_list))
        .route("/:room_id", get(show_room))
        .route("/:room_id/availability", post(check_room_availability));

    Router::new().nest("/rooms", room_routers)
}
