use axum::{
    routing::{delete, get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::event::{
    delete_event, register_event, show_event, show_event_list, show_upcoming_event_list,
};

pub fn build_event_routers() -> Router<AppRegistry> {
    let event_routers = Router::new()
        .route("/", post(register_event))
        .route("/", get(show_event_list))
        .route("/upcoming", get(show_upcoming_event_list))
        .route("/:event_id", get(show_event))
        .route("/:event_id", delete(delete_event));

    Router::new().nest("/events", event_routers)
}
