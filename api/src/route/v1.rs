use super::{
    event::build_event_routers, health::build_health_check_routers, room::build_room_routers,
};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_event_routers())
        .merge(build_room_routers());

    Router::new().nest("/api/v1", router)
}
