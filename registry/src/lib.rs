use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::event::EventRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::reset_token::ResetTokenRepositoryImpl;
use adapter::repository::room::RoomRepositoryImpl;
use kernel::repository::event::EventRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::reset_token::ResetTokenRepository;
use kernel::repository::room::RoomRepository;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    event_repository: Arc<dyn EventRepository>,
    room_repository: Arc<dyn RoomRepository>,
    reset_token_repository: Arc<dyn ResetTokenRepository>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let event_repository = Arc::new(EventRepositoryImpl::new(pool.clone()));
        let room_repository = Arc::new(RoomRepositoryImpl::new(pool.clone()));
        let reset_token_repository = Arc::new(ResetTokenRepositoryImpl::new());
        Self {
            health_check_repository,
            event_repository,
            room_repository,
            reset_token_repository,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn event_repository(&self) -> Arc<dyn EventRepository> {
        self.event_repository.clone()
    }

    pub fn room_repository(&self) -> Arc<dyn RoomRepository> {
        self.room_repository.clone()
    }

    pub fn reset_token_repository(&self) -> Arc<dyn ResetTokenRepository> {
        self.reset_token_repository.clone()
    }
}
