use async_trait::async_trait;
use derive_new::new;
use kernel::model::id::RoomId;
use kernel::model::room::event::CreateRoom;
use kernel::model::room::Room;
use kernel::repository::room::RoomRepository;
use shared::error::{AppError, AppResult};

use crate::database::model::room::RoomRow;
use crate::database::ConnectionPool;

#[derive(new)]
pub struct RoomRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn create(&self, event: CreateRoom) -> AppResult<RoomId> {
        sqlx::query_scalar(
            r#"
                INSERT INTO rooms (name, capacity, location, company_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id
            "#,
        )
        .bind(&event.name)
        .bind(event.capacity)
        .bind(&event.location)
        .bind(event.company_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_all(&self) -> AppResult<Vec<Room>> {
        let rows: Vec<RoomRow> = sqlx::query_as(
            r#"
                SELECT
                    id,
                    name,
                    capacity,
                    location,
                    company_id
                FROM rooms
                ORDER BY id ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Room::from).collect())
    }

    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>> {
        let row: Option<RoomRow> = sqlx::query_as(
            r#"
                SELECT
                    id,
                    name,
                    capacity,
                    location,
                    company_id
                FROM rooms
                WHERE id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Room::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::id::CompanyId;

    #[sqlx::test(fixtures("common"))]
    async fn register_and_fetch_room(pool: sqlx::PgPool) {
        let repo = RoomRepositoryImpl::new(ConnectionPool::new(pool));

        let room_id = repo
            .create(CreateRoom {
                name: "War room".into(),
                capacity: Some(8),
                location: Some("2nd floor".into()),
                company_id: CompanyId::new(900).unwrap(),
            })
            .await
            .unwrap();

        let room = repo.find_by_id(room_id).await.unwrap().unwrap();
        assert_eq!(room.id, room_id);
        assert_eq!(room.name, "War room");
        assert_eq!(room.capacity, Some(8));
        assert_eq!(room.location.as_deref(), Some("2nd floor"));

        // The fixture rooms plus the one just created.
        let rooms = repo.find_all().await.unwrap();
        assert_eq!(rooms.len(), 4);
        assert!(rooms.iter().any(|r| r.id == room_id));
    }

    #[sqlx::test(fixtures("common"))]
    async fn fetching_an_unknown_room_yields_none(pool: sqlx::PgPool) {
        let repo = RoomRepositoryImpl::new(ConnectionPool::new(pool));
        let missing = repo.find_by_id(RoomId::new(424242).unwrap()).await.unwrap();
        assert!(missing.is_none());
    }
}
