use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use derive_new::new;
use kernel::model::event::event::CreateEvent;
use kernel::model::event::Event;
use kernel::model::id::{EventId, RoomId, UserId};
use kernel::model::window::BookingWindow;
use kernel::repository::event::EventRepository;
use shared::error::{AppError, AppResult};
use sqlx::{Postgres, Transaction};

use crate::database::model::event::EventRow;
use crate::database::ConnectionPool;

// PostgreSQL SQLSTATE for a serialization failure under SERIALIZABLE.
const SERIALIZATION_FAILURE: &str = "40001";
const MAX_CREATE_ATTEMPTS: u32 = 3;

const SELECT_EVENT: &str = r#"
    SELECT
        e.id,
        e.name,
        e.description,
        e.start_time,
        e.end_time,
        e.organizer_id,
        COALESCE(
            (SELECT ARRAY_AGG(er.room_id ORDER BY er.room_id)
             FROM event_rooms AS er
             WHERE er.event_id = e.id),
            '{}'
        ) AS room_ids,
        COALESCE(
            (SELECT ARRAY_AGG(a.user_id ORDER BY a.user_id)
             FROM attendees AS a
             WHERE a.event_id = e.id),
            '{}'
        ) AS attendee_ids
    FROM events AS e
"#;

// A user participates in an event as its organizer or through an attendee row.
const MEMBERSHIP: &str = r#"(
    e.organizer_id = $1
    OR EXISTS (
        SELECT 1 FROM attendees AS a
        WHERE a.event_id = e.id AND a.user_id = $1
    )
)"#;

#[derive(new)]
pub struct EventRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl EventRepository for EventRepositoryImpl {
    async fn create(&self, event: CreateEvent) -> AppResult<EventId> {
        if event.name.trim().is_empty() {
            return Err(AppError::UnprocessableEntity(
                "event name must not be empty".into(),
            ));
        }
        if event.room_ids.is_empty() {
            return Err(AppError::UnprocessableEntity(
                "an event must claim at least one room".into(),
            ));
        }

        let mut room_ids = event.room_ids.clone();
        room_ids.sort_unstable();
        room_ids.dedup();

        let mut attendee_ids = event.attendee_ids.clone();
        attendee_ids.sort_unstable();
        attendee_ids.dedup();

        // The overlap check and the inserts must not interleave with another
        // booking for the same room, so both run inside one SERIALIZABLE
        // transaction. A transaction aborted by the serialization checker is
        // retried; on retry the committed rival booking is visible and the
        // request fails with a room conflict instead.
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.try_create(&event, &room_ids, &attendee_ids).await {
                Err(e) if is_serialization_failure(&e) => {
                    if attempts >= MAX_CREATE_ATTEMPTS {
                        return Err(AppError::SerializationRetryExceeded);
                    }
                }
                other => return other,
            }
        }
    }

    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>> {
        let sql = format!("{SELECT_EVENT} WHERE e.id = $1");
        let row: Option<EventRow> = sqlx::query_as(&sql)
            .bind(event_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Event::from))
    }

    async fn delete(&self, event_id: EventId) -> AppResult<()> {
        // Attendee and room claims go with the event via ON DELETE CASCADE.
        let res = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "event {event_id} not found"
            )));
        }

        Ok(())
    }

    async fn room_is_available(&self, room_id: RoomId, window: BookingWindow) -> AppResult<bool> {
        let occupied: bool = sqlx::query_scalar(
            r#"
                SELECT EXISTS (
                    SELECT 1
                    FROM events AS e
                    INNER JOIN event_rooms AS er ON er.event_id = e.id
                    WHERE er.room_id = $1
                      AND e.start_time < $3
                      AND $2 < e.end_time
                )
            "#,
        )
        .bind(room_id)
        .bind(window.start())
        .bind(window.end())
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(!occupied)
    }

    async fn find_for_user(&self, user_id: UserId) -> AppResult<Vec<Event>> {
        let sql = format!("{SELECT_EVENT} WHERE {MEMBERSHIP} ORDER BY e.start_time ASC");
        let rows: Vec<EventRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn find_for_user_on_date(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> AppResult<Vec<Event>> {
        self.find_for_user_in_window(user_id, BookingWindow::day(date))
            .await
    }

    async fn find_for_user_in_range(
        &self,
        user_id: UserId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Vec<Event>> {
        // One scan over the whole range; an event spanning several days
        // matches the interval predicate once, so no deduplication pass.
        let window = BookingWindow::date_range(start_date, end_date)?;
        self.find_for_user_in_window(user_id, window).await
    }

    async fn find_upcoming_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Event>> {
        let sql = format!(
            "{SELECT_EVENT} WHERE {MEMBERSHIP} AND e.start_time >= $2 ORDER BY e.start_time ASC"
        );
        let rows: Vec<EventRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(now)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Event::from).collect())
    }
}

impl EventRepositoryImpl {
    async fn try_create(
        &self,
        event: &CreateEvent,
        room_ids: &[RoomId],
        attendee_ids: &[UserId],
    ) -> AppResult<EventId> {
        let mut tx = self.db.begin().await?;

        self.set_transaction_serializable(&mut tx).await?;

        self.ensure_rooms_exist(&mut tx, room_ids).await?;
        self.ensure_users_exist(&mut tx, event.organizer_id, attendee_ids)
            .await?;

        let busy = self.busy_rooms(&mut tx, room_ids, event.window).await?;
        if !busy.is_empty() {
            let busy = busy
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(AppError::RoomConflict(format!(
                "room(s) {busy} are already booked between {} and {}",
                event.window.start(),
                event.window.end()
            )));
        }

        let event_id: EventId = sqlx::query_scalar(
            r#"
                INSERT INTO events (name, description, start_time, end_time, organizer_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
            "#,
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.window.start())
        .bind(event.window.end())
        .bind(event.organizer_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let claimed = sqlx::query(
            r#"
                INSERT INTO event_rooms (event_id, room_id)
                SELECT $1, room_id FROM UNNEST($2::BIGINT[]) AS t(room_id)
            "#,
        )
        .bind(event_id)
        .bind(room_ids)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if claimed.rows_affected() < room_ids.len() as u64 {
            return Err(AppError::NoRowsAffectedError(
                "not every requested room claim was recorded".into(),
            ));
        }

        if !attendee_ids.is_empty() {
            sqlx::query(
                r#"
                    INSERT INTO attendees (event_id, user_id)
                    SELECT $1, user_id FROM UNNEST($2::BIGINT[]) AS t(user_id)
                "#,
            )
            .bind(event_id)
            .bind(attendee_ids)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(event_id)
    }

    async fn set_transaction_serializable(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }

    async fn ensure_rooms_exist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        room_ids: &[RoomId],
    ) -> AppResult<()> {
        let found: Vec<RoomId> = sqlx::query_scalar("SELECT id FROM rooms WHERE id = ANY($1)")
            .bind(room_ids)
            .fetch_all(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if found.len() != room_ids.len() {
            let missing = room_ids
                .iter()
                .filter(|id| !found.contains(id))
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(AppError::EntityNotFound(format!(
                "room(s) {missing} do not exist"
            )));
        }

        Ok(())
    }

    async fn ensure_users_exist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organizer_id: Option<UserId>,
        attendee_ids: &[UserId],
    ) -> AppResult<()> {
        let mut user_ids = attendee_ids.to_vec();
        if let Some(organizer_id) = organizer_id {
            user_ids.push(organizer_id);
        }
        user_ids.sort_unstable();
        user_ids.dedup();

        if user_ids.is_empty() {
            return Ok(());
        }

        let found: Vec<UserId> = sqlx::query_scalar("SELECT id FROM users WHERE id = ANY($1)")
            .bind(&user_ids)
            .fetch_all(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if found.len() != user_ids.len() {
            let missing = user_ids
                .iter()
                .filter(|id| !found.contains(id))
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(AppError::EntityNotFound(format!(
                "user(s) {missing} do not exist"
            )));
        }

        Ok(())
    }

    async fn busy_rooms(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        room_ids: &[RoomId],
        window: BookingWindow,
    ) -> AppResult<Vec<RoomId>> {
        sqlx::query_scalar(
            r#"
                SELECT DISTINCT er.room_id
                FROM events AS e
                INNER JOIN event_rooms AS er ON er.event_id = e.id
                WHERE er.room_id = ANY($1)
                  AND e.start_time < $3
                  AND $2 < e.end_time
                ORDER BY er.room_id
            "#,
        )
        .bind(room_ids)
        .bind(window.start())
        .bind(window.end())
        .fetch_all(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_for_user_in_window(
        &self,
        user_id: UserId,
        window: BookingWindow,
    ) -> AppResult<Vec<Event>> {
        let sql = format!(
            "{SELECT_EVENT} WHERE {MEMBERSHIP} AND e.start_time < $3 AND $2 < e.end_time ORDER BY e.start_time ASC"
        );
        let rows: Vec<EventRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(window.start())
            .bind(window.end())
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Event::from).collect())
    }
}

fn is_serialization_failure(err: &AppError) -> bool {
    let source = match err {
        AppError::SpecificOperationError(e) | AppError::TransactionError(e) => e,
        _ => return false,
    };
    matches!(
        source.as_database_error().and_then(|e| e.code()),
        Some(code) if code == SERIALIZATION_FAILURE
    )
}
