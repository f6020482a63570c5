//! SQLite Reading State Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::book_repo::{db_error, parse_time, parse_uuid, position_from_sql, sql_position};
use super::DbPool;
use crate::application::ports::{ReadingStateRecord, ReadingStateRepositoryPort, RepositoryError};

/// SQLite Reading State Repository
pub struct SqliteReadingStateRepository {
    pool: DbPool,
}

impl SqliteReadingStateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ReadingStateRow {
    user_id: String,
    book_id: String,
    position: i64,
    progress: i64,
    last_read_at: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ReadingStateRow> for ReadingStateRecord {
    type Error = RepositoryError;

    fn try_from(row: ReadingStateRow) -> Result<Self, Self::Error> {
        Ok(ReadingStateRecord {
            user_id: row.user_id,
            book_id: parse_uuid(&row.book_id)?,
            position: position_from_sql(row.position),
            progress: row.progress.clamp(0, 100) as u8,
            last_read_at: parse_time(&row.last_read_at)?,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

#[async_trait]
impl ReadingStateRepositoryPort for SqliteReadingStateRepository {
    async fn upsert(
        &self,
        state: &ReadingStateRecord,
    ) -> Result<ReadingStateRecord, RepositoryError> {
        let row: ReadingStateRow = sqlx::query_as(
            r#"
            INSERT INTO reading_states (user_id, book_id, position, progress, last_read_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, book_id) DO UPDATE SET
                position = excluded.position,
                progress = excluded.progress,
                last_read_at = excluded.last_read_at,
                updated_at = excluded.updated_at
            RETURNING user_id, book_id, position, progress, last_read_at, created_at, updated_at
            "#,
        )
        .bind(&state.user_id)
        .bind(state.book_id.to_string())
        .bind(sql_position(state.position))
        .bind(i64::from(state.progress))
        .bind(state.last_read_at.to_rfc3339())
        .bind(state.created_at.to_rfc3339())
        .bind(state.updated_at.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        ReadingStateRecord::try_from(row)
    }

    async fn find(
        &self,
        user_id: &str,
        book_id: Uuid,
    ) -> Result<Option<ReadingStateRecord>, RepositoryError> {
        let row: Option<ReadingStateRow> = sqlx::query_as(
            r#"
            SELECT user_id, book_id, position, progress, last_read_at, created_at, updated_at
            FROM reading_states
            WHERE user_id = ? AND book_id = ?
            "#,
        )
        .bind(user_id)
        .bind(book_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ReadingStateRecord::try_from).transpose()
    }
}
