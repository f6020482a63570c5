//! SQLite Artifact Store
//!
//! 产物内容以 JSON 存储在 payload 列，按 (book_id, kind, position) 建索引

use async_trait::async_trait;
use sqlx::FromRow;

use super::book_repo::{db_error, parse_time, parse_uuid, position_from_sql, sql_position};
use super::DbPool;
use crate::application::ports::{ArtifactStorePort, RepositoryError};
use crate::domain::artifact::{Artifact, ArtifactKind, ArtifactPayload};
use crate::domain::book::{BookId, Position};

/// SQLite Artifact Store
pub struct SqliteArtifactStore {
    pool: DbPool,
}

impl SqliteArtifactStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ArtifactRow {
    id: String,
    book_id: String,
    kind: String,
    position: i64,
    payload: String,
    provider: String,
    input_hash: String,
    created_at: String,
}

impl TryFrom<ArtifactRow> for Artifact {
    type Error = RepositoryError;

    fn try_from(row: ArtifactRow) -> Result<Self, Self::Error> {
        let kind = ArtifactKind::from_str(&row.kind).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown artifact kind: {}", row.kind))
        })?;
        let payload: ArtifactPayload = serde_json::from_str(&row.payload)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
        if payload.kind() != kind {
            return Err(RepositoryError::SerializationError(format!(
                "payload kind {} does not match column kind {}",
                payload.kind(),
                kind
            )));
        }

        Ok(Artifact::restore(
            parse_uuid(&row.id)?,
            BookId::from_uuid(parse_uuid(&row.book_id)?),
            position_from_sql(row.position),
            payload,
            row.provider,
            row.input_hash,
            parse_time(&row.created_at)?,
        ))
    }
}

#[async_trait]
impl ArtifactStorePort for SqliteArtifactStore {
    async fn find_best_prior(
        &self,
        book_id: &BookId,
        kind: ArtifactKind,
        position: Position,
    ) -> Result<Option<Artifact>, RepositoryError> {
        let row: Option<ArtifactRow> = sqlx::query_as(
            r#"
            SELECT id, book_id, kind, position, payload, provider, input_hash, created_at
            FROM artifacts
            WHERE book_id = ? AND kind = ? AND position <= ?
            ORDER BY position DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(book_id.to_string())
        .bind(kind.as_str())
        .bind(sql_position(position))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(Artifact::try_from).transpose()
    }

    async fn insert(&self, artifact: &Artifact) -> Result<(), RepositoryError> {
        let payload = serde_json::to_string(artifact.payload())
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO artifacts (id, book_id, kind, position, payload, provider, input_hash, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(artifact.id().to_string())
        .bind(artifact.book_id().to_string())
        .bind(artifact.kind().as_str())
        .bind(sql_position(artifact.position()))
        .bind(payload)
        .bind(artifact.provider())
        .bind(artifact.input_hash())
        .bind(artifact.created_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }
}
