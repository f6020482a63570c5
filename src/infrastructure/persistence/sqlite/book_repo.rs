//! SQLite Book Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{BookRecord, BookRepositoryPort, RepositoryError, SectionRecord};
use crate::domain::book::Position;

/// SQLite Book Repository
pub struct SqliteBookRepository {
    pool: DbPool,
}

impl SqliteBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(super) fn parse_uuid(value: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(value).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

pub(super) fn parse_time(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

pub(super) fn db_error(err: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(err.to_string())
}

/// 位置写入 SQLite INTEGER，超出范围的值按上限处理
pub(super) fn sql_position(position: Position) -> i64 {
    i64::try_from(position.value()).unwrap_or(i64::MAX)
}

pub(super) fn position_from_sql(value: i64) -> Position {
    Position::new(u64::try_from(value).unwrap_or(0))
}

#[derive(FromRow)]
struct BookRow {
    id: String,
    title: String,
    author: String,
    is_public_domain: bool,
    owner_id: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<BookRow> for BookRecord {
    type Error = RepositoryError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Ok(BookRecord {
            id: parse_uuid(&row.id)?,
            title: row.title,
            author: row.author,
            is_public_domain: row.is_public_domain,
            owner_id: row.owner_id,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct SectionRow {
    id: String,
    book_id: String,
    order_index: i64,
    title: String,
    content: String,
    start_position: i64,
    end_position: i64,
}

impl TryFrom<SectionRow> for SectionRecord {
    type Error = RepositoryError;

    fn try_from(row: SectionRow) -> Result<Self, Self::Error> {
        Ok(SectionRecord {
            id: parse_uuid(&row.id)?,
            book_id: parse_uuid(&row.book_id)?,
            index: row.order_index as usize,
            title: row.title,
            content: row.content,
            start_position: position_from_sql(row.start_position),
            end_position: position_from_sql(row.end_position),
        })
    }
}

const SECTION_COLUMNS: &str =
    "id, book_id, order_index, title, content, start_position, end_position";

#[async_trait]
impl BookRepositoryPort for SqliteBookRepository {
    async fn save(&self, book: &BookRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, is_public_domain, owner_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                author = excluded.author,
                is_public_domain = excluded.is_public_domain,
                owner_id = excluded.owner_id,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(book.id.to_string())
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.is_public_domain)
        .bind(&book.owner_id)
        .bind(book.created_at.to_rfc3339())
        .bind(book.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookRecord>, RepositoryError> {
        let row: Option<BookRow> = sqlx::query_as(
            "SELECT id, title, author, is_public_domain, owner_id, created_at, updated_at FROM books WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(BookRecord::try_from).transpose()
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM books WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(found.is_some())
    }

    async fn find_all(&self) -> Result<Vec<BookRecord>, RepositoryError> {
        let rows: Vec<BookRow> = sqlx::query_as(
            "SELECT id, title, author, is_public_domain, owner_id, created_at, updated_at FROM books ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(BookRecord::try_from).collect()
    }

    async fn save_sections(&self, sections: &[SectionRecord]) -> Result<(), RepositoryError> {
        if sections.is_empty() {
            return Ok(());
        }

        // 使用事务批量插入
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        for section in sections {
            sqlx::query(
                r#"
                INSERT INTO sections (id, book_id, order_index, title, content, start_position, end_position)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(section.id.to_string())
            .bind(section.book_id.to_string())
            .bind(section.index as i64)
            .bind(&section.title)
            .bind(&section.content)
            .bind(sql_position(section.start_position))
            .bind(sql_position(section.end_position))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return RepositoryError::Duplicate(format!(
                            "section {} of book {}",
                            section.index, section.book_id
                        ));
                    }
                }
                db_error(e)
            })?;
        }

        tx.commit().await.map_err(db_error)?;

        tracing::debug!(count = sections.len(), "Sections saved");
        Ok(())
    }

    async fn find_sections_paginated(
        &self,
        book_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SectionRecord>, RepositoryError> {
        let rows: Vec<SectionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM sections WHERE book_id = ? ORDER BY order_index LIMIT ? OFFSET ?",
            SECTION_COLUMNS
        ))
        .bind(book_id.to_string())
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(SectionRecord::try_from).collect()
    }

    async fn find_sections_read_by(
        &self,
        book_id: Uuid,
        position: Position,
    ) -> Result<Vec<SectionRecord>, RepositoryError> {
        let rows: Vec<SectionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM sections WHERE book_id = ? AND end_position <= ? ORDER BY order_index",
            SECTION_COLUMNS
        ))
        .bind(book_id.to_string())
        .bind(sql_position(position))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(SectionRecord::try_from).collect()
    }

    async fn count_sections(&self, book_id: Uuid) -> Result<usize, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sections WHERE book_id = ?")
            .bind(book_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(count as usize)
    }

    async fn total_words(&self, book_id: Uuid) -> Result<Position, RepositoryError> {
        let (total,): (Option<i64>,) =
            sqlx::query_as("SELECT MAX(end_position) FROM sections WHERE book_id = ?")
                .bind(book_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(position_from_sql(total.unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::Database;

    fn book() -> BookRecord {
        let now = Utc::now();
        BookRecord {
            id: Uuid::new_v4(),
            title: "Persuasion".to_string(),
            author: "Jane Austen".to_string(),
            is_public_domain: true,
            owner_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn section(book_id: Uuid, index: usize, start: u64, end: u64) -> SectionRecord {
        SectionRecord {
            id: Uuid::new_v4(),
            book_id,
            index,
            title: format!("Section {}", index + 1),
            content: format!("content {}", index),
            start_position: Position::new(start),
            end_position: Position::new(end),
        }
    }

    #[tokio::test]
    async fn test_save_and_find_book() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.book_repository();
        let record = book();

        repo.save(&record).await.unwrap();

        let found = repo.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Persuasion");
        assert!(found.is_public_domain);
        assert!(repo.exists(record.id).await.unwrap());
        assert!(!repo.exists(Uuid::new_v4()).await.unwrap());
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sections_read_by_position() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.book_repository();
        let record = book();
        repo.save(&record).await.unwrap();
        repo.save_sections(&[
            section(record.id, 0, 0, 500),
            section(record.id, 1, 500, 1200),
        ])
        .await
        .unwrap();

        let none = repo.find_sections_read_by(record.id, Position::new(499)).await.unwrap();
        assert!(none.is_empty());

        let first = repo.find_sections_read_by(record.id, Position::new(500)).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].end_position, Position::new(500));

        let all = repo.find_sections_read_by(record.id, Position::new(5000)).await.unwrap();
        assert_eq!(all.iter().map(|s| s.index).collect::<Vec<_>>(), vec![0, 1]);

        for far in [u64::MAX, 1 << 63] {
            let past_end = repo.find_sections_read_by(record.id, Position::new(far)).await.unwrap();
            assert_eq!(past_end.len(), 2);
        }

        assert_eq!(repo.count_sections(record.id).await.unwrap(), 2);
        assert_eq!(repo.total_words(record.id).await.unwrap(), Position::new(1200));
        assert_eq!(repo.total_words(Uuid::new_v4()).await.unwrap(), Position::ZERO);
    }

    #[tokio::test]
    async fn test_sections_paginated() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.book_repository();
        let record = book();
        repo.save(&record).await.unwrap();
        let sections: Vec<_> = (0..5)
            .map(|i| section(record.id, i, i as u64 * 10, i as u64 * 10 + 10))
            .collect();
        repo.save_sections(&sections).await.unwrap();

        let page = repo.find_sections_paginated(record.id, 2, 2).await.unwrap();
        assert_eq!(page.iter().map(|s| s.index).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_duplicate_section_index_rejected() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.book_repository();
        let record = book();
        repo.save(&record).await.unwrap();
        repo.save_sections(&[section(record.id, 0, 0, 10)]).await.unwrap();

        let err = repo
            .save_sections(&[section(record.id, 0, 0, 10)])
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(_)));
    }
}
