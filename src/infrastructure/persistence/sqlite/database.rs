//! SQLite Database - 数据库连接和迁移

use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;
use std::sync::Arc;

use super::{SqliteArtifactStore, SqliteBookRepository, SqliteReadingStateRepository};

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    pub database_url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./data/chapterwise.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            max_connections: 5,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:")
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 创建数据库连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let mut options = SqlitePoolOptions::new().max_connections(config.max_connections);

    // 内存数据库随连接销毁，保持唯一连接常驻
    if config.is_in_memory() {
        options = options.idle_timeout(None).max_lifetime(None);
    }

    let pool = options.connect(&config.database_url).await?;

    // 启用 WAL 模式，允许并发读写
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await?;

    // 设置 busy_timeout=5000ms，遇到锁时等待而不是立即失败
    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await?;

    // 设置同步模式为 NORMAL（平衡性能和安全性）
    sqlx::query("PRAGMA synchronous=NORMAL")
        .execute(&pool)
        .await?;

    tracing::info!(
        url = %config.database_url,
        max_connections = config.max_connections,
        "SQLite pool created with WAL mode and busy_timeout=5000ms"
    );

    Ok(pool)
}

/// 运行数据库迁移
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    // 创建 books 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL DEFAULT '',
            is_public_domain INTEGER NOT NULL DEFAULT 0,
            owner_id TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 创建 sections 表（区间为半开 [start_position, end_position)）
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sections (
            id TEXT PRIMARY KEY,
            book_id TEXT NOT NULL,
            order_index INTEGER NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            start_position INTEGER NOT NULL,
            end_position INTEGER NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE,
            UNIQUE (book_id, order_index)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 创建 artifacts 表（只追加）
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artifacts (
            id TEXT PRIMARY KEY,
            book_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            position INTEGER NOT NULL,
            payload TEXT NOT NULL,
            provider TEXT NOT NULL,
            input_hash TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 创建 reading_states 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reading_states (
            user_id TEXT NOT NULL,
            book_id TEXT NOT NULL,
            position INTEGER NOT NULL DEFAULT 0,
            progress INTEGER NOT NULL DEFAULT 0,
            last_read_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (user_id, book_id),
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 创建索引
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sections_book_end
        ON sections(book_id, end_position)
        "#,
    )
    .execute(pool)
    .await?;

    // 索引: 最佳前序查找 (book_id, kind, position DESC)
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_artifacts_lookup
        ON artifacts(book_id, kind, position)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed");
    Ok(())
}

/// 数据库句柄
///
/// 打开时建立连接池并运行迁移，各 Repository 共享同一连接池
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// 打开数据库
    pub async fn open(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = create_pool(config).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// 打开内存数据库（测试用）
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        Self::open(&DatabaseConfig::in_memory()).await
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn book_repository(&self) -> Arc<SqliteBookRepository> {
        Arc::new(SqliteBookRepository::new(self.pool.clone()))
    }

    pub fn artifact_store(&self) -> Arc<SqliteArtifactStore> {
        Arc::new(SqliteArtifactStore::new(self.pool.clone()))
    }

    pub fn reading_state_repository(&self) -> Arc<SqliteReadingStateRepository> {
        Arc::new(SqliteReadingStateRepository::new(self.pool.clone()))
    }

    /// 关闭连接池，等待进行中的操作完成
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory_db() {
        let config = DatabaseConfig::in_memory();
        let pool = create_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        // 迁移可重复执行
        run_migrations(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_open_file_db() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&DatabaseConfig::new(dir.path().join("test.db")))
            .await
            .unwrap();
        assert!(!db.pool().is_closed());
        db.close().await;
        assert!(db.pool().is_closed());
    }
}
