//! SQLite Persistence - SQLite 数据库持久化实现

mod artifact_store;
mod book_repo;
mod database;
mod reading_state_repo;

pub use artifact_store::*;
pub use book_repo::SqliteBookRepository;
pub use database::*;
pub use reading_state_repo::*;
