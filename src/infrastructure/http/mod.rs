//! HTTP Layer - RESTful API
//!
//! 统一响应信封 `{errno, error, data}`，路由见 routes.rs

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
