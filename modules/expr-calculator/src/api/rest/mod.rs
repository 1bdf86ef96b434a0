pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

pub use error::ApiError;
pub use routes::{ApiDoc, register_routes};
