//! Request and response bodies.

pub mod request;
pub mod response;

pub use request::UpsertAccountRequest;
pub use response::{ApiResponse, HealthResponse, LinkedAccountResponse};
