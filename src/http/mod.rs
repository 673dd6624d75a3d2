//! HTTP boundary: per-scenario sessions and response normalization

pub mod envelope;
pub mod session;

pub use session::{ApiResponse, ApiSession, SessionOptions};
