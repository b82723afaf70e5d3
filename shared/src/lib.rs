//! Shared types for the ration distribution backend
//!
//! Common types used across crates: domain models, the API response
//! envelope, and ID/time utilities.

pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use response::ApiResponse;
