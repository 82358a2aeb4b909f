// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod error;
pub mod model;
pub mod options;
pub mod predictor;
pub mod scrape;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::error::ApiError;
pub use crate::model::ModelState;
