//! Application layer: Use cases and services.
//!
//! This module composes the domain transforms into the screening pipeline
//! and manages the lifetime of the loaded parameters.

mod inference;
mod service;

pub use inference::InferenceContext;
pub use service::{ModelSummary, ScreeningService};
