//! Adapters layer: Concrete implementations of ports.
//!
//! - `json`: model directory of JSON artifacts with an optional digest manifest
//! - `sanitize`: patient data filtering for logs

pub mod json;
pub mod sanitize;

pub use json::JsonArtifactStore;
