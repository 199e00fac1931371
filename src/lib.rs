//! # CardioScreen
//!
//! Heart disease risk screening from thirteen clinical measurements.
//!
//! This crate provides:
//! - Feature standardization with parameters fitted during training
//! - A dense 13-64-32-1 network producing a risk probability
//! - A configurable decision threshold turning that probability into a risk level
//! - A terminal front-end for local use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types and transforms (patient features, scaler, network, decision)
//! - `ports`: Trait definitions for obtaining artifacts
//! - `adapters`: Concrete implementations (JSON model directory, log sanitization)
//! - `application`: The inference context and the load-once screening service
//! - `config`: Front-end settings read from the environment
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use application::{InferenceContext, ScreeningService};
pub use domain::{Assessment, ConfigError, DecisionPolicy, InputError, PatientData, RiskLevel};

/// Result type for CardioScreen operations
pub type Result<T> = std::result::Result<T, CardioError>;

/// Main error type for CardioScreen
#[derive(Debug, thiserror::Error)]
pub enum CardioError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Model not loaded")]
    NotReady,
}
