//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with model status and session counts
//! - Patient data input
//! - Assessment result with guidance

mod app;
mod styles;
mod ui;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
