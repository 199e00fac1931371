//! Ports layer: Trait definitions for external operations.
//!
//! These traits define the boundary between the screening core and the
//! places its learned parameters come from.

mod artifacts;

pub use artifacts::{ArtifactSource, InMemoryArtifacts};
