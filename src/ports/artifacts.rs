//! Artifact source port: Trait for obtaining learned parameters.
//!
//! The core does not care how artifacts are encoded or where they live, only
//! that the decoded parameters have the expected shape. Implementations must
//! fail rather than return partial parameters.

use crate::domain::{ConfigError, NetworkParams, ScalerParams};

/// Source of the two artifacts produced by offline training.
pub trait ArtifactSource: Send + Sync {
    /// Human-readable location, for diagnostics.
    fn describe(&self) -> String;

    /// Load the standardization parameters.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingArtifact` or `ConfigError::MalformedArtifact`.
    fn load_scaler(&self) -> Result<ScalerParams, ConfigError>;

    /// Load the network parameters.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingArtifact` or `ConfigError::MalformedArtifact`.
    fn load_network(&self) -> Result<NetworkParams, ConfigError>;

    /// Load both artifacts as one consistent pair.
    ///
    /// Sources that verify artifacts together (e.g. against a digest manifest)
    /// override this so the pair is checked under a single verification.
    ///
    /// # Errors
    /// Any error of [`Self::load_scaler`] or [`Self::load_network`].
    fn load_artifacts(&self) -> Result<(ScalerParams, NetworkParams), ConfigError> {
        Ok((self.load_scaler()?, self.load_network()?))
    }
}

/// Artifacts already decoded in memory.
///
/// Useful for embedding parameters in tests or in a host that decodes its own
/// format.
#[derive(Debug, Clone)]
pub struct InMemoryArtifacts {
    pub scaler: ScalerParams,
    pub network: NetworkParams,
}

impl ArtifactSource for InMemoryArtifacts {
    fn describe(&self) -> String {
        "in-memory artifacts".to_string()
    }

    fn load_scaler(&self) -> Result<ScalerParams, ConfigError> {
        Ok(self.scaler.clone())
    }

    fn load_network(&self) -> Result<NetworkParams, ConfigError> {
        Ok(self.network.clone())
    }
}
