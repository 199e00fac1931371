//! JSON artifact adapter: Implementation of ArtifactSource over a model directory.
//!
//! Layout produced by the training export:
//!
//! ```text
//! models/
//!   model.json      network layers + feature encoding
//!   scaler.json     mean / scale + feature encoding
//!   manifest.json   optional, SHA-256 digest of each artifact
//! ```
//!
//! # Integrity
//!
//! When `manifest.json` is present, every file it lists must exist and hash
//! to the recorded digest, and both artifacts must be listed. The manifest is
//! read once per load and digests are checked on the same bytes that are then
//! parsed. Entries must be plain file names inside the model directory. With
//! `require_manifest`, a missing manifest refuses the load.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{ConfigError, NetworkParams, ScalerParams};
use crate::ports::ArtifactSource;

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Only manifest layout this build reads.
pub const MANIFEST_VERSION: u32 = 1;

/// Digest manifest binding artifact files by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

impl ArtifactManifest {
    /// Build a manifest for `names` inside `dir`.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingArtifact` if a file cannot be read.
    pub fn for_files(dir: &Path, names: &[&str]) -> Result<Self, ConfigError> {
        let mut files = BTreeMap::new();
        for name in names {
            let path = dir.join(name);
            let bytes = fs::read(&path)
                .map_err(|e| ConfigError::MissingArtifact(format!("{}: {e}", path.display())))?;
            files.insert((*name).to_string(), sha256_hex(&bytes));
        }
        Ok(Self {
            version: MANIFEST_VERSION,
            files,
        })
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// File-backed artifact store.
#[derive(Debug, Clone)]
pub struct JsonArtifactStore {
    dir: PathBuf,
    model_file: String,
    scaler_file: String,
    require_manifest: bool,
}

impl JsonArtifactStore {
    /// Store reading `model.json` and `scaler.json` from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            model_file: MODEL_FILE.to_string(),
            scaler_file: SCALER_FILE.to_string(),
            require_manifest: false,
        }
    }

    /// Use different artifact file names inside the directory.
    #[must_use]
    pub fn with_file_names(mut self, model_file: &str, scaler_file: &str) -> Self {
        self.model_file = model_file.to_string();
        self.scaler_file = scaler_file.to_string();
        self
    }

    /// Refuse to load unless a manifest binds both artifacts.
    #[must_use]
    pub fn require_manifest(mut self, required: bool) -> Self {
        self.require_manifest = required;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_manifest(&self) -> Result<Option<ArtifactManifest>, ConfigError> {
        let path = self.dir.join(MANIFEST_FILE);
        if !path.exists() {
            if self.require_manifest {
                tracing::error!("Integrity manifest not found at {:?}", path);
                return Err(ConfigError::MissingManifest(path.display().to_string()));
            }
            tracing::debug!("No manifest at {:?}; skipping digest verification", path);
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(|e| {
            ConfigError::IntegrityCheck(format!("failed to read {}: {e}", path.display()))
        })?;
        let manifest: ArtifactManifest = serde_json::from_slice(&bytes)
            .map_err(|e| ConfigError::IntegrityCheck(format!("invalid manifest format: {e}")))?;

        if manifest.version != MANIFEST_VERSION {
            return Err(ConfigError::IntegrityCheck(format!(
                "unsupported manifest version {}",
                manifest.version
            )));
        }
        for required in [&self.model_file, &self.scaler_file] {
            if !manifest.files.contains_key(required) {
                return Err(ConfigError::IntegrityCheck(format!(
                    "manifest does not bind {required}"
                )));
            }
        }

        Ok(Some(manifest))
    }

    fn read_artifact(&self, name: &str) -> Result<Vec<u8>, ConfigError> {
        let path = self.dir.join(name);
        fs::read(&path)
            .map_err(|e| ConfigError::MissingArtifact(format!("{}: {e}", path.display())))
    }

    /// Read a manifest entry that is not one of the loaded artifacts.
    fn read_listed(&self, name: &str) -> Result<Vec<u8>, ConfigError> {
        let mut components = Path::new(name).components();
        let plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain {
            return Err(ConfigError::IntegrityCheck(format!(
                "manifest entry {name:?} is not a file name"
            )));
        }

        let path = self.dir.join(name);
        fs::read(&path).map_err(|e| {
            ConfigError::IntegrityCheck(format!("listed file {} unreadable: {e}", path.display()))
        })
    }

    /// Check every manifest entry. `loaded` holds artifacts already in memory
    /// so their digests are taken over the exact bytes that will be parsed.
    fn verify(
        &self,
        manifest: &ArtifactManifest,
        loaded: &[(&str, &[u8])],
    ) -> Result<(), ConfigError> {
        for (name, expected) in &manifest.files {
            let actual = match loaded.iter().find(|(n, _)| *n == name.as_str()) {
                Some((_, bytes)) => sha256_hex(bytes),
                None => sha256_hex(&self.read_listed(name)?),
            };
            if !expected.eq_ignore_ascii_case(&actual) {
                tracing::error!("Digest mismatch for {}", name);
                return Err(ConfigError::IntegrityCheck(format!(
                    "digest mismatch for {name}"
                )));
            }
            tracing::debug!("Verified digest of {}", name);
        }
        Ok(())
    }

    /// Read the named artifacts under a single manifest check.
    fn read_verified<const N: usize>(&self, names: [&str; N]) -> Result<[Vec<u8>; N], ConfigError> {
        let manifest = self.read_manifest()?;

        let mut contents: [Vec<u8>; N] = std::array::from_fn(|_| Vec::new());
        for (slot, name) in contents.iter_mut().zip(names) {
            *slot = self.read_artifact(name)?;
        }

        if let Some(manifest) = manifest {
            let loaded: Vec<(&str, &[u8])> = names
                .iter()
                .zip(&contents)
                .map(|(name, bytes)| (*name, bytes.as_slice()))
                .collect();
            self.verify(&manifest, &loaded)?;
            tracing::info!(
                "Verified {} file(s) against {}",
                manifest.files.len(),
                MANIFEST_FILE
            );
        }

        Ok(contents)
    }
}

fn parse<T: DeserializeOwned>(artifact: &str, bytes: &[u8]) -> Result<T, ConfigError> {
    serde_json::from_slice(bytes).map_err(|e| ConfigError::MalformedArtifact {
        artifact: artifact.to_string(),
        reason: e.to_string(),
    })
}

impl ArtifactSource for JsonArtifactStore {
    fn describe(&self) -> String {
        format!(
            "{} ({}, {})",
            self.dir.display(),
            self.model_file,
            self.scaler_file
        )
    }

    fn load_scaler(&self) -> Result<ScalerParams, ConfigError> {
        let [bytes] = self.read_verified([self.scaler_file.as_str()])?;
        let params: ScalerParams = parse("scaler", &bytes)?;
        tracing::info!(
            "Loaded scaler from {:?} (n_features={}, encoding={})",
            self.dir.join(&self.scaler_file),
            params.mean.len(),
            params.feature_encoding
        );
        Ok(params)
    }

    fn load_network(&self) -> Result<NetworkParams, ConfigError> {
        let [bytes] = self.read_verified([self.model_file.as_str()])?;
        let params: NetworkParams = parse("model", &bytes)?;
        tracing::info!(
            "Loaded model from {:?} (layers={}, encoding={})",
            self.dir.join(&self.model_file),
            params.layers.len(),
            params.feature_encoding
        );
        Ok(params)
    }

    fn load_artifacts(&self) -> Result<(ScalerParams, NetworkParams), ConfigError> {
        let [scaler_bytes, model_bytes] =
            self.read_verified([self.scaler_file.as_str(), self.model_file.as_str()])?;
        let scaler: ScalerParams = parse("scaler", &scaler_bytes)?;
        let network: NetworkParams = parse("model", &model_bytes)?;
        tracing::info!(
            "Loaded artifacts from {} (n_features={}, layers={}, encoding={})",
            self.dir.display(),
            scaler.mean.len(),
            network.layers.len(),
            network.feature_encoding
        );
        Ok((scaler, network))
    }
}
