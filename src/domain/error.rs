//! Error taxonomy for the screening core.
//!
//! Two families, with different blast radius:
//! - [`ConfigError`]: raised while loading artifacts. Fatal; no prediction may
//!   be served until the artifacts are corrected.
//! - [`InputError`]: raised for a single request. Only that request is rejected.

/// Load-time configuration failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Artifact not found: {0}")]
    MissingArtifact(String),

    #[error("Malformed {artifact} artifact: {reason}")]
    MalformedArtifact { artifact: String, reason: String },

    #[error("{artifact} declares {got} features, expected {expected}")]
    FeatureCount {
        artifact: String,
        expected: usize,
        got: usize,
    },

    #[error("{field} has length {got}, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        got: usize,
    },

    #[error("Scaler standard deviation for feature {index} ({name}) is {value}; must be finite and non-zero")]
    InvalidScale {
        index: usize,
        name: String,
        value: f64,
    },

    #[error("Non-finite parameter in {0}")]
    NonFiniteParameter(String),

    #[error("Network architecture mismatch: {0}")]
    Architecture(String),

    #[error("Feature encoding mismatch: scaler declares {scaler}, model declares {model}")]
    EncodingMismatch { scaler: String, model: String },

    #[error("Unsupported feature encoding version {got} (supported: {supported})")]
    UnsupportedEncoding { got: u32, supported: u32 },

    #[error("Artifact integrity check failed: {0}")]
    IntegrityCheck(String),

    #[error("Integrity manifest required but not found at {0}")]
    MissingManifest(String),

    #[error("Decision threshold {0} must lie strictly between 0 and 1")]
    InvalidThreshold(f64),

    #[error("Invalid value {value:?} for {name}")]
    InvalidSetting { name: String, value: String },
}

/// Per-request input rejection.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("Expected {expected} features, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("Feature {name} is not a finite number ({value})")]
    NonFinite { name: &'static str, value: f64 },

    #[error("{name} {value} out of range [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{name} {value} is not one of {allowed}")]
    NotAllowed {
        name: &'static str,
        value: f64,
        allowed: &'static str,
    },

    #[error("Input overflows layer {layer} of the network")]
    Overflow { layer: usize },

    #[error("Invalid patient data: {}", join_messages(.0))]
    Multiple(Vec<InputError>),
}

fn join_messages(findings: &[InputError]) -> String {
    findings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl InputError {
    /// Flatten a list of findings into a single error.
    ///
    /// A single finding is returned as-is rather than wrapped.
    #[must_use]
    pub fn from_findings(mut findings: Vec<InputError>) -> Option<Self> {
        match findings.len() {
            0 => None,
            1 => findings.pop(),
            _ => Some(Self::Multiple(findings)),
        }
    }

    /// Individual messages, for display next to a form.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Multiple(inner) => inner.iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        }
    }
}
