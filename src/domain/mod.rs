//! Domain layer: Core screening types and logic.
//!
//! Pure Rust types with no I/O. Parameter types validate themselves on
//! construction so that a loaded model is always well-formed.

mod assessment;
pub mod encoding;
mod error;
pub mod network;
mod patient;
mod scaler;

pub use assessment::{Assessment, DecisionPolicy, Prediction, RiskLevel, DEFAULT_THRESHOLD, DISCLAIMER};
pub use encoding::{ChestPainEncoding, FeatureEncoding, ThalliumEncoding};
pub use error::{ConfigError, InputError};
pub use network::{Activation, LayerParams, NetworkParams, RiskNetwork, ARCHITECTURE};
pub use patient::{ensure_finite, PatientData, PatientFeatures, FEATURE_COUNT, FEATURE_NAMES};
pub use scaler::{FeatureScaler, ScalerParams};
