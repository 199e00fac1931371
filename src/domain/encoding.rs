//! Feature-encoding contract shared by the training export and the inference core.
//!
//! Two categorical features have been encoded differently across data sources:
//! chest-pain type (0-3 or 1-4) and thallium test result (1-3 or 3/6/7). The
//! encoding a model was trained with is therefore part of its artifacts. The
//! core never guesses or converts between encodings; it only checks that the
//! scaler and the model agree and validates inputs against the declared one.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// The only contract version this build understands.
pub const SUPPORTED_ENCODING_VERSION: u32 = 1;

/// Chest-pain type encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChestPainEncoding {
    /// 0 = typical angina .. 3 = asymptomatic
    ZeroBased,
    /// 1 = typical angina .. 4 = asymptomatic
    OneBased,
}

/// Thallium stress test result encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThalliumEncoding {
    /// 1 = normal, 2 = fixed defect, 3 = reversible defect
    Ordinal,
    /// 3 = normal, 6 = fixed defect, 7 = reversible defect
    Clinical,
}

/// Versioned feature-encoding contract declared by both artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureEncoding {
    pub version: u32,
    pub chest_pain: ChestPainEncoding,
    pub thallium: ThalliumEncoding,
}

impl FeatureEncoding {
    /// Accepted chest-pain codes.
    #[must_use]
    pub fn chest_pain_codes(&self) -> &'static [f64] {
        match self.chest_pain {
            ChestPainEncoding::ZeroBased => &[0.0, 1.0, 2.0, 3.0],
            ChestPainEncoding::OneBased => &[1.0, 2.0, 3.0, 4.0],
        }
    }

    /// Accepted thallium codes.
    #[must_use]
    pub fn thallium_codes(&self) -> &'static [f64] {
        match self.thallium {
            ThalliumEncoding::Ordinal => &[1.0, 2.0, 3.0],
            ThalliumEncoding::Clinical => &[3.0, 6.0, 7.0],
        }
    }

    /// Short form hint for the chest-pain field.
    #[must_use]
    pub fn chest_pain_hint(&self) -> &'static str {
        match self.chest_pain {
            ChestPainEncoding::ZeroBased => "0=typical 1=atypical 2=non-anginal 3=asympt.",
            ChestPainEncoding::OneBased => "1=typical 2=atypical 3=non-anginal 4=asympt.",
        }
    }

    /// Short form hint for the thallium field.
    #[must_use]
    pub fn thallium_hint(&self) -> &'static str {
        match self.thallium {
            ThalliumEncoding::Ordinal => "1=normal 2=fixed 3=reversible",
            ThalliumEncoding::Clinical => "3=normal 6=fixed 7=reversible",
        }
    }

    /// Reject contract versions this build does not implement.
    ///
    /// # Errors
    /// Returns `ConfigError::UnsupportedEncoding` for any other version.
    pub fn ensure_supported(&self) -> Result<(), ConfigError> {
        if self.version != SUPPORTED_ENCODING_VERSION {
            return Err(ConfigError::UnsupportedEncoding {
                got: self.version,
                supported: SUPPORTED_ENCODING_VERSION,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for FeatureEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cp = match self.chest_pain {
            ChestPainEncoding::ZeroBased => "cp:0-3",
            ChestPainEncoding::OneBased => "cp:1-4",
        };
        let thal = match self.thallium {
            ThalliumEncoding::Ordinal => "thal:1-3",
            ThalliumEncoding::Clinical => "thal:3/6/7",
        };
        write!(f, "v{} {cp} {thal}", self.version)
    }
}
