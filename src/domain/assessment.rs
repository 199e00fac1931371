//! Risk decision and assessment result types.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Probability above which a patient is flagged as high risk.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Binary risk classification for heart disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Clinical markers suggest a lower probability of heart disease
    Low,
    /// Clinical markers correlate with heart disease patterns
    High,
}

impl RiskLevel {
    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Clinical markers suggest a lower probability of heart disease.",
            Self::High => "Clinical indicators show high correlation with heart disease patterns.",
        }
    }

    /// Heading for the guidance block.
    #[must_use]
    pub fn guidance_title(&self) -> &'static str {
        match self {
            Self::Low => "Preventive Recommendations",
            Self::High => "Urgent Recommendations",
        }
    }

    /// Static clinical guidance for this risk level.
    #[must_use]
    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            Self::Low => &[
                "Maintain 150 minutes of moderate aerobic activity weekly.",
                "Continue a heart-healthy diet (Mediterranean/DASH).",
                "Schedule annual cardiovascular wellness screenings.",
            ],
            Self::High => &[
                "Immediate referral to a cardiologist for diagnostic correlation.",
                "Evaluate for Stress ECG or Echocardiogram.",
                "Strict monitoring of lipid profile and blood pressure.",
            ],
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (42, 157, 143),  // #2A9D8F
            Self::High => (214, 40, 40),  // #D62828
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Footer shown with every result.
pub const DISCLAIMER: &str = "This tool is for educational/screening purposes and does not replace professional medical diagnosis.";

/// Thresholding policy turning a probability into a [`RiskLevel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    threshold: f64,
}

impl DecisionPolicy {
    /// Create a policy with a custom threshold.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidThreshold` unless `0 < threshold < 1`.
    pub fn new(threshold: f64) -> Result<Self, ConfigError> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// HIGH iff `probability > threshold`; the threshold itself maps to LOW.
    #[must_use]
    pub fn classify(&self, probability: f64) -> Prediction {
        let risk_level = if probability > self.threshold {
            RiskLevel::High
        } else {
            RiskLevel::Low
        };
        Prediction {
            probability,
            risk_level,
        }
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Output of one forward pass after thresholding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Probability of heart disease (0.0 to 1.0)
    pub probability: f64,

    /// Thresholded classification
    pub risk_level: RiskLevel,
}

/// One screening result, ready for presentation. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Unique identifier
    pub id: String,

    /// Reference to patient (if available)
    pub patient_id: Option<String>,

    /// The thresholded prediction
    pub prediction: Prediction,

    /// Threshold the prediction was classified with
    pub threshold: f64,

    /// Timestamp of assessment
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    /// Create a new assessment from a prediction.
    #[must_use]
    pub fn new(prediction: Prediction, threshold: f64) -> Self {
        Self {
            id: uuid_v4(),
            patient_id: None,
            prediction,
            threshold,
            created_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        self.prediction.risk_level
    }

    #[must_use]
    pub fn probability(&self) -> f64 {
        self.prediction.probability
    }
}

/// Generate a random UUID v4 from a CSPRNG seeded with OS entropy.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}
