//! Feature standardization fitted during training.
//!
//! `z[i] = (x[i] - mean[i]) / scale[i]`. The network was trained on
//! standardized inputs; feeding it raw values saturates the sigmoid.

use serde::{Deserialize, Serialize};

use super::encoding::FeatureEncoding;
use super::error::{ConfigError, InputError};
use super::patient::{ensure_finite, FEATURE_COUNT, FEATURE_NAMES};

/// Scaler parameters as exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub feature_encoding: FeatureEncoding,
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Validated, immutable standardization transform.
#[derive(Debug, Clone)]
pub struct FeatureScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
    encoding: FeatureEncoding,
}

impl FeatureScaler {
    /// Validate exported parameters.
    ///
    /// # Errors
    /// Returns `ConfigError` if lengths differ from the fitted feature count,
    /// feature names are out of order, or any mean/scale entry is unusable.
    pub fn new(params: ScalerParams) -> Result<Self, ConfigError> {
        let ScalerParams {
            feature_encoding,
            feature_names,
            mean,
            scale,
        } = params;

        feature_encoding.ensure_supported()?;

        if mean.len() != FEATURE_COUNT {
            return Err(ConfigError::FeatureCount {
                artifact: "scaler".into(),
                expected: FEATURE_COUNT,
                got: mean.len(),
            });
        }
        if scale.len() != mean.len() {
            return Err(ConfigError::LengthMismatch {
                field: "scaler.scale".into(),
                expected: mean.len(),
                got: scale.len(),
            });
        }

        // Names are optional in hand-written fixtures; when present they must match.
        if !feature_names.is_empty() {
            if feature_names.len() != FEATURE_COUNT {
                return Err(ConfigError::LengthMismatch {
                    field: "scaler.feature_names".into(),
                    expected: FEATURE_COUNT,
                    got: feature_names.len(),
                });
            }
            for (i, (got, expected)) in feature_names.iter().zip(FEATURE_NAMES).enumerate() {
                if got != expected {
                    return Err(ConfigError::MalformedArtifact {
                        artifact: "scaler".into(),
                        reason: format!(
                            "feature {i} is {got:?}, expected {expected:?} (field order drifted from training)"
                        ),
                    });
                }
            }
        }

        if mean.iter().any(|m| !m.is_finite()) {
            return Err(ConfigError::NonFiniteParameter("scaler.mean".into()));
        }
        for (index, &value) in scale.iter().enumerate() {
            if !value.is_finite() || value == 0.0 {
                return Err(ConfigError::InvalidScale {
                    index,
                    name: FEATURE_NAMES[index].to_string(),
                    value,
                });
            }
        }

        Ok(Self {
            mean,
            scale,
            encoding: feature_encoding,
        })
    }

    /// Number of features this scaler was fitted on.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.mean.len()
    }

    /// Encoding declared by the scaler artifact.
    #[must_use]
    pub fn encoding(&self) -> &FeatureEncoding {
        &self.encoding
    }

    /// Standardize one raw feature vector.
    ///
    /// # Errors
    /// Returns `InputError` on a length mismatch or a non-finite value.
    pub fn scale(&self, raw: &[f64]) -> Result<Vec<f64>, InputError> {
        if raw.len() != self.mean.len() {
            return Err(InputError::WrongLength {
                expected: self.mean.len(),
                got: raw.len(),
            });
        }
        ensure_finite(raw)?;

        Ok(raw
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::encoding::{ChestPainEncoding, ThalliumEncoding};

    fn encoding() -> FeatureEncoding {
        FeatureEncoding {
            version: 1,
            chest_pain: ChestPainEncoding::ZeroBased,
            thallium: ThalliumEncoding::Ordinal,
        }
    }

    fn params(mean: Vec<f64>, scale: Vec<f64>) -> ScalerParams {
        ScalerParams {
            feature_encoding: encoding(),
            feature_names: Vec::new(),
            mean,
            scale,
        }
    }

    fn fitted() -> FeatureScaler {
        let mean = vec![
            54.4, 0.68, 3.17, 131.6, 249.7, 0.15, 1.02, 149.7, 0.33, 1.05, 1.59, 0.67, 4.7,
        ];
        let scale = vec![
            9.1, 0.47, 0.95, 17.8, 51.7, 0.36, 1.0, 23.1, 0.47, 1.14, 0.61, 0.94, 1.94,
        ];
        FeatureScaler::new(params(mean, scale)).expect("valid scaler")
    }

    #[test]
    fn test_mean_maps_to_zero() {
        let scaler = fitted();
        let mean = scaler.mean.clone();
        let z = scaler.scale(&mean).expect("Should scale");
        assert!(z.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_scale_elementwise() {
        let scaler = fitted();
        let mut raw = scaler.mean.clone();
        raw[0] += 9.1;
        raw[4] -= 2.0 * 51.7;
        let z = scaler.scale(&raw).expect("Should scale");
        assert!((z[0] - 1.0).abs() < 1e-9);
        assert!((z[4] + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_wrong_length_input() {
        let scaler = fitted();
        for len in [12, 14] {
            let err = scaler.scale(&vec![1.0; len]).expect_err("must reject");
            assert_eq!(
                err,
                InputError::WrongLength {
                    expected: 13,
                    got: len
                }
            );
        }
    }

    #[test]
    fn test_rejects_infinite_input() {
        let scaler = fitted();
        let mut raw = vec![1.0; 13];
        raw[7] = f64::INFINITY;
        assert!(matches!(
            scaler.scale(&raw),
            Err(InputError::NonFinite {
                name: "max_heart_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_short_mean_is_config_error() {
        let err = FeatureScaler::new(params(vec![0.0; 10], vec![1.0; 10])).expect_err("10 means");
        assert!(matches!(
            err,
            ConfigError::FeatureCount {
                expected: 13,
                got: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_scale_is_config_error() {
        let mut scale = vec![1.0; 13];
        scale[5] = 0.0;
        let err = FeatureScaler::new(params(vec![0.0; 13], scale)).expect_err("zero std");
        assert!(matches!(err, ConfigError::InvalidScale { index: 5, .. }));
    }

    #[test]
    fn test_feature_order_drift_is_config_error() {
        let mut names: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        names.swap(2, 12);
        let p = ScalerParams {
            feature_names: names,
            ..params(vec![0.0; 13], vec![1.0; 13])
        };
        let err = FeatureScaler::new(p).expect_err("swapped names");
        assert!(err.to_string().contains("drifted"));
    }
}
