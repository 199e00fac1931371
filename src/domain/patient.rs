//! Patient data types for heart disease risk screening.
//!
//! Thirteen clinical measurements in the order the scaler and the network
//! were fitted with (Cleveland/Statlog heart disease attributes).

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::encoding::FeatureEncoding;
use super::error::InputError;

/// Number of clinical features consumed by the model.
pub const FEATURE_COUNT: usize = 13;

/// Feature names in fitted order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "sex",
    "chest_pain",
    "resting_bp",
    "cholesterol",
    "fasting_blood_sugar",
    "resting_ecg",
    "max_heart_rate",
    "exercise_angina",
    "st_depression",
    "st_slope",
    "major_vessels",
    "thallium",
];

/// Raw patient data entered in the front-end.
///
/// Callers holding a record after assessment should `zeroize()` it.
#[derive(Debug, Clone, Serialize, Deserialize, Zeroize)]
pub struct PatientData {
    /// Patient identifier (local only, never logged)
    pub id: Option<String>,

    /// Clinical features for prediction
    pub features: PatientFeatures,

    /// Timestamp of data entry
    #[zeroize(skip)]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Clinical features for heart disease prediction.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Zeroize)]
pub struct PatientFeatures {
    /// Age in years
    pub age: f64,

    /// Sex: 0 = female, 1 = male
    pub sex: f64,

    /// Chest pain type, coded per the model's [`FeatureEncoding`]
    pub chest_pain: f64,

    /// Resting blood pressure in mmHg
    pub resting_bp: f64,

    /// Serum cholesterol in mg/dL
    pub cholesterol: f64,

    /// Fasting blood sugar > 120 mg/dL: 0 = no, 1 = yes
    pub fasting_blood_sugar: f64,

    /// Resting ECG: 0 = normal, 1 = ST-T abnormality, 2 = LV hypertrophy
    pub resting_ecg: f64,

    /// Maximum heart rate achieved (bpm)
    pub max_heart_rate: f64,

    /// Exercise-induced angina: 0 = no, 1 = yes
    pub exercise_angina: f64,

    /// ST depression induced by exercise relative to rest
    pub st_depression: f64,

    /// Slope of the peak exercise ST segment (ordinal)
    pub st_slope: f64,

    /// Number of major vessels colored by fluoroscopy (0-3)
    pub major_vessels: f64,

    /// Thallium stress test result, coded per the model's [`FeatureEncoding`]
    pub thallium: f64,
}

type Field = fn(&PatientFeatures) -> f64;

/// Inclusive sanity bounds for continuous and ordinal features.
///
/// Each bound reads its field by name, so the table does not depend on
/// feature order.
struct Bound {
    name: &'static str,
    field: Field,
    min: f64,
    max: f64,
}

const BOUNDS: [Bound; 8] = [
    Bound { name: "age", field: |f| f.age, min: 18.0, max: 120.0 },
    Bound { name: "resting_bp", field: |f| f.resting_bp, min: 50.0, max: 250.0 },
    Bound { name: "cholesterol", field: |f| f.cholesterol, min: 80.0, max: 700.0 },
    Bound { name: "resting_ecg", field: |f| f.resting_ecg, min: 0.0, max: 2.0 },
    Bound { name: "max_heart_rate", field: |f| f.max_heart_rate, min: 40.0, max: 250.0 },
    Bound { name: "st_depression", field: |f| f.st_depression, min: 0.0, max: 10.0 },
    Bound { name: "st_slope", field: |f| f.st_slope, min: 0.0, max: 3.0 },
    Bound { name: "major_vessels", field: |f| f.major_vessels, min: 0.0, max: 3.0 },
];

const BINARY: [(&str, Field); 3] = [
    ("sex", |f| f.sex),
    ("fasting_blood_sugar", |f| f.fasting_blood_sugar),
    ("exercise_angina", |f| f.exercise_angina),
];

/// Reject NaN and infinities, naming the offending feature.
///
/// # Errors
/// Returns `InputError::NonFinite` for the first non-finite value.
pub fn ensure_finite(values: &[f64]) -> Result<(), InputError> {
    for (i, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(InputError::NonFinite {
                name: FEATURE_NAMES.get(i).copied().unwrap_or("feature"),
                value,
            });
        }
    }
    Ok(())
}

impl PatientFeatures {
    /// Convert features to a vector for inference, in fitted order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.age,
            self.sex,
            self.chest_pain,
            self.resting_bp,
            self.cholesterol,
            self.fasting_blood_sugar,
            self.resting_ecg,
            self.max_heart_rate,
            self.exercise_angina,
            self.st_depression,
            self.st_slope,
            self.major_vessels,
            self.thallium,
        ]
    }

    /// Create features from a vector in fitted order.
    ///
    /// # Errors
    /// Returns `InputError::WrongLength` unless exactly 13 values are given.
    pub fn from_vec(v: &[f64]) -> Result<Self, InputError> {
        if v.len() != FEATURE_COUNT {
            return Err(InputError::WrongLength {
                expected: FEATURE_COUNT,
                got: v.len(),
            });
        }

        Ok(Self {
            age: v[0],
            sex: v[1],
            chest_pain: v[2],
            resting_bp: v[3],
            cholesterol: v[4],
            fasting_blood_sugar: v[5],
            resting_ecg: v[6],
            max_heart_rate: v[7],
            exercise_angina: v[8],
            st_depression: v[9],
            st_slope: v[10],
            major_vessels: v[11],
            thallium: v[12],
        })
    }

    /// Validate every feature against its clinically sane range.
    ///
    /// Chest-pain and thallium codes are checked against `encoding`.
    /// All findings are collected, not just the first.
    ///
    /// # Errors
    /// Returns the collected `InputError`s.
    pub fn validate(&self, encoding: &FeatureEncoding) -> Result<(), InputError> {
        ensure_finite(&self.to_vec())?;

        let mut findings = Vec::new();

        for bound in &BOUNDS {
            let value = (bound.field)(self);
            if !(bound.min..=bound.max).contains(&value) {
                findings.push(InputError::OutOfRange {
                    name: bound.name,
                    value,
                    min: bound.min,
                    max: bound.max,
                });
            }
        }

        for &(name, field) in &BINARY {
            let value = field(self);
            if value != 0.0 && value != 1.0 {
                findings.push(InputError::NotAllowed {
                    name,
                    value,
                    allowed: "{0, 1}",
                });
            }
        }

        if !encoding.chest_pain_codes().contains(&self.chest_pain) {
            findings.push(InputError::NotAllowed {
                name: "chest_pain",
                value: self.chest_pain,
                allowed: encoding.chest_pain_hint(),
            });
        }
        if !encoding.thallium_codes().contains(&self.thallium) {
            findings.push(InputError::NotAllowed {
                name: "thallium",
                value: self.thallium,
                allowed: encoding.thallium_hint(),
            });
        }

        match InputError::from_findings(findings) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl PatientData {
    /// Create new patient data with the given features.
    #[must_use]
    pub fn new(features: PatientFeatures) -> Self {
        Self {
            id: None,
            features,
            created_at: chrono::Utc::now(),
        }
    }

    /// Create new patient data with an ID.
    #[must_use]
    pub fn with_id(id: impl Into<String>, features: PatientFeatures) -> Self {
        Self {
            id: Some(id.into()),
            features,
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::encoding::{ChestPainEncoding, ThalliumEncoding};

    fn zero_based() -> FeatureEncoding {
        FeatureEncoding {
            version: 1,
            chest_pain: ChestPainEncoding::ZeroBased,
            thallium: ThalliumEncoding::Ordinal,
        }
    }

    fn sample() -> PatientFeatures {
        PatientFeatures {
            age: 55.0,
            sex: 1.0,
            chest_pain: 0.0,
            resting_bp: 120.0,
            cholesterol: 240.0,
            fasting_blood_sugar: 0.0,
            resting_ecg: 0.0,
            max_heart_rate: 150.0,
            exercise_angina: 0.0,
            st_depression: 1.0,
            st_slope: 1.0,
            major_vessels: 0.0,
            thallium: 2.0,
        }
    }

    #[test]
    fn test_features_to_vec() {
        let vec = sample().to_vec();
        assert_eq!(vec.len(), FEATURE_COUNT);
        assert!((vec[0] - 55.0).abs() < f64::EPSILON);
        assert!((vec[12] - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_features_from_vec() {
        let features = PatientFeatures::from_vec(&sample().to_vec()).expect("Should parse");
        assert_eq!(features, sample());

        let err = PatientFeatures::from_vec(&[0.0; 12]).expect_err("12 values");
        assert_eq!(
            err,
            InputError::WrongLength {
                expected: 13,
                got: 12
            }
        );
    }

    #[test]
    fn test_validation() {
        assert!(sample().validate(&zero_based()).is_ok());

        let invalid = PatientFeatures {
            age: 10.0,
            sex: 2.0,
            ..sample()
        };
        let err = invalid.validate(&zero_based()).expect_err("two findings");
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_validation_follows_encoding() {
        let one_based = FeatureEncoding {
            version: 1,
            chest_pain: ChestPainEncoding::OneBased,
            thallium: ThalliumEncoding::Clinical,
        };

        // 0 is a valid zero-based chest pain code but not a one-based one,
        // and 2 is not a clinical thallium code.
        let err = sample().validate(&one_based).expect_err("encoding mismatch");
        let messages = err.messages();
        assert!(messages.iter().any(|m| m.starts_with("chest_pain")));
        assert!(messages.iter().any(|m| m.starts_with("thallium")));

        let recoded = PatientFeatures {
            chest_pain: 4.0,
            thallium: 7.0,
            ..sample()
        };
        assert!(recoded.validate(&one_based).is_ok());
    }

    #[test]
    fn test_bound_names_match_their_fields() {
        // Feature i holds the value i, so each field must read its own position.
        let positions: Vec<f64> = (0..FEATURE_COUNT).map(|i| i as f64).collect();
        let features = PatientFeatures::from_vec(&positions).expect("13 values");

        let checked = BOUNDS
            .iter()
            .map(|b| (b.name, b.field))
            .chain(BINARY.iter().copied());
        for (name, field) in checked {
            let index = FEATURE_NAMES
                .iter()
                .position(|n| *n == name)
                .expect("bound names a known feature");
            assert_eq!(field(&features), index as f64, "{name}");
        }
    }

    #[test]
    fn test_zeroize_clears_record() {
        let mut patient = PatientData::with_id("local-1", sample());
        patient.zeroize();
        assert_eq!(patient.features, PatientFeatures::default());
        assert_eq!(patient.id.as_deref(), None);
    }

    #[test]
    fn test_non_finite_rejected() {
        let invalid = PatientFeatures {
            cholesterol: f64::NAN,
            ..sample()
        };
        assert!(matches!(
            invalid.validate(&zero_based()),
            Err(InputError::NonFinite {
                name: "cholesterol",
                ..
            })
        ));
    }
}
