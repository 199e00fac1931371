//! Inference context: Standardize, evaluate, threshold.
//!
//! The context owns the scaler, the network and the decision policy as one
//! immutable unit. It is the only path to the classifier, so every prediction
//! runs on standardized inputs:
//!
//! 1. Check length and finiteness of the raw vector
//! 2. Standardize with the fitted scaler
//! 3. Forward pass through the network
//! 4. Threshold with the decision policy

use crate::domain::{
    ensure_finite, Assessment, ConfigError, DecisionPolicy, FeatureEncoding, FeatureScaler,
    InputError, NetworkParams, PatientData, Prediction, RiskNetwork, ScalerParams,
};
use crate::ports::ArtifactSource;

/// Loaded, cross-validated screening parameters.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct InferenceContext {
    scaler: FeatureScaler,
    network: RiskNetwork,
    policy: DecisionPolicy,
}

impl InferenceContext {
    /// Load both artifacts from `source` and cross-validate them.
    ///
    /// # Errors
    /// Returns `ConfigError` if either artifact is missing, malformed, or
    /// inconsistent with the other.
    pub fn load(source: &impl ArtifactSource, policy: DecisionPolicy) -> Result<Self, ConfigError> {
        tracing::info!("Loading screening artifacts from {}", source.describe());

        let (scaler, network) = source.load_artifacts()?;
        let context = Self::from_parts(scaler, network, policy)?;

        tracing::info!(
            "Inference context ready (architecture={:?}, encoding={}, threshold={})",
            context.architecture(),
            context.encoding(),
            context.policy.threshold()
        );
        Ok(context)
    }

    /// Build a context from already decoded parameters.
    ///
    /// # Errors
    /// Returns `ConfigError` on the same conditions as [`Self::load`].
    pub fn from_parts(
        scaler: ScalerParams,
        network: NetworkParams,
        policy: DecisionPolicy,
    ) -> Result<Self, ConfigError> {
        let scaler = FeatureScaler::new(scaler)?;
        let network = RiskNetwork::new(network)?;

        if scaler.feature_count() != network.input_len() {
            tracing::error!(
                "Scaler fitted on {} features but classifier expects {}",
                scaler.feature_count(),
                network.input_len()
            );
            return Err(ConfigError::FeatureCount {
                artifact: "scaler".into(),
                expected: network.input_len(),
                got: scaler.feature_count(),
            });
        }

        if scaler.encoding() != network.encoding() {
            tracing::error!(
                "Feature encoding disagreement: scaler={}, model={}",
                scaler.encoding(),
                network.encoding()
            );
            return Err(ConfigError::EncodingMismatch {
                scaler: scaler.encoding().to_string(),
                model: network.encoding().to_string(),
            });
        }

        Ok(Self {
            scaler,
            network,
            policy,
        })
    }

    #[must_use]
    pub fn policy(&self) -> DecisionPolicy {
        self.policy
    }

    /// Encoding both artifacts were produced with.
    #[must_use]
    pub fn encoding(&self) -> &FeatureEncoding {
        self.scaler.encoding()
    }

    /// Layer widths, input first.
    #[must_use]
    pub fn architecture(&self) -> Vec<usize> {
        self.network.widths()
    }

    /// Same parameters, different threshold.
    #[must_use]
    pub fn with_policy(&self, policy: DecisionPolicy) -> Self {
        Self {
            policy,
            ..self.clone()
        }
    }

    /// Predict from a raw feature vector in fitted order.
    ///
    /// # Errors
    /// Returns `InputError::WrongLength`, `InputError::NonFinite`, or
    /// `InputError::Overflow` when a finite input leaves the finite range
    /// inside the network.
    pub fn predict_vector(&self, raw: &[f64]) -> Result<Prediction, InputError> {
        let scaled = self.scaler.scale(raw)?;

        // Finite but extreme inputs can overflow during standardization.
        ensure_finite(&scaled)?;

        let probability = self.network.predict(&scaled).map_err(|e| {
            tracing::warn!("Rejected feature vector: {}", e);
            e
        })?;
        let prediction = self.policy.classify(probability);
        tracing::debug!(
            "Forward pass complete: risk={}, threshold={}",
            prediction.risk_level,
            self.policy.threshold()
        );
        Ok(prediction)
    }

    /// Validate a patient record against clinical ranges and the encoding
    /// contract, then predict.
    ///
    /// # Errors
    /// Returns the collected `InputError`s if validation fails.
    pub fn assess(&self, patient: &PatientData) -> Result<Assessment, InputError> {
        if let Err(e) = patient.features.validate(self.encoding()) {
            tracing::warn!("Rejected patient record ({} finding(s))", e.messages().len());
            return Err(e);
        }

        let prediction = self.predict_vector(&patient.features.to_vec())?;
        let mut assessment = Assessment::new(prediction, self.policy.threshold());
        assessment.patient_id.clone_from(&patient.id);

        tracing::info!(
            "Assessment complete: probability={:.1}%, risk={}",
            assessment.probability() * 100.0,
            assessment.risk_level()
        );
        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::network::fixtures::pass_through;
    use crate::domain::{ChestPainEncoding, PatientFeatures, RiskLevel, ThalliumEncoding};
    use crate::ports::InMemoryArtifacts;

    fn encoding() -> FeatureEncoding {
        FeatureEncoding {
            version: 1,
            chest_pain: ChestPainEncoding::ZeroBased,
            thallium: ThalliumEncoding::Ordinal,
        }
    }

    fn identity_scaler() -> ScalerParams {
        ScalerParams {
            feature_encoding: encoding(),
            feature_names: Vec::new(),
            mean: vec![0.0; 13],
            scale: vec![1.0; 13],
        }
    }

    fn create_test_context(out_weight: f64) -> InferenceContext {
        InferenceContext::from_parts(
            identity_scaler(),
            pass_through(encoding(), out_weight, 0.0),
            DecisionPolicy::default(),
        )
        .expect("Context should build")
    }

    fn sample_patient() -> PatientData {
        PatientData::with_id(
            "patient-7",
            PatientFeatures {
                age: 63.0,
                sex: 1.0,
                chest_pain: 3.0,
                resting_bp: 145.0,
                cholesterol: 233.0,
                fasting_blood_sugar: 1.0,
                resting_ecg: 0.0,
                max_heart_rate: 150.0,
                exercise_angina: 0.0,
                st_depression: 2.3,
                st_slope: 0.0,
                major_vessels: 0.0,
                thallium: 1.0,
            },
        )
    }

    #[test]
    fn test_zero_network_scenario() {
        let context = create_test_context(0.0);
        let prediction = context.predict_vector(&[0.0; 13]).expect("Should predict");
        assert_eq!(prediction.probability, 0.5);
        assert_eq!(prediction.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_scaling_happens_before_the_network() {
        // mean 10 / scale 2 on the first feature: raw 14 becomes 2.0.
        let mut scaler = identity_scaler();
        scaler.mean[0] = 10.0;
        scaler.scale[0] = 2.0;
        let context = InferenceContext::from_parts(
            scaler,
            pass_through(encoding(), 1.0, 0.0),
            DecisionPolicy::default(),
        )
        .expect("Context should build");

        let mut raw = [0.0; 13];
        raw[0] = 14.0;
        let prediction = context.predict_vector(&raw).expect("Should predict");
        let expected = crate::domain::network::sigmoid(2.0);
        assert!((prediction.probability - expected).abs() < 1e-15);
        assert_eq!(prediction.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_deterministic() {
        let context = create_test_context(0.37);
        let raw: Vec<f64> = (0..13).map(|i| f64::from(i) * 0.25 - 1.0).collect();
        let first = context.predict_vector(&raw).expect("Should predict");
        for _ in 0..10 {
            let again = context.predict_vector(&raw).expect("Should predict");
            assert_eq!(again.probability.to_bits(), first.probability.to_bits());
        }
    }

    #[test]
    fn test_wrong_lengths_rejected() {
        let context = create_test_context(0.0);
        for len in [12, 14] {
            assert_eq!(
                context.predict_vector(&vec![0.0; len]),
                Err(InputError::WrongLength {
                    expected: 13,
                    got: len
                })
            );
        }
    }

    #[test]
    fn test_overflowing_input_rejected() {
        let mut scaler = identity_scaler();
        scaler.scale[4] = 1e-300;
        let context = InferenceContext::from_parts(
            scaler,
            pass_through(encoding(), 0.0, 0.0),
            DecisionPolicy::default(),
        )
        .expect("Context should build");

        let mut raw = [0.0; 13];
        raw[4] = 1e300;
        assert!(matches!(
            context.predict_vector(&raw),
            Err(InputError::NonFinite {
                name: "cholesterol",
                ..
            })
        ));
    }

    #[test]
    fn test_hidden_layer_overflow_is_an_error() {
        // The doubled first feature overflows the first affine step.
        let mut network = pass_through(encoding(), 0.0, 0.0);
        network.layers[0].weights[0][0] = 2.0;
        network.layers[2].weights[0][0] = 1.0;
        network.layers[2].weights[1][0] = -1.0;
        let context =
            InferenceContext::from_parts(identity_scaler(), network, DecisionPolicy::default())
                .expect("Context should build");

        let mut raw = [0.0; 13];
        raw[0] = 1e308;
        raw[1] = 1e308;
        let err = context.predict_vector(&raw).expect_err("overflow");
        assert!(matches!(err, InputError::Overflow { .. }));
    }

    #[test]
    fn test_short_scaler_fails_at_load() {
        let mut scaler = identity_scaler();
        scaler.mean.truncate(10);
        scaler.scale.truncate(10);
        let source = InMemoryArtifacts {
            scaler,
            network: pass_through(encoding(), 0.0, 0.0),
        };
        let err = InferenceContext::load(&source, DecisionPolicy::default())
            .expect_err("10 means vs 13 inputs");
        assert!(matches!(err, ConfigError::FeatureCount { got: 10, .. }));
    }

    #[test]
    fn test_encoding_mismatch_fails_at_load() {
        let mut network = pass_through(encoding(), 0.0, 0.0);
        network.feature_encoding.thallium = ThalliumEncoding::Clinical;
        let source = InMemoryArtifacts {
            scaler: identity_scaler(),
            network,
        };
        let err = InferenceContext::load(&source, DecisionPolicy::default())
            .expect_err("encodings differ");
        assert!(matches!(err, ConfigError::EncodingMismatch { .. }));
    }

    #[test]
    fn test_unsupported_encoding_version() {
        let mut scaler = identity_scaler();
        scaler.feature_encoding.version = 2;
        let mut network = pass_through(encoding(), 0.0, 0.0);
        network.feature_encoding.version = 2;
        let err = InferenceContext::from_parts(scaler, network, DecisionPolicy::default())
            .expect_err("version 2");
        assert_eq!(
            err,
            ConfigError::UnsupportedEncoding {
                got: 2,
                supported: 1
            }
        );
    }

    #[test]
    fn test_assess_sets_patient_and_threshold() {
        let context = create_test_context(0.01).with_policy(DecisionPolicy::new(0.9).expect("valid"));
        let assessment = context.assess(&sample_patient()).expect("Should assess");
        assert_eq!(assessment.patient_id.as_deref(), Some("patient-7"));
        assert!((assessment.threshold - 0.9).abs() < f64::EPSILON);
        assert!(assessment.probability() > 0.0 && assessment.probability() < 1.0);
    }

    #[test]
    fn test_assess_rejects_implausible_values() {
        let context = create_test_context(0.0);
        let mut patient = sample_patient();
        patient.features.resting_bp = 20.0;
        patient.features.thallium = 7.0;
        let err = context.assess(&patient).expect_err("two findings");
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_accessors() {
        let context = create_test_context(0.0);
        assert_eq!(context.architecture(), vec![13, 64, 32, 1]);
        assert_eq!(context.encoding(), &encoding());
        assert_eq!(context.policy(), DecisionPolicy::default());
    }
}
