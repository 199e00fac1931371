//! Screening service: load-once lifecycle around the inference context.
//!
//! Artifacts are loaded at most once per successful initialization. Loading
//! is serialized by a mutex and the finished context is published through a
//! `OnceLock`, so readers see either nothing or a complete parameter set.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::application::InferenceContext;
use crate::domain::{Assessment, DecisionPolicy, FeatureEncoding, PatientData, Prediction};
use crate::ports::ArtifactSource;
use crate::CardioError;

/// Snapshot of the loaded model for status displays.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub source: String,
    pub architecture: Vec<usize>,
    pub encoding: FeatureEncoding,
    pub threshold: f64,
}

impl std::fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let widths: Vec<String> = self.architecture.iter().map(ToString::to_string).collect();
        write!(
            f,
            "{} | encoding {} | threshold {:.2}",
            widths.join("-"),
            self.encoding,
            self.threshold
        )
    }
}

/// Service owning an artifact source and the context loaded from it.
pub struct ScreeningService<A>
where
    A: ArtifactSource,
{
    source: A,
    policy: DecisionPolicy,
    load_lock: Mutex<()>,
    context: OnceLock<Arc<InferenceContext>>,
}

impl<A> ScreeningService<A>
where
    A: ArtifactSource,
{
    /// Create a new, not yet initialized service.
    pub fn new(source: A, policy: DecisionPolicy) -> Self {
        Self {
            source,
            policy,
            load_lock: Mutex::new(()),
            context: OnceLock::new(),
        }
    }

    /// Load the artifacts unless already loaded.
    ///
    /// Concurrent callers block on the same load. A failed load leaves the
    /// service uninitialized and may be retried.
    ///
    /// # Errors
    /// Returns `CardioError::Config` if the artifacts cannot be loaded.
    pub fn initialize(&self) -> Result<Arc<InferenceContext>, CardioError> {
        if let Some(context) = self.context.get() {
            return Ok(Arc::clone(context));
        }

        let _guard = self
            .load_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished while we waited.
        if let Some(context) = self.context.get() {
            return Ok(Arc::clone(context));
        }

        tracing::info!("Initializing screening service...");
        let context = match InferenceContext::load(&self.source, self.policy) {
            Ok(context) => Arc::new(context),
            Err(e) => {
                tracing::error!("Failed to load artifacts from {}: {}", self.source.describe(), e);
                return Err(e.into());
            }
        };

        let published = self.context.get_or_init(|| context);
        Ok(Arc::clone(published))
    }

    /// Check if the artifacts have been loaded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.context.get().is_some()
    }

    /// The loaded context.
    ///
    /// # Errors
    /// Returns `CardioError::NotReady` before a successful [`Self::initialize`].
    pub fn context(&self) -> Result<Arc<InferenceContext>, CardioError> {
        self.context.get().cloned().ok_or(CardioError::NotReady)
    }

    /// Run one patient record through the pipeline.
    ///
    /// # Errors
    /// Returns `CardioError::NotReady` or `CardioError::Input`.
    pub fn assess(&self, patient: &PatientData) -> Result<Assessment, CardioError> {
        Ok(self.context()?.assess(patient)?)
    }

    /// Predict from a raw feature vector.
    ///
    /// # Errors
    /// Returns `CardioError::NotReady` or `CardioError::Input`.
    pub fn predict_vector(&self, raw: &[f64]) -> Result<Prediction, CardioError> {
        Ok(self.context()?.predict_vector(raw)?)
    }

    /// Summary of the loaded model, if any.
    #[must_use]
    pub fn model_summary(&self) -> Option<ModelSummary> {
        let context = self.context.get()?;
        Some(ModelSummary {
            source: self.source.describe(),
            architecture: context.architecture(),
            encoding: *context.encoding(),
            threshold: context.policy().threshold(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::network::fixtures::pass_through;
    use crate::domain::{
        ChestPainEncoding, ConfigError, NetworkParams, PatientFeatures, ScalerParams,
        ThalliumEncoding,
    };
    use crate::ports::InMemoryArtifacts;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn encoding() -> FeatureEncoding {
        FeatureEncoding {
            version: 1,
            chest_pain: ChestPainEncoding::OneBased,
            thallium: ThalliumEncoding::Clinical,
        }
    }

    fn artifacts() -> InMemoryArtifacts {
        InMemoryArtifacts {
            scaler: ScalerParams {
                feature_encoding: encoding(),
                feature_names: Vec::new(),
                mean: vec![0.0; 13],
                scale: vec![1.0; 13],
            },
            network: pass_through(encoding(), 0.0, 0.0),
        }
    }

    /// Counts loads; fails the first `failures` network loads.
    struct CountingSource {
        inner: InMemoryArtifacts,
        loads: AtomicUsize,
        failures: usize,
    }

    impl CountingSource {
        fn new(failures: usize) -> Self {
            Self {
                inner: artifacts(),
                loads: AtomicUsize::new(0),
                failures,
            }
        }
    }

    impl ArtifactSource for CountingSource {
        fn describe(&self) -> String {
            "counting".to_string()
        }

        fn load_scaler(&self) -> Result<ScalerParams, ConfigError> {
            self.inner.load_scaler()
        }

        fn load_network(&self) -> Result<NetworkParams, ConfigError> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(ConfigError::MissingArtifact("model.json".into()));
            }
            self.inner.load_network()
        }
    }

    fn patient() -> PatientData {
        PatientData::new(PatientFeatures {
            age: 48.0,
            sex: 0.0,
            chest_pain: 2.0,
            resting_bp: 130.0,
            cholesterol: 275.0,
            fasting_blood_sugar: 0.0,
            resting_ecg: 1.0,
            max_heart_rate: 139.0,
            exercise_angina: 0.0,
            st_depression: 0.2,
            st_slope: 1.0,
            major_vessels: 0.0,
            thallium: 3.0,
        })
    }

    #[test]
    fn test_not_ready_before_initialize() {
        let service = ScreeningService::new(artifacts(), DecisionPolicy::default());
        assert!(!service.is_ready());
        assert!(service.model_summary().is_none());
        assert!(matches!(service.context(), Err(CardioError::NotReady)));
        assert!(matches!(
            service.assess(&patient()),
            Err(CardioError::NotReady)
        ));
    }

    #[test]
    fn test_initialize_and_assess() {
        let service = ScreeningService::new(artifacts(), DecisionPolicy::default());
        service.initialize().expect("Should initialize");
        assert!(service.is_ready());

        let assessment = service.assess(&patient()).expect("Should assess");
        assert_eq!(assessment.probability(), 0.5);

        let summary = service.model_summary().expect("summary");
        assert_eq!(summary.architecture, vec![13, 64, 32, 1]);
        assert!(summary.to_string().starts_with("13-64-32-1"));
    }

    #[test]
    fn test_input_errors_pass_through() {
        let service = ScreeningService::new(artifacts(), DecisionPolicy::default());
        service.initialize().expect("Should initialize");
        assert!(matches!(
            service.predict_vector(&[0.0; 12]),
            Err(CardioError::Input(_))
        ));
    }

    #[test]
    fn test_concurrent_initialize_loads_once() {
        let service = Arc::new(ScreeningService::new(
            CountingSource::new(0),
            DecisionPolicy::default(),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || service.initialize().expect("Should initialize"))
            })
            .collect();
        let contexts: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect();

        assert_eq!(service.source.loads.load(Ordering::SeqCst), 1);
        assert!(contexts.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn test_failed_load_can_be_retried() {
        let service = ScreeningService::new(CountingSource::new(1), DecisionPolicy::default());

        let err = service.initialize().expect_err("first load fails");
        assert!(matches!(err, CardioError::Config(ConfigError::MissingArtifact(_))));
        assert!(!service.is_ready());

        service.initialize().expect("retry succeeds");
        assert!(service.is_ready());
    }
}
