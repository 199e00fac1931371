//! Property tests for standardization and the forward pass.

use cardioscreen::domain::{
    Activation, ChestPainEncoding, FeatureEncoding, FeatureScaler, LayerParams, NetworkParams,
    RiskLevel, ScalerParams, ThalliumEncoding, ARCHITECTURE,
};
use cardioscreen::{DecisionPolicy, InferenceContext, InputError};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn encoding() -> FeatureEncoding {
    FeatureEncoding {
        version: 1,
        chest_pain: ChestPainEncoding::ZeroBased,
        thallium: ThalliumEncoding::Ordinal,
    }
}

fn scaler_params(mean: Vec<f64>, scale: Vec<f64>) -> ScalerParams {
    ScalerParams {
        feature_encoding: encoding(),
        feature_names: Vec::new(),
        mean,
        scale,
    }
}

/// Random network with weights uniform in `±gain / sqrt(fan_in)`.
fn random_network(seed: u64, gain: f64) -> NetworkParams {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let activations = [Activation::Relu, Activation::Relu, Activation::Sigmoid];

    let layers = ARCHITECTURE
        .windows(2)
        .zip(activations)
        .map(|(shape, activation)| {
            let (inputs, outputs) = (shape[0], shape[1]);
            let bound = gain / (inputs as f64).sqrt();
            LayerParams {
                weights: (0..inputs)
                    .map(|_| (0..outputs).map(|_| rng.gen_range(-bound..bound)).collect())
                    .collect(),
                bias: (0..outputs).map(|_| rng.gen_range(-bound..bound)).collect(),
                activation,
            }
        })
        .collect();

    NetworkParams {
        feature_encoding: encoding(),
        layers,
    }
}

fn context(seed: u64, gain: f64) -> InferenceContext {
    InferenceContext::from_parts(
        scaler_params(vec![0.0; 13], vec![1.0; 13]),
        random_network(seed, gain),
        DecisionPolicy::default(),
    )
    .expect("valid context")
}

fn arb_vector(range: std::ops::Range<f64>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(range, 13)
}

proptest! {
    #[test]
    fn scaler_maps_mean_to_zero(
        mean in arb_vector(-500.0..500.0),
        scale in arb_vector(0.01..100.0),
    ) {
        let scaler = FeatureScaler::new(scaler_params(mean.clone(), scale)).expect("valid scaler");
        let z = scaler.scale(&mean).expect("scale");
        prop_assert!(z.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn scaler_is_affine(
        mean in arb_vector(-500.0..500.0),
        scale in arb_vector(0.01..100.0),
        x in arb_vector(-1000.0..1000.0),
        y in arb_vector(-1000.0..1000.0),
        a in 0.0f64..=1.0,
    ) {
        let scaler = FeatureScaler::new(scaler_params(mean, scale)).expect("valid scaler");
        let mixed: Vec<f64> = x.iter().zip(&y).map(|(xi, yi)| a * xi + (1.0 - a) * yi).collect();

        let lhs = scaler.scale(&mixed).expect("scale");
        let sx = scaler.scale(&x).expect("scale");
        let sy = scaler.scale(&y).expect("scale");

        for i in 0..13 {
            let rhs = a * sx[i] + (1.0 - a) * sy[i];
            let tolerance = 1e-9 * (1.0 + lhs[i].abs().max(sx[i].abs()).max(sy[i].abs()));
            prop_assert!((lhs[i] - rhs).abs() <= tolerance, "feature {}: {} vs {}", i, lhs[i], rhs);
        }
    }

    #[test]
    fn probability_stays_in_unit_interval(
        seed in any::<u64>(),
        x in arb_vector(-1000.0..1000.0),
    ) {
        let prediction = context(seed, 1.0).predict_vector(&x).expect("predict");
        prop_assert!(!prediction.probability.is_nan());
        prop_assert!((0.0..=1.0).contains(&prediction.probability));
    }

    #[test]
    fn small_weights_never_saturate(
        seed in any::<u64>(),
        x in arb_vector(-5.0..5.0),
    ) {
        let prediction = context(seed, 0.05).predict_vector(&x).expect("predict");
        prop_assert!(prediction.probability > 0.0 && prediction.probability < 1.0);
    }

    #[test]
    fn extreme_inputs_never_yield_nan(
        seed in any::<u64>(),
        x in prop::collection::vec(
            prop_oneof![-1e308f64..1e308, Just(f64::MAX), Just(f64::MIN)],
            13,
        ),
    ) {
        match context(seed, 1.0).predict_vector(&x) {
            Ok(prediction) => prop_assert!((0.0..=1.0).contains(&prediction.probability)),
            Err(e) => prop_assert!(matches!(e, InputError::Overflow { .. }), "unexpected {:?}", e),
        }
    }

    #[test]
    fn predictions_are_deterministic(
        seed in any::<u64>(),
        x in arb_vector(-10.0..10.0),
    ) {
        let first = context(seed, 1.0).predict_vector(&x).expect("predict");
        let second = context(seed, 1.0).predict_vector(&x).expect("predict");
        prop_assert_eq!(first.probability.to_bits(), second.probability.to_bits());
        prop_assert_eq!(first.risk_level, second.risk_level);
    }

    #[test]
    fn risk_level_follows_threshold(
        seed in any::<u64>(),
        x in arb_vector(-10.0..10.0),
        threshold in 0.01f64..0.99,
    ) {
        let policy = DecisionPolicy::new(threshold).expect("valid threshold");
        let prediction = context(seed, 1.0).with_policy(policy).predict_vector(&x).expect("predict");
        let expected = if prediction.probability > threshold { RiskLevel::High } else { RiskLevel::Low };
        prop_assert_eq!(prediction.risk_level, expected);
    }

    #[test]
    fn wrong_lengths_always_rejected(len in 0usize..40) {
        prop_assume!(len != 13);
        prop_assert!(context(7, 1.0).predict_vector(&vec![0.0; len]).is_err());
    }
}
