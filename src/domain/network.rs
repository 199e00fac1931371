//! Dense feed-forward risk classifier.
//!
//! The network is plain data: an ordered list of dense layers, each an affine
//! map followed by an activation. One routine evaluates every layer.
//! Shape is fixed at 13 -> 64 -> 32 -> 1 (relu, relu, sigmoid) and checked
//! when the parameters are loaded.
//!
//! Evaluation is crate-private: callers go through the inference context,
//! which always standardizes inputs first.

use serde::{Deserialize, Serialize};

use super::encoding::FeatureEncoding;
use super::error::{ConfigError, InputError};

/// Layer widths, input first.
pub const ARCHITECTURE: [usize; 4] = [13, 64, 32, 1];

/// Activation applied after each layer.
pub const ACTIVATIONS: [Activation; 3] = [Activation::Relu, Activation::Relu, Activation::Sigmoid];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Sigmoid,
}

impl Activation {
    #[inline]
    fn apply(self, z: f64) -> f64 {
        match self {
            Self::Relu => z.max(0.0),
            Self::Sigmoid => sigmoid(z),
        }
    }
}

/// Logistic function, 1 / (1 + e^-z).
#[inline]
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// One exported layer: `weights` has `inputs` rows of `outputs` columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerParams {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

/// Network parameters as exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkParams {
    pub feature_encoding: FeatureEncoding,
    pub layers: Vec<LayerParams>,
}

/// Validated dense layer with row-major weights.
#[derive(Debug, Clone)]
struct DenseLayer {
    inputs: usize,
    outputs: usize,
    weights: Vec<f64>,
    bias: Vec<f64>,
    activation: Activation,
}

impl DenseLayer {
    fn from_params(index: usize, params: LayerParams) -> Result<Self, ConfigError> {
        let inputs = ARCHITECTURE[index];
        let outputs = ARCHITECTURE[index + 1];

        if params.weights.len() != inputs {
            return Err(ConfigError::Architecture(format!(
                "layer {index} weights have {} rows, expected {inputs}",
                params.weights.len()
            )));
        }
        if let Some((row, w)) = params
            .weights
            .iter()
            .enumerate()
            .find(|(_, w)| w.len() != outputs)
        {
            return Err(ConfigError::Architecture(format!(
                "layer {index} weight row {row} has {} columns, expected {outputs}",
                w.len()
            )));
        }
        if params.bias.len() != outputs {
            return Err(ConfigError::Architecture(format!(
                "layer {index} bias has length {}, expected {outputs}",
                params.bias.len()
            )));
        }
        if params.activation != ACTIVATIONS[index] {
            return Err(ConfigError::Architecture(format!(
                "layer {index} activation is {:?}, expected {:?}",
                params.activation, ACTIVATIONS[index]
            )));
        }

        let weights: Vec<f64> = params.weights.into_iter().flatten().collect();
        if weights.iter().chain(&params.bias).any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFiniteParameter(format!("layer {index}")));
        }

        Ok(Self {
            inputs,
            outputs,
            weights,
            bias: params.bias,
            activation: params.activation,
        })
    }

    /// `activation(x · W + b)`
    ///
    /// The pre-activation is checked before ReLU can clip an inf or NaN to 0.
    fn forward(&self, index: usize, x: &[f64]) -> Result<Vec<f64>, InputError> {
        debug_assert_eq!(x.len(), self.inputs);
        let mut z = self.bias.clone();
        for (xi, row) in x.iter().zip(self.weights.chunks_exact(self.outputs)) {
            for (zj, wij) in z.iter_mut().zip(row) {
                *zj += xi * wij;
            }
        }
        if z.iter().any(|v| !v.is_finite()) {
            return Err(InputError::Overflow { layer: index });
        }
        Ok(z.into_iter().map(|v| self.activation.apply(v)).collect())
    }
}

/// Immutable risk classifier.
#[derive(Debug, Clone)]
pub struct RiskNetwork {
    layers: Vec<DenseLayer>,
    encoding: FeatureEncoding,
}

impl RiskNetwork {
    /// Validate exported parameters against the fixed architecture.
    ///
    /// # Errors
    /// Returns `ConfigError::Architecture` on any shape or activation mismatch,
    /// `ConfigError::NonFiniteParameter` on NaN/inf weights.
    pub fn new(params: NetworkParams) -> Result<Self, ConfigError> {
        params.feature_encoding.ensure_supported()?;

        let expected = ACTIVATIONS.len();
        if params.layers.len() != expected {
            return Err(ConfigError::Architecture(format!(
                "got {} layers, expected {expected}",
                params.layers.len()
            )));
        }

        let layers = params
            .layers
            .into_iter()
            .enumerate()
            .map(|(i, layer)| DenseLayer::from_params(i, layer))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            layers,
            encoding: params.feature_encoding,
        })
    }

    /// Number of inputs of the first layer.
    #[must_use]
    pub fn input_len(&self) -> usize {
        self.layers.first().map_or(0, |l| l.inputs)
    }

    /// Layer widths, input first.
    #[must_use]
    pub fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.layers.first().map(|l| l.inputs).into_iter().collect();
        widths.extend(self.layers.iter().map(|l| l.outputs));
        widths
    }

    /// Encoding declared by the model artifact.
    #[must_use]
    pub fn encoding(&self) -> &FeatureEncoding {
        &self.encoding
    }

    /// Forward pass on an already standardized vector.
    ///
    /// Callers must have checked the length against [`Self::input_len`].
    ///
    /// # Errors
    /// Returns `InputError::Overflow` if any layer's affine step leaves the
    /// finite range.
    pub(crate) fn predict(&self, scaled: &[f64]) -> Result<f64, InputError> {
        let mut activations = scaled.to_vec();
        for (index, layer) in self.layers.iter().enumerate() {
            activations = layer.forward(index, &activations)?;
        }
        match activations.first() {
            Some(p) if p.is_finite() => Ok(*p),
            _ => Err(InputError::Overflow {
                layer: self.layers.len().saturating_sub(1),
            }),
        }
    }
}
