//! Feed-forward network estimator
//!
//! Networks are stored as JSON:
//!
//! ```json
//! {
//!   "input_ranges": [[0.0, 0.5], [0.0, 0.5], ...],
//!   "output_ranges": [[-3.0, 2.0]],
//!   "layers": [
//!     { "weights": [[...], ...], "biases": [...] },
//!     { "weights": [[...]], "biases": [...] }
//!   ]
//! }
//! ```
//!
//! `weights[j][i]` connects node `i` of the previous layer to node `j`. Inputs are
//! min-max scaled from their training range, hidden layers use the logistic activation
//! and the last layer is linear, rescaled into the output range.

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{Estimator, EstimatorError, EstimatorOutput, RangeStatus};

/// Training range of a single node, `[min, max]` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NodeRange(pub f32, pub f32);

impl NodeRange {
    pub fn min(&self) -> f32 {
        self.0
    }

    pub fn max(&self) -> f32 {
        self.1
    }

    fn span(&self) -> f32 {
        self.1 - self.0
    }

    /// Clamp `value` into the range; the flag is set when clamping was needed.
    fn clamp(&self, value: f32) -> (f32, bool) {
        if value.is_nan() || value < self.0 {
            (self.0, true)
        } else if value > self.1 {
            (self.1, true)
        } else {
            (value, false)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Layer {
    pub weights: Vec<Vec<f32>>,
    pub biases: Vec<f32>,
}

impl Layer {
    fn forward(&self, input: &[f32], activate: bool) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, bias)| {
                let sum = row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + bias;
                if activate { logistic(sum) } else { sum }
            })
            .collect()
    }
}

fn logistic(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[derive(Debug, Deserialize)]
struct NetworkDefinition {
    input_ranges: Vec<NodeRange>,
    output_ranges: Vec<NodeRange>,
    layers: Vec<Layer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "NetworkDefinition")]
pub struct FeedForwardNetwork {
    input_ranges: Vec<NodeRange>,
    output_ranges: Vec<NodeRange>,
    layers: Vec<Layer>,
}

impl TryFrom<NetworkDefinition> for FeedForwardNetwork {
    type Error = EstimatorError;

    fn try_from(definition: NetworkDefinition) -> Result<Self, Self::Error> {
        Self::new(
            definition.input_ranges,
            definition.output_ranges,
            definition.layers,
        )
    }
}

impl FeedForwardNetwork {
    pub fn new(
        input_ranges: Vec<NodeRange>,
        output_ranges: Vec<NodeRange>,
        layers: Vec<Layer>,
    ) -> Result<Self, EstimatorError> {
        for (label, ranges) in [("input", &input_ranges), ("output", &output_ranges)] {
            if ranges.is_empty() {
                return Err(EstimatorError::Shape(format!("no {label} nodes")));
            }
            if let Some(i) = ranges
                .iter()
                .position(|r| !r.min().is_finite() || !r.max().is_finite() || r.span() <= 0.0)
            {
                return Err(EstimatorError::Shape(format!(
                    "{label} range {i} is not a finite, increasing interval: {:?}",
                    ranges[i]
                )));
            }
        }

        if layers.is_empty() {
            return Err(EstimatorError::Shape("no layers".to_string()));
        }

        let mut width = input_ranges.len();
        for (l, layer) in layers.iter().enumerate() {
            if layer.weights.len() != layer.biases.len() {
                return Err(EstimatorError::Shape(format!(
                    "layer {l} has {} weight rows but {} biases",
                    layer.weights.len(),
                    layer.biases.len()
                )));
            }
            if let Some(row) = layer.weights.iter().position(|row| row.len() != width) {
                return Err(EstimatorError::Shape(format!(
                    "layer {l} row {row} has {} weights, expected {width}",
                    layer.weights[row].len()
                )));
            }
            width = layer.biases.len();
        }

        if width != output_ranges.len() {
            return Err(EstimatorError::Shape(format!(
                "last layer has {width} nodes but {} output ranges are declared",
                output_ranges.len()
            )));
        }

        Ok(Self {
            input_ranges,
            output_ranges,
            layers,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EstimatorError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Estimator for FeedForwardNetwork {
    fn input_node_count(&self) -> usize {
        self.input_ranges.len()
    }

    fn output_node_count(&self) -> usize {
        self.output_ranges.len()
    }

    fn evaluate(&self, input: &[f32]) -> EstimatorOutput {
        let mut input_failed = input.len() != self.input_ranges.len();
        let mut activations: Vec<f32> = self
            .input_ranges
            .iter()
            .zip(input)
            .map(|(range, &value)| {
                let (clamped, out_of_range) = range.clamp(value);
                input_failed |= out_of_range;
                (clamped - range.min()) / range.span()
            })
            .collect();

        let last = self.layers.len() - 1;
        for (l, layer) in self.layers.iter().enumerate() {
            activations = layer.forward(&activations, l < last);
        }

        let mut output_failed = false;
        let values = self
            .output_ranges
            .iter()
            .zip(activations)
            .map(|(range, y)| {
                let (clamped, out_of_range) = range.clamp(range.min() + y * range.span());
                output_failed |= out_of_range;
                clamped
            })
            .collect();

        EstimatorOutput {
            status: RangeStatus::new(input_failed, output_failed),
            values,
        }
    }
}
