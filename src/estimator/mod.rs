//! Estimator adapter
//!
//! The four retrievals (chlorophyll, yellow substance, suspended matter, atmospheric
//! correction) are pre-trained empirical functions sharing one call contract: an
//! 18-element normalized input vector in, a stage-specific output vector and a range
//! status out. Their internals are opaque here; [`network::FeedForwardNetwork`] loads
//! them from weight files and [`sentinel::SentinelAdapter`] wraps networks that still
//! report range problems through the legacy sentinel scalar.

pub mod network;
pub mod sentinel;
pub mod set;

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

pub use network::FeedForwardNetwork;
pub use sentinel::{NodeQuery, SentinelAdapter, SentinelNetwork};
pub use set::EstimatorSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    Chlorophyll,
    YellowSubstance,
    SuspendedMatter,
    AtmosphericCorrection,
}

impl EstimatorKind {
    /// Stage order of the orchestrator
    pub const ALL: [EstimatorKind; 4] = [
        EstimatorKind::Chlorophyll,
        EstimatorKind::YellowSubstance,
        EstimatorKind::SuspendedMatter,
        EstimatorKind::AtmosphericCorrection,
    ];

    /// One-based stage number; it fixes the stage's bit positions in the flag word.
    pub fn stage_index(self) -> u32 {
        match self {
            EstimatorKind::Chlorophyll => 1,
            EstimatorKind::YellowSubstance => 2,
            EstimatorKind::SuspendedMatter => 3,
            EstimatorKind::AtmosphericCorrection => 4,
        }
    }

    pub fn is_concentration(self) -> bool {
        !matches!(self, EstimatorKind::AtmosphericCorrection)
    }
}

impl Display for EstimatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimatorKind::Chlorophyll => write!(f, "chlorophyll"),
            EstimatorKind::YellowSubstance => write!(f, "yellow substance"),
            EstimatorKind::SuspendedMatter => write!(f, "total suspended matter"),
            EstimatorKind::AtmosphericCorrection => write!(f, "atmospheric correction"),
        }
    }
}

/// Range check outcome of one estimator call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeStatus {
    #[default]
    Ok,
    InputOutOfRange,
    OutputOutOfRange,
    Both,
}

impl RangeStatus {
    pub fn new(input_failed: bool, output_failed: bool) -> Self {
        match (input_failed, output_failed) {
            (false, false) => RangeStatus::Ok,
            (true, false) => RangeStatus::InputOutOfRange,
            (false, true) => RangeStatus::OutputOutOfRange,
            (true, true) => RangeStatus::Both,
        }
    }

    pub fn input_failed(self) -> bool {
        matches!(self, RangeStatus::InputOutOfRange | RangeStatus::Both)
    }

    pub fn output_failed(self) -> bool {
        matches!(self, RangeStatus::OutputOutOfRange | RangeStatus::Both)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorOutput {
    pub status: RangeStatus,
    pub values: Vec<f32>,
}

/// Uniform call contract for every retrieval stage.
///
/// `evaluate` must not depend on earlier calls: the orchestrator re-enters the same
/// estimator for every pixel, in parallel.
pub trait Estimator: Send + Sync {
    fn input_node_count(&self) -> usize;

    fn output_node_count(&self) -> usize;

    fn evaluate(&self, input: &[f32]) -> EstimatorOutput;
}

#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse estimator definition: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed network: {0}")]
    Shape(String),
    #[error("{kind} estimator has {found} {nodes} nodes, expected {expected}")]
    NodeCount {
        kind: EstimatorKind,
        nodes: &'static str,
        expected: String,
        found: usize,
    },
    #[error("No estimator configured for {0}")]
    Missing(EstimatorKind),
}
