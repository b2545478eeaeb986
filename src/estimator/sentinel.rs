// Legacy range-check protocol.
//
// Older network code reports range problems by rewriting a caller-owned scalar: the
// caller sets it to -1 to enable range checks, and the network leaves roughly -2 (input
// out of range), -19 (output out of range) or -22 (both) behind. Any other value means
// no problem. The values are matched with the same +-0.1 windows the networks were
// trained with.

use super::{Estimator, EstimatorOutput, RangeStatus};

pub const RANGE_CHECKS_ENABLED: f32 = -1.0;
pub const INPUT_OUT_OF_RANGE: f32 = -2.0;
pub const OUTPUT_OUT_OF_RANGE: f32 = -19.0;
pub const BOTH_OUT_OF_RANGE: f32 = -22.0;
pub const SENTINEL_TOLERANCE: f32 = 0.1;

fn near(value: f32, nominal: f32) -> bool {
    value > nominal - SENTINEL_TOLERANCE && value < nominal + SENTINEL_TOLERANCE
}

impl RangeStatus {
    pub fn from_sentinel(value: f32) -> Self {
        if near(value, INPUT_OUT_OF_RANGE) {
            RangeStatus::InputOutOfRange
        } else if near(value, OUTPUT_OUT_OF_RANGE) {
            RangeStatus::OutputOutOfRange
        } else if near(value, BOTH_OUT_OF_RANGE) {
            RangeStatus::Both
        } else {
            RangeStatus::Ok
        }
    }

    pub fn to_sentinel(self) -> f32 {
        match self {
            RangeStatus::Ok => RANGE_CHECKS_ENABLED,
            RangeStatus::InputOutOfRange => INPUT_OUT_OF_RANGE,
            RangeStatus::OutputOutOfRange => OUTPUT_OUT_OF_RANGE,
            RangeStatus::Both => BOTH_OUT_OF_RANGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeQuery {
    Inputs,
    Outputs,
}

/// A network speaking the sentinel protocol.
pub trait SentinelNetwork: Send + Sync {
    /// Answer a node-count query without evaluating anything.
    fn node_count(&self, query: NodeQuery) -> usize;

    /// Evaluate one pixel. The network may overwrite `input` and rewrites `range_check`
    /// when range checks are enabled.
    fn compute(&self, input: &mut [f32], output: &mut [f32], range_check: &mut f32);
}

/// Exposes a [`SentinelNetwork`] through the tagged [`Estimator`] contract.
pub struct SentinelAdapter<N> {
    network: N,
    input_nodes: usize,
    output_nodes: usize,
}

impl<N: SentinelNetwork> SentinelAdapter<N> {
    pub fn new(network: N) -> Self {
        let input_nodes = network.node_count(NodeQuery::Inputs);
        let output_nodes = network.node_count(NodeQuery::Outputs);
        log::debug!("Sentinel network reports {input_nodes} inputs, {output_nodes} outputs");
        Self {
            network,
            input_nodes,
            output_nodes,
        }
    }
}

impl<N: SentinelNetwork> Estimator for SentinelAdapter<N> {
    fn input_node_count(&self) -> usize {
        self.input_nodes
    }

    fn output_node_count(&self) -> usize {
        self.output_nodes
    }

    fn evaluate(&self, input: &[f32]) -> EstimatorOutput {
        // Fresh copies: the network is free to scribble over its input
        let mut scratch = input.to_vec();
        let wrong_length = scratch.len() != self.input_nodes;
        scratch.resize(self.input_nodes, 0.0);
        let mut values = vec![0.0; self.output_nodes];
        let mut range_check = RANGE_CHECKS_ENABLED;

        self.network.compute(&mut scratch, &mut values, &mut range_check);

        let status = RangeStatus::from_sentinel(range_check);
        EstimatorOutput {
            status: RangeStatus::new(
                wrong_length || status.input_failed(),
                status.output_failed(),
            ),
            values,
        }
    }
}
