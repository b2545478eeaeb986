use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{Estimator, EstimatorError, EstimatorKind, FeedForwardNetwork};
use crate::catalog::ATM_CORR_SLOTS;
use crate::correction::NORMALIZED_VECTOR_LEN;

/// The estimators of one processing run, one per stage. Node counts are checked when an
/// estimator is added, so the orchestrator can size its buffers once per scene.
#[derive(Default)]
pub struct EstimatorSet {
    estimators: [Option<Box<dyn Estimator>>; 4],
}

fn slot(kind: EstimatorKind) -> usize {
    kind.stage_index() as usize - 1
}

impl EstimatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the estimator for `kind` after checking its node counts.
    pub fn insert(
        &mut self,
        kind: EstimatorKind,
        estimator: Box<dyn Estimator>,
    ) -> Result<(), EstimatorError> {
        let inputs = estimator.input_node_count();
        if inputs != NORMALIZED_VECTOR_LEN {
            return Err(EstimatorError::NodeCount {
                kind,
                nodes: "input",
                expected: NORMALIZED_VECTOR_LEN.to_string(),
                found: inputs,
            });
        }

        let outputs = estimator.output_node_count();
        match kind {
            EstimatorKind::AtmosphericCorrection if outputs != ATM_CORR_SLOTS => {
                return Err(EstimatorError::NodeCount {
                    kind,
                    nodes: "output",
                    expected: ATM_CORR_SLOTS.to_string(),
                    found: outputs,
                });
            }
            _ if outputs == 0 => {
                return Err(EstimatorError::NodeCount {
                    kind,
                    nodes: "output",
                    expected: "at least 1".to_string(),
                    found: outputs,
                });
            }
            _ => {}
        }

        log::debug!("Registered {kind} estimator with {inputs} inputs and {outputs} outputs");
        self.estimators[slot(kind)] = Some(estimator);
        Ok(())
    }

    pub fn with(
        mut self,
        kind: EstimatorKind,
        estimator: Box<dyn Estimator>,
    ) -> Result<Self, EstimatorError> {
        self.insert(kind, estimator)?;
        Ok(self)
    }

    /// Load feed-forward networks from a JSON object keyed by stage name
    /// (`chlorophyll`, `yellow_substance`, `suspended_matter`, `atmospheric_correction`).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EstimatorError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let networks: HashMap<EstimatorKind, FeedForwardNetwork> =
            serde_json::from_reader(reader)?;

        let mut set = Self::new();
        for (kind, network) in networks {
            set.insert(kind, Box::new(network))?;
        }
        Ok(set)
    }

    pub fn get(&self, kind: EstimatorKind) -> Option<&dyn Estimator> {
        self.estimators[slot(kind)].as_deref()
    }

    pub fn require(&self, kind: EstimatorKind) -> Result<&dyn Estimator, EstimatorError> {
        self.get(kind).ok_or(EstimatorError::Missing(kind))
    }
}

impl fmt::Debug for EstimatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_map();
        for kind in EstimatorKind::ALL {
            if let Some(estimator) = self.get(kind) {
                list.entry(
                    &kind,
                    &(estimator.input_node_count(), estimator.output_node_count()),
                );
            }
        }
        list.finish()
    }
}
