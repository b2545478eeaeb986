#![allow(dead_code)]

use tidewater::correction::SpectralContext;
use tidewater::estimator::network::{Layer, NodeRange};
use tidewater::estimator::{EstimatorKind, EstimatorSet, FeedForwardNetwork};
use tidewater::retrieval::PixelInputs;
use tidewater::sat_bands::{NOMINAL_WAVELENGTHS, NUM_RADIANCE_BANDS, SatBands};
use tidewater::solar::SolarFlux;

pub const HIDDEN_NODES: usize = 4;

/// Typical open ocean TOA radiances (mW m-2 sr-1 nm-1)
pub const MID_SCENE_RADIANCES: [f32; NUM_RADIANCE_BANDS] = [
    78.0, 69.5, 54.2, 44.8, 33.1, 21.7, 17.9, 16.8, 15.2, 12.1, 6.9, 10.4, 8.2, 7.5, 4.3,
];

pub const CHL_RANGE: (f32, f32) = (-3.0, 2.0);
pub const YS_RANGE: (f32, f32) = (-4.0, 1.0);
pub const TSM_RANGE: (f32, f32) = (-3.0, 3.0);
pub const REFLECTANCE_RANGE: (f32, f32) = (0.0, 0.05);
pub const OPTICAL_DEPTH_RANGE: (f32, f32) = (0.0, 1.5);

/// Training ranges of the 18 input nodes
pub fn input_ranges() -> Vec<NodeRange> {
    let mut ranges = vec![NodeRange(0.0, 0.3); 12];
    ranges.extend([
        NodeRange(0.0, 30.0),
        NodeRange(800.0, 1100.0),
        NodeRange(0.0, 1.0),
        NodeRange(-1.0, 1.0),
        NodeRange(-1.0, 1.0),
        NodeRange(0.0, 1.0),
    ]);
    ranges
}

/// A small network whose scaled output stays inside (0.2, 0.7) of every output range.
pub fn network(output_ranges: Vec<(f32, f32)>) -> FeedForwardNetwork {
    let hidden = Layer {
        weights: (0..HIDDEN_NODES)
            .map(|j| (0..18).map(|i| ((i + j) % 5) as f32 * 0.1 - 0.2).collect())
            .collect(),
        biases: vec![0.1; HIDDEN_NODES],
    };
    let outputs = output_ranges.len();
    let last = Layer {
        weights: (0..outputs)
            .map(|k| {
                (0..HIDDEN_NODES)
                    .map(|j| if j == k % HIDDEN_NODES { 0.5 } else { 0.0 })
                    .collect()
            })
            .collect(),
        biases: vec![0.2; outputs],
    };
    FeedForwardNetwork::new(
        input_ranges(),
        output_ranges
            .into_iter()
            .map(|(lo, hi)| NodeRange(lo, hi))
            .collect(),
        vec![hidden, last],
    )
    .unwrap()
}

/// Atmospheric correction emits 8 reflectances then 4 optical depths.
pub fn atm_corr_ranges() -> Vec<(f32, f32)> {
    let mut ranges = vec![REFLECTANCE_RANGE; 8];
    ranges.extend([OPTICAL_DEPTH_RANGE; 4]);
    ranges
}

pub fn estimator_set() -> EstimatorSet {
    EstimatorSet::new()
        .with(EstimatorKind::Chlorophyll, Box::new(network(vec![CHL_RANGE])))
        .unwrap()
        .with(EstimatorKind::YellowSubstance, Box::new(network(vec![YS_RANGE])))
        .unwrap()
        .with(EstimatorKind::SuspendedMatter, Box::new(network(vec![TSM_RANGE])))
        .unwrap()
        .with(
            EstimatorKind::AtmosphericCorrection,
            Box::new(network(atm_corr_ranges())),
        )
        .unwrap()
}

pub fn spectral_context() -> SpectralContext {
    let flux = SolarFlux::resolve(None, &[]).unwrap();
    SpectralContext::new(NOMINAL_WAVELENGTHS, flux, SatBands::default().radiance_names()).unwrap()
}

/// All angles 30 degrees, wind (2, 2), 1013 hPa, 300 DU.
pub fn scenario_pixel(valid: bool) -> PixelInputs {
    PixelInputs::from_samples(
        MID_SCENE_RADIANCES,
        [30.0, 30.0, 30.0, 30.0, 2.0, 2.0, 1013.0, 300.0],
        valid,
    )
}
