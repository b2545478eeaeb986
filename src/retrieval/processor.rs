use crate::catalog::{ATM_CORR_SLOTS, NUM_OPTICAL_DEPTHS, NUM_WATER_REFLECTANCES, ProductCatalog};
use crate::correction::SpectralContext;
use crate::estimator::{Estimator, EstimatorError, EstimatorKind, EstimatorSet};
use crate::flags;

use super::pixel::{PixelInputs, PixelResult};

/// Map the raw atmospheric correction output onto its product slots.
///
/// The estimator emits the 8 water-leaving reflectances first and the 4 aerosol
/// optical depths last. Products store the optical depths first:
///
/// * `segment[i] = output[8 + i]` for `i` in `0..4`
/// * `segment[4 + i] = output[i]` for `i` in `0..8`
pub fn deinterleave_atm_corr(output: &[f32; ATM_CORR_SLOTS]) -> [f32; ATM_CORR_SLOTS] {
    let mut segment = [0.0; ATM_CORR_SLOTS];
    segment[..NUM_OPTICAL_DEPTHS].copy_from_slice(&output[NUM_WATER_REFLECTANCES..]);
    segment[NUM_OPTICAL_DEPTHS..].copy_from_slice(&output[..NUM_WATER_REFLECTANCES]);
    segment
}

/// Runs the enabled retrieval stages for single pixels.
///
/// Every pixel goes through the same sequence: normalize once, evaluate each enabled
/// stage in catalog order on an identical copy of the normalized vector, then combine
/// the flags. A failing stage never short-circuits the stages after it, so the flag
/// word always reports every failure.
pub struct StageOrchestrator<'a> {
    spectral: &'a SpectralContext,
    stages: Vec<(EstimatorKind, &'a dyn Estimator)>,
    slot_count: usize,
}

impl<'a> StageOrchestrator<'a> {
    /// Fails when an enabled stage has no estimator.
    pub fn new(
        catalog: &ProductCatalog,
        spectral: &'a SpectralContext,
        estimators: &'a EstimatorSet,
    ) -> Result<Self, EstimatorError> {
        let stages = catalog
            .stages()
            .iter()
            .map(|&kind| estimators.require(kind).map(|estimator| (kind, estimator)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            spectral,
            stages,
            slot_count: catalog.slot_count(),
        })
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn process_pixel(&self, pixel: &PixelInputs) -> PixelResult {
        let mut values = vec![0.0; self.slot_count];
        let flags = self.process_pixel_into(pixel, &mut values);
        PixelResult { values, flags }
    }

    /// Write the pixel's outputs into `out` (one slot per catalog band) and return the
    /// flag word.
    pub fn process_pixel_into(&self, pixel: &PixelInputs, out: &mut [f32]) -> u16 {
        debug_assert_eq!(out.len(), self.slot_count);

        let vector = self.spectral.normalize(pixel);
        let mut stage_flags = 0;
        let mut slot = 0;

        for &(kind, estimator) in &self.stages {
            let result = estimator.evaluate(vector.as_slice());
            stage_flags |= flags::stage_flags(kind, result.status);

            match kind {
                EstimatorKind::AtmosphericCorrection => {
                    let mut raw = [f32::NAN; ATM_CORR_SLOTS];
                    for (dst, src) in raw.iter_mut().zip(&result.values) {
                        *dst = *src;
                    }
                    let segment = deinterleave_atm_corr(&raw);
                    out[slot..slot + ATM_CORR_SLOTS].copy_from_slice(&segment);
                    slot += ATM_CORR_SLOTS;
                }
                _ => {
                    out[slot] = result.values.first().copied().unwrap_or(f32::NAN);
                    slot += 1;
                }
            }
        }

        flags::combine(pixel.valid, stage_flags, out)
    }
}
