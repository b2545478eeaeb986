//! Scene retrieval
//!
//! Scene setup (solar flux, wavelengths, valid mask, estimator lookup) runs once and
//! fails before any pixel is touched. The pixel loop that follows cannot fail: numeric
//! problems end up in the flag word.

pub mod pixel;
pub mod processor;
pub mod runner;

use std::sync::atomic::AtomicBool;
use std::time::Instant;
use thiserror::Error;

use crate::catalog::ProductCatalog;
use crate::config::{ConfigError, ProcessingOptions};
use crate::estimator::{EstimatorError, EstimatorSet};
use crate::mask::ValidMask;
use crate::readers::ReadError;
use crate::sat_bands::SatBands;
use crate::scene::Scene;
use crate::writers::WriteError;

pub use pixel::{PixelInputs, PixelResult};
pub use processor::{StageOrchestrator, deinterleave_atm_corr};
pub use runner::{SceneResult, run_scene};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Estimator(#[from] EstimatorError),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("Processing was cancelled")]
    Cancelled,
}

/// Result of processing one scene
#[derive(Debug)]
pub struct ProcessedScene {
    pub catalog: ProductCatalog,
    pub product_type: String,
    pub result: SceneResult,
}

/// Processes scenes with one set of options and estimators.
#[derive(Debug)]
pub struct WaterProcessor {
    options: ProcessingOptions,
    bands: SatBands,
    estimators: EstimatorSet,
}

impl WaterProcessor {
    pub fn new(options: ProcessingOptions, estimators: EstimatorSet) -> Self {
        let bands = SatBands::default();
        log::debug!("{bands}, estimators: {estimators:?}");
        Self {
            options,
            bands,
            estimators,
        }
    }

    pub fn options(&self) -> &ProcessingOptions {
        &self.options
    }

    pub fn bands(&self) -> &SatBands {
        &self.bands
    }

    pub fn process(
        &self,
        scene: &Scene,
        cancel: &AtomicBool,
    ) -> Result<ProcessedScene, RetrievalError> {
        let start = Instant::now();

        let catalog = ProductCatalog::new(&self.options);
        let names: Vec<String> = catalog.stages().iter().map(|k| k.to_string()).collect();
        log::info!(
            "Enabled products: {} ({} output bands)",
            if names.is_empty() {
                "none".to_string()
            } else {
                names.join(", ")
            },
            catalog.slot_count()
        );

        let spectral = scene.spectral_context()?;
        let mask = ValidMask::for_scene(
            &self.options,
            scene.product_type(),
            &self.bands,
            scene.flags(),
            scene.width(),
            scene.height(),
        )?;
        let orchestrator = StageOrchestrator::new(&catalog, &spectral, &self.estimators)?;
        log::debug!("Estimators: {:?}", self.estimators);

        let result = run_scene(&orchestrator, scene, &mask, cancel)?;
        let masked = result.flags().iter().filter(|&&f| f != 0).count();
        log::info!(
            "Processed {}x{} pixels in {:.2?}, {} flagged",
            scene.width(),
            scene.height(),
            start.elapsed(),
            masked
        );

        Ok(ProcessedScene {
            product_type: ProductCatalog::product_type(scene.product_type()),
            catalog,
            result,
        })
    }
}
