//! Per-pixel water constituent and atmospheric correction retrieval for MERIS level 1b
//! scenes.
//!
//! A scene is processed in three steps: scene setup ([`correction::SpectralContext`],
//! [`mask::ValidMask`], [`estimator::EstimatorSet`]), the parallel pixel loop
//! ([`retrieval::run_scene`]) and the output product ([`writers::write_product`]).

pub mod catalog;
pub mod config;
pub mod correction;
pub mod estimator;
pub mod flags;
pub mod mask;
pub mod readers;
pub mod retrieval;
pub mod sat_bands;
pub mod scene;
pub mod solar;
pub mod utils;
pub mod writers;
