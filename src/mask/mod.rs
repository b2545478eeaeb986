//! A-priori valid pixel mask
//!
//! The valid-pixel expression is parsed and evaluated once per scene, before any pixel
//! is processed, into a row-major boolean raster.

pub mod expression;
pub mod suspect;

use crate::config::{ConfigError, ProcessingOptions};
use crate::sat_bands::SatBands;

pub use expression::Expr;
pub use suspect::relax_suspect_term;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidMask {
    width: usize,
    height: usize,
    valid: Vec<bool>,
}

impl ValidMask {
    pub fn all_valid(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            valid: vec![true; width * height],
        }
    }

    /// Evaluate `expression` for every pixel of the flag raster.
    pub fn evaluate(
        expression: &str,
        bands: &SatBands,
        flags: &[u32],
        width: usize,
        height: usize,
    ) -> Result<Self, ConfigError> {
        let expr = Expr::parse(expression, bands)?;
        if flags.len() != width * height {
            return Err(ConfigError::IncompatibleExpression {
                expression: expression.to_string(),
                reason: format!(
                    "flag raster holds {} pixels, expected {width}x{height}",
                    flags.len()
                ),
            });
        }

        Ok(Self {
            width,
            height,
            valid: flags.iter().map(|&f| expr.eval(f)).collect(),
        })
    }

    /// Build the scene mask from the processing options, applying the suspect flag
    /// check first when it is enabled.
    pub fn for_scene(
        options: &ProcessingOptions,
        product_type: Option<&str>,
        bands: &SatBands,
        flags: &[u32],
        width: usize,
        height: usize,
    ) -> Result<Self, ConfigError> {
        let expression = if options.suspect_flag_check {
            relax_suspect_term(
                &options.valid_pixel_expression,
                product_type,
                flags,
                width,
                height,
                bands,
            )
        } else {
            options.valid_pixel_expression.clone()
        };

        let mask = Self::evaluate(&expression, bands, flags, width, height)?;
        log::info!(
            "Valid pixel expression '{}' accepts {} of {} pixels",
            expression,
            mask.valid_count(),
            mask.valid.len()
        );
        Ok(mask)
    }

    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.valid.get(y * self.width + x).copied().unwrap_or(false)
    }

    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }
}
