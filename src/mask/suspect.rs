// Suspect flag relaxation.
//
// Some scenes set the SUSPECT flag on large areas where the data are fine. ICOL
// corrected products never carry a usable SUSPECT flag, and for other products the
// middle scan line tells how widespread it is. In both cases the SUSPECT term is removed
// from the valid-pixel expression.

use crate::config::{SUSPECT_EXPRESSION_TERM, SUSPECT_FLAG_NAME};
use crate::sat_bands::SatBands;

/// ICOL products follow the `MER_*1N` type naming.
pub fn is_icol_product(product_type: &str) -> bool {
    product_type.len() >= 6 && product_type.starts_with("MER_") && product_type.ends_with("1N")
}

/// Number of pixels on row `y` with the SUSPECT flag raised.
pub fn suspect_count(flags: &[u32], width: usize, y: usize, bands: &SatBands) -> usize {
    let Some(mask) = bands.flag_value("SUSPECT") else {
        return 0;
    };
    flags
        .chunks(width.max(1))
        .nth(y)
        .map(|row| row.iter().filter(|&&f| f & mask != 0).count())
        .unwrap_or(0)
}

/// Return the valid-pixel expression to use for this scene, with the SUSPECT term
/// removed when the flag cannot be trusted.
pub fn relax_suspect_term(
    expression: &str,
    product_type: Option<&str>,
    flags: &[u32],
    width: usize,
    height: usize,
    bands: &SatBands,
) -> String {
    if !expression.contains(SUSPECT_EXPRESSION_TERM) {
        return expression.to_string();
    }

    if let Some(product_type) = product_type.filter(|t| is_icol_product(t)) {
        log::info!("Ignoring {SUSPECT_FLAG_NAME} for ICOL product {product_type}");
        return remove_term(expression);
    }

    let middle = height / 2;
    let count = suspect_count(flags, width, middle, bands);
    let percent = if width == 0 {
        0.0
    } else {
        100.0 * count as f64 / width as f64
    };

    if count >= width / 2 {
        log::info!(
            "{percent:.1}% of row {middle} is flagged SUSPECT, ignoring {SUSPECT_FLAG_NAME}"
        );
        remove_term(expression)
    } else {
        log::debug!("{percent:.1}% of row {middle} is flagged SUSPECT, keeping {SUSPECT_FLAG_NAME}");
        expression.to_string()
    }
}

fn remove_term(expression: &str) -> String {
    expression.replace(SUSPECT_EXPRESSION_TERM, "").trim().to_string()
}
