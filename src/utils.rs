use crate::catalog::RESULT_MASK_VALUE;
use crate::retrieval::ProcessedScene;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStatistics {
    pub valid: usize,
    pub total: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

/// Statistics over the unflagged, finite pixels of one output band.
pub fn band_statistics(values: &[f32], flags: &[u16]) -> BandStatistics {
    let valid_values: Vec<f32> = values
        .iter()
        .zip(flags)
        .filter(|&(v, &f)| f == 0 && v.is_finite())
        .map(|(&v, _)| v)
        .collect();

    let mean = if valid_values.is_empty() {
        f32::NAN
    } else {
        valid_values.iter().sum::<f32>() / valid_values.len() as f32
    };

    BandStatistics {
        valid: valid_values.len(),
        total: values.len(),
        min: valid_values.iter().fold(f32::INFINITY, |a, &b| a.min(b)),
        max: valid_values.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b)),
        mean,
    }
}

pub fn log_output_statistics(processed: &ProcessedScene) {
    let result = &processed.result;
    let flags = result.flags();
    let flagged = flags.iter().filter(|&&f| f != 0).count();

    log::info!(
        "{}: {} of {} pixels flagged, flagged outputs set to {}",
        processed.product_type,
        flagged,
        flags.len(),
        RESULT_MASK_VALUE
    );

    for (slot, band) in processed.catalog.bands().iter().enumerate() {
        let stats = band_statistics(&result.band(slot), flags);
        if stats.valid == 0 {
            log::info!("  {}: no valid pixels", band.name);
            continue;
        }
        log::info!(
            "  {}: valid {} / {} ({:.1}%), min {:.4}, max {:.4}, mean {:.4} {}",
            band.name,
            stats.valid,
            stats.total,
            100.0 * stats.valid as f32 / stats.total as f32,
            stats.min,
            stats.max,
            stats.mean,
            band.unit
        );
    }

    let coding = processed.catalog.flag_coding();
    for flag in &coding.flags {
        let count = flags.iter().filter(|&&f| f & flag.value != 0).count();
        if count > 0 {
            log::debug!("  {}: {} pixels", flag.name, count);
        }
    }
}
