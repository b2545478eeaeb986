//! Output product on disk
//!
//! One Float32 GeoTIFF per catalog band, the UInt16 result flag raster, the source
//! `l1_flags` passed through unchanged, and `product.json` describing the bands, both
//! flag codings and the run.

pub mod geotiff;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::catalog::BandDescriptor;
use crate::flags::FlagCoding;
use crate::retrieval::ProcessedScene;
use crate::sat_bands::FLAG_BAND_NAME;
use crate::scene::Scene;

pub use geotiff::{write_f32_band, write_u16_band};

pub const PRODUCT_DESCRIPTION_FILE: &str = "product.json";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode GeoTIFF '{path}': {source}")]
    GeoTiff {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },
    #[error("Failed to write product description: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ProductDescription<'a> {
    product_type: &'a str,
    width: usize,
    height: usize,
    processed_at: DateTime<Utc>,
    sensing_start: Option<DateTime<Utc>>,
    bands: &'a [BandDescriptor],
    flag_band: &'a str,
    flag_coding: &'a FlagCoding,
    source_flag_band: &'a str,
    source_flag_coding: FlagCoding,
}

/// Write every output raster and the product description into `directory`, returning
/// the paths written. `scene` is the source `processed` was computed from.
pub fn write_product(
    processed: &ProcessedScene,
    scene: &Scene,
    directory: &Path,
) -> Result<Vec<PathBuf>, WriteError> {
    fs::create_dir_all(directory)?;
    let result = &processed.result;
    let (width, height) = (result.width() as u32, result.height() as u32);
    let mut written = Vec::new();

    for (slot, band) in processed.catalog.bands().iter().enumerate() {
        let path = directory.join(format!("{}.tif", band.name));
        write_f32_band(&path, width, height, &result.band(slot))?;
        written.push(path);
    }

    let flag_path = directory.join(format!("{}.tif", processed.catalog.flag_band()));
    write_u16_band(&flag_path, width, height, result.flags())?;
    written.push(flag_path);

    // MERIS L1b flags are 8 bit
    let l1_flags: Vec<u16> = scene.flags().iter().map(|&f| (f & 0xFFFF) as u16).collect();
    let l1_path = directory.join(format!("{FLAG_BAND_NAME}.tif"));
    write_u16_band(&l1_path, width, height, &l1_flags)?;
    written.push(l1_path);

    let description = ProductDescription {
        product_type: &processed.product_type,
        width: result.width(),
        height: result.height(),
        processed_at: Utc::now(),
        sensing_start: scene.metadata().sensing_start,
        bands: processed.catalog.bands(),
        flag_band: processed.catalog.flag_band(),
        flag_coding: processed.catalog.flag_coding(),
        source_flag_band: FLAG_BAND_NAME,
        source_flag_coding: FlagCoding::l1_flags(),
    };
    let description_path = directory.join(PRODUCT_DESCRIPTION_FILE);
    let writer = BufWriter::new(File::create(&description_path)?);
    serde_json::to_writer_pretty(writer, &description)?;
    written.push(description_path);

    log::info!(
        "Wrote {} files for {} to {}",
        written.len(),
        processed.product_type,
        directory.display()
    );
    Ok(written)
}
