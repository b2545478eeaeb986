//! Level 1b scene on disk
//!
//! A scene directory holds a `scene.json` description and one single-band GeoTIFF per
//! band, named `<band>.tif`, anywhere below the directory:
//!
//! ```json
//! {
//!   "product_type": "MER_RR__1P",
//!   "width": 1121,
//!   "height": 1601,
//!   "sensing_start": "2008-06-19T09:41:22Z",
//!   "bands": {
//!     "radiance_1": { "wavelength": 412.691, "solar_flux": 1713.7 },
//!     ...
//!   },
//!   "sun_spec_flux": [1713.7, ...]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ConfigError;
use crate::correction::SpectralContext;
use crate::readers::{DataReader, GeoTiffReader, ReadError};
use crate::retrieval::RetrievalError;
use crate::retrieval::pixel::PixelInputs;
use crate::sat_bands::{AUX_BAND_NAMES, FLAG_BAND_NAME, NUM_RADIANCE_BANDS, SatBands};
use crate::solar::{SolarFlux, SolarFluxSource};

pub const SCENE_METADATA_FILE: &str = "scene.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandInfo {
    #[serde(default)]
    pub wavelength: Option<f32>,
    #[serde(default)]
    pub solar_flux: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMetadata {
    #[serde(default)]
    pub product_type: Option<String>,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub sensing_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub bands: BTreeMap<String, BandInfo>,
    #[serde(default)]
    pub sun_spec_flux: Option<Vec<f32>>,
}

impl SceneMetadata {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// All rasters of one scene, held in memory
#[derive(Debug, Clone)]
pub struct Scene {
    metadata: SceneMetadata,
    band_names: Vec<String>,
    radiances: Vec<Vec<f32>>,
    flags: Vec<u32>,
    aux: Vec<Vec<f32>>,
}

impl Scene {
    /// Assemble a scene from named rasters. Every radiance, the flag band and every
    /// auxiliary band must be present with `width * height` samples.
    pub fn new(
        metadata: SceneMetadata,
        mut rasters: HashMap<String, Vec<f32>>,
        bands: &SatBands,
    ) -> Result<Self, RetrievalError> {
        let pixels = metadata.width as usize * metadata.height as usize;

        let mut take = |name: &str| -> Result<Vec<f32>, RetrievalError> {
            let raster = rasters
                .remove(name)
                .ok_or_else(|| ConfigError::MissingBand(name.to_string()))?;
            if raster.len() != pixels {
                return Err(ReadError::SampleCount {
                    band: name.to_string(),
                    expected: pixels,
                    found: raster.len(),
                }
                .into());
            }
            Ok(raster)
        };

        let radiances = bands
            .radiance_names()
            .iter()
            .map(|name| take(name.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let flags = take(FLAG_BAND_NAME)?
            .into_iter()
            .map(|f| f as u32)
            .collect();
        let aux = AUX_BAND_NAMES
            .iter()
            .map(|&name| take(name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            metadata,
            band_names: bands.radiance_names().to_vec(),
            radiances,
            flags,
            aux,
        })
    }

    /// Load `scene.json` and the band rasters below `directory`.
    pub fn load<P: AsRef<Path>>(directory: P, bands: &SatBands) -> Result<Self, RetrievalError> {
        let directory = directory.as_ref();
        let metadata = SceneMetadata::from_file(directory.join(SCENE_METADATA_FILE))?;
        let expected = (metadata.width, metadata.height);
        log::info!(
            "Loading {}x{} scene {} from {}",
            metadata.width,
            metadata.height,
            metadata.product_type.as_deref().unwrap_or("(unknown type)"),
            directory.display()
        );

        let files = find_band_files(directory);
        let mut rasters = HashMap::new();
        for band in bands.required_bands() {
            let path = files.get(&band).ok_or_else(|| ReadError::MissingFile {
                band: band.clone(),
                directory: directory.to_path_buf(),
            })?;
            let data = GeoTiffReader::new(path).read_data()?;
            if (data.width, data.height) != expected {
                return Err(ReadError::Dimensions {
                    band,
                    expected,
                    found: (data.width, data.height),
                }
                .into());
            }
            log::debug!("Read {band} from {}: {data}", path.display());
            rasters.insert(band, data.buffer);
        }

        Self::new(metadata, rasters, bands)
    }

    pub fn metadata(&self) -> &SceneMetadata {
        &self.metadata
    }

    pub fn product_type(&self) -> Option<&str> {
        self.metadata.product_type.as_deref()
    }

    pub fn width(&self) -> usize {
        self.metadata.width as usize
    }

    pub fn height(&self) -> usize {
        self.metadata.height as usize
    }

    pub fn flags(&self) -> &[u32] {
        &self.flags
    }

    /// Wavelengths from the band metadata and the resolved solar flux.
    pub fn spectral_context(&self) -> Result<SpectralContext, ConfigError> {
        let mut wavelengths = [0.0; NUM_RADIANCE_BANDS];
        let mut band_flux = Vec::with_capacity(NUM_RADIANCE_BANDS);
        for (i, name) in self.band_names.iter().enumerate() {
            let info = self.metadata.bands.get(name);
            wavelengths[i] = info
                .and_then(|b| b.wavelength)
                .ok_or_else(|| ConfigError::MissingWavelength(name.clone()))?;
            band_flux.push(info.and_then(|b| b.solar_flux).filter(|f| *f > 0.0));
        }

        let flux = SolarFlux::resolve(self.metadata.sun_spec_flux.as_deref(), &band_flux)?;
        match flux.source() {
            SolarFluxSource::Metadata => log::info!("Solar flux taken from scene metadata"),
            SolarFluxSource::Bands { defaulted: 0 } => {
                log::info!("Solar flux taken from band attributes")
            }
            SolarFluxSource::Bands { defaulted } => log::warn!(
                "{defaulted} of {NUM_RADIANCE_BANDS} bands have no solar flux, using sensor defaults"
            ),
        }

        SpectralContext::new(wavelengths, flux, &self.band_names)
    }

    /// Samples of pixel (`x`, `y`)
    pub fn pixel(&self, x: usize, y: usize, valid: bool) -> PixelInputs {
        let index = y * self.width() + x;
        let radiances = std::array::from_fn(|b| self.radiances[b][index]);
        let aux = std::array::from_fn(|a| self.aux[a][index]);
        PixelInputs::from_samples(radiances, aux, valid)
    }
}

/// Map every `<band>.tif` below `directory` to its path. The first match wins.
fn find_band_files(directory: &Path) -> HashMap<String, PathBuf> {
    let mut files = HashMap::new();
    for entry in WalkDir::new(directory)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("tif"))
            && let Some(stem) = path.file_stem()
        {
            files
                .entry(stem.to_string_lossy().to_string())
                .or_insert_with(|| path.to_path_buf());
        }
    }
    files
}
