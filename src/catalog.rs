//! Output product layout
//!
//! One band per enabled product, in a fixed order: the concentrations that are enabled
//! (chlorophyll, yellow substance, suspended matter), then, with atmospheric
//! correction, 4 aerosol optical depths followed by 8 water-leaving reflectances. The
//! uint16 `result_flags` band comes last.

use serde::Serialize;

use crate::config::ProcessingOptions;
use crate::estimator::EstimatorKind;
use crate::flags::{FlagCoding, RESULT_FLAGS_NAME};

/// Written to every output slot of a pixel that carries any result flag.
pub const RESULT_MASK_VALUE: f32 = 5.0;

pub const NUM_OPTICAL_DEPTHS: usize = 4;
pub const NUM_WATER_REFLECTANCES: usize = 8;
pub const ATM_CORR_SLOTS: usize = NUM_OPTICAL_DEPTHS + NUM_WATER_REFLECTANCES;

const CONCENTRATIONS: [(&str, &str, &str); 3] = [
    ("algal_2", "Chlorophyll 2 content", "log10(mg/m^3)"),
    ("yellow_subs", "Yellow substance", "log10(1/m)"),
    ("total_susp", "Total suspended matter", "log10(g/m^3)"),
];

const OPTICAL_DEPTH_NAMES: [&str; NUM_OPTICAL_DEPTHS] = [
    "aero_opt_thick_440",
    "aero_opt_thick_550",
    "aero_opt_thick_670",
    "aero_opt_thick_870",
];
const OPTICAL_DEPTH_WAVELENGTHS: [f32; NUM_OPTICAL_DEPTHS] = [440.0, 550.0, 670.0, 870.0];

const REFLECTANCE_NAMES: [&str; NUM_WATER_REFLECTANCES] = [
    "reflec_1", "reflec_2", "reflec_3", "reflec_4", "reflec_5", "reflec_6", "reflec_7",
    "reflec_9",
];
const REFLECTANCE_WAVELENGTHS: [f32; NUM_WATER_REFLECTANCES] =
    [412.5, 442.5, 490.0, 510.0, 560.0, 620.0, 665.0, 708.75];
const REFLECTANCE_BANDWIDTH: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandDescriptor {
    pub name: String,
    pub description: String,
    pub unit: String,
    pub wavelength: Option<f32>,
    pub bandwidth: Option<f32>,
    pub spectral_index: usize,
    pub no_data_value: f32,
}

impl BandDescriptor {
    fn new(name: &str, description: &str, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            unit: unit.to_string(),
            wavelength: None,
            bandwidth: None,
            spectral_index: 0,
            no_data_value: RESULT_MASK_VALUE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCatalog {
    stages: Vec<EstimatorKind>,
    bands: Vec<BandDescriptor>,
    flag_band: String,
    flag_coding: FlagCoding,
}

impl ProductCatalog {
    pub fn new(options: &ProcessingOptions) -> Self {
        let switches = [
            options.compute_chl,
            options.compute_ys,
            options.compute_tsm,
            options.compute_atm_corr,
        ];
        let stages: Vec<EstimatorKind> = EstimatorKind::ALL
            .into_iter()
            .zip(switches)
            .filter_map(|(kind, enabled)| enabled.then_some(kind))
            .collect();

        let mut bands = Vec::new();
        for kind in &stages {
            match kind {
                EstimatorKind::AtmosphericCorrection => {
                    for (i, name) in OPTICAL_DEPTH_NAMES.iter().enumerate() {
                        let mut band = BandDescriptor::new(name, "Aerosol optical thickness", "1");
                        band.wavelength = Some(OPTICAL_DEPTH_WAVELENGTHS[i]);
                        band.spectral_index = i;
                        bands.push(band);
                    }
                    for (i, name) in REFLECTANCE_NAMES.iter().enumerate() {
                        let mut band = BandDescriptor::new(name, "RS reflectance", "1/sr");
                        band.wavelength = Some(REFLECTANCE_WAVELENGTHS[i]);
                        band.bandwidth = Some(REFLECTANCE_BANDWIDTH);
                        band.spectral_index = i;
                        bands.push(band);
                    }
                }
                concentration => {
                    let (name, description, unit) =
                        CONCENTRATIONS[concentration.stage_index() as usize - 1];
                    bands.push(BandDescriptor::new(name, description, unit));
                }
            }
        }

        Self {
            stages,
            bands,
            flag_band: RESULT_FLAGS_NAME.to_string(),
            flag_coding: FlagCoding::result_flags(),
        }
    }

    /// Enabled stages in execution order
    pub fn stages(&self) -> &[EstimatorKind] {
        &self.stages
    }

    pub fn bands(&self) -> &[BandDescriptor] {
        &self.bands
    }

    pub fn slot_count(&self) -> usize {
        self.bands.len()
    }

    pub fn flag_band(&self) -> &str {
        &self.flag_band
    }

    pub fn flag_coding(&self) -> &FlagCoding {
        &self.flag_coding
    }

    /// Output product type derived from the source product type.
    pub fn product_type(source_type: Option<&str>) -> String {
        match source_type {
            Some(source) if !source.is_empty() => format!("{source}_WATER"),
            _ => "WATER".to_string(),
        }
    }
}
