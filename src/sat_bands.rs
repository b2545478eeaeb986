// MERIS Level 1b band layout. Band order is fixed by the sensor definition and every
// index in this file is zero-based.
use std::fmt::Display;

pub const NUM_RADIANCE_BANDS: usize = 15;

/// Bands that enter the normalized reflectance vector. Bands 8, 11 and 15 (681 nm
/// fluorescence, 761 nm oxygen A and 900 nm water vapour) are left out.
pub const RETAINED_BANDS: [usize; 12] = [0, 1, 2, 3, 4, 5, 6, 8, 9, 11, 12, 13];

pub const FLAG_BAND_NAME: &str = "l1_flags";

pub const SUN_ZENITH: &str = "sun_zenith";
pub const SUN_AZIMUTH: &str = "sun_azimuth";
pub const VIEW_ZENITH: &str = "view_zenith";
pub const VIEW_AZIMUTH: &str = "view_azimuth";
pub const ZONAL_WIND: &str = "zonal_wind";
pub const MERID_WIND: &str = "merid_wind";
pub const ATM_PRESS: &str = "atm_press";
pub const OZONE: &str = "ozone";

/// Auxiliary tie-point bands in the order `PixelInputs` stores them.
pub const AUX_BAND_NAMES: [&str; 8] = [
    SUN_ZENITH,
    SUN_AZIMUTH,
    VIEW_ZENITH,
    VIEW_AZIMUTH,
    ZONAL_WIND,
    MERID_WIND,
    ATM_PRESS,
    OZONE,
];

/// Nominal band centres (nm)
pub const NOMINAL_WAVELENGTHS: [f32; NUM_RADIANCE_BANDS] = [
    412.5, 442.5, 490.0, 510.0, 560.0, 620.0, 665.0, 681.25, 708.75, 753.75, 760.625, 778.75,
    865.0, 885.0, 900.0,
];

/// Mean extraterrestrial solar flux per band (mW m^-2 nm^-1), used when neither the scene
/// metadata nor the band itself carries a value.
pub const DEFAULT_SOLAR_FLUX: [f64; NUM_RADIANCE_BANDS] = [
    1670.5964, 1824.1444, 1874.9883, 1877.6682, 1754.7749, 1606.6401, 1490.0026, 1431.8726,
    1369.2035, 1231.7164, 1220.0767, 1144.9675, 932.3497, 904.8193, 871.0908,
];

/// Bit values of the `l1_flags` band
pub const L1_FLAGS: [(&str, u32); 8] = [
    ("COSMETIC", 0x01),
    ("DUPLICATED", 0x02),
    ("GLINT_RISK", 0x04),
    ("SUSPECT", 0x08),
    ("LAND_OCEAN", 0x10),
    ("BRIGHT", 0x20),
    ("COASTLINE", 0x40),
    ("INVALID", 0x80),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    Meris,
}

#[derive(Debug)]
pub struct SatBands {
    sensor: Sensor,
    radiance_names: Vec<String>,
}

impl SatBands {
    pub fn new(sensor: Sensor) -> Self {
        let radiance_names = match sensor {
            Sensor::Meris => (1..=NUM_RADIANCE_BANDS)
                .map(|i| format!("radiance_{i}"))
                .collect(),
        };
        Self {
            sensor,
            radiance_names,
        }
    }

    pub fn radiance_names(&self) -> &[String] {
        &self.radiance_names
    }

    pub fn flag_value(&self, name: &str) -> Option<u32> {
        L1_FLAGS
            .iter()
            .find(|(flag, _)| flag.eq_ignore_ascii_case(name))
            .map(|&(_, value)| value)
    }

    /// Every band a scene has to provide, radiances first.
    pub fn required_bands(&self) -> Vec<String> {
        self.radiance_names
            .iter()
            .cloned()
            .chain(std::iter::once(FLAG_BAND_NAME.to_string()))
            .chain(AUX_BAND_NAMES.iter().map(|name| name.to_string()))
            .collect()
    }
}

impl Default for SatBands {
    fn default() -> Self {
        Self::new(Sensor::Meris)
    }
}

impl Display for Sensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sensor::Meris => write!(f, "MERIS"),
        }
    }
}

impl Display for SatBands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sensor: {}, Radiance bands: {}",
            self.sensor,
            self.radiance_names.len()
        )
    }
}
