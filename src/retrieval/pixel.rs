use crate::sat_bands::NUM_RADIANCE_BANDS;

// Measurements and geometry for a single pixel
#[derive(Debug, Clone, PartialEq)]
pub struct PixelInputs {
    pub radiances: [f32; NUM_RADIANCE_BANDS], // TOA radiance, mW m-2 sr-1 nm-1
    pub sun_zenith: f32,                      // degrees
    pub sun_azimuth: f32,                     // degrees
    pub view_zenith: f32,                     // degrees
    pub view_azimuth: f32,                    // degrees
    pub zonal_wind: f32,                      // m/s
    pub merid_wind: f32,                      // m/s
    pub pressure: f32,                        // hPa
    pub ozone: f32,                           // DU
    pub valid: bool,                          // a-priori valid pixel mask
}

impl PixelInputs {
    /// Build from the 8 auxiliary scalars in tie-point band order (see
    /// `sat_bands::AUX_BAND_NAMES`).
    pub fn from_samples(
        radiances: [f32; NUM_RADIANCE_BANDS],
        aux: [f32; 8],
        valid: bool,
    ) -> Self {
        let [
            sun_zenith,
            sun_azimuth,
            view_zenith,
            view_azimuth,
            zonal_wind,
            merid_wind,
            pressure,
            ozone,
        ] = aux;
        Self {
            radiances,
            sun_zenith,
            sun_azimuth,
            view_zenith,
            view_azimuth,
            zonal_wind,
            merid_wind,
            pressure,
            ozone,
            valid,
        }
    }
}

/// Outputs of one pixel: values of the enabled products in catalog order, and the
/// result flag word.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelResult {
    pub values: Vec<f32>,
    pub flags: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_samples_order() {
        let pixel = PixelInputs::from_samples(
            [1.0; NUM_RADIANCE_BANDS],
            [10.0, 20.0, 30.0, 40.0, 1.5, -2.5, 1013.0, 300.0],
            true,
        );
        assert_eq!(pixel.sun_zenith, 10.0);
        assert_eq!(pixel.view_azimuth, 40.0);
        assert_eq!(pixel.merid_wind, -2.5);
        assert_eq!(pixel.ozone, 300.0);
        assert!(pixel.valid);
    }
}
