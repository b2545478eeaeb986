//! Geometry and ozone correction
//!
//! Turns the raw radiances and tie-point values of a pixel into the 18-element vector
//! every estimator is trained on:
//!
//! | index  | content                                              |
//! |--------|------------------------------------------------------|
//! | 0..12  | ozone corrected TOA reflectance of the retained bands |
//! | 12     | wind speed (m/s)                                     |
//! | 13     | surface pressure (hPa)                               |
//! | 14     | cos(sun zenith)                                      |
//! | 15..18 | viewing direction x, y, z                            |
//!
//! Reordering this layout silently corrupts every estimator output.

pub mod constants;
pub mod geometry;
pub mod ozone;

use crate::config::ConfigError;
use crate::retrieval::pixel::PixelInputs;
use crate::sat_bands::{NUM_RADIANCE_BANDS, RETAINED_BANDS};
use crate::solar::SolarFlux;

pub use geometry::{reflect_azimuth, relative_azimuth, viewing_geometry, wrap_azimuth};
pub use ozone::{extinction_coefficient, ozone_transmittance};

pub const NUM_REFLECTANCES: usize = RETAINED_BANDS.len();
pub const NORMALIZED_VECTOR_LEN: usize = NUM_REFLECTANCES + 2 + 4;

const WIND_INDEX: usize = NUM_REFLECTANCES;
const PRESSURE_INDEX: usize = NUM_REFLECTANCES + 1;
const GEOMETRY_INDEX: usize = NUM_REFLECTANCES + 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedInputVector([f32; NORMALIZED_VECTOR_LEN]);

impl NormalizedInputVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn reflectances(&self) -> &[f32] {
        &self.0[..NUM_REFLECTANCES]
    }

    pub fn wind_speed(&self) -> f32 {
        self.0[WIND_INDEX]
    }

    pub fn pressure(&self) -> f32 {
        self.0[PRESSURE_INDEX]
    }

    pub fn geometry(&self) -> &[f32] {
        &self.0[GEOMETRY_INDEX..]
    }
}

/// Scene-level spectral information: wavelength and solar flux per radiance band, with
/// the ozone extinction of the retained bands looked up once.
#[derive(Debug, Clone)]
pub struct SpectralContext {
    wavelengths: [f32; NUM_RADIANCE_BANDS],
    solar_flux: SolarFlux,
    extinction: [f64; NUM_REFLECTANCES],
}

impl SpectralContext {
    /// `band_names` is only used for error reporting and must follow band order.
    pub fn new(
        wavelengths: [f32; NUM_RADIANCE_BANDS],
        solar_flux: SolarFlux,
        band_names: &[String],
    ) -> Result<Self, ConfigError> {
        let band_name = |i: usize| {
            band_names
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("radiance_{}", i + 1))
        };

        if let Some(i) = wavelengths.iter().position(|wl| !wl.is_finite() || *wl <= 0.0) {
            return Err(ConfigError::MissingWavelength(band_name(i)));
        }

        let mut extinction = [0.0; NUM_REFLECTANCES];
        for (slot, &band) in extinction.iter_mut().zip(RETAINED_BANDS.iter()) {
            *slot = extinction_coefficient(wavelengths[band] as f64)
                .ok_or_else(|| ConfigError::MissingWavelength(band_name(band)))?;
        }

        Ok(Self {
            wavelengths,
            solar_flux,
            extinction,
        })
    }

    pub fn wavelengths(&self) -> &[f32; NUM_RADIANCE_BANDS] {
        &self.wavelengths
    }

    pub fn solar_flux(&self) -> &SolarFlux {
        &self.solar_flux
    }

    pub fn extinction(&self) -> &[f64; NUM_REFLECTANCES] {
        &self.extinction
    }

    pub fn normalize(&self, pixel: &PixelInputs) -> NormalizedInputVector {
        let mut vector = [0.0_f32; NORMALIZED_VECTOR_LEN];
        let flux = self.solar_flux.values();

        for (slot, (&band, &extinction)) in RETAINED_BANDS.iter().zip(&self.extinction).enumerate()
        {
            let reflectance = pixel.radiances[band] / flux[band];
            let transmittance =
                ozone_transmittance(pixel.ozone, extinction, pixel.sun_zenith, pixel.view_zenith);
            vector[slot] = (reflectance as f64 * transmittance) as f32;
        }

        let wind = pixel.zonal_wind * pixel.zonal_wind + pixel.merid_wind * pixel.merid_wind;
        vector[WIND_INDEX] = (wind as f64).sqrt() as f32;
        vector[PRESSURE_INDEX] = pixel.pressure;

        let dazi = relative_azimuth(pixel.view_azimuth, pixel.sun_azimuth);
        vector[GEOMETRY_INDEX..]
            .copy_from_slice(&viewing_geometry(pixel.sun_zenith, pixel.view_zenith, dazi));

        NormalizedInputVector(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat_bands::{DEFAULT_SOLAR_FLUX, NOMINAL_WAVELENGTHS, SatBands};
    use approx::assert_relative_eq;

    fn context() -> SpectralContext {
        let flux = SolarFlux::resolve(None, &[None; NUM_RADIANCE_BANDS]).unwrap();
        SpectralContext::new(NOMINAL_WAVELENGTHS, flux, SatBands::default().radiance_names())
            .unwrap()
    }

    fn pixel(ozone: f32) -> PixelInputs {
        let mut radiances = [0.0; NUM_RADIANCE_BANDS];
        for (i, r) in radiances.iter_mut().enumerate() {
            *r = 100.0 - 5.0 * i as f32;
        }
        PixelInputs::from_samples(
            radiances,
            [30.0, 30.0, 30.0, 30.0, 3.0, 4.0, 1013.0, ozone],
            true,
        )
    }

    #[test]
    fn test_vector_layout() {
        let vector = context().normalize(&pixel(344.0));
        assert_eq!(vector.as_slice().len(), 18);

        // At the reference ozone column the reflectance is a plain flux ratio
        for (slot, &band) in RETAINED_BANDS.iter().enumerate() {
            let expected = (100.0 - 5.0 * band as f32) / DEFAULT_SOLAR_FLUX[band] as f32;
            assert_eq!(vector.reflectances()[slot], expected);
        }
        assert_eq!(vector.wind_speed(), 5.0);
        assert_eq!(vector.pressure(), 1013.0);

        let geo = vector.geometry();
        assert_relative_eq!(geo[0], 30.0_f32.to_radians().cos(), epsilon = 1e-6);
        assert_relative_eq!(geo[1], -0.5, epsilon = 1e-6);
        assert_relative_eq!(geo[3], 30.0_f32.to_radians().cos(), epsilon = 1e-6);
    }

    #[test]
    fn test_ozone_correction_lowers_reflectance() {
        let ctx = context();
        let reference = ctx.normalize(&pixel(344.0));
        let thin = ctx.normalize(&pixel(250.0));
        // 560 nm is slot 4 and sits in the Chappuis band
        assert!(thin.reflectances()[4] < reference.reflectances()[4]);
        assert_eq!(thin.pressure(), reference.pressure());
    }

    #[test]
    fn test_missing_wavelength_is_fatal() {
        let flux = SolarFlux::resolve(None, &[]).unwrap();
        let mut wavelengths = NOMINAL_WAVELENGTHS;
        wavelengths[3] = 0.0;
        let err = SpectralContext::new(wavelengths, flux, SatBands::default().radiance_names())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingWavelength(name) if name == "radiance_4"));
    }
}
