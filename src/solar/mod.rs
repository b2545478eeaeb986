// Solar spectral flux resolution for the radiance bands.
//
// Level 1b files do not always carry the solar fluxes. The fluxes vary over the year and
// with small wavelength shifts, so values found in the product are preferred and the
// sensor defaults are only a fallback.

use crate::config::ConfigError;
use crate::sat_bands::{DEFAULT_SOLAR_FLUX, NUM_RADIANCE_BANDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarFluxSource {
    /// Taken verbatim from the scene metadata table
    Metadata,
    /// Taken from the band attributes; `defaulted` bands fell back to the sensor table
    Bands { defaulted: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolarFlux {
    values: [f32; NUM_RADIANCE_BANDS],
    source: SolarFluxSource,
}

impl SolarFlux {
    /// Resolve the flux for every radiance band.
    ///
    /// `metadata` is the scene-level table (`sun_spec_flux`), `band_flux` the per-band
    /// attribute in band order. A metadata table must hold exactly one positive, finite
    /// value per band.
    pub fn resolve(
        metadata: Option<&[f32]>,
        band_flux: &[Option<f32>],
    ) -> Result<Self, ConfigError> {
        if let Some(table) = metadata {
            if table.len() != NUM_RADIANCE_BANDS {
                return Err(ConfigError::SolarFlux(format!(
                    "expected {} values in metadata, found {}",
                    NUM_RADIANCE_BANDS,
                    table.len()
                )));
            }
            if let Some(bad) = table.iter().position(|v| !v.is_finite() || *v <= 0.0) {
                return Err(ConfigError::SolarFlux(format!(
                    "metadata value for band {} is {}",
                    bad + 1,
                    table[bad]
                )));
            }
            let mut values = [0.0; NUM_RADIANCE_BANDS];
            values.copy_from_slice(table);
            return Ok(Self {
                values,
                source: SolarFluxSource::Metadata,
            });
        }

        let mut values = [0.0; NUM_RADIANCE_BANDS];
        let mut defaulted = 0;
        for (i, value) in values.iter_mut().enumerate() {
            *value = match band_flux.get(i).copied().flatten() {
                Some(flux) if flux > 0.0 => flux,
                _ => {
                    defaulted += 1;
                    DEFAULT_SOLAR_FLUX[i] as f32
                }
            };
        }

        Ok(Self {
            values,
            source: SolarFluxSource::Bands { defaulted },
        })
    }

    pub fn values(&self) -> &[f32; NUM_RADIANCE_BANDS] {
        &self.values
    }

    pub fn source(&self) -> SolarFluxSource {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_values_are_used_verbatim() {
        let table: Vec<f32> = (0..15).map(|i| 1000.0 + i as f32 * 12.25).collect();
        let flux = SolarFlux::resolve(Some(&table), &[]).unwrap();
        assert_eq!(flux.values().as_slice(), table.as_slice());
        assert_eq!(flux.source(), SolarFluxSource::Metadata);
    }

    #[test]
    fn test_defaults_when_nothing_is_available() {
        let flux = SolarFlux::resolve(None, &[None; 15]).unwrap();
        for (value, default) in flux.values().iter().zip(DEFAULT_SOLAR_FLUX) {
            assert_eq!(*value, default as f32);
        }
        assert_eq!(flux.source(), SolarFluxSource::Bands { defaulted: 15 });
    }

    #[test]
    fn test_band_values_fill_before_defaults() {
        let mut bands = [None; 15];
        bands[0] = Some(1700.0);
        bands[1] = Some(0.0);
        let flux = SolarFlux::resolve(None, &bands).unwrap();
        assert_eq!(flux.values()[0], 1700.0);
        assert_eq!(flux.values()[1], DEFAULT_SOLAR_FLUX[1] as f32);
        assert_eq!(flux.source(), SolarFluxSource::Bands { defaulted: 14 });
    }

    #[test]
    fn test_short_metadata_table_is_rejected() {
        let table = [1700.0_f32; 12];
        assert!(SolarFlux::resolve(Some(&table), &[]).is_err());
    }

    #[test]
    fn test_non_positive_metadata_value_is_rejected() {
        let mut table = [1700.0_f32; 15];
        table[4] = -1.0;
        assert!(SolarFlux::resolve(Some(&table), &[]).is_err());
    }
}
