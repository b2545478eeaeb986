use super::constants::{DEG_TO_RAD, OZONE_EXTINCTION, TOTAL_OZONE_REFERENCE_DU};

/// Ozone extinction coefficient for `wavelength` (nm), linearly interpolated between the
/// tabulated wavelengths and clamped to the table ends.
///
/// Returns `None` for a wavelength that is not finite or not positive.
pub fn extinction_coefficient(wavelength: f64) -> Option<f64> {
    if !wavelength.is_finite() || wavelength <= 0.0 {
        return None;
    }

    let table = &*OZONE_EXTINCTION;
    let below = table.range(..=wavelength.floor() as u32).next_back();
    let above = table.range(wavelength.ceil() as u32..).next();

    match (below, above) {
        (Some((&wl0, &k0)), Some((&wl1, &k1))) => {
            if wl0 == wl1 {
                Some(k0)
            } else {
                let weight = (wavelength - wl0 as f64) / (wl1 as f64 - wl0 as f64);
                Some(k0 + weight * (k1 - k0))
            }
        }
        (Some((_, &k)), None) | (None, Some((_, &k))) => Some(k),
        (None, None) => None,
    }
}

/// Two-way ozone transmittance along the sun and view paths, relative to the
/// reference column.
///
/// `ozone_du` is the pixel's column in Dobson units, the zenith angles are in degrees.
pub fn ozone_transmittance(
    ozone_du: f32,
    extinction: f64,
    sun_zenith: f32,
    view_zenith: f32,
) -> f64 {
    let air_mass =
        1.0 / (view_zenith as f64 * DEG_TO_RAD).cos() + 1.0 / (sun_zenith as f64 * DEG_TO_RAD).cos();
    (-(TOTAL_OZONE_REFERENCE_DU - ozone_du as f64) * extinction / 1000.0 * air_mass).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_table_entry() {
        assert_eq!(extinction_coefficient(550.0), Some(0.092));
    }

    #[test]
    fn test_interpolates_between_entries() {
        let k = extinction_coefficient(560.0).unwrap();
        assert_relative_eq!(k, 0.092 + 0.5 * (0.12 - 0.092), epsilon = 1e-12);

        let k = extinction_coefficient(412.5).unwrap();
        assert!(k > 0.0 && k < 0.003);
    }

    #[test]
    fn test_clamps_outside_table() {
        assert_eq!(extinction_coefficient(1500.0), Some(0.0));
        assert_eq!(extinction_coefficient(250.0), Some(10.0));
    }

    #[test]
    fn test_invalid_wavelengths() {
        assert_eq!(extinction_coefficient(0.0), None);
        assert_eq!(extinction_coefficient(-442.5), None);
        assert_eq!(extinction_coefficient(f64::NAN), None);
    }

    #[test]
    fn test_reference_column_gives_unit_transmittance() {
        for (sza, vza) in [(0.0, 0.0), (30.0, 30.0), (75.0, 42.0), (12.5, 60.0)] {
            for wl in [412.5, 560.0, 665.0, 865.0] {
                let k = extinction_coefficient(wl).unwrap();
                assert_eq!(ozone_transmittance(344.0, k, sza, vza), 1.0);
            }
        }
    }

    #[test]
    fn test_transmittance_within_unit_interval() {
        for ozone in [0.0_f32, 150.0, 250.0, 300.0, 343.9, 344.0] {
            for sza in [0.0_f32, 20.0, 45.0, 70.0] {
                for wl in [412.5, 490.0, 560.0, 620.0, 708.75, 885.0] {
                    let k = extinction_coefficient(wl).unwrap();
                    let t = ozone_transmittance(ozone, k, sza, 35.0);
                    assert!(t > 0.0 && t <= 1.0, "t = {t} for {ozone} DU, {wl} nm");
                }
            }
        }
    }

    #[test]
    fn test_lower_ozone_attenuates_more() {
        let k = extinction_coefficient(600.0).unwrap();
        let t_low = ozone_transmittance(250.0, k, 30.0, 30.0);
        let t_high = ozone_transmittance(320.0, k, 30.0, 30.0);
        assert!(t_low < t_high);
    }
}
