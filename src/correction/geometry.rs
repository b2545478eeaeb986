use super::constants::DEG_TO_RAD;

/// Wrap an azimuth difference (degrees) into (-180, 180].
pub fn wrap_azimuth(mut dazi: f32) -> f32 {
    if !dazi.is_finite() {
        return dazi;
    }
    // Large fills would otherwise absorb the +-360 steps below
    if dazi.abs() > 360.0 {
        dazi %= 360.0;
    }
    while dazi <= -180.0 {
        dazi += 360.0;
    }
    while dazi > 180.0 {
        dazi -= 360.0;
    }
    dazi
}

/// Reflect a wrapped azimuth difference about +-180 degrees. This is the convention the
/// estimators were trained with; 0 maps to 180 and the result stays in (-180, 180].
pub fn reflect_azimuth(dazi: f32) -> f32 {
    if dazi >= 0.0 {
        180.0 - dazi
    } else {
        -180.0 - dazi
    }
}

/// Relative azimuth as fed to the estimators.
pub fn relative_azimuth(view_azimuth: f32, sun_azimuth: f32) -> f32 {
    reflect_azimuth(wrap_azimuth(view_azimuth - sun_azimuth))
}

/// `[cos(sza), obs_x, obs_y, obs_z]`: the cosine of the sun zenith followed by the
/// viewing direction in Cartesian coordinates. Angles are in degrees.
pub fn viewing_geometry(sun_zenith: f32, view_zenith: f32, dazi: f32) -> [f32; 4] {
    let vza = view_zenith as f64 * DEG_TO_RAD;
    let dazi = dazi as f64 * DEG_TO_RAD;
    [
        (sun_zenith as f64 * DEG_TO_RAD).cos() as f32,
        (vza.sin() * dazi.cos()) as f32,
        (vza.sin() * dazi.sin()) as f32,
        vza.cos() as f32,
    ]
}
