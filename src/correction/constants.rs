//! Constants for the top-of-atmosphere ozone correction

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Ozone column (DU) the estimators were trained against. Pixels are corrected
/// relative to this column, so a pixel at exactly this value is left unchanged.
pub const TOTAL_OZONE_REFERENCE_DU: f64 = 344.0;

pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Ozone absorption coefficients at different wavelengths (nm)
/// Values are in (atm cm)^-1; a column in Dobson units divided by 1000 gives atm cm.
/// Data after Bird and Riordan (1986), Vigroux ozone absorption spectrum
pub static OZONE_EXTINCTION: LazyLock<BTreeMap<u32, f64>> = LazyLock::new(|| {
    BTreeMap::from([
        (300, 10.0),
        (305, 4.8),
        (310, 2.7),
        (315, 1.35),
        (320, 0.8),
        (325, 0.38),
        (330, 0.16),
        (335, 0.075),
        (340, 0.04),
        (345, 0.019),
        (350, 0.007),
        (360, 0.0),
        (400, 0.0),
        (450, 0.003),
        (500, 0.035),
        (550, 0.092),
        (570, 0.12),
        (593, 0.119),
        (610, 0.12),
        (630, 0.09),
        (656, 0.065),
        (668, 0.051),
        (690, 0.028),
        (710, 0.018),
        (718, 0.015),
        (724, 0.012),
        (740, 0.01),
        (753, 0.008),
        (758, 0.007),
        (763, 0.006),
        (768, 0.005),
        (780, 0.004),
        (800, 0.003),
        (816, 0.002),
        (832, 0.001),
        (860, 0.0),
        (1100, 0.0),
    ])
});
