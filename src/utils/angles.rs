//! Angle wrapping for circular quantities
//!
//! Yaw and bearing live on a circle. Differences between two such values
//! must be folded into [-pi, pi] before they enter a covariance sum, or a
//! jump across the discontinuity at pi inflates the covariance.

use nalgebra::RealField;

/// Folds an angle difference into the interval [-pi, pi].
///
/// Values are brought into range by repeatedly adding or subtracting 2*pi,
/// which is exact for the small excursions produced by sigma-point spreads
/// and measurement residuals.
#[inline]
pub fn wrap_angle<T: RealField + Copy>(mut angle: T) -> T {
    let pi = T::pi();
    let two_pi = T::two_pi();
    while angle > pi {
        angle -= two_pi;
    }
    while angle < -pi {
        angle += two_pi;
    }
    angle
}
