//! The tracked belief: state estimate, uncertainty, and reference time

use nalgebra::RealField;

use super::spaces::{StateCovariance, StateVector};

/// The current state estimate of the tracked object.
///
/// Holds the mean and covariance of the 5-dimensional CTRV state
/// (position x, position y, speed, yaw, yaw rate) together with the
/// timestamp the estimate refers to. The belief is owned exclusively by the
/// tracker and replaced once per accepted sensor reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Belief<T: RealField> {
    /// State estimate mean
    pub mean: StateVector<T, 5>,
    /// State estimate covariance
    pub covariance: StateCovariance<T, 5>,
    /// Time the estimate refers to, in integer microseconds
    pub timestamp_us: i64,
}

impl<T: RealField + Copy> Belief<T> {
    /// Creates a new belief.
    #[inline]
    pub fn new(mean: StateVector<T, 5>, covariance: StateCovariance<T, 5>, timestamp_us: i64) -> Self {
        Self {
            mean,
            covariance,
            timestamp_us,
        }
    }

    /// Returns the estimated position.
    #[inline]
    pub fn position(&self) -> [T; 2] {
        [*self.mean.index(0), *self.mean.index(1)]
    }

    /// Returns the estimated speed magnitude.
    #[inline]
    pub fn speed(&self) -> T {
        *self.mean.index(2)
    }

    /// Returns the estimated heading angle in radians.
    #[inline]
    pub fn yaw(&self) -> T {
        *self.mean.index(3)
    }

    /// Returns the estimated turn rate in radians per second.
    #[inline]
    pub fn yaw_rate(&self) -> T {
        *self.mean.index(4)
    }

    /// Returns the trace of the covariance matrix (sum of variances).
    #[inline]
    pub fn uncertainty(&self) -> T {
        self.covariance.trace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_belief_accessors() {
        let belief = Belief::new(
            StateVector::from_array([2.0_f64, -1.0, 4.5, 0.3, 0.05]),
            StateCovariance::identity(),
            1_000_000,
        );

        let [px, py] = belief.position();
        assert!((px - 2.0).abs() < 1e-12);
        assert!((py + 1.0).abs() < 1e-12);
        assert!((belief.speed() - 4.5).abs() < 1e-12);
        assert!((belief.yaw() - 0.3).abs() < 1e-12);
        assert!((belief.yaw_rate() - 0.05).abs() < 1e-12);
        assert!((belief.uncertainty() - 5.0).abs() < 1e-12);
        assert_eq!(belief.timestamp_us, 1_000_000);
    }
}
