//! Sensor models
//!
//! Each sensor maps a state-space point into its own measurement space and
//! declares which measurement component, if any, is an angle that needs
//! wraparound handling in residuals. Both sensors are corrected through the
//! unscented update, so no observation matrices or Jacobians appear here.

use nalgebra::RealField;
use num_traits::Float;

use crate::types::spaces::{Measurement, MeasurementCovariance, StateVector};
use crate::{FusionError, Result};

/// Ranges below this magnitude make the radar model undefined (the range
/// rate divides by the range).
const RANGE_FLOOR: f64 = 1e-6;

/// Trait for sensor models used in the unscented update.
///
/// Implementations map individual sigma points into measurement space; the
/// update stage recombines the mapped points into a predicted measurement
/// distribution.
pub trait SensorModel<T: RealField, const M: usize> {
    /// Maps a state-space point into this sensor's measurement space.
    fn observe(&self, state: &StateVector<T, 5>) -> Result<Measurement<T, M>>;

    /// Index of the angular measurement component, if any.
    ///
    /// Residuals in that component are wrapped into [-pi, pi] before they
    /// enter any covariance sum.
    fn angle_component(&self) -> Option<usize>;

    /// Returns the measurement noise covariance.
    fn measurement_noise(&self) -> MeasurementCovariance<T, M>;
}

// ============================================================================
// Lidar
// ============================================================================

/// Linear position sensor: observes (x, y) directly.
#[derive(Debug, Clone)]
pub struct LidarSensor<T: RealField> {
    /// X position noise standard deviation
    pub std_px: T,
    /// Y position noise standard deviation
    pub std_py: T,
}

impl<T: RealField + Float + Copy> LidarSensor<T> {
    /// Creates a new lidar sensor model.
    ///
    /// # Panics
    /// Panics if either noise parameter is not positive.
    pub fn new(std_px: T, std_py: T) -> Self {
        assert!(std_px > T::zero(), "Measurement noise std_px must be positive");
        assert!(std_py > T::zero(), "Measurement noise std_py must be positive");
        Self { std_px, std_py }
    }
}

impl<T: RealField + Float + Copy> SensorModel<T, 2> for LidarSensor<T> {
    fn observe(&self, state: &StateVector<T, 5>) -> Result<Measurement<T, 2>> {
        Ok(Measurement::from_array([*state.index(0), *state.index(1)]))
    }

    fn angle_component(&self) -> Option<usize> {
        None
    }

    fn measurement_noise(&self) -> MeasurementCovariance<T, 2> {
        let zero = T::zero();
        MeasurementCovariance::from_matrix(nalgebra::matrix![
            self.std_px * self.std_px, zero;
            zero, self.std_py * self.std_py
        ])
    }
}

// ============================================================================
// Radar
// ============================================================================

/// Nonlinear polar sensor: observes (range, bearing, range rate).
///
/// The range rate is the projection of the velocity onto the line of sight,
/// (px*v*cos(yaw) + py*v*sin(yaw)) / range, which is why the model needs the
/// heading-and-speed state parameterization rather than vx/vy.
#[derive(Debug, Clone)]
pub struct RadarSensor<T: RealField> {
    /// Range noise standard deviation (m)
    pub std_range: T,
    /// Bearing noise standard deviation (rad)
    pub std_bearing: T,
    /// Range rate noise standard deviation (m/s)
    pub std_range_rate: T,
}

impl<T: RealField + Float + Copy> RadarSensor<T> {
    /// Creates a new radar sensor model.
    ///
    /// # Panics
    /// Panics if any noise parameter is not positive.
    pub fn new(std_range: T, std_bearing: T, std_range_rate: T) -> Self {
        assert!(std_range > T::zero(), "Measurement noise std_range must be positive");
        assert!(
            std_bearing > T::zero(),
            "Measurement noise std_bearing must be positive"
        );
        assert!(
            std_range_rate > T::zero(),
            "Measurement noise std_range_rate must be positive"
        );
        Self {
            std_range,
            std_bearing,
            std_range_rate,
        }
    }

    /// Recovers the Cartesian position implied by a polar observation.
    ///
    /// Used to seed the belief when the first accepted reading is a radar
    /// reading.
    pub fn cartesian_position(&self, measurement: &Measurement<T, 3>) -> (T, T) {
        let range = *measurement.index(0);
        let bearing = *measurement.index(1);
        (range * Float::cos(bearing), range * Float::sin(bearing))
    }
}

impl<T: RealField + Float + Copy> SensorModel<T, 3> for RadarSensor<T> {
    fn observe(&self, state: &StateVector<T, 5>) -> Result<Measurement<T, 3>> {
        let px = *state.index(0);
        let py = *state.index(1);
        let speed = *state.index(2);
        let yaw = *state.index(3);

        let range = Float::sqrt(px * px + py * py);
        if range < T::from_f64(RANGE_FLOOR).unwrap() {
            return Err(FusionError::DegenerateRange);
        }

        let bearing = Float::atan2(py, px);
        let range_rate = (px * speed * Float::cos(yaw) + py * speed * Float::sin(yaw)) / range;

        Ok(Measurement::from_array([range, bearing, range_rate]))
    }

    fn angle_component(&self) -> Option<usize> {
        Some(1)
    }

    fn measurement_noise(&self) -> MeasurementCovariance<T, 3> {
        let zero = T::zero();
        MeasurementCovariance::from_matrix(nalgebra::matrix![
            self.std_range * self.std_range, zero, zero;
            zero, self.std_bearing * self.std_bearing, zero;
            zero, zero, self.std_range_rate * self.std_range_rate
        ])
    }
}
