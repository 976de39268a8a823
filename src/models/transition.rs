//! CTRV process model: constant turn rate and velocity
//!
//! State: [px, py, v, yaw, yaw_rate]. The object is assumed to move on a
//! circular arc with constant speed and turn rate; process noise enters as
//! longitudinal acceleration and yaw acceleration, carried as two extra
//! zero-mean components of the augmented state during sigma-point
//! propagation.

use nalgebra::RealField;
use num_traits::Float;

use crate::types::spaces::{AugmentedVector, StateVector};

/// Turn rates below this magnitude use the straight-line limit of the arc
/// equations, which divide by the turn rate.
const YAW_RATE_FLOOR: f64 = 1e-3;

/// Constant turn rate and velocity motion model.
#[derive(Debug, Clone)]
pub struct CtrvModel<T: RealField> {
    /// Longitudinal acceleration noise standard deviation (m/s^2)
    pub std_accel: T,
    /// Yaw acceleration noise standard deviation (rad/s^2)
    pub std_yaw_accel: T,
}

impl<T: RealField + Float + Copy> CtrvModel<T> {
    /// Creates a new CTRV model.
    ///
    /// # Arguments
    /// - `std_accel`: longitudinal acceleration noise standard deviation (must be >= 0)
    /// - `std_yaw_accel`: yaw acceleration noise standard deviation (must be >= 0)
    ///
    /// # Panics
    /// Panics if either noise parameter is negative.
    pub fn new(std_accel: T, std_yaw_accel: T) -> Self {
        assert!(
            std_accel >= T::zero(),
            "Process noise std_accel must be non-negative"
        );
        assert!(
            std_yaw_accel >= T::zero(),
            "Process noise std_yaw_accel must be non-negative"
        );
        Self {
            std_accel,
            std_yaw_accel,
        }
    }

    /// Propagates one augmented sigma point forward by `dt` seconds.
    ///
    /// The first five components of the point are the state, the last two
    /// are the sampled noise realizations. The arc equations are used when
    /// the turn rate is meaningfully nonzero; otherwise the straight-line
    /// limit avoids the division by the turn rate.
    ///
    /// # Panics
    /// Panics if `dt < 0`.
    pub fn propagate(&self, point: &AugmentedVector<T, 7>, dt: T) -> StateVector<T, 5> {
        assert!(dt >= T::zero(), "Time step dt must be non-negative");

        let px = *point.index(0);
        let py = *point.index(1);
        let speed = *point.index(2);
        let yaw = *point.index(3);
        let yaw_rate = *point.index(4);
        let nu_accel = *point.index(5);
        let nu_yaw_accel = *point.index(6);

        let cos_yaw = Float::cos(yaw);
        let sin_yaw = Float::sin(yaw);

        let (px_pred, py_pred) = if Float::abs(yaw_rate) > T::from_f64(YAW_RATE_FLOOR).unwrap() {
            let yaw_ahead = yaw + yaw_rate * dt;
            (
                px + speed / yaw_rate * (Float::sin(yaw_ahead) - sin_yaw),
                py + speed / yaw_rate * (cos_yaw - Float::cos(yaw_ahead)),
            )
        } else {
            (px + speed * dt * cos_yaw, py + speed * dt * sin_yaw)
        };

        let half = T::from_f64(0.5).unwrap();
        let dt_sq = dt * dt;

        StateVector::from_array([
            px_pred + half * nu_accel * dt_sq * cos_yaw,
            py_pred + half * nu_accel * dt_sq * sin_yaw,
            speed + nu_accel * dt,
            yaw + yaw_rate * dt + half * nu_yaw_accel * dt_sq,
            yaw_rate + nu_yaw_accel * dt,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noiseless(state: [f64; 5]) -> AugmentedVector<f64, 7> {
        AugmentedVector::from_array([state[0], state[1], state[2], state[3], state[4], 0.0, 0.0])
    }

    #[test]
    fn test_straight_line_matches_analytic_solution() {
        // With zero turn rate and zero noise the motion is a straight line
        let model = CtrvModel::new(1.0_f64, 0.5);
        let yaw = 0.6_f64;
        let point = noiseless([1.0, 2.0, 8.0, yaw, 0.0]);
        let dt = 0.25;

        let predicted = model.propagate(&point, dt);

        assert!((predicted.index(0) - (1.0 + 8.0 * yaw.cos() * dt)).abs() < 1e-12);
        assert!((predicted.index(1) - (2.0 + 8.0 * yaw.sin() * dt)).abs() < 1e-12);
        assert!((predicted.index(2) - 8.0).abs() < 1e-12);
        assert!((predicted.index(3) - yaw).abs() < 1e-12);
        assert!((predicted.index(4) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_quarter_turn() {
        use std::f64::consts::FRAC_PI_2;

        // Moving east at 10 m/s, turning left at pi/2 rad/s for one second
        let model = CtrvModel::new(1.0_f64, 0.5);
        let point = noiseless([0.0, 0.0, 10.0, 0.0, FRAC_PI_2]);

        let predicted = model.propagate(&point, 1.0);

        // Turn radius r = v / omega; after a quarter turn the object sits at (r, r)
        let r = 10.0 / FRAC_PI_2;
        assert!((predicted.index(0) - r).abs() < 1e-9, "x: {}", predicted.index(0));
        assert!((predicted.index(1) - r).abs() < 1e-9, "y: {}", predicted.index(1));
        assert!((predicted.index(3) - FRAC_PI_2).abs() < 1e-12);
        assert!((predicted.index(4) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_branch_continuity_at_threshold() {
        // The arc branch and the straight-line branch must agree as the
        // turn rate crosses the floor, otherwise the floor would introduce
        // a discontinuity in the prediction.
        let model = CtrvModel::new(1.0_f64, 0.5);
        let dt = 0.5;

        let above = noiseless([3.0, -2.0, 6.0, 0.4, 1.001e-3]);
        let below = noiseless([3.0, -2.0, 6.0, 0.4, 0.999e-3]);

        let pred_above = model.propagate(&above, dt);
        let pred_below = model.propagate(&below, dt);

        for i in 0..5 {
            assert!(
                (pred_above.index(i) - pred_below.index(i)).abs() < 1e-3,
                "component {} jumps across the threshold: {} vs {}",
                i,
                pred_above.index(i),
                pred_below.index(i)
            );
        }
    }

    #[test]
    fn test_noise_injection() {
        let model = CtrvModel::new(1.0_f64, 0.5);
        let dt = 2.0;
        let point =
            AugmentedVector::from_array([0.0, 0.0, 5.0, 0.0, 0.0, 0.3, 0.1]);

        let predicted = model.propagate(&point, dt);

        // Second-order position contribution along the heading, first-order
        // contributions on speed, yaw and yaw rate
        assert!((predicted.index(0) - (5.0 * 2.0 + 0.5 * 0.3 * 4.0)).abs() < 1e-12);
        assert!((predicted.index(1) - 0.0).abs() < 1e-12);
        assert!((predicted.index(2) - (5.0 + 0.3 * 2.0)).abs() < 1e-12);
        assert!((predicted.index(3) - 0.5 * 0.1 * 4.0).abs() < 1e-12);
        assert!((predicted.index(4) - 0.1 * 2.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn test_negative_noise_rejected() {
        let _ = CtrvModel::new(-1.0_f64, 0.5);
    }
}
