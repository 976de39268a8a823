//! Common test helpers for the fusion integration tests

#![cfg(feature = "alloc")]
#![allow(dead_code)]

use rand::Rng;

use sigmatrack::types::belief::Belief;
use sigmatrack::types::readings::SensorReading;
use sigmatrack::types::spaces::{StateCovariance, StateVector};

/// Creates a lidar reading at the given position and time.
pub fn lidar(px: f64, py: f64, timestamp_us: i64) -> SensorReading<f64> {
    SensorReading::lidar(px, py, timestamp_us)
}

/// Creates a radar reading from a polar observation and time.
pub fn radar(range: f64, bearing: f64, range_rate: f64, timestamp_us: i64) -> SensorReading<f64> {
    SensorReading::radar(range, bearing, range_rate, timestamp_us)
}

/// Draws a random symmetric positive-definite 5x5 covariance.
///
/// Built as A * A^T plus a diagonal ridge, which is positive definite for
/// any draw of A, then scaled per component so the angular variances stay
/// in a physically plausible range.
pub fn random_pd_covariance<R: Rng>(rng: &mut R) -> StateCovariance<f64, 5> {
    let mut a = nalgebra::SMatrix::<f64, 5, 5>::zeros();
    for i in 0..5 {
        for j in 0..5 {
            a[(i, j)] = rng.gen_range(-1.0..1.0);
        }
    }
    let base = a * a.transpose() + nalgebra::SMatrix::<f64, 5, 5>::identity() * 0.5;

    let scales = nalgebra::SVector::<f64, 5>::from([1.0, 1.0, 0.7, 0.3, 0.15]);
    let d = nalgebra::SMatrix::<f64, 5, 5>::from_diagonal(&scales);
    StateCovariance::from_matrix(d * base * d)
}

/// Draws a random but physically plausible belief.
pub fn random_belief<R: Rng>(rng: &mut R) -> Belief<f64> {
    use std::f64::consts::PI;

    let mean = StateVector::from_array([
        rng.gen_range(-10.0..10.0),
        rng.gen_range(-10.0..10.0),
        rng.gen_range(0.0..10.0),
        rng.gen_range(-PI..PI),
        rng.gen_range(-1.0..1.0),
    ]);
    Belief::new(mean, random_pd_covariance(rng), 0)
}
