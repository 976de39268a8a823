//! Statistical and numerical consistency of the filter stages

#![cfg(feature = "alloc")]

mod common;

use common::{lidar, random_belief};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use sigmatrack::filters::tracker::{TrackerConfig, UkfTracker};
use sigmatrack::filters::ukf;
use sigmatrack::models::{CtrvModel, LidarSensor};
use sigmatrack::types::readings::SensorKind;
use sigmatrack::types::spaces::Measurement;

/// Asserts that a 5x5 covariance is symmetric and has no eigenvalue below
/// the numerical floor.
fn assert_valid_covariance(p: &nalgebra::SMatrix<f64, 5, 5>, context: &str) {
    for i in 0..5 {
        for j in 0..5 {
            assert!(
                (p[(i, j)] - p[(j, i)]).abs() < 1e-9,
                "{context}: covariance asymmetric at ({i}, {j})"
            );
        }
    }

    let eigenvalues = p.symmetric_eigenvalues();
    for (i, lambda) in eigenvalues.iter().enumerate() {
        assert!(
            *lambda > -1e-9,
            "{context}: eigenvalue {i} is negative: {lambda}"
        );
    }
}

#[test]
fn test_cycle_preserves_covariance_validity_for_random_priors() {
    let mut rng = StdRng::seed_from_u64(42);
    let motion = CtrvModel::new(1.51_f64, 0.51);
    let sensor = LidarSensor::new(0.15_f64, 0.15);

    for trial in 0..50 {
        let belief = random_belief(&mut rng);

        let predicted = ukf::predict(&belief, &motion, 0.1).unwrap();
        assert_valid_covariance(
            predicted.covariance.as_matrix(),
            &format!("trial {trial} after predict"),
        );

        // Measure near the predicted position
        let [px, py] = [*predicted.mean.index(0), *predicted.mean.index(1)];
        let z = Measurement::from_array([px + 0.1, py - 0.1]);

        let corrected = ukf::update(&predicted, &z, &sensor).unwrap();
        assert_valid_covariance(
            corrected.covariance.as_matrix(),
            &format!("trial {trial} after update"),
        );
    }
}

#[test]
fn test_nis_is_overwritten_each_cycle() {
    let mut tracker = UkfTracker::new(TrackerConfig::default());

    tracker.process(&lidar(0.0, 0.0, 0)).unwrap();
    tracker.process(&lidar(0.5, 0.0, 100_000)).unwrap();
    let first = tracker.nis(SensorKind::Lidar).unwrap();

    // A wildly inconsistent reading must replace, not accumulate, the statistic
    tracker.process(&lidar(30.0, -20.0, 200_000)).unwrap();
    let second = tracker.nis(SensorKind::Lidar).unwrap();

    assert!(second > first, "nis not overwritten: {first} vs {second}");
    assert!(second > 100.0, "outlier nis unexpectedly small: {second}");
}

#[test]
fn test_nis_matches_measurement_dimension_on_average() {
    // With measurement noise drawn from the modeled distribution the NIS
    // follows a chi-square with 2 degrees of freedom, so its running mean
    // should sit near 2
    let mut rng = StdRng::seed_from_u64(7);
    let noise = Normal::new(0.0, 0.15).unwrap();

    let mut tracker = UkfTracker::new(TrackerConfig::default());
    let speed = 4.0;

    tracker.process(&lidar(0.0, 0.0, 0)).unwrap();

    let mut nis_sum = 0.0;
    let mut cycles = 0;
    for k in 1..120i64 {
        let t = k as f64 * 0.1;
        let px = speed * t + noise.sample(&mut rng);
        let py = noise.sample(&mut rng);
        tracker.process(&lidar(px, py, k * 100_000)).unwrap();

        // Skip the transient while the wrong initialization defaults wash out
        if k >= 20 {
            nis_sum += tracker.nis(SensorKind::Lidar).unwrap();
            cycles += 1;
        }
    }

    let mean_nis = nis_sum / cycles as f64;
    assert!(
        mean_nis > 0.2 && mean_nis < 6.0,
        "mean lidar NIS out of range: {mean_nis}"
    );
}
