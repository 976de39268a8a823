//! Example usage of the Sigmatrack library
//!
//! Tracks a simulated turning target from interleaved lidar and radar
//! readings and prints the estimate against the ground truth.

use sigmatrack::filters::tracker::{TrackerConfig, UkfTracker};
use sigmatrack::models::CtrvModel;
use sigmatrack::types::readings::{SensorKind, SensorReading};
use sigmatrack::types::spaces::AugmentedVector;

fn main() {
    println!("Sigmatrack: Unscented Lidar/Radar Fusion");
    println!("========================================\n");

    let mut tracker = UkfTracker::new(TrackerConfig::default());

    // Ground truth: constant speed and turn rate, stepped with the same
    // CTRV equations the filter assumes (noise components zero)
    let truth_model = CtrvModel::new(0.0_f64, 0.0);
    let mut truth: [f64; 5] = [5.0, 1.0, 3.0, 0.5, 0.4];
    let step_s = 0.1;
    let step_us: i64 = 100_000;

    println!(
        "{:>4} {:>6} {:>20} {:>20} {:>8} {:>8}",
        "step", "sensor", "truth (x, y)", "estimate (x, y)", "err", "NIS"
    );

    for k in 0..24i64 {
        let timestamp_us = 1_000_000 + k * step_us;
        let [tx, ty, tv, tyaw, _] = truth;

        // Alternate modalities, exact readings (no simulated sensor noise)
        let reading = if k % 2 == 0 {
            SensorReading::lidar(tx, ty, timestamp_us)
        } else {
            let range = (tx * tx + ty * ty).sqrt();
            let bearing = ty.atan2(tx);
            let range_rate = (tx * tv * tyaw.cos() + ty * tv * tyaw.sin()) / range;
            SensorReading::radar(range, bearing, range_rate, timestamp_us)
        };
        let kind = reading.kind();

        if let Err(err) = tracker.process(&reading) {
            println!("step {k}: cycle failed: {err}");
            continue;
        }

        let belief = tracker.belief().expect("belief exists after first reading");
        let [ex, ey] = belief.position();
        let err = ((ex - tx).powi(2) + (ey - ty).powi(2)).sqrt();
        let nis = tracker
            .nis(kind)
            .map_or_else(|| "-".to_string(), |v| format!("{v:.3}"));
        let sensor = match kind {
            SensorKind::Lidar => "lidar",
            SensorKind::Radar => "radar",
        };

        println!(
            "{:>4} {:>6} ({:>8.3}, {:>8.3}) ({:>8.3}, {:>8.3}) {:>8.3} {:>8}",
            k, sensor, tx, ty, ex, ey, err, nis
        );

        // Advance the truth to the next reading time
        let point = AugmentedVector::from_array([
            truth[0], truth[1], truth[2], truth[3], truth[4], 0.0, 0.0,
        ]);
        let next = truth_model.propagate(&point, step_s);
        truth = [
            *next.index(0),
            *next.index(1),
            *next.index(2),
            *next.index(3),
            *next.index(4),
        ];
    }

    println!("\nTracking complete!");
}
