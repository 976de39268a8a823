//! Measurement-driven tracker orchestration
//!
//! The tracker owns the belief and the models. Every accepted reading runs
//! exactly one predict + update cycle against the sensor that produced it;
//! the first accepted reading only seeds the belief. Readings from disabled
//! sensors are skipped without touching any state.
//!
//! Numerical failures abort the cycle and leave the previous belief (and its
//! timestamp) in place, so one degenerate reading cannot corrupt the track.
//!
//! # Example
//!
//! ```
//! use sigmatrack::filters::tracker::{TrackerConfig, UkfTracker};
//! use sigmatrack::types::readings::{SensorKind, SensorReading};
//!
//! let mut tracker = UkfTracker::new(TrackerConfig::default());
//!
//! tracker.process(&SensorReading::lidar(5.0, 1.0, 0)).unwrap();
//! tracker.process(&SensorReading::radar(5.2, 0.19, 0.5, 100_000)).unwrap();
//!
//! assert!(tracker.belief().is_some());
//! assert!(tracker.nis(SensorKind::Radar).is_some());
//! ```

use nalgebra::{RealField, SVector};
use num_traits::Float;

use crate::filters::ukf;
use crate::models::{CtrvModel, LidarSensor, RadarSensor};
use crate::types::belief::Belief;
use crate::types::readings::{ReadingPayload, SensorKind, SensorReading};
use crate::types::spaces::{StateCovariance, StateVector};
use crate::{FusionError, Result};

// ============================================================================
// Configuration
// ============================================================================

/// Tracker configuration, fixed for the lifetime of a tracker.
///
/// Collects the per-sensor enable flags, the process and measurement noise
/// standard deviations, and the initialization prior in one immutable value
/// passed at construction.
#[derive(Debug, Clone)]
pub struct TrackerConfig<T: RealField> {
    /// Process lidar readings (disabled readings are skipped silently)
    pub use_lidar: bool,
    /// Process radar readings (disabled readings are skipped silently)
    pub use_radar: bool,
    /// Longitudinal acceleration noise standard deviation (m/s^2)
    pub std_accel: T,
    /// Yaw acceleration noise standard deviation (rad/s^2)
    pub std_yaw_accel: T,
    /// Lidar x position noise standard deviation (m)
    pub std_lidar_px: T,
    /// Lidar y position noise standard deviation (m)
    pub std_lidar_py: T,
    /// Radar range noise standard deviation (m)
    pub std_radar_range: T,
    /// Radar bearing noise standard deviation (rad)
    pub std_radar_bearing: T,
    /// Radar range rate noise standard deviation (m/s)
    pub std_radar_range_rate: T,
    /// Diagonal of the initial state covariance
    pub initial_variances: [T; 5],
    /// Speed assumed before any speed information has been observed (m/s)
    pub initial_speed: T,
    /// Heading assumed before any heading information has been observed (rad)
    pub initial_yaw: T,
    /// Turn rate assumed at initialization (rad/s)
    pub initial_yaw_rate: T,
}

impl<T: RealField + Float + Copy> Default for TrackerConfig<T> {
    fn default() -> Self {
        let f = |x: f64| T::from_f64(x).unwrap();
        Self {
            use_lidar: true,
            use_radar: true,
            std_accel: f(1.51),
            std_yaw_accel: f(0.51),
            std_lidar_px: f(0.15),
            std_lidar_py: f(0.15),
            std_radar_range: f(0.3),
            std_radar_bearing: f(0.03),
            std_radar_range_rate: f(0.3),
            initial_variances: [f(0.15), f(0.15), f(1.0), f(1.0), f(1.0)],
            initial_speed: f(1.0),
            initial_yaw: f(1.0),
            initial_yaw_rate: f(0.1),
        }
    }
}

// ============================================================================
// Tracker
// ============================================================================

/// A single-target unscented tracker fusing lidar and radar readings.
///
/// Holds the belief exclusively; callers query it through [`UkfTracker::belief`]
/// after feeding readings through [`UkfTracker::process`].
#[derive(Debug, Clone)]
pub struct UkfTracker<T: RealField> {
    config: TrackerConfig<T>,
    motion: CtrvModel<T>,
    lidar: LidarSensor<T>,
    radar: RadarSensor<T>,
    belief: Option<Belief<T>>,
    nis_lidar: Option<T>,
    nis_radar: Option<T>,
}

impl<T: RealField + Float + Copy> UkfTracker<T> {
    /// Creates a new tracker from a configuration.
    ///
    /// # Panics
    /// Panics if any noise standard deviation in the configuration is
    /// invalid (negative process noise, non-positive measurement noise).
    pub fn new(config: TrackerConfig<T>) -> Self {
        let motion = CtrvModel::new(config.std_accel, config.std_yaw_accel);
        let lidar = LidarSensor::new(config.std_lidar_px, config.std_lidar_py);
        let radar = RadarSensor::new(
            config.std_radar_range,
            config.std_radar_bearing,
            config.std_radar_range_rate,
        );
        Self {
            config,
            motion,
            lidar,
            radar,
            belief: None,
            nis_lidar: None,
            nis_radar: None,
        }
    }

    /// Returns the current belief, if any reading has been accepted yet.
    #[inline]
    pub fn belief(&self) -> Option<&Belief<T>> {
        self.belief.as_ref()
    }

    /// Returns the most recent normalized innovation squared for a sensor
    /// kind. `None` until the first update cycle of that kind.
    #[inline]
    pub fn nis(&self, kind: SensorKind) -> Option<T> {
        match kind {
            SensorKind::Lidar => self.nis_lidar,
            SensorKind::Radar => self.nis_radar,
        }
    }

    /// Returns the tracker configuration.
    #[inline]
    pub fn config(&self) -> &TrackerConfig<T> {
        &self.config
    }

    /// Processes one sensor reading.
    ///
    /// Readings from disabled sensors are skipped and return `Ok`. The first
    /// accepted reading initializes the belief from the measured position
    /// and returns without predicting or updating. Every later reading runs
    /// one predict + update cycle and overwrites the belief and the NIS slot
    /// of its sensor kind.
    ///
    /// # Errors
    /// - [`FusionError::NonMonotonicTimestamp`] if the reading is older than
    ///   the belief
    /// - [`FusionError::NotPositiveDefinite`], [`FusionError::SingularInnovation`],
    ///   [`FusionError::DegenerateRange`] on numerical degeneracies
    ///
    /// On any error the belief, its timestamp and the NIS values are left
    /// exactly as they were.
    pub fn process(&mut self, reading: &SensorReading<T>) -> Result<()> {
        let enabled = match reading.kind() {
            SensorKind::Lidar => self.config.use_lidar,
            SensorKind::Radar => self.config.use_radar,
        };
        if !enabled {
            return Ok(());
        }

        let Some(belief) = self.belief.clone() else {
            self.belief = Some(self.initial_belief(reading));
            return Ok(());
        };

        let elapsed_us = reading.timestamp_us - belief.timestamp_us;
        if elapsed_us < 0 {
            return Err(FusionError::NonMonotonicTimestamp);
        }
        let dt = T::from_i64(elapsed_us).unwrap() / T::from_f64(1e6).unwrap();

        let predicted = ukf::predict(&belief, &self.motion, dt)?;

        let corrected = match &reading.payload {
            ReadingPayload::Lidar(z) => ukf::update(&predicted, z, &self.lidar)?,
            ReadingPayload::Radar(z) => ukf::update(&predicted, z, &self.radar)?,
        };

        // Commit only after the whole cycle succeeded
        self.belief = Some(Belief::new(
            corrected.mean,
            corrected.covariance,
            reading.timestamp_us,
        ));
        match reading.kind() {
            SensorKind::Lidar => self.nis_lidar = Some(corrected.nis),
            SensorKind::Radar => self.nis_radar = Some(corrected.nis),
        }
        Ok(())
    }

    /// Seeds the belief from the first accepted reading.
    ///
    /// Position comes from the measurement (inverse-mapped from polar
    /// coordinates for radar); speed, heading and turn rate fall back to
    /// the configured defaults.
    fn initial_belief(&self, reading: &SensorReading<T>) -> Belief<T> {
        let (px, py) = match &reading.payload {
            ReadingPayload::Lidar(z) => (*z.index(0), *z.index(1)),
            ReadingPayload::Radar(z) => self.radar.cartesian_position(z),
        };

        let mean = StateVector::from_array([
            px,
            py,
            self.config.initial_speed,
            self.config.initial_yaw,
            self.config.initial_yaw_rate,
        ]);
        let covariance = StateCovariance::from_diagonal(&SVector::from(self.config.initial_variances));

        Belief::new(mean, covariance, reading.timestamp_us)
    }
}
