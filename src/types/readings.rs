//! Sensor readings: the ingestion contract of the tracker
//!
//! A reading carries a sensor-tagged raw measurement and its timestamp.
//! The tag is a variant of the payload enum, so dispatching on the sensor
//! kind is a `match` rather than a runtime flag check, and the payload
//! dimension always agrees with the sensor that produced it.

use nalgebra::Scalar;

use super::spaces::Measurement;

/// The sensor modality that produced a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    /// Linear position sensor: observes (x, y) directly
    Lidar,
    /// Nonlinear polar sensor: observes (range, bearing, range rate)
    Radar,
}

/// The raw measurement carried by a reading, tagged by sensor kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadingPayload<T: Scalar> {
    /// Cartesian position (x, y)
    Lidar(Measurement<T, 2>),
    /// Polar observation (range, bearing, range rate)
    Radar(Measurement<T, 3>),
}

/// A timestamped sensor reading.
///
/// Timestamps are integer microseconds and must be non-decreasing across
/// the stream fed to a tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading<T: Scalar> {
    /// The raw measurement, tagged by the sensor that produced it
    pub payload: ReadingPayload<T>,
    /// Acquisition time in integer microseconds
    pub timestamp_us: i64,
}

impl<T: Scalar> SensorReading<T> {
    /// Creates a lidar reading from a Cartesian position fix.
    #[inline]
    pub fn lidar(px: T, py: T, timestamp_us: i64) -> Self {
        Self {
            payload: ReadingPayload::Lidar(Measurement::from_array([px, py])),
            timestamp_us,
        }
    }

    /// Creates a radar reading from a polar observation.
    #[inline]
    pub fn radar(range: T, bearing: T, range_rate: T, timestamp_us: i64) -> Self {
        Self {
            payload: ReadingPayload::Radar(Measurement::from_array([range, bearing, range_rate])),
            timestamp_us,
        }
    }

    /// Returns the kind of sensor that produced this reading.
    #[inline]
    pub fn kind(&self) -> SensorKind {
        match self.payload {
            ReadingPayload::Lidar(_) => SensorKind::Lidar,
            ReadingPayload::Radar(_) => SensorKind::Radar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_constructors() {
        let lidar: SensorReading<f64> = SensorReading::lidar(2.5, 0.8, 1000);
        assert_eq!(lidar.kind(), SensorKind::Lidar);
        assert_eq!(lidar.timestamp_us, 1000);
        match &lidar.payload {
            ReadingPayload::Lidar(z) => {
                assert!((z.index(0) - 2.5).abs() < 1e-12);
                assert!((z.index(1) - 0.8).abs() < 1e-12);
            }
            ReadingPayload::Radar(_) => panic!("expected lidar payload"),
        }

        let radar: SensorReading<f64> = SensorReading::radar(5.0, 0.1, -0.4, 2000);
        assert_eq!(radar.kind(), SensorKind::Radar);
    }
}
