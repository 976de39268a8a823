//! Sigmatrack: unscented sensor-fusion tracking for Rust
//!
//! A type-safe single-target tracker that fuses two sensor modalities, a
//! linear position sensor (lidar) and a nonlinear range/bearing/range-rate
//! sensor (radar), into one belief over position, speed, heading and turn
//! rate. Propagation and correction both go through the unscented transform,
//! so neither the motion model nor the radar model is ever linearized.
//!
//! # Features
//!
//! - **Type Safety**: state, augmented and measurement spaces encoded in the
//!   type system, so vectors from different spaces cannot be mixed
//! - **Explicit Failure**: numerical degeneracies (covariance not positive
//!   definite, singular innovation covariance, zero radar range) surface as
//!   errors instead of silent NaN propagation
//! - **no_std Support**: works in embedded environments
//!
//! # Example
//!
//! ```
//! use sigmatrack::filters::tracker::{TrackerConfig, UkfTracker};
//! use sigmatrack::types::readings::SensorReading;
//!
//! let mut tracker = UkfTracker::new(TrackerConfig::default());
//!
//! // First reading initializes the belief at the measured position.
//! tracker.process(&SensorReading::lidar(2.5, 0.8, 1_000_000)).unwrap();
//!
//! // Subsequent readings run a full predict + update cycle.
//! tracker.process(&SensorReading::lidar(2.6, 0.85, 1_100_000)).unwrap();
//!
//! let belief = tracker.belief().unwrap();
//! let [px, py] = belief.position();
//! assert!((px - 2.6f64).abs() < 0.5);
//! assert!((py - 0.85f64).abs() < 0.5);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod types;
pub mod models;
pub mod filters;
pub mod utils;

pub mod prelude {
    pub use crate::types::spaces::*;
    pub use crate::types::belief::*;
    pub use crate::types::readings::*;
    pub use crate::models::*;
    #[cfg(feature = "alloc")]
    pub use crate::filters::tracker::*;
    #[cfg(feature = "alloc")]
    pub use crate::filters::ukf::*;
    pub use crate::utils::*;
}

/// Error types for the library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionError {
    /// Covariance matrix is not positive definite, its square root cannot be taken
    NotPositiveDefinite,
    /// Predicted measurement covariance is singular and cannot be inverted
    SingularInnovation,
    /// Radar observation of a state at (or numerically at) the sensor origin
    DegenerateRange,
    /// Measurement timestamp precedes the current belief timestamp
    NonMonotonicTimestamp,
}

#[cfg(feature = "std")]
impl std::error::Error for FusionError {}

impl ::core::fmt::Display for FusionError {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        match self {
            FusionError::NotPositiveDefinite => {
                write!(f, "Covariance matrix is not positive definite")
            }
            FusionError::SingularInnovation => {
                write!(f, "Predicted measurement covariance is singular")
            }
            FusionError::DegenerateRange => write!(f, "Radar range is zero"),
            FusionError::NonMonotonicTimestamp => {
                write!(f, "Measurement timestamp moved backwards")
            }
        }
    }
}

pub type Result<T> = ::core::result::Result<T, FusionError>;
