//! Unscented transform stages: sigma points, prediction, update
//!
//! The belief is propagated through the nonlinear CTRV dynamics and
//! corrected against nonlinear measurement models without Jacobians. A
//! small deterministic set of weighted sample points (sigma points) is
//! pushed through the true nonlinear functions and recombined into a mean
//! and covariance on the other side.
//!
//! # Sigma Point Selection
//!
//! For an n-dimensional distribution there are 2n+1 points:
//! - χ₀ = μ (mean)
//! - χᵢ = μ + √((n+λ)P)ᵢ for i = 1...n
//! - χᵢ₊ₙ = μ - √((n+λ)P)ᵢ for i = 1...n
//!
//! with the fixed scaling λ = 3 - n, so the spread factor √(n+λ) is √3 for
//! every dimension. The center weight λ/(λ+n) may be negative; all weights
//! sum to 1.
//!
//! # Augmentation
//!
//! Process noise is not additive in the CTRV model, so the prediction stage
//! samples it explicitly: the state is extended with the two zero-mean noise
//! components (longitudinal and yaw acceleration) before sigma points are
//! drawn, and each 7-dimensional point carries its own noise realization
//! through the dynamics.

use alloc::vec::Vec;

use nalgebra::{RealField, SMatrix, SVector};
use num_traits::Float;

use crate::models::{CtrvModel, SensorModel};
use crate::types::belief::Belief;
use crate::types::spaces::{
    AugmentedCovariance, AugmentedVector, ComputeInnovation, Covariance, Measurement,
    StateCovariance, StateVector, Vector,
};
use crate::utils::wrap_angle;
use crate::{FusionError, Result};

// ============================================================================
// Sigma Points
// ============================================================================

/// A deterministic set of 2N+1 weighted sample points drawn from a mean and
/// covariance in some vector space.
///
/// Ordering matters: column 0 is the mean, columns 1..=N add the scaled
/// Cholesky columns, columns N+1..=2N subtract them. The recombination
/// weights assume exactly this layout.
#[derive(Debug, Clone)]
pub struct SigmaPoints<T: RealField, const N: usize, Space> {
    /// The sample points: [χ₀, χ₁, ..., χ₂ₙ]
    pub points: Vec<Vector<T, N, Space>>,
    /// Weight of the center point, λ/(λ+N)
    pub weight_center: T,
    /// Weight of every spread point, 1/(2(λ+N))
    pub weight_spread: T,
}

impl<T: RealField + Float + Copy, const N: usize, Space: Clone> SigmaPoints<T, N, Space> {
    /// Draws sigma points from a mean and covariance with λ = 3 - N.
    ///
    /// # Errors
    /// Returns [`FusionError::NotPositiveDefinite`] if the covariance has no
    /// Cholesky factor, instead of silently producing invalid points.
    pub fn generate(
        mean: &Vector<T, N, Space>,
        covariance: &Covariance<T, N, Space>,
    ) -> Result<Self> {
        let n_t = T::from_usize(N).unwrap();
        let lambda = T::from_f64(3.0).unwrap() - n_t;
        let scale = Float::sqrt(lambda + n_t);

        let factor = covariance
            .cholesky()
            .ok_or(FusionError::NotPositiveDefinite)?;

        let mut points = Vec::with_capacity(2 * N + 1);
        points.push(mean.clone());
        for i in 0..N {
            let offset = factor.column(i).into_owned().scale(scale);
            points.push(Vector::from_svector(mean.as_svector() + offset));
        }
        for i in 0..N {
            let offset = factor.column(i).into_owned().scale(scale);
            points.push(Vector::from_svector(mean.as_svector() - offset));
        }

        let two = T::from_f64(2.0).unwrap();
        Ok(Self {
            points,
            weight_center: lambda / (lambda + n_t),
            weight_spread: T::one() / (two * (lambda + n_t)),
        })
    }

    /// Returns the recombination weight of point `i`.
    #[inline]
    pub fn weight(&self, i: usize) -> T {
        if i == 0 {
            self.weight_center
        } else {
            self.weight_spread
        }
    }
}

// ============================================================================
// Prediction Stage
// ============================================================================

/// The output of the prediction stage.
///
/// Besides the predicted mean and covariance this keeps the propagated
/// state-space sigma points and their weights: the update stage maps exactly
/// these points into measurement space, so they must not be redrawn.
#[derive(Debug, Clone)]
pub struct PredictedBelief<T: RealField> {
    /// Predicted state mean
    pub mean: StateVector<T, 5>,
    /// Predicted state covariance
    pub covariance: StateCovariance<T, 5>,
    /// Sigma points propagated through the dynamics, in state space
    pub sigma_points: Vec<StateVector<T, 5>>,
    /// Weight of the center sigma point
    pub weight_center: T,
    /// Weight of every spread sigma point
    pub weight_spread: T,
}

impl<T: RealField + Copy> PredictedBelief<T> {
    /// Returns the recombination weight of sigma point `i`.
    #[inline]
    pub fn weight(&self, i: usize) -> T {
        if i == 0 {
            self.weight_center
        } else {
            self.weight_spread
        }
    }
}

/// Advances a belief by `dt` seconds through the CTRV dynamics.
///
/// Augments the state with the two process-noise dimensions, draws sigma
/// points over the 7-dimensional augmented distribution, propagates each
/// point through the dynamics, and recombines the propagated points into the
/// predicted 5-dimensional mean and covariance. Yaw deviations are wrapped
/// into [-pi, pi] before the covariance sum.
///
/// # Errors
/// Returns [`FusionError::NotPositiveDefinite`] if the augmented covariance
/// has no Cholesky factor.
pub fn predict<T: RealField + Float + Copy>(
    belief: &Belief<T>,
    motion: &CtrvModel<T>,
    dt: T,
) -> Result<PredictedBelief<T>> {
    // Augment: mean gains two zero noise components, covariance gains the
    // noise variances on the new diagonal entries
    let mut mean_aug = SVector::<T, 7>::zeros();
    mean_aug
        .fixed_rows_mut::<5>(0)
        .copy_from(belief.mean.as_svector());

    let mut cov_aug = SMatrix::<T, 7, 7>::zeros();
    cov_aug
        .fixed_view_mut::<5, 5>(0, 0)
        .copy_from(belief.covariance.as_matrix());
    cov_aug[(5, 5)] = motion.std_accel * motion.std_accel;
    cov_aug[(6, 6)] = motion.std_yaw_accel * motion.std_yaw_accel;

    let sigma = SigmaPoints::generate(
        &AugmentedVector::from_svector(mean_aug),
        &AugmentedCovariance::from_matrix(cov_aug),
    )?;

    let propagated: Vec<StateVector<T, 5>> = sigma
        .points
        .iter()
        .map(|point| motion.propagate(point, dt))
        .collect();

    let mut mean = SVector::<T, 5>::zeros();
    for (i, point) in propagated.iter().enumerate() {
        mean += point.as_svector().scale(sigma.weight(i));
    }

    let mut covariance = SMatrix::<T, 5, 5>::zeros();
    for (i, point) in propagated.iter().enumerate() {
        let mut diff = point.as_svector() - mean;
        diff[3] = wrap_angle(diff[3]);
        covariance += (diff * diff.transpose()).scale(sigma.weight(i));
    }

    Ok(PredictedBelief {
        mean: StateVector::from_svector(mean),
        covariance: StateCovariance::from_matrix(covariance),
        sigma_points: propagated,
        weight_center: sigma.weight_center,
        weight_spread: sigma.weight_spread,
    })
}

// ============================================================================
// Update Stage
// ============================================================================

/// The output of the update stage: the posterior belief contents and the
/// normalized innovation squared of the cycle.
#[derive(Debug, Clone)]
pub struct Update<T: RealField> {
    /// Posterior state mean
    pub mean: StateVector<T, 5>,
    /// Posterior state covariance
    pub covariance: StateCovariance<T, 5>,
    /// Normalized innovation squared, innovationᵀ S⁻¹ innovation
    pub nis: T,
}

/// Corrects a predicted belief with one raw measurement.
///
/// Maps every propagated sigma point into the sensor's measurement space,
/// recombines them into the predicted measurement mean and covariance, forms
/// the state/measurement cross-correlation, and applies the Kalman gain.
/// Residuals in the sensor's declared angle component and in the state yaw
/// component are wrapped into [-pi, pi] before every covariance sum.
///
/// # Errors
/// - [`FusionError::SingularInnovation`] if the predicted measurement
///   covariance cannot be inverted
/// - any error of the sensor model, e.g. [`FusionError::DegenerateRange`]
///   when a radar observes a point at its origin
pub fn update<T, S, const M: usize>(
    predicted: &PredictedBelief<T>,
    measurement: &Measurement<T, M>,
    sensor: &S,
) -> Result<Update<T>>
where
    T: RealField + Float + Copy,
    S: SensorModel<T, M>,
{
    let angle = sensor.angle_component();

    // Sigma points into measurement space
    let mut projected = Vec::with_capacity(predicted.sigma_points.len());
    for point in &predicted.sigma_points {
        projected.push(sensor.observe(point)?);
    }

    // Predicted measurement mean
    let mut z_mean = SVector::<T, M>::zeros();
    for (i, z) in projected.iter().enumerate() {
        z_mean += z.as_svector().scale(predicted.weight(i));
    }

    // Predicted measurement covariance, plus sensor noise
    let mut s = sensor.measurement_noise().into_matrix();
    for (i, z) in projected.iter().enumerate() {
        let mut z_diff = z.as_svector() - z_mean;
        if let Some(k) = angle {
            z_diff[k] = wrap_angle(z_diff[k]);
        }
        s += (z_diff * z_diff.transpose()).scale(predicted.weight(i));
    }

    // Cross-correlation between state and measurement deviations
    let mut cross = SMatrix::<T, 5, M>::zeros();
    for (i, (point, z)) in predicted
        .sigma_points
        .iter()
        .zip(projected.iter())
        .enumerate()
    {
        let mut x_diff = point.as_svector() - predicted.mean.as_svector();
        x_diff[3] = wrap_angle(x_diff[3]);

        let mut z_diff = z.as_svector() - z_mean;
        if let Some(k) = angle {
            z_diff[k] = wrap_angle(z_diff[k]);
        }

        cross += (x_diff * z_diff.transpose()).scale(predicted.weight(i));
    }

    let s_inv = s.try_inverse().ok_or(FusionError::SingularInnovation)?;
    let gain = cross * s_inv;

    let mut innovation = measurement
        .clone()
        .innovation(Measurement::from_svector(z_mean))
        .into_svector();
    if let Some(k) = angle {
        innovation[k] = wrap_angle(innovation[k]);
    }

    let nis = (innovation.transpose() * s_inv * innovation)[(0, 0)];

    let mean = predicted.mean.as_svector() + gain * innovation;
    let covariance = predicted.covariance.as_matrix() - gain * s * gain.transpose();

    Ok(Update {
        mean: StateVector::from_svector(mean),
        covariance: StateCovariance::from_matrix(covariance),
        nis,
    })
}

// ============================================================================
// Tests
// ============================================================================
