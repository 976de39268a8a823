//! Unscented filtering stages
//!
//! - [`ukf`]: sigma-point generation, the nonlinear prediction stage, and
//!   the measurement update stage
//! - [`tracker`]: the measurement-driven orchestrator that owns the belief
//!
//! Both stages allocate their sigma-point sets, so the module requires the
//! `alloc` feature (implied by `std`).

#[cfg(feature = "alloc")]
pub mod tracker;
#[cfg(feature = "alloc")]
pub mod ukf;
