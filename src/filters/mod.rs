//! Single-target densities and the multi-Bernoulli mixture
//!
//! # Single-Target
//!
//! - [`density::GaussianDensity`]: Linear Kalman predict/update, likelihood and gating
//!
//! # Multi-Target
//!
//! - [`pmbm`]: Hypothesis trees, global hypothesis pool and its maintenance

pub mod density;
pub mod pmbm;
