//! Utility functions for hypothesis management
//!
//! Log-weight normalisation and state read-out.

mod extraction;
mod weights;

pub use extraction::*;
pub use weights::*;
