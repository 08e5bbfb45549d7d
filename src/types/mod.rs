//! Core types for type-safe vector spaces, Gaussian beliefs and identifiers

pub mod gaussian;
pub mod ids;
pub mod spaces;
pub mod transforms;
