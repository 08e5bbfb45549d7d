//! Model traits for multi-target tracking
//!
//! Target dynamics, sensor characteristics and the birth process.

mod birth;
mod observation;
mod transition;

pub use birth::*;
pub use observation::*;
pub use transition::*;
