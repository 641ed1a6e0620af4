//! Port traits (interfaces)
//!
//! These traits define the boundaries between the calibration core and
//! external I/O. Adapters implement these traits to connect to real hardware
//! or to a synthetic stand-in.

pub mod radio;
pub mod store;

pub use radio::*;
pub use store::*;
