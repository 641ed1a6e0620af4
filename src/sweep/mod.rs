//! Frequency sweep
//!
//! - `plan`: which LO frequencies get calibrated
//! - `controller`: tune, search and accept/reject per frequency
//! - `progress`: observers for sweep events

pub mod controller;
pub mod plan;
pub mod progress;

pub use controller::{PointOutcome, SweepController};
pub use plan::SweepPlan;
pub use progress::{ConsoleProgress, SweepObserver};
