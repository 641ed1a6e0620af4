//! Correction search
//!
//! Grid refinement over (phase, amplitude) IQ-imbalance correction space.
//! Pure with respect to hardware: measurements come in through a closure.

pub mod refine;
pub mod window;

pub use refine::{search, search_round, RoundOutcome};
pub use window::{Axis, SearchWindow};
