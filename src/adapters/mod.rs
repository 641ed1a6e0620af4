//! Adapters - implementations of port traits
//!
//! - `sim_radio`: synthetic front-end with an IQ imbalance model
//! - `json_store`: calibration tables as JSON files
//! - `memory_store`: calibration tables kept in memory

pub mod json_store;
pub mod memory_store;
pub mod sim_radio;
