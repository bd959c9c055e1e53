//! smartroute route construction engine
//!
//! Greedy single-vehicle sequencing of client visits under availability
//! windows, time-of-day traffic, and a pluggable desirability score.

pub mod traits;
pub mod model;
pub mod error;
pub mod config;
pub mod osrm;
pub mod matrix;
pub mod haversine;
pub mod traffic;
pub mod time_window;
pub mod scorer;
pub mod solver;
pub mod engine;
