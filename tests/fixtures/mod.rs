//! Test fixtures for smartroute.
//!
//! Provides realistic test data:
//! - Real central Moscow locations (from OpenStreetMap)
//! - Mock collaborators for matrices, routing, and scoring

pub mod moscow_locations;
pub mod mocks;

pub use moscow_locations::*;
