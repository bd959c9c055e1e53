//! Core seams of the route engine.
//!
//! The engine only talks to its collaborators through these traits, so a
//! routing backend, a matrix source, or a scoring model can be swapped
//! without touching the construction loop.

use crate::error::{RoutingError, ScoreError};
use crate::model::{TravelLeg, TravelMatrix};

/// A directed point-to-point routing backend.
///
/// Locations are `(latitude, longitude)`.
pub trait RoutingService {
    /// Travel duration and distance for one directed pair.
    fn route(&self, from: (f64, f64), to: (f64, f64)) -> Result<TravelLeg, RoutingError>;
}

/// Provides a travel matrix for a set of locations.
///
/// The matrix is indexed by the provided location order. Implementations
/// degrade instead of failing, so this never errors.
pub trait TravelMatrixProvider {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> TravelMatrix;
}

/// Scoring oracle for how desirable a location is as the next stop.
///
/// Scores are expected in `[0, 1]` and must be deterministic for a fixed
/// model and input.
pub trait AttentionScorer {
    /// Make the scorer ready for use (e.g. load model weights).
    ///
    /// Called once at the start of every route build.
    fn prepare(&self) -> Result<(), ScoreError> {
        Ok(())
    }

    fn score(&self, location: (f64, f64)) -> Result<f64, ScoreError>;
}

impl<T: AttentionScorer + ?Sized> AttentionScorer for &T {
    fn prepare(&self) -> Result<(), ScoreError> {
        (**self).prepare()
    }

    fn score(&self, location: (f64, f64)) -> Result<f64, ScoreError> {
        (**self).score(location)
    }
}

impl<T: AttentionScorer + ?Sized> AttentionScorer for Box<T> {
    fn prepare(&self) -> Result<(), ScoreError> {
        (**self).prepare()
    }

    fn score(&self, location: (f64, f64)) -> Result<f64, ScoreError> {
        (**self).score(location)
    }
}

impl<T: TravelMatrixProvider + ?Sized> TravelMatrixProvider for &T {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> TravelMatrix {
        (**self).matrix_for(locations)
    }
}

impl<T: TravelMatrixProvider + ?Sized> TravelMatrixProvider for Box<T> {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> TravelMatrix {
        (**self).matrix_for(locations)
    }
}
