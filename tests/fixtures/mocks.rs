//! Hand-written collaborators with predictable behavior.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use smartroute::error::{RoutingError, ScoreError};
use smartroute::model::{TravelLeg, TravelMatrix};
use smartroute::traits::{AttentionScorer, RoutingService, TravelMatrixProvider};

/// Serves a fixed duration table; distance is duration / 2 km.
pub struct FixedMatrix {
    durations: Vec<Vec<f64>>,
    calls: AtomicUsize,
}

impl FixedMatrix {
    pub fn new(durations: Vec<Vec<f64>>) -> Self {
        Self {
            durations,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every off-diagonal pair takes `minutes`.
    pub fn uniform(n: usize, minutes: f64) -> Self {
        Self::new(vec![vec![minutes; n]; n])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TravelMatrixProvider for FixedMatrix {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> TravelMatrix {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(locations.len(), self.durations.len(), "matrix fixture size mismatch");
        TravelMatrix::from_fn(locations.len(), |i, j| {
            TravelLeg::new(self.durations[i][j], self.durations[i][j] / 2.0)
        })
    }
}

/// Routing backend answering 20 minutes / 10 km per pair, counting calls.
pub struct CountingRouter {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingRouter {
    pub fn healthy() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn down() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RoutingService for CountingRouter {
    fn route(&self, _from: (f64, f64), _to: (f64, f64)) -> Result<TravelLeg, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(RoutingError::Status(502))
        } else {
            Ok(TravelLeg::new(20.0, 10.0))
        }
    }
}

/// Scores looked up by latitude; unknown locations score `default`.
pub struct TableScorer {
    scores: HashMap<i64, f64>,
    default: f64,
}

impl TableScorer {
    pub fn new(default: f64) -> Self {
        Self {
            scores: HashMap::new(),
            default,
        }
    }

    pub fn with(mut self, latitude: f64, score: f64) -> Self {
        self.scores.insert((latitude * 1e5).round() as i64, score);
        self
    }
}

impl AttentionScorer for TableScorer {
    fn score(&self, location: (f64, f64)) -> Result<f64, ScoreError> {
        let key = (location.0 * 1e5).round() as i64;
        Ok(self.scores.get(&key).copied().unwrap_or(self.default))
    }
}

/// A model that never loaded.
pub struct UnloadedScorer;

impl AttentionScorer for UnloadedScorer {
    fn prepare(&self) -> Result<(), ScoreError> {
        Err(ScoreError::Unavailable("models/routenet_traffic.pt not found".to_string()))
    }

    fn score(&self, _location: (f64, f64)) -> Result<f64, ScoreError> {
        Err(ScoreError::Unavailable("model not loaded".to_string()))
    }
}

/// A model that answers with NaN.
pub struct NanScorer;

impl AttentionScorer for NanScorer {
    fn score(&self, _location: (f64, f64)) -> Result<f64, ScoreError> {
        Ok(f64::NAN)
    }
}
