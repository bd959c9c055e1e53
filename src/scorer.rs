//! Scorer adapters.
//!
//! The trained model lives outside this crate; anything implementing
//! [`AttentionScorer`] can drive route construction.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::ScoreError;
use crate::traits::AttentionScorer;

/// Gives every location the same score, which reduces ranking to
/// nearest-next by adjusted travel time.
#[derive(Debug, Clone, Copy)]
pub struct ConstantScorer(pub f64);

impl Default for ConstantScorer {
    fn default() -> Self {
        Self(1.0)
    }
}

impl AttentionScorer for ConstantScorer {
    fn score(&self, _location: (f64, f64)) -> Result<f64, ScoreError> {
        Ok(self.0)
    }
}

/// Memoizes an inner scorer by location rounded to 5 decimals.
///
/// Valid because scores are deterministic per location. Errors are not
/// cached.
#[derive(Debug)]
pub struct CachedScorer<S> {
    inner: S,
    scores: Mutex<HashMap<(i64, i64), f64>>,
}

impl<S: AttentionScorer> CachedScorer<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            scores: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.scores.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: AttentionScorer> AttentionScorer for CachedScorer<S> {
    fn prepare(&self) -> Result<(), ScoreError> {
        self.inner.prepare()
    }

    fn score(&self, location: (f64, f64)) -> Result<f64, ScoreError> {
        let key = (
            (location.0 * 1e5).round() as i64,
            (location.1 * 1e5).round() as i64,
        );

        if let Some(score) = self
            .scores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(*score);
        }

        let score = self.inner.score(location)?;
        self.scores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, score);
        Ok(score)
    }
}
