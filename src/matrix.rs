//! Travel matrix acquisition with caching, retry, and fallback.
//!
//! Every directed pair is fetched from a [`RoutingService`] at most once per
//! provider lifetime. Failed pairs are retried, then pinned to a fixed
//! fallback leg so unreachable pairs cost the network only once.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::thread;
use std::time::Duration;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::model::{TravelLeg, TravelMatrix};
use crate::traits::{RoutingService, TravelMatrixProvider};

#[derive(Debug, Clone)]
pub struct MatrixConfig {
    /// Requests per pair before falling back.
    pub max_attempts: u32,
    /// Pause after a failed attempt (not after the last one).
    pub retry_pause: Duration,
    /// Pause after every successful request, for shared public servers.
    pub success_delay: Duration,
    /// Leg used once all attempts fail.
    pub fallback: TravelLeg,
    /// Fetch pairs on the rayon pool instead of one after another.
    pub parallel: bool,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_pause: Duration::from_secs(1),
            success_delay: Duration::from_millis(200),
            fallback: TravelLeg::new(10.0, 5.0),
            parallel: false,
        }
    }
}

/// Coordinates rounded to 5 decimals (about 1.1 m), origin then destination.
type PairKey = [i64; 4];

fn round5(value: f64) -> i64 {
    (value * 1e5).round() as i64
}

fn pair_key(from: (f64, f64), to: (f64, f64)) -> PairKey {
    [round5(from.0), round5(from.1), round5(to.0), round5(to.1)]
}

#[derive(Debug)]
pub struct CachingMatrixProvider<S> {
    service: S,
    config: MatrixConfig,
    cache: RwLock<HashMap<PairKey, TravelLeg>>,
}

impl<S: RoutingService> CachingMatrixProvider<S> {
    pub fn new(service: S, config: MatrixConfig) -> Self {
        Self {
            service,
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    /// Travel from `from` to `to`. Never fails; see [`MatrixConfig::fallback`].
    pub fn pair(&self, from: (f64, f64), to: (f64, f64)) -> TravelLeg {
        let key = pair_key(from, to);

        if let Some(leg) = self.cached(&key) {
            debug!(?from, ?to, "travel cache hit");
            return leg;
        }

        debug!(?from, ?to, "travel cache miss");
        let leg = self.fetch(from, to);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(leg);
        leg
    }

    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cached(&self, key: &PairKey) -> Option<TravelLeg> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    fn fetch(&self, from: (f64, f64), to: (f64, f64)) -> TravelLeg {
        let attempts = self.config.max_attempts;

        for attempt in 1..=attempts {
            match self.service.route(from, to) {
                Ok(leg) => {
                    pause(self.config.success_delay);
                    return leg;
                }
                Err(err) => {
                    warn!(attempt, attempts, ?from, ?to, error = %err, "routing request failed");
                    if attempt < attempts {
                        pause(self.config.retry_pause);
                    }
                }
            }
        }

        warn!(?from, ?to, fallback = ?self.config.fallback, "routing unavailable, using fallback");
        self.config.fallback
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

impl<S: RoutingService + Sync> TravelMatrixProvider for CachingMatrixProvider<S> {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> TravelMatrix {
        let n = locations.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .collect();

        let legs: Vec<TravelLeg> = if self.config.parallel {
            pairs
                .par_iter()
                .map(|&(i, j)| self.pair(locations[i], locations[j]))
                .collect()
        } else {
            pairs
                .iter()
                .map(|&(i, j)| self.pair(locations[i], locations[j]))
                .collect()
        };

        TravelMatrix::from_legs(n, legs)
    }
}
