//! Greedy route construction.
//!
//! Starting from node 0, repeatedly moves to the unvisited node with the
//! best `score / adjusted_travel_time`, waiting in fixed quanta while every
//! remaining client is temporarily unavailable. The heuristic is not
//! optimal; it is deterministic.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{RouteError, ScoreError};
use crate::model::{Client, TravelMatrix, hm};
use crate::time_window::TimeWindowPolicy;
use crate::traffic::{TrafficCalendar, canonical_day};
use crate::traits::{AttentionScorer, TravelMatrixProvider};

/// Damping applied to every traffic multiplier. Empirical; pending
/// calibration.
pub const TRAFFIC_DAMPING: f64 = 0.65;

/// Clock advance while every remaining client is temporarily unavailable.
pub const WAIT_QUANTUM_MINUTES: i64 = 15;

/// Keeps the ranking finite for zero travel time.
pub const SCORE_EPSILON: f64 = 1e-5;

#[derive(Debug, Clone)]
pub struct RouteOptions {
    pub start_time: NaiveTime,
    /// Calendar date the route is simulated on. The clock never leaves it.
    pub service_date: NaiveDate,
    /// Day name for traffic lookup; derived from `service_date` when `None`.
    pub day: Option<String>,
    pub traffic_damping: f64,
    pub wait_quantum_minutes: i64,
    pub score_epsilon: f64,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            start_time: hm(9, 0),
            service_date: Local::now().date_naive(),
            day: None,
            traffic_damping: TRAFFIC_DAMPING,
            wait_quantum_minutes: WAIT_QUANTUM_MINUTES,
            score_epsilon: SCORE_EPSILON,
        }
    }
}

impl RouteOptions {
    /// Capitalized day name used for traffic lookups.
    pub fn day_name(&self) -> String {
        match &self.day {
            Some(day) => canonical_day(day),
            None => weekday_name(self.service_date.weekday()).to_string(),
        }
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// One stop of a built route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteVisit {
    /// Index into the node list the route was built from.
    pub node: usize,
    pub arrival: NaiveDateTime,
    pub departure: NaiveDateTime,
    /// Traffic-adjusted minutes from the previous stop.
    pub travel_minutes: f64,
    /// Kilometers from the previous stop.
    pub distance_km: f64,
    pub service_minutes: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Starts with node 0 at the start time.
    pub visits: Vec<RouteVisit>,
    /// Nodes that could not be scheduled, ascending.
    pub unvisited: Vec<usize>,
    /// Travel plus service minutes; waiting is not counted.
    pub total_minutes: f64,
    pub total_km: f64,
    pub day: String,
}

impl Route {
    pub fn order(&self) -> Vec<usize> {
        self.visits.iter().map(|visit| visit.node).collect()
    }

    /// Render for callers: 1-based order, `HH:MM` times, 2-decimal values.
    ///
    /// `nodes` must be the list the route was built from.
    pub fn summarize(&self, nodes: &[Client]) -> Result<RouteSummary, RouteError> {
        let client_at = |node: usize| nodes.get(node).ok_or(RouteError::UnknownNode(node));

        let stops = self
            .visits
            .iter()
            .enumerate()
            .map(|(position, visit)| {
                let client = client_at(visit.node)?;
                Ok(RouteStop {
                    order: position + 1,
                    id: client.id_or_index(visit.node),
                    address: client.address.clone(),
                    latitude: client.location.0,
                    longitude: client.location.1,
                    estimated_arrival: visit.arrival.format("%H:%M").to_string(),
                    departure_time: visit.departure.format("%H:%M").to_string(),
                    travel_time: round2(visit.travel_minutes),
                    distance: round2(visit.distance_km),
                    service_time: visit.service_minutes,
                })
            })
            .collect::<Result<Vec<_>, RouteError>>()?;

        let unvisited = self
            .unvisited
            .iter()
            .map(|&node| client_at(node).map(|client| client.id_or_index(node)))
            .collect::<Result<Vec<_>, RouteError>>()?;

        Ok(RouteSummary {
            total_distance: round2(self.total_km),
            total_duration: round2(self.total_minutes),
            optimized_route: stops,
            unvisited,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub order: usize,
    pub id: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub estimated_arrival: String,
    pub departure_time: String,
    /// Minutes from the previous stop.
    pub travel_time: f64,
    /// Kilometers from the previous stop.
    pub distance: f64,
    pub service_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Kilometers.
    pub total_distance: f64,
    /// Minutes.
    pub total_duration: f64,
    pub optimized_route: Vec<RouteStop>,
    /// Ids of clients left out of the route.
    pub unvisited: Vec<String>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `at + value` minutes, or `None` when the result is not representable.
fn after_minutes(at: NaiveDateTime, value: f64) -> Option<NaiveDateTime> {
    let micros = (value * 60_000_000.0).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return None;
    }
    at.checked_add_signed(TimeDelta::microseconds(micros as i64))
}

#[derive(Debug, Clone)]
struct Candidate {
    node: usize,
    score: f64,
    arrival: NaiveDateTime,
    departure: NaiveDateTime,
    service_minutes: i64,
    travel_minutes: f64,
}

enum Step {
    Visit(Candidate),
    Wait,
    Done,
}

/// Read-only state of one build.
struct Ctx<'c> {
    nodes: &'c [Client],
    matrix: &'c TravelMatrix,
    options: &'c RouteOptions,
    day: &'c str,
}

pub struct RouteBuilder<'a, M: ?Sized, S: ?Sized> {
    matrix_provider: &'a M,
    calendar: &'a TrafficCalendar,
    policy: &'a TimeWindowPolicy,
    scorer: &'a S,
}

impl<'a, M, S> RouteBuilder<'a, M, S>
where
    M: TravelMatrixProvider + ?Sized,
    S: AttentionScorer + ?Sized,
{
    pub fn new(
        matrix_provider: &'a M,
        calendar: &'a TrafficCalendar,
        policy: &'a TimeWindowPolicy,
        scorer: &'a S,
    ) -> Self {
        Self {
            matrix_provider,
            calendar,
            policy,
            scorer,
        }
    }

    /// Build a route over `nodes`; node 0 is the start.
    ///
    /// The full travel matrix is fetched once before any decision is made.
    /// Scorer failures abort the build; routing failures never do.
    pub fn build(&self, nodes: &[Client], options: &RouteOptions) -> Result<Route, RouteError> {
        if nodes.is_empty() {
            return Err(RouteError::NoClients);
        }

        self.scorer.prepare()?;

        let locations: Vec<(f64, f64)> = nodes.iter().map(|client| client.location).collect();
        let matrix = self.matrix_provider.matrix_for(&locations);

        self.build_with_matrix(nodes, &matrix, options)
    }

    /// Route construction over a precomputed matrix.
    pub fn build_with_matrix(
        &self,
        nodes: &[Client],
        matrix: &TravelMatrix,
        options: &RouteOptions,
    ) -> Result<Route, RouteError> {
        if nodes.is_empty() {
            return Err(RouteError::NoClients);
        }
        if matrix.len() != nodes.len() {
            return Err(RouteError::MatrixSize {
                matrix: matrix.len(),
                nodes: nodes.len(),
            });
        }

        let day = options.day_name();
        let ctx = Ctx {
            nodes,
            matrix,
            options,
            day: &day,
        };

        let n = nodes.len();
        let mut now = options.service_date.and_time(options.start_time);
        let mut current = 0;
        let mut visited = vec![false; n];
        visited[0] = true;
        let mut remaining = n - 1;

        let mut visits = vec![RouteVisit {
            node: 0,
            arrival: now,
            departure: now,
            travel_minutes: 0.0,
            distance_km: 0.0,
            service_minutes: self.policy.service_minutes(nodes[0].tier),
        }];
        let mut total_minutes = 0.0;
        let mut total_km = 0.0;

        info!(day = %day, start = %now.format("%H:%M"), nodes = n, "building route");

        while remaining > 0 {
            match self.step(&ctx, current, now, &visited)? {
                Step::Visit(candidate) => {
                    let client = &nodes[candidate.node];
                    let service_minutes = candidate.service_minutes;
                    let departure = candidate.departure;
                    let distance_km = matrix.distance(current, candidate.node);

                    total_minutes += candidate.travel_minutes + service_minutes as f64;
                    total_km += distance_km;

                    info!(
                        from = %nodes[current].id_or_index(current),
                        to = %client.id_or_index(candidate.node),
                        travel_minutes = %format!("{:.1}", candidate.travel_minutes),
                        arrival = %candidate.arrival.format("%H:%M"),
                        service_minutes,
                        departure = %departure.format("%H:%M"),
                        "stop added"
                    );

                    visits.push(RouteVisit {
                        node: candidate.node,
                        arrival: candidate.arrival,
                        departure,
                        travel_minutes: candidate.travel_minutes,
                        distance_km,
                        service_minutes,
                    });
                    visited[candidate.node] = true;
                    remaining -= 1;
                    current = candidate.node;
                    now = departure;
                }
                Step::Wait => {
                    let next = TimeDelta::try_minutes(options.wait_quantum_minutes)
                        .and_then(|quantum| now.checked_add_signed(quantum))
                        .filter(|next| next.date() == options.service_date);
                    let Some(next) = next else {
                        info!(at = %now.format("%H:%M"), remaining, "day ended while waiting");
                        break;
                    };
                    debug!(at = %now.format("%H:%M"), "no client available, waiting");
                    now = next;
                }
                Step::Done => break,
            }
        }

        let unvisited: Vec<usize> = (0..n).filter(|&node| !visited[node]).collect();

        info!(
            stops = visits.len(),
            unvisited = unvisited.len(),
            total_minutes = %format!("{:.1}", total_minutes),
            total_km = %format!("{:.2}", total_km),
            "route built"
        );

        Ok(Route {
            visits,
            unvisited,
            total_minutes,
            total_km,
            day,
        })
    }

    /// Rank every unvisited node from `current` at time `now`.
    ///
    /// Ties keep the lowest index.
    fn step(
        &self,
        ctx: &Ctx<'_>,
        current: usize,
        now: NaiveDateTime,
        visited: &[bool],
    ) -> Result<Step, RouteError> {
        let factor = self.calendar.multiplier(now.hour(), ctx.day) * ctx.options.traffic_damping;

        let mut best: Option<Candidate> = None;
        let mut pending = false;

        for (node, client) in ctx.nodes.iter().enumerate() {
            if visited[node] || node == current {
                continue;
            }

            let travel_minutes = ctx.matrix.duration(current, node) * factor;
            let service_minutes = self.policy.service_minutes(client.tier);
            let arrival = after_minutes(now, travel_minutes)
                .filter(|arrival| arrival.date() == ctx.options.service_date)
                .filter(|&arrival| self.policy.is_visitable(arrival, client));
            let timing = arrival.and_then(|arrival| {
                TimeDelta::try_minutes(service_minutes)
                    .and_then(|service| arrival.checked_add_signed(service))
                    .map(|departure| (arrival, departure))
            });

            let Some((arrival, departure)) = timing else {
                if !self.policy.is_closed_for_day(now.time(), client) {
                    pending = true;
                }
                continue;
            };

            let desirability = self.scorer.score(client.location)?;
            if !desirability.is_finite() {
                return Err(ScoreError::Failed(format!(
                    "non-finite score {desirability} for {:?}",
                    client.location
                ))
                .into());
            }
            let score = desirability / (travel_minutes + ctx.options.score_epsilon);

            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(Candidate {
                    node,
                    score,
                    arrival,
                    departure,
                    service_minutes,
                    travel_minutes,
                });
            }
        }

        Ok(match best {
            Some(candidate) => Step::Visit(candidate),
            None if pending => Step::Wait,
            None => Step::Done,
        })
    }
}
