//! Domain data: clients, availability windows, and travel tables.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::time_window::parse_time_or;

/// Client service class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tier {
    Vip,
    #[default]
    Standard,
}

impl Tier {
    /// Case-insensitive; anything other than `vip` is standard.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("vip") {
            Tier::Vip
        } else {
            Tier::Standard
        }
    }
}

/// Half-open time-of-day interval `[start, end)`.
///
/// `start == end` is an empty window, which is how "no lunch break" is
/// expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

pub(crate) fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// A client to be visited.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    /// Reported as `client_<node index>` when absent.
    pub id: Option<String>,
    pub address: String,
    /// `(latitude, longitude)`.
    pub location: (f64, f64),
    pub tier: Tier,
    pub work: TimeWindow,
    pub lunch: TimeWindow,
}

impl Client {
    /// Standard client working 09:00-18:00 with lunch 13:00-14:00.
    pub fn new(address: impl Into<String>, location: (f64, f64)) -> Self {
        Self {
            id: None,
            address: address.into(),
            location,
            tier: Tier::Standard,
            work: TimeWindow::new(hm(9, 0), hm(18, 0)),
            lunch: TimeWindow::new(hm(13, 0), hm(14, 0)),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_work_window(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.work = TimeWindow::new(start, end);
        self
    }

    pub fn with_lunch(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.lunch = TimeWindow::new(start, end);
        self
    }

    pub fn without_lunch(self) -> Self {
        let start = self.lunch.start;
        self.with_lunch(start, start)
    }

    /// The client id, or `client_<index>` for anonymous clients.
    pub fn id_or_index(&self, index: usize) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("client_{index}"))
    }
}

fn default_level() -> String {
    "standard".to_string()
}

fn default_work_start() -> String {
    "09:00".to_string()
}

fn default_work_end() -> String {
    "18:00".to_string()
}

fn default_lunch_start() -> String {
    "13:00".to_string()
}

fn default_lunch_end() -> String {
    "14:00".to_string()
}

/// Client as it arrives on the wire, with `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_work_start")]
    pub work_start: String,
    #[serde(default = "default_work_end")]
    pub work_end: String,
    #[serde(default = "default_lunch_start")]
    pub lunch_start: String,
    #[serde(default = "default_lunch_end")]
    pub lunch_end: String,
    #[serde(default)]
    pub id: Option<String>,
}

impl From<ClientRecord> for Client {
    /// Malformed times fall back to the field's default instead of failing.
    fn from(record: ClientRecord) -> Self {
        Client {
            id: record.id,
            address: record.address,
            location: (record.latitude, record.longitude),
            tier: Tier::from_label(&record.level),
            work: TimeWindow::new(
                parse_time_or(&record.work_start, hm(9, 0)),
                parse_time_or(&record.work_end, hm(18, 0)),
            ),
            lunch: TimeWindow::new(
                parse_time_or(&record.lunch_start, hm(13, 0)),
                parse_time_or(&record.lunch_end, hm(14, 0)),
            ),
        }
    }
}

/// Depot or office the route departs from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartPoint {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Id given to an inserted start point.
pub const START_ID: &str = "START";

impl StartPoint {
    /// Always-open pseudo-client: 00:00-23:59, lunch collapsed to 23:59.
    pub fn into_client(self) -> Client {
        Client {
            id: Some(START_ID.to_string()),
            address: self.address,
            location: (self.latitude, self.longitude),
            tier: Tier::Standard,
            work: TimeWindow::new(hm(0, 0), hm(23, 59)),
            lunch: TimeWindow::new(hm(23, 59), hm(23, 59)),
        }
    }
}

/// Travel between two locations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelLeg {
    pub duration_minutes: f64,
    pub distance_km: f64,
}

impl TravelLeg {
    pub const ZERO: TravelLeg = TravelLeg {
        duration_minutes: 0.0,
        distance_km: 0.0,
    };

    pub fn new(duration_minutes: f64, distance_km: f64) -> Self {
        Self {
            duration_minutes,
            distance_km,
        }
    }
}

/// Square duration (minutes) and distance (km) tables.
///
/// Diagonal is zero. Not necessarily symmetric.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TravelMatrix {
    durations: Vec<Vec<f64>>,
    distances: Vec<Vec<f64>>,
}

impl TravelMatrix {
    /// Build an `n x n` matrix; `leg` is only called for `i != j`.
    pub fn from_fn(n: usize, mut leg: impl FnMut(usize, usize) -> TravelLeg) -> Self {
        let mut durations = vec![vec![0.0; n]; n];
        let mut distances = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let value = leg(i, j);
                    durations[i][j] = value.duration_minutes;
                    distances[i][j] = value.distance_km;
                }
            }
        }
        Self {
            durations,
            distances,
        }
    }

    /// Assemble from row-major off-diagonal legs, in `(i, j)` scan order.
    pub(crate) fn from_legs(n: usize, legs: Vec<TravelLeg>) -> Self {
        let mut legs = legs.into_iter();
        Self::from_fn(n, |_, _| legs.next().unwrap_or(TravelLeg::ZERO))
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    pub fn duration(&self, from: usize, to: usize) -> f64 {
        self.durations[from][to]
    }

    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from][to]
    }

    pub fn durations(&self) -> &[Vec<f64>] {
        &self.durations
    }

    pub fn distances(&self) -> &[Vec<f64>] {
        &self.distances
    }
}
