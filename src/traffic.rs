//! Time-of-day traffic multipliers.
//!
//! The table is a JSON object keyed by capitalized day name:
//!
//! ```json
//! { "Monday": { "hours": { "8": { "average": 1.4 }, "9": { "average": 1.6 } } } }
//! ```
//!
//! Any lookup that cannot be satisfied returns the neutral multiplier.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// Multiplier used whenever the table has nothing to say.
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

fn neutral() -> f64 {
    NEUTRAL_MULTIPLIER
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourTraffic {
    #[serde(default = "neutral")]
    pub average: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayTraffic {
    /// Keyed by hour as a string, `"0"` through `"23"`.
    #[serde(default)]
    pub hours: HashMap<String, HourTraffic>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrafficTable {
    pub days: HashMap<String, DayTraffic>,
}

/// `"monday"` / `"MONDAY"` -> `"Monday"`.
pub fn canonical_day(name: &str) -> String {
    let name = name.trim();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrafficCalendar {
    source: Option<PathBuf>,
    table: TrafficTable,
}

impl TrafficCalendar {
    /// Calendar with no data; every multiplier is neutral.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_table(table: TrafficTable) -> Self {
        Self {
            source: None,
            table,
        }
    }

    /// Parse a JSON table. Malformed content degrades to an empty table.
    pub fn from_json_str(json: &str) -> Self {
        Self::from_table(parse_table(json, "<inline>"))
    }

    /// Load from a file. A missing or malformed file degrades to an empty
    /// table and is logged, never returned as an error.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let table = read_table(&path);
        Self {
            source: Some(path),
            table,
        }
    }

    /// Re-read the file this calendar was loaded from, if any.
    pub fn reload(&mut self) {
        if let Some(path) = &self.source {
            self.table = read_table(path);
        }
    }

    pub fn table(&self) -> &TrafficTable {
        &self.table
    }

    pub fn day(&self, day: &str) -> Option<&DayTraffic> {
        self.table.days.get(&canonical_day(day))
    }

    /// Multiplier for `hour` (0-23) on `day`, case-insensitive.
    pub fn multiplier(&self, hour: u32, day: &str) -> f64 {
        self.day(day)
            .and_then(|day| day.hours.get(&hour.to_string()))
            .map(|slot| slot.average)
            .unwrap_or(NEUTRAL_MULTIPLIER)
    }
}

fn read_table(path: &Path) -> TrafficTable {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let table = parse_table(&contents, &path.display().to_string());
            info!(path = %path.display(), days = table.days.len(), "traffic table loaded");
            table
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "traffic table unavailable, using neutral multipliers");
            TrafficTable::default()
        }
    }
}

/// Parse day by day and hour by hour; a bad record is skipped, not the table.
fn parse_table(json: &str, origin: &str) -> TrafficTable {
    let raw: Map<String, Value> = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(origin, error = %err, "malformed traffic table, using neutral multipliers");
            return TrafficTable::default();
        }
    };

    let days = raw
        .into_iter()
        .filter_map(|(day, value)| parse_day(origin, &day, value).map(|traffic| (day, traffic)))
        .collect();

    TrafficTable { days }
}

fn parse_day(origin: &str, day: &str, value: Value) -> Option<DayTraffic> {
    let Value::Object(mut fields) = value else {
        warn!(origin, day, "traffic entry is not a day object, skipped");
        return None;
    };

    let hours = match fields.remove("hours") {
        None | Some(Value::Null) => HashMap::new(),
        Some(Value::Object(hours)) => hours
            .into_iter()
            .filter_map(|(hour, slot)| match serde_json::from_value::<HourTraffic>(slot) {
                Ok(traffic) => Some((hour, traffic)),
                Err(err) => {
                    warn!(origin, day, hour = %hour, error = %err, "malformed traffic hour skipped");
                    None
                }
            })
            .collect(),
        Some(_) => {
            warn!(origin, day, "traffic hours are not an object, day is neutral");
            HashMap::new()
        }
    };

    Some(DayTraffic { hours })
}
