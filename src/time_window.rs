//! Client availability and service durations.

use chrono::{NaiveDateTime, NaiveTime};

use crate::model::{Client, Tier};

/// Parse `HH:MM`, falling back to `default` on malformed input.
pub fn parse_time_or(value: &str, default: NaiveTime) -> NaiveTime {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").unwrap_or(default)
}

#[derive(Debug, Clone)]
pub struct TimeWindowPolicy {
    /// Service minutes for VIP clients.
    pub vip_minutes: i64,
    /// Service minutes for everyone else.
    pub standard_minutes: i64,
}

impl Default for TimeWindowPolicy {
    fn default() -> Self {
        Self {
            vip_minutes: 25,
            standard_minutes: 15,
        }
    }
}

impl TimeWindowPolicy {
    /// Visitable iff inside the work window and outside the lunch window.
    ///
    /// Both windows are half-open: start inclusive, end exclusive. Only the
    /// time of day of `arrival` is considered.
    pub fn is_visitable(&self, arrival: NaiveDateTime, client: &Client) -> bool {
        self.is_open_at(arrival.time(), client)
    }

    pub fn is_open_at(&self, time: NaiveTime, client: &Client) -> bool {
        client.work.contains(time) && !client.lunch.contains(time)
    }

    /// The client's work window has already ended at `time`, so no later
    /// arrival on the same day can succeed.
    pub fn is_closed_for_day(&self, time: NaiveTime, client: &Client) -> bool {
        time >= client.work.end
    }

    pub fn service_minutes(&self, tier: Tier) -> i64 {
        match tier {
            Tier::Vip => self.vip_minutes,
            Tier::Standard => self.standard_minutes,
        }
    }
}
