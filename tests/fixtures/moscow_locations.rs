//! Real central Moscow locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. These are routable with the
//! public OSRM demo server.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Offices (good for start points)
// ============================================================================

pub const OFFICES: &[Location] = &[
    Location::new("Moscow City Tower", 55.7494733, 37.5370800),
    Location::new("Belorusskaya Business Center", 55.7776250, 37.5825630),
];

// ============================================================================
// Client addresses
// ============================================================================

pub const CLIENTS: &[Location] = &[
    Location::new("GUM", 55.7546880, 37.6215230),
    Location::new("Bolshoi Theatre", 55.7601620, 37.6185800),
    Location::new("Tretyakov Gallery", 55.7414300, 37.6208100),
    Location::new("Gorky Park Entrance", 55.7311140, 37.6035370),
    Location::new("Kurskaya Station", 55.7581630, 37.6609940),
    Location::new("Pushkin Museum", 55.7473130, 37.6051630),
    Location::new("Chistye Prudy", 55.7644710, 37.6389710),
    Location::new("Paveletskaya Station", 55.7298010, 37.6401850),
];
