//! OSRM HTTP adapter for point-to-point routes.

use serde::Deserialize;

use crate::error::RoutingError;
use crate::model::TravelLeg;
use crate::traits::RoutingService;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    fn route_url(&self, from: (f64, f64), to: (f64, f64)) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.1,
            from.0,
            to.1,
            to.0
        )
    }
}

impl RoutingService for OsrmClient {
    fn route(&self, from: (f64, f64), to: (f64, f64)) -> Result<TravelLeg, RoutingError> {
        let response = self.client.get(self.route_url(from, to)).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::Status(status.as_u16()));
        }

        let body = response.text()?;
        parse_route(&body)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Seconds.
    duration: f64,
    /// Meters.
    distance: f64,
}

/// First route of an OSRM `route` response, converted to minutes and km.
fn parse_route(body: &str) -> Result<TravelLeg, RoutingError> {
    let parsed: OsrmRouteResponse =
        serde_json::from_str(body).map_err(|err| RoutingError::Malformed(err.to_string()))?;

    let route = parsed.routes.first().ok_or(RoutingError::NoRoute)?;
    Ok(TravelLeg::new(route.duration / 60.0, route.distance / 1000.0))
}
