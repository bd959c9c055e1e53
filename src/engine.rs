//! Request entrypoint.
//!
//! A [`RouteEngine`] is built once at process start and shared by request
//! handlers. It owns every collaborator, so the travel cache lives as long
//! as the engine does.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::RouteError;
use crate::matrix::CachingMatrixProvider;
use crate::model::{Client, ClientRecord, StartPoint, hm};
use crate::osrm::OsrmClient;
use crate::solver::{RouteBuilder, RouteOptions, RouteSummary};
use crate::time_window::{TimeWindowPolicy, parse_time_or};
use crate::traffic::TrafficCalendar;
use crate::traits::{AttentionScorer, TravelMatrixProvider};

/// One optimization request, pre-validated by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub clients: Vec<ClientRecord>,
    /// When absent the first client is the start.
    #[serde(default)]
    pub start_point: Option<StartPoint>,
    /// `HH:MM`, default `09:00`.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Day name; derived from the service date when absent.
    #[serde(default)]
    pub start_day: Option<String>,
}

impl OptimizeRequest {
    pub fn route_options(&self, service_date: NaiveDate) -> RouteOptions {
        let start_time = self
            .start_time
            .as_deref()
            .map(|value| parse_time_or(value, hm(9, 0)))
            .unwrap_or(hm(9, 0));

        RouteOptions {
            start_time,
            service_date,
            day: self.start_day.clone(),
            ..RouteOptions::default()
        }
    }

    /// Node list with the start point, if any, at index 0.
    pub fn into_nodes(self) -> Vec<Client> {
        self.start_point
            .map(StartPoint::into_client)
            .into_iter()
            .chain(self.clients.into_iter().map(Client::from))
            .collect()
    }
}

pub struct RouteEngine<M, S> {
    matrix_provider: M,
    calendar: TrafficCalendar,
    policy: TimeWindowPolicy,
    scorer: S,
}

impl<S: AttentionScorer> RouteEngine<CachingMatrixProvider<OsrmClient>, S> {
    /// OSRM-backed engine with the traffic table loaded from disk.
    pub fn from_config(config: EngineConfig, scorer: S) -> Result<Self, reqwest::Error> {
        let client = OsrmClient::new(config.osrm)?;
        Ok(Self::new(
            CachingMatrixProvider::new(client, config.matrix),
            TrafficCalendar::load(config.traffic_path),
            config.policy,
            scorer,
        ))
    }
}

impl<M, S> RouteEngine<M, S>
where
    M: TravelMatrixProvider,
    S: AttentionScorer,
{
    pub fn new(
        matrix_provider: M,
        calendar: TrafficCalendar,
        policy: TimeWindowPolicy,
        scorer: S,
    ) -> Self {
        Self {
            matrix_provider,
            calendar,
            policy,
            scorer,
        }
    }

    pub fn matrix_provider(&self) -> &M {
        &self.matrix_provider
    }

    pub fn calendar(&self) -> &TrafficCalendar {
        &self.calendar
    }

    pub fn calendar_mut(&mut self) -> &mut TrafficCalendar {
        &mut self.calendar
    }

    pub fn policy(&self) -> &TimeWindowPolicy {
        &self.policy
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Optimize for today.
    pub fn optimize(&self, request: OptimizeRequest) -> Result<RouteSummary, RouteError> {
        self.optimize_on(request, Local::now().date_naive())
    }

    pub fn optimize_on(
        &self,
        request: OptimizeRequest,
        service_date: NaiveDate,
    ) -> Result<RouteSummary, RouteError> {
        let options = request.route_options(service_date);
        let nodes = request.into_nodes();

        let route = RouteBuilder::new(&self.matrix_provider, &self.calendar, &self.policy, &self.scorer)
            .build(&nodes, &options)?;

        route.summarize(&nodes)
    }
}
