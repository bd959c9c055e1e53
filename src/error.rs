//! Error types for routing, scoring, and route construction.

use thiserror::Error;

/// Failure of a single routing-service request.
///
/// These never leave the matrix layer: they are retried and then replaced
/// by the fallback leg.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("routing service answered with status {0}")]
    Status(u16),

    #[error("routing service returned no route")]
    NoRoute,

    #[error("malformed routing response: {0}")]
    Malformed(String),
}

/// The scoring oracle could not produce a score.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("scoring model is not loaded: {0}")]
    Unavailable(String),

    #[error("scoring failed: {0}")]
    Failed(String),
}

/// Errors surfaced by route construction.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no clients to route")]
    NoClients,

    #[error("attention scorer unavailable: {0}")]
    Scorer(#[from] ScoreError),

    #[error("travel matrix covers {matrix} nodes but {nodes} were given")]
    MatrixSize { matrix: usize, nodes: usize },

    #[error("route visits node {0}, which is not in the node list")]
    UnknownNode(usize),
}
