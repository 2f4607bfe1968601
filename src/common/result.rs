use serde::Serialize;
use std::time::Duration;

use super::{JointState, Position};

/// Record of one joint-state search call.
///
/// Metrics are filled in whatever the outcome, so failed searches can still
/// be inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub path: Option<Vec<JointState>>,
    pub total_cost: Option<f64>,
    pub nodes_generated: usize,
    /// Distinct states whose successors were generated.
    pub nodes_expanded: usize,
    pub max_frontier_size: usize,
    pub elapsed: Duration,
}

/// How a joint-state search ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A meeting state was popped; `path` and `total_cost` are set.
    Found(SearchResult),
    /// The frontier ran dry without reaching a meeting state.
    NoPath(SearchResult),
    /// The node budget ran out before a meeting state was popped.
    Exhausted(SearchResult),
}

impl SearchOutcome {
    pub fn result(&self) -> &SearchResult {
        match self {
            SearchOutcome::Found(result)
            | SearchOutcome::NoPath(result)
            | SearchOutcome::Exhausted(result) => result,
        }
    }

    pub fn into_result(self) -> SearchResult {
        match self {
            SearchOutcome::Found(result)
            | SearchOutcome::NoPath(result)
            | SearchOutcome::Exhausted(result) => result,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchOutcome::Found(_) => "found",
            SearchOutcome::NoPath(_) => "no_path",
            SearchOutcome::Exhausted(_) => "exhausted",
        }
    }
}

/// Cell sequence from start to goal inclusive, with its unit-step cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: Vec<Position>,
    pub cost: usize,
}
