mod joint;
mod ucs;

pub use joint::joint_search;
pub use ucs::route;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::common::Position;
use crate::distance::CostModel;
use crate::heuristic::Heuristic;

/// Default cap on generated nodes for one joint-state search.
pub const DEFAULT_MAX_NODES: usize = 1_000_000;

/// Frontier ordering of the joint-state search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Order by heuristic alone.
    Greedy,
    /// Order by cost so far plus heuristic.
    AStar,
}

impl Strategy {
    pub fn priority(&self, cost: f64, heuristic: f64) -> f64 {
        match self {
            Strategy::Greedy => heuristic,
            Strategy::AStar => cost + heuristic,
        }
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "greedy" => Ok(Strategy::Greedy),
            "astar" | "a*" => Ok(Strategy::AStar),
            _ => Err(anyhow!("unknown strategy {s}, expected greedy or astar")),
        }
    }
}

/// Knobs of one joint-state search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub strategy: Strategy,
    pub heuristic: Heuristic,
    pub costs: CostModel,
    /// Stop with `SearchOutcome::Exhausted` instead of generating more than
    /// this many nodes. `None` searches until the frontier is empty.
    pub max_nodes: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            strategy: Strategy::AStar,
            heuristic: Heuristic::Straight,
            costs: CostModel::default(),
            max_nodes: Some(DEFAULT_MAX_NODES),
        }
    }
}

fn construct_path(trace: &HashMap<Position, Position>, mut current: Position) -> Vec<Position> {
    let mut path = vec![current];
    while let Some(&prev) = trace.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_priority() {
        assert_eq!(Strategy::Greedy.priority(7.0, 3.0), 3.0);
        assert_eq!(Strategy::AStar.priority(7.0, 3.0), 10.0);
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("greedy".parse::<Strategy>().unwrap(), Strategy::Greedy);
        assert_eq!("astar".parse::<Strategy>().unwrap(), Strategy::AStar);
        assert!("dijkstra".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_construct_path() {
        let trace = HashMap::from([((0, 1), (0, 0)), ((1, 1), (0, 1))]);
        assert_eq!(construct_path(&trace, (1, 1)), vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(construct_path(&trace, (0, 0)), vec![(0, 0)]);
    }
}
