use anyhow::anyhow;

use crate::common::JointState;
use crate::distance::CostModel;
use crate::graph::LocationGraph;

/// Estimate of the remaining cost before the two agents meet.
///
/// Under the max-of-costs move model the agents must jointly cover at least
/// the distance between them, so `factor * distance(a, b)` never overestimates
/// while `factor <= step_multiplier / 2`. With the default multiplier of 2,
/// `Straight` is admissible and `Inflated` with a factor above 1 is not.
///
/// A* with an inadmissible heuristic is not guaranteed to return the cheapest
/// meeting. `Inflated` exists to model indirect road routing in comparative
/// runs; do not rely on optimality when it is selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Heuristic {
    Straight,
    Inflated(f64),
}

impl Heuristic {
    /// Typical detour ratio of roads over straight lines.
    pub const ROAD_FACTOR: f64 = 1.4;

    pub fn from_name(name: &str, road_factor: f64) -> anyhow::Result<Self> {
        match name {
            "straight" => Ok(Heuristic::Straight),
            "inflated" => {
                if !road_factor.is_finite() || road_factor <= 0.0 {
                    return Err(anyhow!(
                        "road factor must be a positive number, got {road_factor}"
                    ));
                }
                Ok(Heuristic::Inflated(road_factor))
            }
            _ => Err(anyhow!(
                "unknown heuristic {name}, expected straight or inflated"
            )),
        }
    }

    pub fn factor(&self) -> f64 {
        match self {
            Heuristic::Straight => 1.0,
            Heuristic::Inflated(factor) => *factor,
        }
    }

    pub fn estimate(&self, graph: &LocationGraph, costs: &CostModel, state: JointState) -> f64 {
        self.factor() * costs.distance(graph, state.0, state.1)
    }

    pub fn is_admissible(&self, costs: &CostModel) -> bool {
        self.factor() <= costs.step_multiplier / 2.0
    }

    pub fn label(&self) -> String {
        match self {
            Heuristic::Straight => "straight".to_string(),
            Heuristic::Inflated(factor) => format!("inflated({factor})"),
        }
    }
}
