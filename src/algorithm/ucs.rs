use super::construct_path;
use crate::common::{GridNode, Position, Route};
use crate::error::{Result, SearchError};
use crate::map::Grid;
use crate::stat::Stats;

use std::collections::{BinaryHeap, HashMap};
use tracing::{debug, instrument, trace};

/// Uniform-cost search over the grid, one unit per 4-directional move.
///
/// Returns `Ok(None)` when obstacles cut the goal off from the start.
#[instrument(skip_all, name = "ucs", fields(start = ?start, goal = ?goal), level = "debug")]
pub fn route(
    grid: &Grid,
    start: Position,
    goal: Position,
    stats: &mut Stats,
) -> Result<Option<Route>> {
    for (label, position) in [("start", start), ("goal", goal)] {
        match grid.cell(position) {
            None => {
                return Err(SearchError::InvalidState(format!(
                    "{label} {position:?} is outside the {}x{} grid",
                    grid.height, grid.width
                )))
            }
            Some(cell) if !cell.is_passable() => {
                return Err(SearchError::InvalidState(format!(
                    "{label} {position:?} is an obstacle"
                )))
            }
            Some(_) => {}
        }
    }

    let mut open = BinaryHeap::new();
    let mut best_cost: HashMap<Position, usize> = HashMap::new();
    let mut trace: HashMap<Position, Position> = HashMap::new();

    best_cost.insert(start, 0);
    open.push(GridNode {
        g_cost: 0,
        position: start,
    });

    loop {
        stats.max_frontier_size = stats.max_frontier_size.max(open.len());
        let Some(GridNode { g_cost, position }) = open.pop() else {
            break;
        };

        // A cheaper entry for this cell was already expanded.
        if g_cost > best_cost[&position] {
            continue;
        }
        trace!("expand node: {position:?} cost {g_cost}");
        stats.nodes_expanded += 1;

        if position == goal {
            return Ok(Some(Route {
                path: construct_path(&trace, goal),
                cost: g_cost,
            }));
        }

        // Uniform cost.
        let next_cost = g_cost + 1;
        for &neighbor in grid.neighbors(position) {
            if next_cost < best_cost.get(&neighbor).copied().unwrap_or(usize::MAX) {
                best_cost.insert(neighbor, next_cost);
                trace.insert(neighbor, position);
                open.push(GridNode {
                    g_cost: next_cost,
                    position: neighbor,
                });
                stats.nodes_generated += 1;
            }
        }
    }

    debug!("cannot find route");
    Ok(None)
}
