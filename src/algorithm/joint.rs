use super::SearchOptions;
use crate::common::{JointNode, JointState, SearchOutcome, SearchResult};
use crate::error::{Result, SearchError};
use crate::graph::LocationGraph;

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;
use tracing::{debug, instrument, trace};

/// Best-first search for the cheapest place where two agents meet.
///
/// Both agents move on every step, each to one of its neighbours, and the
/// step costs the larger of the two individual step costs. The search ends
/// when a state with both agents on the same location is popped.
///
/// Optimality holds only for `Strategy::AStar` with an admissible heuristic;
/// see `Heuristic`.
#[instrument(skip_all, name = "joint_search", fields(start = ?start, strategy = ?options.strategy, heuristic = %options.heuristic.label()), level = "debug")]
pub fn joint_search(
    graph: &LocationGraph,
    start: JointState,
    options: &SearchOptions,
) -> Result<SearchOutcome> {
    for id in [start.0, start.1] {
        if !graph.contains(id) {
            return Err(SearchError::InvalidState(format!(
                "location id {id} is not in the graph of {} locations",
                graph.len()
            )));
        }
    }

    let start_time = Instant::now();
    let costs = &options.costs;
    let heuristic = |state: JointState| options.heuristic.estimate(graph, costs, state);

    if start.is_meeting() {
        debug!("agents start together");
        return Ok(SearchOutcome::Found(SearchResult {
            path: Some(vec![start]),
            total_cost: Some(0.0),
            nodes_generated: 0,
            nodes_expanded: 0,
            max_frontier_size: 1,
            elapsed: start_time.elapsed(),
        }));
    }

    let mut open = BTreeSet::new();
    let mut explored = HashSet::new();
    let mut sequence = 0;
    let mut nodes_generated = 0;
    let mut nodes_expanded = 0;
    let mut max_frontier_size = 0;

    open.insert(JointNode {
        priority: options.strategy.priority(0.0, heuristic(start)),
        cost: 0.0,
        sequence,
        state: start,
        path: vec![start],
    });

    let unfinished = |nodes_generated, nodes_expanded, max_frontier_size| SearchResult {
        path: None,
        total_cost: None,
        nodes_generated,
        nodes_expanded,
        max_frontier_size,
        elapsed: start_time.elapsed(),
    };

    loop {
        max_frontier_size = max_frontier_size.max(open.len());
        let Some(current) = open.pop_first() else {
            break;
        };
        trace!("expand node: {:?} cost {}", current.state, current.cost);

        if current.state.is_meeting() {
            debug!(
                "agents meet at {} after {} steps",
                graph.name(current.state.0),
                current.path.len() - 1
            );
            return Ok(SearchOutcome::Found(SearchResult {
                path: Some(current.path),
                total_cost: Some(current.cost),
                nodes_generated,
                nodes_expanded,
                max_frontier_size,
                elapsed: start_time.elapsed(),
            }));
        }

        // Stale duplicate of an expanded state.
        if !explored.insert(current.state) {
            continue;
        }
        nodes_expanded += 1;

        let JointState(a, b) = current.state;
        for &next_a in graph.neighbors(a) {
            let cost_a = costs.step_cost(graph, a, next_a);
            for &next_b in graph.neighbors(b) {
                let cost_b = costs.step_cost(graph, b, next_b);
                let next = JointState(next_a, next_b);
                let cost = current.cost + cost_a.max(cost_b);

                if options.max_nodes.is_some_and(|limit| nodes_generated >= limit) {
                    debug!("node budget exhausted after {nodes_generated} nodes");
                    return Ok(SearchOutcome::Exhausted(unfinished(
                        nodes_generated,
                        nodes_expanded,
                        max_frontier_size,
                    )));
                }

                let mut path = Vec::with_capacity(current.path.len() + 1);
                path.extend_from_slice(&current.path);
                path.push(next);

                sequence += 1;
                open.insert(JointNode {
                    priority: options.strategy.priority(cost, heuristic(next)),
                    cost,
                    sequence,
                    state: next,
                    path,
                });
                nodes_generated += 1;
            }
        }
    }

    debug!("cannot find meeting point");
    Ok(SearchOutcome::NoPath(unfinished(
        nodes_generated,
        nodes_expanded,
        max_frontier_size,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Strategy;
    use crate::distance::{CostModel, Metric};
    use crate::graph::Coordinate;
    use crate::heuristic::Heuristic;
    use std::collections::BTreeMap;

    // Helper function to setup tracing
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("trace")
            .try_init();
    }

    fn build_graph(points: &[(&str, f64, f64)], edges: &[(&str, &str)]) -> LocationGraph {
        let locations = points
            .iter()
            .map(|&(name, lat, lon)| (name.to_string(), Coordinate { lat, lon }))
            .collect();
        let mut adjacency: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for &(u, v) in edges {
            adjacency.entry(u.to_string()).or_default().push(v.to_string());
            adjacency.entry(v.to_string()).or_default().push(u.to_string());
        }
        LocationGraph::new(locations, &adjacency).unwrap()
    }

    // Equilateral triangle with unit sides.
    fn triangle() -> LocationGraph {
        build_graph(
            &[
                ("A", 0.0, 0.0),
                ("B", 1.0, 0.0),
                ("C", 0.5, 3f64.sqrt() / 2.0),
            ],
            &[("A", "B"), ("B", "C"), ("A", "C")],
        )
    }

    fn options(strategy: Strategy, heuristic: Heuristic) -> SearchOptions {
        SearchOptions {
            strategy,
            heuristic,
            ..SearchOptions::default()
        }
    }

    fn cities_options(strategy: Strategy, heuristic: Heuristic) -> SearchOptions {
        SearchOptions {
            strategy,
            heuristic,
            costs: CostModel::new(Metric::Haversine, 2.0),
            max_nodes: None,
        }
    }

    #[test]
    fn test_triangle_meeting() {
        init_tracing();
        let graph = triangle();
        let start = JointState(graph.id("A").unwrap(), graph.id("B").unwrap());

        let outcome = joint_search(
            &graph,
            start,
            &options(Strategy::AStar, Heuristic::Straight),
        )
        .unwrap();
        assert!(outcome.is_found());

        let result = outcome.result();
        let path = result.path.as_ref().unwrap();
        assert_eq!(path.first(), Some(&start));
        assert!(path.last().unwrap().is_meeting());
        assert!((result.total_cost.unwrap() - 2.0).abs() < 1e-9);
        assert!(result.nodes_generated > 0);
        assert!(result.max_frontier_size >= 1);
    }

    #[test]
    fn test_start_together() {
        let graph = triangle();
        let start = JointState(2, 2);
        for strategy in [Strategy::Greedy, Strategy::AStar] {
            let outcome =
                joint_search(&graph, start, &options(strategy, Heuristic::Straight)).unwrap();
            let result = outcome.result();
            assert!(outcome.is_found());
            assert_eq!(result.path, Some(vec![start]));
            assert_eq!(result.total_cost, Some(0.0));
            assert_eq!(result.nodes_generated, 0);
        }
    }

    #[test]
    fn test_bipartite_pair_never_meets() {
        // Two agents swapping across a single edge can never coincide.
        let graph = build_graph(&[("A", 0.0, 0.0), ("B", 1.0, 0.0)], &[("A", "B")]);
        let outcome = joint_search(
            &graph,
            JointState(0, 1),
            &options(Strategy::AStar, Heuristic::Straight),
        )
        .unwrap();

        assert!(matches!(outcome, SearchOutcome::NoPath(_)));
        let result = outcome.result();
        assert_eq!(result.path, None);
        assert_eq!(result.total_cost, None);
        // (A,B) -> (B,A) -> (A,B), each push counted.
        assert_eq!(result.nodes_generated, 2);
        assert_eq!(result.nodes_expanded, 2);
    }

    #[test]
    fn test_isolated_location_has_no_successors() {
        let graph = build_graph(
            &[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 5.0, 5.0)],
            &[("A", "B")],
        );
        let outcome = joint_search(
            &graph,
            JointState(0, 2),
            &options(Strategy::Greedy, Heuristic::Straight),
        )
        .unwrap();
        assert!(matches!(outcome, SearchOutcome::NoPath(_)));
        assert_eq!(outcome.result().nodes_generated, 0);
    }

    #[test]
    fn test_node_budget_exhausted() {
        let graph = LocationGraph::sample_cities();
        let start = JointState(graph.id("Delhi").unwrap(), graph.id("Chennai").unwrap());
        let options = SearchOptions {
            max_nodes: Some(1),
            ..cities_options(Strategy::AStar, Heuristic::Straight)
        };

        let outcome = joint_search(&graph, start, &options).unwrap();
        assert!(matches!(outcome, SearchOutcome::Exhausted(_)));
        let result = outcome.into_result();
        assert_eq!(result.path, None);
        assert_eq!(result.nodes_generated, 1);
        assert_eq!(result.nodes_expanded, 1);
    }

    #[test]
    fn test_node_budget_is_never_exceeded() {
        let graph = LocationGraph::sample_cities();
        // Hyderabad has four neighbours, Mumbai three: twelve successors at once.
        let start = JointState(graph.id("Hyderabad").unwrap(), graph.id("Mumbai").unwrap());
        for limit in 1..20 {
            let options = SearchOptions {
                max_nodes: Some(limit),
                ..cities_options(Strategy::AStar, Heuristic::Straight)
            };
            let outcome = joint_search(&graph, start, &options).unwrap();
            assert!(outcome.result().nodes_generated <= limit);
            if !outcome.is_found() {
                assert!(matches!(outcome, SearchOutcome::Exhausted(_)));
                assert_eq!(outcome.result().nodes_generated, limit);
            }
        }
    }

    #[test]
    fn test_invalid_start_state() {
        let graph = triangle();
        let result = joint_search(
            &graph,
            JointState(0, 9),
            &options(Strategy::AStar, Heuristic::Straight),
        );
        assert!(matches!(result, Err(SearchError::InvalidState(_))));
    }

    #[test]
    fn test_astar_not_worse_than_greedy() {
        init_tracing();
        let graph = LocationGraph::sample_cities();
        for a in 0..graph.len() {
            for b in 0..graph.len() {
                let start = JointState(a, b);
                let astar = joint_search(
                    &graph,
                    start,
                    &cities_options(Strategy::AStar, Heuristic::Straight),
                )
                .unwrap();
                let greedy = joint_search(
                    &graph,
                    start,
                    &cities_options(Strategy::Greedy, Heuristic::Straight),
                )
                .unwrap();

                let astar_cost = astar.result().total_cost.unwrap();
                let greedy_cost = greedy.result().total_cost.unwrap();
                assert!(
                    astar_cost <= greedy_cost + 1e-6,
                    "{} / {}: astar {astar_cost} greedy {greedy_cost}",
                    graph.name(a),
                    graph.name(b)
                );
            }
        }
    }

    #[test]
    fn test_swapping_agents_mirrors_result() {
        let graph = LocationGraph::sample_cities();
        let n = graph.len();
        let runs = [Strategy::AStar, Strategy::Greedy]
            .into_iter()
            .flat_map(|strategy| (0..n * n).map(move |i| (strategy, JointState(i / n, i % n))));

        for (strategy, start) in runs {
            let options = cities_options(strategy, Heuristic::Straight);
            let forward = joint_search(&graph, start, &options)
                .unwrap()
                .into_result();
            let backward = joint_search(&graph, start.swapped(), &options)
                .unwrap()
                .into_result();

            let forward_cost = forward.total_cost.unwrap();
            let backward_cost = backward.total_cost.unwrap();
            assert!((forward_cost - backward_cost).abs() < 1e-6);

            let forward_path = forward.path.unwrap();
            assert!(forward_path.last().unwrap().is_meeting());
            let mirrored: Vec<JointState> = forward_path.iter().map(JointState::swapped).collect();
            assert_eq!(
                Some(mirrored),
                backward.path,
                "{strategy:?}: {} / {}",
                graph.name(start.0),
                graph.name(start.1)
            );
        }
    }

    #[test]
    fn test_greedy_takes_first_meeting_it_sees() {
        // A far-away shared neighbour F looks perfect to greedy (h = 0) while
        // the cheap meeting at X needs two steps.
        //
        //          F
        //        /   \
        //   A - P - X - Q - B
        let graph = build_graph(
            &[
                ("A", 0.0, 0.0),
                ("P", 0.5, 0.0),
                ("X", 1.0, 0.0),
                ("Q", 1.5, 0.0),
                ("B", 2.0, 0.0),
                ("F", 1.0, 5.0),
            ],
            &[("A", "P"), ("A", "F"), ("B", "Q"), ("B", "F"), ("P", "X"), ("Q", "X")],
        );
        let start = JointState(graph.id("A").unwrap(), graph.id("B").unwrap());

        let astar = joint_search(&graph, start, &options(Strategy::AStar, Heuristic::Straight))
            .unwrap()
            .into_result();
        let greedy = joint_search(&graph, start, &options(Strategy::Greedy, Heuristic::Straight))
            .unwrap()
            .into_result();

        let x = graph.id("X").unwrap();
        let f = graph.id("F").unwrap();
        assert!((astar.total_cost.unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(astar.path.unwrap().last(), Some(&JointState(x, x)));

        assert!((greedy.total_cost.unwrap() - 2.0 * 26f64.sqrt()).abs() < 1e-9);
        assert_eq!(greedy.path.unwrap(), vec![start, JointState(f, f)]);
    }

    #[test]
    fn test_inflated_heuristic_still_meets() {
        // No optimality claim here, only that a meeting is found.
        let graph = LocationGraph::sample_cities();
        let start = JointState(graph.id("Mumbai").unwrap(), graph.id("Kolkata").unwrap());
        let outcome = joint_search(
            &graph,
            start,
            &cities_options(Strategy::AStar, Heuristic::Inflated(Heuristic::ROAD_FACTOR)),
        )
        .unwrap();
        assert!(outcome.is_found());
        assert!(outcome.result().path.as_ref().unwrap().last().unwrap().is_meeting());
    }

    #[test]
    fn test_repeated_search_is_identical() {
        let graph = LocationGraph::sample_cities();
        let start = JointState(graph.id("Delhi").unwrap(), graph.id("Kolkata").unwrap());
        let options = cities_options(Strategy::AStar, Heuristic::Straight);

        let first = joint_search(&graph, start, &options).unwrap().into_result();
        let second = joint_search(&graph, start, &options).unwrap().into_result();
        assert_eq!(first.path, second.path);
        assert_eq!(first.total_cost, second.total_cost);
        assert_eq!(first.nodes_generated, second.nodes_generated);
        assert_eq!(first.max_frontier_size, second.max_frontier_size);
    }
}
