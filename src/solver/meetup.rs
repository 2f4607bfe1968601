use super::Solver;
use crate::algorithm::{joint_search, SearchOptions, Strategy};
use crate::common::{JointState, SearchOutcome};
use crate::config::Config;
use crate::error::Result;
use crate::graph::LocationGraph;
use crate::heuristic::Heuristic;
use crate::stat::Stats;

use serde::Serialize;
use tracing::{debug, info, warn};

/// Named summary of one meetup search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetupReport {
    pub label: String,
    pub from: String,
    pub to: String,
    pub outcome: &'static str,
    pub meeting_point: Option<String>,
    /// Locations of agent A and agent B after each step, start included.
    pub path: Option<Vec<(String, String)>>,
    pub total_cost: Option<f64>,
    pub nodes_generated: usize,
    pub nodes_expanded: usize,
    pub max_frontier_size: usize,
    pub elapsed_us: u128,
}

impl MeetupReport {
    pub fn is_found(&self) -> bool {
        self.meeting_point.is_some()
    }
}

pub struct MeetupSolver<'a> {
    graph: &'a LocationGraph,
    start: JointState,
    options: SearchOptions,
    stats: Stats,
}

impl<'a> MeetupSolver<'a> {
    pub fn new(
        graph: &'a LocationGraph,
        from: &str,
        to: &str,
        options: SearchOptions,
    ) -> Result<Self> {
        let start = JointState(graph.id(from)?, graph.id(to)?);
        Ok(MeetupSolver {
            graph,
            start,
            options,
            stats: Stats::default(),
        })
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Run one search with `options` and record it in the solver stats.
    pub fn search(&mut self, options: &SearchOptions) -> Result<MeetupReport> {
        if options.strategy == Strategy::AStar && !options.heuristic.is_admissible(&options.costs)
        {
            warn!(
                "heuristic {} is inadmissible, A* may return a costlier meeting",
                options.heuristic.label()
            );
        }

        let outcome = joint_search(self.graph, self.start, options)?;
        self.stats.record_search(outcome.result());
        Ok(self.report(label(options), &outcome))
    }

    /// Greedy and A* with the straight-line heuristic, then A* with the
    /// inflated road heuristic, all from the same start.
    pub fn compare(&mut self, config: &Config) -> Result<Vec<MeetupReport>> {
        let road_factor = match self.options.heuristic {
            Heuristic::Inflated(factor) => factor,
            Heuristic::Straight => Heuristic::ROAD_FACTOR,
        };
        let runs = [
            (Strategy::Greedy, Heuristic::Straight),
            (Strategy::AStar, Heuristic::Straight),
            (Strategy::AStar, Heuristic::Inflated(road_factor)),
        ];

        let mut reports = Vec::with_capacity(runs.len());
        for (strategy, heuristic) in runs {
            let options = SearchOptions {
                strategy,
                heuristic,
                ..self.options
            };
            self.stats = Stats::default();
            let report = self.search(&options)?;
            self.stats.print(&report.label, config);
            reports.push(report);
        }

        if let Some(best) = reports
            .iter()
            .filter_map(|r| r.total_cost.map(|cost| (cost, &r.label)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
        {
            info!("cheapest meeting found by {} at cost {:.3}", best.1, best.0);
        }
        Ok(reports)
    }

    fn report(&self, label: String, outcome: &SearchOutcome) -> MeetupReport {
        let result = outcome.result();
        let name = |id| self.graph.name(id).to_string();
        let path = result.path.as_ref().map(|path| {
            path.iter()
                .map(|state| (name(state.0), name(state.1)))
                .collect::<Vec<_>>()
        });
        let meeting_point = match outcome {
            SearchOutcome::Found(_) => result
                .path
                .as_ref()
                .and_then(|path| path.last())
                .map(|state| name(state.0)),
            _ => None,
        };

        MeetupReport {
            label,
            from: name(self.start.0),
            to: name(self.start.1),
            outcome: outcome.label(),
            meeting_point,
            path,
            total_cost: result.total_cost,
            nodes_generated: result.nodes_generated,
            nodes_expanded: result.nodes_expanded,
            max_frontier_size: result.max_frontier_size,
            elapsed_us: result.elapsed.as_micros(),
        }
    }
}

fn label(options: &SearchOptions) -> String {
    let strategy = match options.strategy {
        Strategy::Greedy => "greedy",
        Strategy::AStar => "astar",
    };
    format!("{strategy}/{}", options.heuristic.label())
}

impl Solver for MeetupSolver<'_> {
    type Output = MeetupReport;

    fn solve(&mut self, config: &Config) -> Result<MeetupReport> {
        let options = self.options;
        let report = self.search(&options)?;
        debug!("meetup report: {report:?}");
        self.stats.print(&report.label, config);
        Ok(report)
    }
}
