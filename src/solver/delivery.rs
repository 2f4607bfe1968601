use super::Solver;
use crate::algorithm::route;
use crate::common::Position;
use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::map::Grid;
use crate::stat::Stats;

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub package: Position,
    pub path_to_package: Vec<Position>,
    pub cost_to_package: usize,
    pub dropoff: Position,
    pub path_to_dropoff: Vec<Position>,
    pub cost_to_dropoff: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub total_cost: usize,
    pub total_reward: i64,
    /// Reward minus cost; both are counted in the same units.
    pub net_reward: i64,
    pub deliveries: Vec<Delivery>,
}

/// Walks a picker through every package of a grid in id order: fetch the
/// package, carry it to its drop-off, continue from there.
///
/// The visiting order is never optimized.
pub struct DeliveryPlanner<'a> {
    grid: &'a Grid,
    start: Position,
    reward: i64,
    stats: Stats,
}

impl<'a> DeliveryPlanner<'a> {
    pub const DEFAULT_REWARD: i64 = 10;

    pub fn new(grid: &'a Grid, start: Position, reward: i64) -> Result<Self> {
        if grid.packages().is_empty() {
            return Err(SearchError::MalformedGrid(
                "no packages or drop-off points provided".to_string(),
            ));
        }
        match grid.cell(start) {
            None => {
                return Err(SearchError::InvalidState(format!(
                    "start {start:?} is outside the {}x{} grid",
                    grid.height, grid.width
                )))
            }
            Some(cell) if !cell.is_passable() => {
                return Err(SearchError::InvalidState(format!(
                    "start {start:?} is an obstacle"
                )))
            }
            Some(_) => {}
        }
        Ok(DeliveryPlanner {
            grid,
            start,
            reward,
            stats: Stats::default(),
        })
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Deliver every package. Returns `Ok(None)` as soon as one leg is
    /// unreachable; no partial delivery report is produced.
    #[instrument(skip_all, name = "simulate", fields(start = ?self.start, packages = self.grid.packages().len()), level = "debug")]
    pub fn simulate(&mut self) -> Result<Option<DeliveryReport>> {
        let grid = self.grid;
        let start_time = Instant::now();
        let mut total_cost = 0;
        let mut total_reward = 0;
        let mut deliveries = Vec::with_capacity(grid.packages().len());
        let mut current = self.start;

        for (package, dropoff) in grid.deliveries() {
            let Some(to_package) = route(grid, current, package, &mut self.stats)? else {
                debug!("package at {package:?} unreachable from {current:?}");
                return Ok(None);
            };
            let Some(to_dropoff) = route(grid, package, dropoff, &mut self.stats)? else {
                debug!("drop-off at {dropoff:?} unreachable from {package:?}");
                return Ok(None);
            };

            total_cost += to_package.cost + to_dropoff.cost;
            total_reward += self.reward;
            deliveries.push(Delivery {
                package,
                path_to_package: to_package.path,
                cost_to_package: to_package.cost,
                dropoff,
                path_to_dropoff: to_dropoff.path,
                cost_to_dropoff: to_dropoff.cost,
            });
            current = dropoff;
        }

        self.stats.cost += total_cost as f64;
        self.stats.time_us += start_time.elapsed().as_micros() as usize;

        Ok(Some(DeliveryReport {
            total_cost,
            total_reward,
            net_reward: total_reward - total_cost as i64,
            deliveries,
        }))
    }
}

impl Solver for DeliveryPlanner<'_> {
    type Output = Option<DeliveryReport>;

    fn solve(&mut self, config: &Config) -> Result<Option<DeliveryReport>> {
        let report = self.simulate()?;
        match &report {
            Some(report) => info!(
                "delivered {} packages, cost {} reward {} net {}",
                report.deliveries.len(),
                report.total_cost,
                report.total_reward,
                report.net_reward
            ),
            None => info!("delivery aborted: a package or drop-off is unreachable"),
        }
        self.stats.print("ucs", config);
        Ok(report)
    }
}
