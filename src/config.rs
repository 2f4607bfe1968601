use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Deserialize;

use crate::algorithm::{SearchOptions, Strategy, DEFAULT_MAX_NODES};
use crate::common::Position;
use crate::distance::{CostModel, Metric};
use crate::heuristic::Heuristic;

#[derive(Parser, Debug, Default)]
#[command(
    name = "agent_search",
    about = "Two-agent meetup search and warehouse delivery routing.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Problem to solve: meetup or warehouse")]
    pub problem: Option<String>,

    #[arg(
        long,
        help = "Meetup: YAML location graph. Warehouse: map file. Built-in data when omitted"
    )]
    pub scenario_path: Option<String>,

    #[arg(long, help = "Append run statistics to this CSV file")]
    pub output_path: Option<String>,

    #[arg(long, help = "Search strategy: greedy, astar or compare")]
    pub strategy: Option<String>,

    #[arg(long, help = "Heuristic: straight or inflated")]
    pub heuristic: Option<String>,

    #[arg(long, help = "Scaling factor of the inflated heuristic")]
    pub road_factor: Option<f64>,

    #[arg(long, help = "Step cost as a multiple of distance")]
    pub step_multiplier: Option<f64>,

    #[arg(long, help = "Distance metric: euclidean or haversine")]
    pub metric: Option<String>,

    #[arg(long, help = "Node budget per meetup search, 0 for unbounded")]
    pub max_nodes: Option<usize>,

    #[arg(long, help = "Meetup: location of the first agent")]
    pub from: Option<String>,

    #[arg(long, help = "Meetup: location of the second agent")]
    pub to: Option<String>,

    #[arg(long, help = "Warehouse: picker start as row,col", value_delimiter = ',')]
    pub start: Option<Vec<usize>>,

    #[arg(long, help = "Warehouse: generated grid rows")]
    pub rows: Option<usize>,

    #[arg(long, help = "Warehouse: generated grid columns")]
    pub cols: Option<usize>,

    #[arg(long, help = "Warehouse: number of generated packages")]
    pub packages: Option<usize>,

    #[arg(long, help = "Warehouse: number of generated obstacles")]
    pub obstacles: Option<usize>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Reward per completed delivery")]
    pub delivery_reward: Option<i64>,

    #[arg(long, help = "Default log filter when RUST_LOG is unset")]
    pub log_level: Option<String>,

    #[arg(long, help = "Print results as JSON", default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub problem: String,
    pub scenario_path: Option<String>,
    pub output_path: Option<String>,
    pub strategy: String,
    pub heuristic: String,
    pub road_factor: f64,
    pub step_multiplier: f64,
    pub metric: String,
    pub max_nodes: usize,
    pub from: String,
    pub to: String,
    pub start: Position,
    pub rows: usize,
    pub cols: usize,
    pub packages: usize,
    pub obstacles: usize,
    pub seed: u64,
    pub delivery_reward: i64,
    pub log_level: String,
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            problem: "meetup".to_string(),
            scenario_path: None,
            output_path: None,
            strategy: "astar".to_string(),
            heuristic: "straight".to_string(),
            road_factor: Heuristic::ROAD_FACTOR,
            step_multiplier: 2.0,
            metric: "haversine".to_string(),
            max_nodes: DEFAULT_MAX_NODES,
            from: "Delhi".to_string(),
            to: "Chennai".to_string(),
            start: (0, 0),
            rows: 8,
            cols: 8,
            packages: 4,
            obstacles: 5,
            seed: 0,
            delivery_reward: 10,
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(yaml).context("invalid config yaml")?;
        Ok(config)
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        take(&mut self.problem, &cli.problem);
        take(&mut self.strategy, &cli.strategy);
        take(&mut self.heuristic, &cli.heuristic);
        take(&mut self.road_factor, &cli.road_factor);
        take(&mut self.step_multiplier, &cli.step_multiplier);
        take(&mut self.metric, &cli.metric);
        take(&mut self.max_nodes, &cli.max_nodes);
        take(&mut self.from, &cli.from);
        take(&mut self.to, &cli.to);
        take(&mut self.rows, &cli.rows);
        take(&mut self.cols, &cli.cols);
        take(&mut self.packages, &cli.packages);
        take(&mut self.obstacles, &cli.obstacles);
        take(&mut self.seed, &cli.seed);
        take(&mut self.delivery_reward, &cli.delivery_reward);
        take(&mut self.log_level, &cli.log_level);

        if cli.scenario_path.is_some() {
            self.scenario_path = cli.scenario_path.clone();
        }
        if cli.output_path.is_some() {
            self.output_path = cli.output_path.clone();
        }
        if let Some(start) = cli.start.as_deref() {
            match start {
                [row, col] => self.start = (*row, *col),
                _ => return Err(anyhow!("--start expects row,col, got {start:?}")),
            }
        }
        self.json |= cli.json;

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        match self.problem.as_str() {
            "meetup" => {
                if self.strategy != "compare" {
                    self.strategy.parse::<Strategy>()?;
                }
                self.search_options()?;
            }
            "warehouse" => {
                if self.scenario_path.is_none() && (self.rows == 0 || self.cols == 0) {
                    return Err(anyhow!(
                        "Grid dimensions must be positive, got {}x{}",
                        self.rows,
                        self.cols
                    ));
                }
            }
            other => {
                return Err(anyhow!(
                    "Unknown problem {other}, expected meetup or warehouse"
                ))
            }
        }

        if !(self.step_multiplier.is_finite() && self.step_multiplier > 0.0) {
            return Err(anyhow!(
                "Step multiplier must be a positive number, got {}",
                self.step_multiplier
            ));
        }
        Ok(())
    }

    /// Search options for the configured strategy. `compare` picks its own
    /// strategies and heuristics, so it maps to the A* defaults here.
    pub fn search_options(&self) -> anyhow::Result<SearchOptions> {
        let strategy = match self.strategy.as_str() {
            "compare" => Strategy::AStar,
            other => other.parse()?,
        };
        Ok(SearchOptions {
            strategy,
            heuristic: Heuristic::from_name(&self.heuristic, self.road_factor)?,
            costs: CostModel::new(self.metric.parse::<Metric>()?, self.step_multiplier),
            max_nodes: (self.max_nodes > 0).then_some(self.max_nodes),
        })
    }
}

fn take<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}
