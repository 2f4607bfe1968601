use agent_search::config::{Cli, Config};
use agent_search::graph::LocationGraph;
use agent_search::map::Grid;
use agent_search::scenario::{generate_warehouse, MeetupScenario};
use agent_search::solver::{DeliveryPlanner, MeetupSolver, Solver};

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("cannot read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        Config::default()
    }
    .override_from_command_line(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();
    if cli.config.is_none() {
        info!("No config file specified, using default config");
    }

    match config.problem.as_str() {
        "meetup" => run_meetup(&config),
        "warehouse" => run_warehouse(&config),
        other => unreachable!("config validation accepted problem {other}"),
    }
}

fn run_meetup(config: &Config) -> anyhow::Result<()> {
    let graph = match config.scenario_path.as_deref() {
        Some(path) => MeetupScenario::load_from_file(path)?.into_graph()?,
        None => {
            info!("No scenario specified, using the built-in city graph");
            LocationGraph::sample_cities()
        }
    };

    let mut solver = MeetupSolver::new(&graph, &config.from, &config.to, config.search_options()?)?;
    if config.strategy == "compare" {
        let reports = solver.compare(config)?;
        return emit(config, &reports);
    }

    let report = solver.solve(config)?;
    match (&report.meeting_point, report.total_cost) {
        (Some(city), Some(cost)) => info!(
            "{} and {} meet at {city}, cost {cost:.3}, {} steps",
            report.from,
            report.to,
            report.path.as_ref().map_or(0, |p| p.len() - 1)
        ),
        _ => error!(
            "{} and {} cannot meet ({})",
            report.from, report.to, report.outcome
        ),
    }
    emit(config, &report)
}

fn run_warehouse(config: &Config) -> anyhow::Result<()> {
    let grid = match config.scenario_path.as_deref() {
        Some(path) => Grid::from_file(path)?,
        None => {
            let mut rng = StdRng::seed_from_u64(config.seed);
            generate_warehouse(
                config.rows,
                config.cols,
                config.packages,
                config.obstacles,
                config.start,
                &mut rng,
            )?
        }
    };

    let mut planner = DeliveryPlanner::new(&grid, config.start, config.delivery_reward)?;
    let report = planner.solve(config)?;
    if report.is_none() {
        error!("delivery simulation found no complete route");
    }
    emit(config, &report)
}

fn emit<T: Serialize>(config: &Config, value: &T) -> anyhow::Result<()> {
    if config.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}
