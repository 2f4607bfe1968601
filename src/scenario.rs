use anyhow::{anyhow, Context, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use tracing::info;

use crate::common::Position;
use crate::graph::{Coordinate, LocationGraph};
use crate::map::Grid;

/// Placement attempts per package pair before the generator gives up.
const MAX_ATTEMPTS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Meetup input as stored on disk:
///
/// ```yaml
/// locations:
///   - { name: A, lat: 0.0, lon: 0.0 }
///   - { name: B, lat: 1.0, lon: 0.0 }
/// adjacency:
///   A: [B]
///   B: [A]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetupScenario {
    pub locations: Vec<LocationEntry>,
    #[serde(default)]
    pub adjacency: BTreeMap<String, Vec<String>>,
}

impl MeetupScenario {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("cannot open scenario {path}"))?;
        let reader = BufReader::new(file);
        let scenario = serde_yaml::from_reader(reader)
            .with_context(|| format!("error with scenario file: {path}"))?;
        Ok(scenario)
    }

    pub fn into_graph(self) -> Result<LocationGraph> {
        let locations = self
            .locations
            .into_iter()
            .map(|entry| {
                (
                    entry.name,
                    Coordinate {
                        lat: entry.lat,
                        lon: entry.lon,
                    },
                )
            })
            .collect();
        Ok(LocationGraph::new(locations, &self.adjacency)?)
    }
}

/// Random warehouse layout: `packages` package/drop-off pairs, then
/// `obstacles` obstacle cells, all on distinct cells. No obstacle is placed
/// on `start`, the cell the picker begins from.
///
/// The result is an ordinary validated `Grid`; nothing downstream depends on
/// how it was produced.
pub fn generate_warehouse<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    packages: usize,
    obstacles: usize,
    start: Position,
    rng: &mut R,
) -> Result<Grid> {
    if rows == 0 || cols == 0 {
        return Err(anyhow!("Grid dimensions must be positive"));
    }
    if packages == 0 {
        return Err(anyhow!("Number of packages must be positive"));
    }
    if packages + obstacles >= rows * cols {
        return Err(anyhow!("Too many packages and obstacles for grid size"));
    }
    if start.0 >= rows || start.1 >= cols {
        return Err(anyhow!("Start {start:?} is outside the {rows}x{cols} grid"));
    }

    let mut used: HashSet<Position> = HashSet::new();
    let mut package_cells = Vec::with_capacity(packages);
    let mut dropoff_cells = Vec::with_capacity(packages);

    for i in 0..packages {
        let placed = (0..MAX_ATTEMPTS).find_map(|_| {
            let package = (rng.gen_range(0..rows), rng.gen_range(0..cols));
            let dropoff = (rng.gen_range(0..rows), rng.gen_range(0..cols));
            (package != dropoff && !used.contains(&package) && !used.contains(&dropoff))
                .then_some((package, dropoff))
        });
        let (package, dropoff) = placed
            .ok_or_else(|| anyhow!("Could not place package {} and its drop-off", i + 1))?;
        used.insert(package);
        used.insert(dropoff);
        package_cells.push(package);
        dropoff_cells.push(dropoff);
    }

    let mut obstacle_cells = Vec::with_capacity(obstacles);
    let mut attempts = 0;
    while obstacle_cells.len() < obstacles && attempts < MAX_ATTEMPTS {
        let obstacle = (rng.gen_range(0..rows), rng.gen_range(0..cols));
        if obstacle != start && used.insert(obstacle) {
            obstacle_cells.push(obstacle);
        }
        attempts += 1;
    }
    if obstacle_cells.len() < obstacles {
        return Err(anyhow!(
            "Could not place all obstacles, placed {} of {obstacles}",
            obstacle_cells.len()
        ));
    }

    let grid = Grid::new(rows, cols, &obstacle_cells, &package_cells, &dropoff_cells)?;
    info!("Generate warehouse {rows}x{cols}:\n{grid}");
    Ok(grid)
}
