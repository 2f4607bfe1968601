use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::graph::{Coordinate, LocationGraph, LocationId};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// How the distance between two coordinates is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Planar distance, treating `lat`/`lon` as plain x/y.
    Euclidean,
    /// Great-circle distance in kilometres.
    Haversine,
}

impl Metric {
    pub fn measure(&self, a: Coordinate, b: Coordinate) -> f64 {
        match self {
            Metric::Euclidean => (a.lat - b.lat).hypot(a.lon - b.lon),
            Metric::Haversine => {
                let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
                let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
                let dlat = lat2 - lat1;
                let dlon = lon2 - lon1;
                let h = (dlat / 2.0).sin().powi(2)
                    + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
                // Rounding can push h a hair above 1 for antipodal points.
                2.0 * h.clamp(0.0, 1.0).sqrt().asin() * EARTH_RADIUS_KM
            }
        }
    }
}

impl FromStr for Metric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "euclidean" => Ok(Metric::Euclidean),
            "haversine" => Ok(Metric::Haversine),
            _ => Err(anyhow!("unknown metric {s}, expected euclidean or haversine")),
        }
    }
}

/// Distance and step cost between graph locations.
///
/// Nothing is cached: every query reads the coordinates of the graph it is
/// handed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    pub metric: Metric,
    pub step_multiplier: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            metric: Metric::Euclidean,
            step_multiplier: 2.0,
        }
    }
}

impl CostModel {
    pub fn new(metric: Metric, step_multiplier: f64) -> Self {
        CostModel {
            metric,
            step_multiplier,
        }
    }

    pub fn distance(&self, graph: &LocationGraph, a: LocationId, b: LocationId) -> f64 {
        if a == b {
            return 0.0;
        }
        self.metric
            .measure(graph.coordinate(a), graph.coordinate(b))
    }

    /// Cost of one edge traversal; the default multiplier of 2 charges the
    /// return trip.
    pub fn step_cost(&self, graph: &LocationGraph, from: LocationId, to: LocationId) -> f64 {
        self.step_multiplier * self.distance(graph, from, to)
    }
}
