use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, SearchError};

/// Dense index of a location inside a `LocationGraph`.
pub type LocationId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone)]
pub struct Location {
    pub name: String,
    pub coordinate: Coordinate,
    pub neighbors: Vec<LocationId>, // Stores ids of reachable locations, in input order
}

/// Read-only coordinate and adjacency table shared by every meetup search.
#[derive(Debug, Clone)]
pub struct LocationGraph {
    locations: Vec<Location>,
    index: HashMap<String, LocationId>,
}

impl LocationGraph {
    /// Build a graph from named coordinates and an adjacency mapping.
    ///
    /// Locations missing from `adjacency` have no neighbours. Adjacency is
    /// taken as given, so one-way links are allowed.
    pub fn new(
        locations: Vec<(String, Coordinate)>,
        adjacency: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(locations.len());
        let mut table = Vec::with_capacity(locations.len());

        for (id, (name, coordinate)) in locations.into_iter().enumerate() {
            if !coordinate.lat.is_finite() || !coordinate.lon.is_finite() {
                return Err(SearchError::MalformedGraph(format!(
                    "location {name} has non-finite coordinates"
                )));
            }
            if index.insert(name.clone(), id).is_some() {
                return Err(SearchError::MalformedGraph(format!(
                    "duplicate location {name}"
                )));
            }
            table.push(Location {
                name,
                coordinate,
                neighbors: Vec::new(),
            });
        }

        for (from, targets) in adjacency {
            let from_id = *index.get(from).ok_or_else(|| {
                SearchError::MalformedGraph(format!("adjacency references unknown location {from}"))
            })?;
            let mut neighbors = Vec::with_capacity(targets.len());
            for to in targets {
                let to_id = *index.get(to).ok_or_else(|| {
                    SearchError::MalformedGraph(format!(
                        "location {from} lists unknown neighbor {to}"
                    ))
                })?;
                neighbors.push(to_id);
            }
            table[from_id].neighbors = neighbors;
        }

        Ok(LocationGraph {
            locations: table,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn contains(&self, id: LocationId) -> bool {
        id < self.locations.len()
    }

    pub fn id(&self, name: &str) -> Result<LocationId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| SearchError::InvalidState(format!("unknown location {name}")))
    }

    pub fn name(&self, id: LocationId) -> &str {
        &self.locations[id].name
    }

    pub fn coordinate(&self, id: LocationId) -> Coordinate {
        self.locations[id].coordinate
    }

    pub fn neighbors(&self, id: LocationId) -> &[LocationId] {
        &self.locations[id].neighbors
    }

    /// Eight Indian cities with their major road connections.
    ///
    /// Coordinates are latitude/longitude, so pair this graph with the
    /// haversine metric.
    pub fn sample_cities() -> Self {
        let cities = [
            ("Delhi", 28.6139, 77.2090),
            ("Mumbai", 19.0760, 72.8777),
            ("Bangalore", 12.9716, 77.5946),
            ("Chennai", 13.0827, 80.2707),
            ("Kolkata", 22.5726, 88.3639),
            ("Hyderabad", 17.3850, 78.4867),
            ("Ahmedabad", 23.0225, 72.5714),
            ("Jaipur", 26.9124, 75.7873),
        ];
        let roads: [(&str, &[&str]); 8] = [
            ("Delhi", &["Jaipur", "Ahmedabad"]),
            ("Mumbai", &["Ahmedabad", "Bangalore", "Hyderabad"]),
            ("Bangalore", &["Chennai", "Hyderabad", "Mumbai"]),
            ("Chennai", &["Bangalore", "Hyderabad"]),
            ("Kolkata", &["Hyderabad"]),
            ("Hyderabad", &["Chennai", "Mumbai", "Kolkata", "Bangalore"]),
            ("Ahmedabad", &["Mumbai", "Delhi", "Jaipur"]),
            ("Jaipur", &["Delhi", "Ahmedabad"]),
        ];

        let locations: Vec<(String, Coordinate)> = cities
            .iter()
            .map(|&(name, lat, lon)| (name.to_string(), Coordinate { lat, lon }))
            .collect();
        let adjacency: BTreeMap<String, Vec<String>> = roads
            .iter()
            .map(|(name, targets)| {
                (
                    name.to_string(),
                    targets.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect();

        // The table above is known to be consistent.
        match LocationGraph::new(locations, &adjacency) {
            Ok(graph) => graph,
            Err(err) => unreachable!("built-in city table is malformed: {err}"),
        }
    }
}
