use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

use crate::common::SearchResult;
use crate::config::Config;

const CSV_HEADER: &str = "label,cost,time_us,nodes_generated,nodes_expanded,max_frontier_size";

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub cost: f64,
    pub time_us: usize,
    pub nodes_generated: usize,
    pub nodes_expanded: usize,
    pub max_frontier_size: usize,
}

impl Stats {
    pub(crate) fn record_search(&mut self, result: &SearchResult) {
        self.cost += result.total_cost.unwrap_or(0.0);
        self.time_us += result.elapsed.as_micros() as usize;
        self.nodes_generated += result.nodes_generated;
        self.nodes_expanded += result.nodes_expanded;
        self.max_frontier_size = self.max_frontier_size.max(result.max_frontier_size);
    }

    pub fn print(&self, label: &str, config: &Config) {
        info!(
            "[{label}] Cost {:.3} Time(microseconds) {:?} Generated nodes: {:?} Expanded nodes: {:?} Max frontier: {:?}",
            self.cost, self.time_us, self.nodes_generated, self.nodes_expanded, self.max_frontier_size
        );

        if let Some(output_path) = config.output_path.as_deref() {
            if let Err(err) = self.append_csv(label, Path::new(output_path)) {
                error!("cannot write stats to {output_path}: {err:#}");
            }
        }
    }

    /// Append one row to `path`, writing the header first if the file is new.
    pub fn append_csv(&self, label: &str, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let is_new = !path.exists();
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if is_new {
            writeln!(file, "{CSV_HEADER}")?;
        }
        writeln!(
            file,
            "{label},{},{},{},{},{}",
            self.cost,
            self.time_us,
            self.nodes_generated,
            self.nodes_expanded,
            self.max_frontier_size
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::JointState;
    use std::time::Duration;

    #[test]
    fn test_record_search_accumulates() {
        let mut stats = Stats::default();
        let result = SearchResult {
            path: Some(vec![JointState(0, 1), JointState(2, 2)]),
            total_cost: Some(3.5),
            nodes_generated: 7,
            nodes_expanded: 3,
            max_frontier_size: 4,
            elapsed: Duration::from_micros(12),
        };
        stats.record_search(&result);
        stats.record_search(&SearchResult {
            path: None,
            total_cost: None,
            max_frontier_size: 2,
            ..result
        });

        assert_eq!(stats.cost, 3.5);
        assert_eq!(stats.nodes_generated, 14);
        assert_eq!(stats.nodes_expanded, 6);
        assert_eq!(stats.max_frontier_size, 4);
        assert_eq!(stats.time_us, 24);
    }

    #[test]
    fn test_append_csv_writes_header_once() {
        let path = std::env::temp_dir().join(format!("agent_search_stats_{}.csv", std::process::id()));
        let _ = fs::remove_file(&path);

        let stats = Stats {
            cost: 4.0,
            nodes_expanded: 3,
            ..Stats::default()
        };
        stats.append_csv("first", &path).unwrap();
        stats.append_csv("second", &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].starts_with("first,4,"));
        assert!(lines[2].starts_with("second,4,"));

        let _ = fs::remove_file(&path);
    }
}
