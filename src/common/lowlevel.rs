use std::cmp::Ordering;

use super::{JointState, Position};

/// Frontier entry of the joint-state search.
///
/// Each node owns the full path that reached it; expanding a node copies the
/// path into the successor.
#[derive(Clone, Debug)]
pub(crate) struct JointNode {
    pub(crate) priority: f64,
    pub(crate) cost: f64,
    pub(crate) sequence: u64, // insertion order, unique per search
    pub(crate) state: JointState,
    pub(crate) path: Vec<JointState>,
}

impl PartialEq for JointNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for JointNode {}

impl PartialOrd for JointNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for JointNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            // Cheaper path first on equal priority
            .then_with(|| self.cost.total_cmp(&other.cost))
            // Then first in, first out
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Frontier entry of the grid uniform-cost search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GridNode {
    pub(crate) g_cost: usize,
    pub(crate) position: Position,
}

impl Ord for GridNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so that `BinaryHeap` pops the cheapest node.
        other
            .g_cost
            .cmp(&self.g_cost)
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for GridNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, BinaryHeap};

    fn node(priority: f64, cost: f64, sequence: u64) -> JointNode {
        JointNode {
            priority,
            cost,
            sequence,
            state: JointState(0, 1),
            path: vec![JointState(0, 1)],
        }
    }

    #[test]
    fn test_joint_node_tie_break() {
        let mut open = BTreeSet::new();
        open.insert(node(5.0, 3.0, 0));
        open.insert(node(5.0, 1.0, 1));
        open.insert(node(4.0, 9.0, 2));
        open.insert(node(5.0, 1.0, 3));

        let order: Vec<u64> = std::iter::from_fn(|| open.pop_first())
            .map(|n| n.sequence)
            .collect();
        assert_eq!(order, vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_grid_node_min_heap() {
        let mut open = BinaryHeap::new();
        open.push(GridNode {
            g_cost: 2,
            position: (0, 0),
        });
        open.push(GridNode {
            g_cost: 1,
            position: (1, 1),
        });
        open.push(GridNode {
            g_cost: 1,
            position: (0, 1),
        });

        assert_eq!(open.pop().unwrap().position, (0, 1));
        assert_eq!(open.pop().unwrap().position, (1, 1));
        assert_eq!(open.pop().unwrap().position, (0, 0));
    }
}
