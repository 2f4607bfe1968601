mod lowlevel;
mod result;

pub(crate) use lowlevel::{GridNode, JointNode};
pub use result::{Route, SearchOutcome, SearchResult};

use serde::{Deserialize, Serialize};

use crate::graph::LocationId;

/// Grid cell identity, `(row, col)`.
pub type Position = (usize, usize);

/// Locations of the two agents, agent A first.
///
/// Order matters: `(a, b)` and `(b, a)` are distinct states because the path
/// records which location belongs to which agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointState(pub LocationId, pub LocationId);

impl JointState {
    pub fn is_meeting(&self) -> bool {
        self.0 == self.1
    }

    pub fn swapped(&self) -> Self {
        JointState(self.1, self.0)
    }
}
