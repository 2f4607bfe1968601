mod delivery;
mod meetup;

pub use delivery::{Delivery, DeliveryPlanner, DeliveryReport};
pub use meetup::{MeetupReport, MeetupSolver};

use crate::config::Config;
use crate::error::Result;

pub trait Solver {
    type Output;

    /// Run the configured search and log its statistics.
    fn solve(&mut self, config: &Config) -> Result<Self::Output>;
}
