//! Console settings.

use std::time::Duration;

use crate::discovery::{BulbSpec, SimulatedFleet};

/// Settings for one console session and the simulated fleet it talks to.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// How long a reboot can still be cancelled
    pub reboot_delay: Duration,
    /// Delay before simulated devices answer queries
    pub latency: Duration,
    /// Gap between simulated devices announcing themselves
    pub stagger: Duration,
    pub fleet: Vec<BulbSpec>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            reboot_delay: Duration::from_secs(3),
            latency: Duration::from_millis(150),
            stagger: Duration::from_millis(200),
            fleet: SimulatedFleet::default_specs(),
        }
    }
}

impl ConsoleConfig {
    /// The simulated fleet these settings describe.
    pub fn simulated_fleet(&self) -> SimulatedFleet {
        SimulatedFleet::new(self.fleet.clone(), self.latency, self.stagger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reboot_window() {
        let config = ConsoleConfig::default();
        assert_eq!(config.reboot_delay, Duration::from_secs(3));
        assert_eq!(config.fleet.len(), 5);
    }
}
