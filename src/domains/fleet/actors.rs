use super::events::FleetUpdate;
use super::ports::DynFleetObserver;
use crate::domains::agent::{AgentId, AgentObserver, AgentStatus, AgentUpdate};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Fleet-side observer of one generation of agents.
///
/// Keeps the last known position of every agent and forwards each change,
/// together with the full roster, to the fleet subscriber.
pub struct FleetRelay {
    roster: Mutex<BTreeMap<AgentId, AgentStatus>>,
    subscriber: DynFleetObserver,
}

impl FleetRelay {
    pub fn new(subscriber: DynFleetObserver) -> Self {
        Self {
            roster: Mutex::new(BTreeMap::new()),
            subscriber,
        }
    }

    /// Seeds the roster with an agent's starting position.
    pub fn track(&self, status: AgentStatus) {
        self.roster.lock().unwrap_or_else(PoisonError::into_inner).insert(status.id, status);
    }

    /// Roster ordered by agent id.
    pub fn roster(&self) -> Vec<AgentStatus> {
        self.roster.lock().unwrap_or_else(PoisonError::into_inner).values().copied().collect()
    }
}

impl AgentObserver for FleetRelay {
    fn on_update(&self, update: &AgentUpdate) {
        let changed = update.status();
        let roster = {
            let mut roster = self.roster.lock().unwrap_or_else(PoisonError::into_inner);
            roster.insert(changed.id, changed);
            roster.values().copied().collect()
        };
        self.subscriber.on_fleet_update(&FleetUpdate { roster, changed });
    }
}
