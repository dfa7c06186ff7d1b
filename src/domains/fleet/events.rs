use crate::domains::agent::AgentStatus;
use serde::{Deserialize, Serialize};

/// Batch a fleet hands to its subscriber for every agent position change:
/// the whole roster as last observed plus the agent that just moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetUpdate {
    pub roster: Vec<AgentStatus>,
    pub changed: AgentStatus,
}
