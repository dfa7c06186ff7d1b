use crate::domains::agent::AgentStatus;
use serde::{Deserialize, Serialize};

/// Serializable view of a fleet: `{"uavs": [{id, uav_coordinates}, ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub uavs: Vec<AgentStatus>,
}
