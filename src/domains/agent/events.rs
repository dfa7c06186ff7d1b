use super::aggregate::AgentId;
use super::projections::AgentStatus;
use crate::domains::geometry::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emitted by an agent every time its position changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentUpdate {
    pub agent_id: AgentId,
    pub position: GeoPoint,
    pub tick: u64,
    pub timestamp: DateTime<Utc>,
}

impl AgentUpdate {
    pub fn new(agent_id: AgentId, position: GeoPoint, tick: u64) -> Self {
        Self {
            agent_id,
            position,
            tick,
            timestamp: Utc::now(),
        }
    }

    pub fn status(&self) -> AgentStatus {
        AgentStatus::new(self.agent_id, self.position)
    }
}
