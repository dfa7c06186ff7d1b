use super::aggregate::AgentId;
use crate::domains::geometry::GeoPoint;
use serde::{Deserialize, Serialize};

/// Per-UAV record shared by snapshots and outbound updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub id: AgentId,
    pub uav_coordinates: GeoPoint,
}

impl AgentStatus {
    pub fn new(id: AgentId, uav_coordinates: GeoPoint) -> Self {
        Self { id, uav_coordinates }
    }
}
