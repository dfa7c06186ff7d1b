use super::events::AgentUpdate;
use super::projections::AgentStatus;
use crate::common::GeometryResult;
use crate::domains::geometry::{generate_waypoints, GeoPoint, Polygon};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

pub type AgentId = u32;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_WAYPOINT_SPACING_M: f64 = 250.0;
pub const DEFAULT_CRUISE_ALTITUDE_M: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentPhase {
    Initializing,
    Moving,
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    pub tick_interval: Duration,
    pub waypoint_spacing_m: f64,
    pub cruise_altitude_m: f64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            waypoint_spacing_m: DEFAULT_WAYPOINT_SPACING_M,
            cruise_altitude_m: DEFAULT_CRUISE_ALTITUDE_M,
        }
    }
}

/// Patrol state of a single UAV: where it is and which waypoints are left.
///
/// Only the owning agent's tick loop mutates it; everyone else reads snapshots.
#[derive(Debug, Clone)]
pub struct UavPatrol {
    id: AgentId,
    buffer: Arc<Polygon>,
    home: GeoPoint,
    position: GeoPoint,
    waypoints: VecDeque<GeoPoint>,
    tick_count: u64,
    spacing: f64,
    cruise_altitude: f64,
}

impl UavPatrol {
    pub fn new(id: AgentId, buffer: Arc<Polygon>, home: GeoPoint, settings: &AgentSettings) -> GeometryResult<Self> {
        let home = home.at_altitude(home.alt.unwrap_or(settings.cruise_altitude_m));
        let waypoints = generate_waypoints(&buffer, &home, settings.waypoint_spacing_m, settings.cruise_altitude_m)?;
        Ok(Self {
            id,
            buffer,
            home,
            position: home,
            waypoints: waypoints.into(),
            tick_count: 0,
            spacing: settings.waypoint_spacing_m,
            cruise_altitude: settings.cruise_altitude_m,
        })
    }

    /// Advances one step along the patrol route.
    ///
    /// Returns the update when the UAV moved. An exhausted route is rebuilt
    /// from the home position instead, and nothing moves on that tick.
    pub fn tick(&mut self) -> GeometryResult<Option<AgentUpdate>> {
        match self.waypoints.pop_front() {
            Some(next) => Ok(Some(self.apply_position(next))),
            None => {
                self.waypoints = generate_waypoints(&self.buffer, &self.home, self.spacing, self.cruise_altitude)?.into();
                Ok(None)
            }
        }
    }

    /// Moves the UAV to `target` at cruise altitude and returns the resulting update.
    pub fn apply_position(&mut self, target: GeoPoint) -> AgentUpdate {
        self.position = target.at_altitude(self.cruise_altitude);
        self.tick_count += 1;
        AgentUpdate::new(self.id, self.position, self.tick_count)
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn remaining_waypoints(&self) -> usize {
        self.waypoints.len()
    }

    pub fn status(&self) -> AgentStatus {
        AgentStatus::new(self.id, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::geometry::{unproject, PlanarPoint};

    fn square_buffer(side: f64) -> Arc<Polygon> {
        let corners = [(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)];
        Arc::new(Polygon::new(corners.iter().map(|&(x, y)| unproject(PlanarPoint::new(x, y))).collect()).unwrap())
    }

    #[test]
    fn tick_consumes_waypoints_front_to_back() {
        let buffer = square_buffer(1000.0);
        let home = buffer.vertices()[0];
        let mut patrol = UavPatrol::new(1, buffer, home, &AgentSettings::default()).unwrap();
        assert_eq!(patrol.remaining_waypoints(), 16);

        let first = patrol.tick().unwrap().expect("moved");
        assert_eq!(first.tick, 1);
        assert_eq!(first.position.alt, Some(DEFAULT_CRUISE_ALTITUDE_M));
        assert_eq!(patrol.remaining_waypoints(), 15);
        assert_eq!(patrol.tick_count(), 1);
    }

    #[test]
    fn exhausted_route_regenerates_without_moving() {
        let buffer = square_buffer(1000.0);
        let home = buffer.vertices()[0];
        let mut patrol = UavPatrol::new(3, buffer, home, &AgentSettings::default()).unwrap();
        for _ in 0..16 {
            assert!(patrol.tick().unwrap().is_some());
        }
        let before = patrol.position();
        assert!(patrol.tick().unwrap().is_none());
        assert_eq!(patrol.position(), before);
        assert_eq!(patrol.tick_count(), 16);
        assert_eq!(patrol.remaining_waypoints(), 16);
    }

    #[test]
    fn apply_position_forces_cruise_altitude() {
        let buffer = square_buffer(1000.0);
        let home = buffer.vertices()[0];
        let mut patrol = UavPatrol::new(2, buffer, home, &AgentSettings::default()).unwrap();
        let update = patrol.apply_position(GeoPoint::with_altitude(0.001, 0.001, 12.0));
        assert_eq!(update.position.alt, Some(DEFAULT_CRUISE_ALTITUDE_M));
        assert_eq!(update.agent_id, 2);
    }
}
