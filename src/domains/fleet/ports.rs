use super::events::FleetUpdate;
use crate::common::DomainResult;
use std::sync::Arc;

/// Downstream subscriber of a fleet. Invoked from agent tasks, possibly
/// concurrently, so implementations must be thread-safe and non-blocking.
pub trait FleetObserver: Send + Sync + 'static {
    fn on_fleet_update(&self, update: &FleetUpdate);
}

pub type DynFleetObserver = Arc<dyn FleetObserver>;

/// Source of geofence outlines, returned as `[lat, lon]` pairs.
pub trait GeofenceSource: Send + Sync {
    fn load_geofence(&self, name: &str) -> DomainResult<Vec<Vec<f64>>>;
}
