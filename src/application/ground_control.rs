use crate::common::{ApplicationError, ApplicationResult, DomainError, DomainResult, OutboundMessage};
use crate::domains::agent::AgentStatus;
use crate::domains::fleet::{Fleet, FleetObserver, FleetSettings, FleetSnapshot, FleetUpdate};
use crate::domains::geometry::{build_polygon, GeoPoint, Polygon};
use crate::domains::logger::{tracing_logger, DynLogger};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use tracing::{error, info, warn};

const COORDINATE_PAIRS_REQUIRED: &str = "Fenced area must be a list of coordinate pairs";

/// Serializable controller state returned after a geofence update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundControlSnapshot {
    pub fenced_area: Vec<GeoPoint>,
    pub is_swarm_init: bool,
    pub swarm: Option<FleetSnapshot>,
}

/// Hands fleet notifications over to the outbound channel.
///
/// `try_send` never blocks the agent task that calls in; a full or closed
/// channel only drops that message.
pub struct OutboundBridge {
    sender: mpsc::Sender<OutboundMessage>,
    roster: Mutex<Vec<AgentStatus>>,
}

impl OutboundBridge {
    pub fn new(sender: mpsc::Sender<OutboundMessage>) -> Self {
        Self {
            sender,
            roster: Mutex::new(Vec::new()),
        }
    }

    pub fn publish(&self, message: OutboundMessage) -> ApplicationResult<()> {
        self.sender.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => ApplicationError::Channel("outbound channel is full".to_string()),
            TrySendError::Closed(_) => ApplicationError::Channel("outbound channel is closed".to_string()),
        })
    }

    /// Roster carried by the most recent fleet notification.
    pub fn last_roster(&self) -> Vec<AgentStatus> {
        self.roster.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl FleetObserver for OutboundBridge {
    fn on_fleet_update(&self, update: &FleetUpdate) {
        *self.roster.lock().unwrap_or_else(PoisonError::into_inner) = update.roster.clone();

        match OutboundMessage::uavs_updated(&update.changed) {
            Ok(message) => {
                if let Err(e) = self.publish(message) {
                    warn!(agent_id = update.changed.id, "Dropped UAV update: {}", e);
                }
            }
            Err(e) => error!(agent_id = update.changed.id, "Failed to serialize UAV update: {}", e),
        }
    }
}

#[derive(Default)]
struct ControlState {
    fenced_area: Option<Polygon>,
    fleet: Option<Fleet>,
}

/// Top-level facade owning the fleet and the outbound channel.
///
/// The fleet is created on the first successful geofence update and replaced
/// on every later one. Updates hold the state lock exclusively, so a snapshot
/// never observes a half-replaced roster.
pub struct GroundControl {
    settings: FleetSettings,
    logger: DynLogger,
    bridge: Arc<OutboundBridge>,
    state: RwLock<ControlState>,
}

impl GroundControl {
    pub fn new(outbound: mpsc::Sender<OutboundMessage>, settings: FleetSettings) -> Self {
        Self::with_logger(outbound, settings, tracing_logger())
    }

    /// Same as [`GroundControl::new`], with the logger handed to every fleet it builds.
    pub fn with_logger(outbound: mpsc::Sender<OutboundMessage>, settings: FleetSettings, logger: DynLogger) -> Self {
        Self {
            settings,
            logger,
            bridge: Arc::new(OutboundBridge::new(outbound)),
            state: RwLock::new(ControlState::default()),
        }
    }

    /// Validates `points`, closes the ring and (re)initializes the fleet.
    ///
    /// On error the running fleet and the stored geofence are left as they were.
    pub async fn update_geofence(&self, points: Vec<Vec<f64>>) -> DomainResult<GroundControlSnapshot> {
        let polygon = build_polygon(parse_geofence(points)?)?;

        let mut state = self.state.write().await;
        match state.fleet.as_mut() {
            Some(fleet) => fleet.reinitialize(polygon.clone()).await?,
            None => {
                let fleet = Fleet::initialize(
                    polygon.clone(),
                    self.bridge.clone(),
                    self.settings.clone(),
                    self.logger.clone(),
                )?;
                state.fleet = Some(fleet);
            }
        }
        info!(vertices = polygon.vertex_count(), "Fenced area updated");
        state.fenced_area = Some(polygon);

        Ok(snapshot_of(&state))
    }

    /// Queues one "UAVs updated" message per agent with its current position.
    ///
    /// Returns how many were queued; zero while no fleet exists. Messages the
    /// outbound channel cannot take are dropped with a warning.
    pub async fn request_status_broadcast(&self) -> ApplicationResult<usize> {
        let state = self.state.read().await;
        let Some(fleet) = state.fleet.as_ref() else {
            return Ok(0);
        };

        let statuses = fleet.statuses();
        let mut queued = 0;
        for status in &statuses {
            let message = OutboundMessage::uavs_updated(status).map_err(DomainError::from)?;
            match self.bridge.publish(message) {
                Ok(()) => queued += 1,
                Err(e) => warn!(agent_id = status.id, "Dropped UAV status: {}", e),
            }
        }
        info!(uavs = statuses.len(), queued, "Swarm status queued");
        Ok(queued)
    }

    pub async fn snapshot(&self) -> GroundControlSnapshot {
        snapshot_of(&*self.state.read().await)
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.fleet.is_some()
    }

    /// Positions as carried by the latest fleet notification.
    pub fn last_roster(&self) -> Vec<AgentStatus> {
        self.bridge.last_roster()
    }

    /// Stops and joins every agent.
    pub async fn shutdown(&self) {
        let mut state = self.state.write().await;
        if let Some(fleet) = state.fleet.as_mut() {
            fleet.stop().await;
        }
    }
}

fn snapshot_of(state: &ControlState) -> GroundControlSnapshot {
    GroundControlSnapshot {
        fenced_area: state
            .fenced_area
            .as_ref()
            .map(|polygon| polygon.ring().to_vec())
            .unwrap_or_default(),
        is_swarm_init: state.fleet.is_some(),
        swarm: state.fleet.as_ref().map(Fleet::snapshot),
    }
}

fn parse_geofence(points: Vec<Vec<f64>>) -> DomainResult<Vec<GeoPoint>> {
    if points.is_empty() {
        return Err(DomainError::Validation { reason: COORDINATE_PAIRS_REQUIRED.to_string() });
    }

    let mut parsed = Vec::with_capacity(points.len());
    for pair in points {
        match pair.as_slice() {
            [lat, lon] => parsed.push(GeoPoint::new(*lat, *lon)),
            _ => return Err(DomainError::Validation { reason: COORDINATE_PAIRS_REQUIRED.to_string() }),
        }
    }

    let mut distinct: Vec<GeoPoint> = Vec::new();
    for p in &parsed {
        if !distinct.iter().any(|d| d.same_position(p)) {
            distinct.push(*p);
        }
    }
    if distinct.len() < 3 {
        return Err(DomainError::Validation {
            reason: format!("Fenced area needs at least 3 distinct points, got {}", distinct.len()),
        });
    }
    Ok(parsed)
}
