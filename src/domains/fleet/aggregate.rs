use super::actors::FleetRelay;
use super::ports::DynFleetObserver;
use super::projections::FleetSnapshot;
use crate::common::DomainResult;
use crate::domains::agent::{Agent, AgentId, AgentSettings, AgentStatus};
use crate::domains::geometry::{shrink_polygon, spread_points, Polygon};
use crate::domains::logger::DynLogger;
use std::sync::Arc;

pub const DEFAULT_AGENT_COUNT: usize = 6;
pub const DEFAULT_BUFFER_DISTANCE_M: f64 = 250.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FleetSettings {
    pub agent_count: usize,
    pub buffer_distance_m: f64,
    pub agent: AgentSettings,
}

impl Default for FleetSettings {
    fn default() -> Self {
        Self {
            agent_count: DEFAULT_AGENT_COUNT,
            buffer_distance_m: DEFAULT_BUFFER_DISTANCE_M,
            agent: AgentSettings::default(),
        }
    }
}

/// All agents created for one geofence.
struct Generation {
    geofence: Polygon,
    buffer: Arc<Polygon>,
    agents: Vec<Agent>,
    relay: Arc<FleetRelay>,
}

impl Generation {
    /// Derives the buffer and builds every agent without starting any of them.
    fn build(
        geofence: Polygon,
        settings: &FleetSettings,
        subscriber: DynFleetObserver,
        logger: &DynLogger,
    ) -> DomainResult<Self> {
        let buffer = Arc::new(shrink_polygon(&geofence, settings.buffer_distance_m)?);
        let starts = spread_points(&buffer, settings.agent_count, settings.agent.cruise_altitude_m)?;
        let relay = Arc::new(FleetRelay::new(subscriber));

        let mut agents = Vec::with_capacity(starts.len());
        for (index, start) in starts.into_iter().enumerate() {
            let agent = Agent::new(index as AgentId + 1, buffer.clone(), start, &settings.agent, logger.clone())?;
            relay.track(agent.status());
            agent.subscribe(relay.clone());
            agents.push(agent);
        }

        Ok(Self { geofence, buffer, agents, relay })
    }

    fn start(&mut self) {
        for agent in &mut self.agents {
            agent.start();
        }
    }

    /// Signals every agent first, then joins them all.
    async fn stop(&mut self) {
        for agent in &self.agents {
            agent.signal_stop();
        }
        for agent in &mut self.agents {
            agent.stop().await;
        }
    }
}

/// The UAV swarm patrolling the buffer of the current geofence.
pub struct Fleet {
    settings: FleetSettings,
    subscriber: DynFleetObserver,
    logger: DynLogger,
    generation: Generation,
    generation_number: u64,
}

impl Fleet {
    /// Builds the buffer polygon and starts one agent per evenly spaced start
    /// position. Must be called inside a tokio runtime.
    pub fn initialize(
        geofence: Polygon,
        subscriber: DynFleetObserver,
        settings: FleetSettings,
        logger: DynLogger,
    ) -> DomainResult<Self> {
        let mut generation = Generation::build(geofence, &settings, subscriber.clone(), &logger)?;
        generation.start();
        logger.info(&format!(
            "Fleet initialized with {} UAVs on a {}-vertex buffer",
            generation.agents.len(),
            generation.buffer.vertex_count()
        ));
        Ok(Self {
            settings,
            subscriber,
            logger,
            generation,
            generation_number: 1,
        })
    }

    /// Replaces every agent with a fresh generation patrolling `geofence`.
    ///
    /// The new generation is fully built before anything is stopped, so a
    /// geometry failure leaves the running fleet untouched. Old agents are
    /// joined before any new agent starts.
    pub async fn reinitialize(&mut self, geofence: Polygon) -> DomainResult<()> {
        let next = match Generation::build(geofence, &self.settings, self.subscriber.clone(), &self.logger) {
            Ok(next) => next,
            Err(e) => {
                self.logger.warn(&format!("Fleet kept generation {}: {}", self.generation_number, e));
                return Err(e);
            }
        };

        self.generation.stop().await;
        drop(std::mem::replace(&mut self.generation, next));
        self.generation.start();
        self.generation_number += 1;

        self.logger.info(&format!(
            "Fleet reinitialized as generation {} with {} UAVs",
            self.generation_number,
            self.generation.agents.len()
        ));
        Ok(())
    }

    /// Stops and joins every agent.
    pub async fn stop(&mut self) {
        self.generation.stop().await;
    }

    pub fn geofence(&self) -> &Polygon {
        &self.generation.geofence
    }

    pub fn buffer(&self) -> &Polygon {
        &self.generation.buffer
    }

    pub fn agents(&self) -> &[Agent] {
        &self.generation.agents
    }

    pub fn generation_number(&self) -> u64 {
        self.generation_number
    }

    pub fn settings(&self) -> &FleetSettings {
        &self.settings
    }

    /// Current position of every agent, ordered by id.
    pub fn statuses(&self) -> Vec<AgentStatus> {
        self.generation.agents.iter().map(Agent::status).collect()
    }

    /// Roster as last reported through agent notifications.
    pub fn observed_roster(&self) -> Vec<AgentStatus> {
        self.generation.relay.roster()
    }

    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot { uavs: self.statuses() }
    }
}
