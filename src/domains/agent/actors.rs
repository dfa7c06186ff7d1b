use super::aggregate::{AgentId, AgentPhase, AgentSettings, UavPatrol};
use super::ports::DynAgentObserver;
use super::projections::AgentStatus;
use crate::common::GeometryResult;
use crate::domains::geometry::{GeoPoint, Polygon};
use crate::domains::logger::DynLogger;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A simulated UAV running its own patrol loop on a tokio task.
///
/// The loop ticks immediately after start and then once per tick interval.
/// The inter-tick sleep is the only point where a stop request is observed.
pub struct Agent {
    id: AgentId,
    patrol: Arc<RwLock<UavPatrol>>,
    observers: Arc<RwLock<Vec<DynAgentObserver>>>,
    tick_interval: Duration,
    phase: AgentPhase,
    stop_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
    logger: DynLogger,
}

impl Agent {
    /// Builds the agent and its initial route without starting the loop.
    pub fn new(
        id: AgentId,
        buffer: Arc<Polygon>,
        initial: GeoPoint,
        settings: &AgentSettings,
        logger: DynLogger,
    ) -> GeometryResult<Self> {
        let patrol = UavPatrol::new(id, buffer, initial, settings)?;
        let (stop_tx, _) = watch::channel(false);
        Ok(Self {
            id,
            patrol: Arc::new(RwLock::new(patrol)),
            observers: Arc::new(RwLock::new(Vec::new())),
            tick_interval: settings.tick_interval,
            phase: AgentPhase::Initializing,
            stop_tx,
            handle: None,
            logger,
        })
    }

    /// Builds the agent and starts moving right away. Must be called inside a tokio runtime.
    pub fn spawn(
        id: AgentId,
        buffer: Arc<Polygon>,
        initial: GeoPoint,
        settings: &AgentSettings,
        logger: DynLogger,
        observers: Vec<DynAgentObserver>,
    ) -> GeometryResult<Self> {
        let mut agent = Self::new(id, buffer, initial, settings, logger)?;
        for observer in observers {
            agent.subscribe(observer);
        }
        agent.start();
        Ok(agent)
    }

    /// Observers are notified in registration order.
    pub fn subscribe(&self, observer: DynAgentObserver) {
        write_lock(&self.observers).push(observer);
    }

    /// Spawns the patrol loop. Only an `Initializing` agent can be started.
    pub fn start(&mut self) {
        if self.phase != AgentPhase::Initializing {
            return;
        }

        let task = PatrolTask {
            id: self.id,
            patrol: self.patrol.clone(),
            observers: self.observers.clone(),
            tick_interval: self.tick_interval,
            stop_rx: self.stop_tx.subscribe(),
            logger: self.logger.clone(),
        };
        self.handle = Some(tokio::spawn(task.run()));
        self.phase = AgentPhase::Moving;
        self.logger.debug(&format!("UAV {} started patrolling", self.id));
    }

    /// Asks the loop to exit at its next wait boundary without waiting for it.
    pub fn signal_stop(&self) {
        self.stop_tx.send_replace(true);
    }

    /// Waits until the loop has exited. No notification is emitted after this returns.
    pub async fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    self.logger.error(&format!("UAV {} patrol task panicked", self.id));
                }
            }
        }
        self.phase = AgentPhase::Stopped;
    }

    /// Stops the loop and waits for it to exit. Stopping twice is a no-op.
    pub async fn stop(&mut self) {
        if self.phase == AgentPhase::Stopped {
            return;
        }
        self.signal_stop();
        self.join().await;
        self.logger.info(&format!("UAV {} stopped", self.id));
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    pub fn position(&self) -> GeoPoint {
        read_lock(&self.patrol).position()
    }

    pub fn tick_count(&self) -> u64 {
        read_lock(&self.patrol).tick_count()
    }

    pub fn status(&self) -> AgentStatus {
        read_lock(&self.patrol).status()
    }
}

impl Drop for Agent {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

struct PatrolTask {
    id: AgentId,
    patrol: Arc<RwLock<UavPatrol>>,
    observers: Arc<RwLock<Vec<DynAgentObserver>>>,
    tick_interval: Duration,
    stop_rx: watch::Receiver<bool>,
    logger: DynLogger,
}

impl PatrolTask {
    async fn run(mut self) {
        loop {
            if *self.stop_rx.borrow() {
                break;
            }
            self.tick();

            tokio::select! {
                _ = tokio::time::sleep(self.tick_interval) => {}
                _ = self.stop_rx.changed() => break,
            }
        }
        self.logger.debug(&format!("UAV {} patrol loop exited", self.id));
    }

    fn tick(&self) {
        let result = write_lock(&self.patrol).tick();
        match result {
            Ok(Some(update)) => {
                self.logger.debug(&format!(
                    "UAV {} moved to new position ({:.6}, {:.6}) on tick {} at {}",
                    self.id,
                    update.position.lat,
                    update.position.lon,
                    update.tick,
                    update.timestamp.to_rfc3339()
                ));
                let observers = read_lock(&self.observers).clone();
                for observer in &observers {
                    observer.on_update(&update);
                }
            }
            Ok(None) => self.logger.info(&format!("UAV {} has no waypoints left, route regenerated", self.id)),
            Err(e) => self.logger.warn(&format!("UAV {} failed to regenerate its route: {}", self.id, e)),
        }
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
