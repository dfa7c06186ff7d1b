use super::events::AgentUpdate;
use std::sync::Arc;

/// Receives every position change of the agents it is subscribed to.
///
/// Called synchronously from the agent's own task, so implementations must not
/// block for long.
pub trait AgentObserver: Send + Sync + 'static {
    fn on_update(&self, update: &AgentUpdate);
}

pub type DynAgentObserver = Arc<dyn AgentObserver>;
