use std::sync::Arc;

/// Logging port used by the domain actors.
/// Non-fallible; adapters decide where the lines end up.
pub trait DomainLogger: Send + Sync + 'static {
    fn debug(&self, msg: &str);
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;

/// Forwards domain log lines to the `tracing` subscriber installed by the binary.
pub struct TracingLogger;

impl DomainLogger for TracingLogger {
    fn debug(&self, msg: &str) {
        tracing::debug!(target: "swarm_patrol::domain", "{}", msg);
    }

    fn info(&self, msg: &str) {
        tracing::info!(target: "swarm_patrol::domain", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "swarm_patrol::domain", "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "swarm_patrol::domain", "{}", msg);
    }
}

pub fn tracing_logger() -> DynLogger {
    Arc::new(TracingLogger)
}
