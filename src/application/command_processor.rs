use super::ground_control::GroundControl;
use crate::common::{ApplicationError, ApplicationResult, CommandRequest, CommandResponse, DomainError};
use std::sync::Arc;
use tracing::{info, warn};

pub const UPDATE_FENCED_AREA: &str = "update_fenced_area";
pub const SEND_SWARM_STATUS: &str = "send_swarm_status";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    UpdateFencedArea(Vec<Vec<f64>>),
    SendSwarmStatus,
}

impl TryFrom<CommandRequest> for Command {
    type Error = ApplicationError;

    fn try_from(request: CommandRequest) -> ApplicationResult<Self> {
        match request.command.as_deref() {
            Some(UPDATE_FENCED_AREA) => {
                let points = request
                    .data
                    .map(serde_json::from_value::<Vec<Vec<f64>>>)
                    .transpose()
                    .ok()
                    .flatten()
                    .ok_or_else(|| DomainError::Validation {
                        reason: "Fenced area must be a list of coordinate pairs".to_string(),
                    })?;
                Ok(Command::UpdateFencedArea(points))
            }
            Some(SEND_SWARM_STATUS) => Ok(Command::SendSwarmStatus),
            _ => Err(ApplicationError::UnknownCommand { command: request.command }),
        }
    }
}

/// Maps inbound commands onto ground-control calls and builds the replies.
pub struct CommandProcessor {
    ground_control: Arc<GroundControl>,
}

impl CommandProcessor {
    pub fn new(ground_control: Arc<GroundControl>) -> Self {
        Self { ground_control }
    }

    /// Handles one raw text frame. Malformed JSON yields an error response.
    pub async fn process_text(&self, text: &str) -> CommandResponse {
        match serde_json::from_str::<CommandRequest>(text) {
            Ok(request) => self.process(request).await,
            Err(e) => {
                warn!("Rejected malformed request: {}", e);
                CommandResponse::error(e.to_string())
            }
        }
    }

    pub async fn process(&self, request: CommandRequest) -> CommandResponse {
        let command = match Command::try_from(request) {
            Ok(command) => command,
            Err(e) => {
                warn!("Rejected command: {}", e);
                return CommandResponse::error(e.to_string());
            }
        };

        match self.execute(command).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Command failed: {}", e);
                CommandResponse::error(e.to_string())
            }
        }
    }

    async fn execute(&self, command: Command) -> ApplicationResult<CommandResponse> {
        match command {
            Command::UpdateFencedArea(points) => {
                let snapshot = self.ground_control.update_geofence(points).await?;
                let data = serde_json::to_value(&snapshot).map_err(DomainError::from)?;
                Ok(CommandResponse::success_with_data("Fenced area updated", data))
            }
            Command::SendSwarmStatus => {
                let queued = self.ground_control.request_status_broadcast().await?;
                info!(queued, "Swarm status requested");
                Ok(CommandResponse::success("Swarm status sent"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CommandRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_known_commands() {
        let cmd = Command::try_from(request(json!({
            "command": "update_fenced_area",
            "data": [[0, 0], [1, 0], [1, 1]]
        })))
        .unwrap();
        assert_eq!(cmd, Command::UpdateFencedArea(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]]));

        let cmd = Command::try_from(request(json!({"command": "send_swarm_status"}))).unwrap();
        assert_eq!(cmd, Command::SendSwarmStatus);
    }

    #[test]
    fn unknown_and_missing_commands_are_rejected() {
        for value in [json!({"command": "launch"}), json!({"data": []})] {
            let err = Command::try_from(request(value)).unwrap_err();
            assert!(matches!(err, ApplicationError::UnknownCommand { .. }));
            assert_eq!(err.to_string(), "Unknown command");
        }
    }

    #[test]
    fn fenced_area_payload_must_be_pairs_list() {
        for data in [json!("nope"), json!([[0, "a"]]), json!(null)] {
            let err = Command::try_from(request(json!({"command": "update_fenced_area", "data": data}))).unwrap_err();
            assert_eq!(err.to_string(), "Fenced area must be a list of coordinate pairs");
        }
    }
}
