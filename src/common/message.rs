use serde::{Deserialize, Serialize};

/// Message text carried by every position update pushed to the client.
pub const UAVS_UPDATED: &str = "UAVs updated";

/// Envelope pushed onto the outbound channel, independent of request/response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub message: String,
    pub data: serde_json::Value,
}

impl OutboundMessage {
    pub fn new<T: Serialize>(message: &str, data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            message: message.to_string(),
            data: serde_json::to_value(data)?,
        })
    }

    pub fn uavs_updated<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        Self::new(UAVS_UPDATED, data)
    }
}

/// Inbound request frame: `{"command": ..., "data": ...}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: None,
        }
    }

    pub fn success_with_data(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            ..Self::success(message)
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_without_data_omits_the_field() {
        let value = serde_json::to_value(CommandResponse::error("Unknown command")).unwrap();
        assert_eq!(value, json!({"status": "error", "message": "Unknown command"}));
    }

    #[test]
    fn request_tolerates_missing_fields() {
        let req: CommandRequest = serde_json::from_str(r#"{"command": "send_swarm_status"}"#).unwrap();
        assert_eq!(req.command.as_deref(), Some("send_swarm_status"));
        assert!(req.data.is_none());
    }
}
