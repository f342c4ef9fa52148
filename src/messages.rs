/// WebSocket message types for client-server communication
use serde::{Deserialize, Serialize};

use crate::dashboard::{Dashboard, DashboardPage};
use crate::view::StatusFilter;

/// Messages sent from client to server
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Change this session's delivery-status selector
    SelectStatus { status: StatusFilter },

    /// Re-render with the current selector
    Refresh,
}

/// Messages sent from server to client
#[derive(Debug, Serialize, Clone)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Freshly computed dashboard for the session's status
    Dashboard { dashboard: Box<Dashboard> },

    /// The data file could not be loaded; nothing was rendered
    LoadFailed { message: String },

    /// Error occurred
    Error { message: String },
}

impl From<DashboardPage> for ServerMessage {
    fn from(page: DashboardPage) -> Self {
        match page {
            DashboardPage::Ready { dashboard } => ServerMessage::Dashboard { dashboard },
            DashboardPage::Failed { message } => ServerMessage::LoadFailed { message },
        }
    }
}

impl ServerMessage {
    /// Serialize for the wire, degrading to an `Error` message if needed.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("Failed to serialize server message: {}", e);
            r#"{"type":"Error","message":"serialization failed"}"#.to_string()
        })
    }
}
