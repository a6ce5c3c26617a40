use crate::error::EventsError;
use crate::frames::{ComparisonFrame, HeatmapFrame, StatisticsFrame};
use chrono::{DateTime, Utc};
use core_types::{Slot, Ticker};
use serde::{Deserialize, Serialize};

/// Enum representing the severity of a log message for structured logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// A structured log message to be sent over WebSocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl LogMessage {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }
}

/// The top-level WebSocket message enum.
/// All communication from the server to the client will be one of these variants.
///
/// Serialized adjacently tagged, e.g. a `Log` variant looks like:
/// `{
///   "type": "Log",
///   "payload": {
///     "timestamp": "...",
///     "level": "Info",
///     "message": "..."
///   }
/// }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WsMessage {
    /// Confirms to a new client that its WebSocket connection is active.
    Connected,
    /// A structured log message, e.g. a rejected command.
    Log(LogMessage),
    /// A new heatmap window or playback state.
    HeatmapFrame(HeatmapFrame),
    /// A new comparator selection.
    ComparisonFrame(ComparisonFrame),
    /// Statistics for a brushed subset of the comparator table.
    Statistics(StatisticsFrame),
}

impl WsMessage {
    pub fn to_json(&self) -> Result<String, EventsError> {
        serde_json::to_string(self).map_err(|e| EventsError::Serialization(e.to_string()))
    }
}

/// A request sent by a browser over the WebSocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientCommand {
    /// A comparator dropdown changed.
    SelectTicker { slot: Slot, ticker: Ticker },
    /// The date slider was dragged.
    Seek { index: usize },
    /// The Play/Pause button was clicked.
    TogglePlayback,
    /// Rows selected on the comparator chart; `None` clears the selection.
    Brush { indices: Option<Vec<usize>> },
}

impl ClientCommand {
    pub fn from_json(text: &str) -> Result<Self, EventsError> {
        serde_json::from_str(text).map_err(|e| EventsError::InvalidCommand(e.to_string()))
    }
}
