//! # Stockscope Events
//!
//! This crate defines the frames and messages exchanged between the dashboard
//! sessions and the browser, over both the HTTP API and the WebSocket.
//!
//! As a Layer 0 crate, it depends only on `core-types` and provides the definitive
//! language for all real-time state synchronization. Frames are always sent
//! whole; a client replaces its copy instead of patching it.

// Declare the modules that make up this crate.
pub mod error;
pub mod frames;
pub mod messages;

// Re-export the core types to provide a clean public API.
pub use error::EventsError;
pub use frames::{ComparisonFrame, CursorFrame, HeatmapFrame, PlaybackFrame, StatisticsFrame};
pub use messages::{ClientCommand, LogLevel, LogMessage, WsMessage};
