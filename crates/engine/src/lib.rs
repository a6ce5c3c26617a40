//! # Stockscope Engine
//!
//! The stateful half of the application: one session object per dashboard,
//! and the background task that animates the heatmap.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Orchestration:** sessions load their price table through an
//!   `api_client::PriceProvider` once, then only run `analytics` pipelines.
//! - **Recompute and Swap:** every event builds a complete new view and frame
//!   and replaces the previous `Arc`. Nothing is patched in place.
//! - **Explicit State:** all mutable state lives in a session. Callers share a
//!   session behind a `tokio::sync::Mutex`; holding the lock serializes
//!   widget events with animation ticks.

pub mod animator;
pub mod comparator;
pub mod cursor;
pub mod error;
pub mod heatmap;
pub mod selection;

pub use animator::Animator;
pub use comparator::{ComparatorSession, comparison_title};
pub use cursor::SequenceCursor;
pub use error::EngineError;
pub use heatmap::{HeatmapSession, heatmap_title};
pub use selection::SelectionState;
