//! # Stockscope Core Types
//!
//! Layer 0 crate: the shared vocabulary of every other crate in the workspace.
//! It holds tickers, date ranges, single-ticker price series and the
//! date-indexed price table, with no knowledge of providers or rendering.

pub mod enums;
pub mod error;
pub mod structs;
pub mod table;

// Re-export the core types to provide a clean public API.
pub use enums::{PlaybackState, Slot};
pub use error::CoreError;
pub use structs::{DateRange, PriceSeries, Ticker};
pub use table::PriceTable;
