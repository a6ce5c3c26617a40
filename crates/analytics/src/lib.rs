//! # Stockscope Analytics
//!
//! The data transformations that sit between the price provider and the
//! renderer, for both dashboards.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   providers, sessions or HTTP. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** every operation takes a table (and parameters)
//!   and returns a freshly built view. Nothing is mutated in place, so callers
//!   can recompute and swap.
//!
//! ## Public API
//!
//! - Rolling correlation: `slice_window`, `pct_change`, `returns_table`,
//!   `CorrelationMatrix`, `LongForm`, `ColorMapper`, and `heatmap_view` which
//!   chains them.
//! - Pairwise comparison: `align_pair`, `PairTable`, `SummaryReport`, and
//!   `pair_statistics`.

// Declare the modules that constitute this crate.
pub mod correlation;
pub mod engine;
pub mod error;
pub mod pairwise;
pub mod palette;
pub mod report;
pub mod reshape;
pub mod returns;
pub mod window;

// Re-export the key components to create a clean, public-facing API.
pub use correlation::CorrelationMatrix;
pub use engine::{HeatmapView, heatmap_view, pair_statistics};
pub use error::AnalyticsError;
pub use pairwise::{PairTable, align_pair};
pub use palette::ColorMapper;
pub use report::{ColumnSummary, SummaryReport};
pub use reshape::LongForm;
pub use returns::{ReturnsTable, diff, pct_change, returns_table};
pub use window::{WindowParams, WindowSlice, slice_window};
