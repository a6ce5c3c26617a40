use chrono::NaiveDate;
use core_types::{PlaybackState, Ticker};
use serde::{Deserialize, Serialize};

/// Position of the date slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorFrame {
    pub index: usize,
    pub date: NaiveDate,
    pub first_index: usize,
    pub last_index: usize,
}

/// State of the Play/Pause button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackFrame {
    pub state: PlaybackState,
    pub label: String,
}

impl From<PlaybackState> for PlaybackFrame {
    fn from(state: PlaybackState) -> Self {
        Self {
            state,
            label: state.button_label().to_string(),
        }
    }
}

/// Everything needed to draw the correlation heatmap for one window.
///
/// `x`, `y`, `rate` and `color` are parallel, one entry per matrix cell in
/// row-major order. An undefined correlation is `null` in `rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapFrame {
    pub title: String,
    pub tickers: Vec<Ticker>,
    pub x: Vec<Ticker>,
    pub y: Vec<Ticker>,
    pub rate: Vec<Option<f64>>,
    pub color: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub window_days: u32,
    pub step_days: u32,
    pub cursor: CursorFrame,
    pub playback: PlaybackFrame,
}

/// The pairwise comparator: the joined live table, dropdown contents and
/// the statistics of the whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonFrame {
    pub title: String,
    pub first: Ticker,
    pub second: Ticker,
    pub options_first: Vec<Ticker>,
    pub options_second: Vec<Ticker>,
    /// Labels of the four value columns, in order.
    pub columns: Vec<String>,
    pub dates: Vec<NaiveDate>,
    pub first_prices: Vec<f64>,
    pub second_prices: Vec<f64>,
    pub first_returns: Vec<f64>,
    pub second_returns: Vec<f64>,
    pub statistics: String,
}

/// The statistics text for a brushed selection of comparator rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsFrame {
    pub first: Ticker,
    pub second: Ticker,
    /// Number of rows the statistics were computed over.
    pub rows: usize,
    pub text: String,
}
