use serde::Serialize;

/// The diverging red-yellow-green palette of the heatmap, from most negative
/// to most positive correlation.
pub const DIVERGING: [&str; 11] = [
    "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#d9ef8b", "#a6d96a",
    "#66bd63", "#1a9850", "#006837",
];

/// Colour used for undefined correlations.
pub const NAN_COLOR: &str = "gray";

/// Maps a value in `[low, high]` onto a palette of equal-width bins.
#[derive(Debug, Clone, Serialize)]
pub struct ColorMapper {
    pub palette: &'static [&'static str],
    pub low: f64,
    pub high: f64,
    pub nan_color: &'static str,
}

impl ColorMapper {
    /// The heatmap mapper: the diverging palette over `[-100, 100]`.
    pub fn diverging() -> Self {
        Self {
            palette: &DIVERGING,
            low: -100.0,
            high: 100.0,
            nan_color: NAN_COLOR,
        }
    }

    /// Values below `low` take the first colour, values at or above `high` the last.
    pub fn color_for(&self, value: Option<f64>) -> &'static str {
        let Some(value) = value.filter(|v| v.is_finite()) else {
            return self.nan_color;
        };
        let last = self.palette.len() - 1;
        if value <= self.low {
            return self.palette[0];
        }
        if value >= self.high {
            return self.palette[last];
        }
        let fraction = (value - self.low) / (self.high - self.low);
        let bin = (fraction * self.palette.len() as f64).floor() as usize;
        self.palette[bin.min(last)]
    }
}
