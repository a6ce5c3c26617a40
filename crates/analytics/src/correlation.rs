use crate::error::AnalyticsError;
use crate::returns::ReturnsTable;
use core_types::Ticker;
use serde::Serialize;

/// Correlation values are percentages: Pearson's r scaled by this factor.
pub const SCALE: f64 = 100.0;

/// A square, symmetric matrix of percentage-scaled Pearson correlations.
///
/// `None` marks an undefined correlation: a ticker with zero variance in the
/// window, or a pair with fewer than two overlapping returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    tickers: Vec<Ticker>,
    values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Builds a matrix from raw values, checking that it is square.
    pub fn new(tickers: Vec<Ticker>, values: Vec<Vec<Option<f64>>>) -> Result<Self, AnalyticsError> {
        let n = tickers.len();
        if values.len() != n || values.iter().any(|row| row.len() != n) {
            return Err(AnalyticsError::InvalidMatrix(format!(
                "expected {n}x{n} values for {n} tickers"
            )));
        }
        Ok(Self { tickers, values })
    }

    /// Computes the correlation of every ordered pair of columns over the
    /// rows where both returns are defined.
    pub fn from_returns(returns: &ReturnsTable) -> Self {
        let tickers = returns.tickers().to_vec();
        let columns: Vec<&[Option<f64>]> = returns.columns().map(|(_, c)| c).collect();
        let n = columns.len();

        let mut values = vec![vec![None; n]; n];
        for i in 0..n {
            values[i][i] = has_variance(columns[i]).then_some(SCALE);
            for j in (i + 1)..n {
                let r = pearson(columns[i], columns[j]).map(|r| (r * SCALE).clamp(-SCALE, SCALE));
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Self { tickers, values }
    }

    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn size(&self) -> usize {
        self.tickers.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }
}

/// Pearson's r over the pairwise-complete observations of `x` and `y`.
///
/// Returns `None` when fewer than two complete pairs exist or either side is
/// constant.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip();

    if xs.len() < 2 || is_constant(&xs) || is_constant(&ys) {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in xs.iter().zip(ys.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    Some(cov / denominator)
}

fn has_variance(column: &[Option<f64>]) -> bool {
    let values: Vec<f64> = column.iter().flatten().copied().collect();
    values.len() >= 2 && !is_constant(&values)
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}
