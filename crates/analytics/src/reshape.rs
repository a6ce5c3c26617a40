use crate::correlation::CorrelationMatrix;
use crate::error::AnalyticsError;
use core_types::Ticker;
use serde::Serialize;

/// The correlation matrix flattened into three parallel columns, one entry per
/// cell, for the heatmap renderer.
///
/// Cells are ordered row-major over the declared ticker order: the outer loop
/// walks the row tickers, the inner loop the column tickers. The renderer
/// relies on this order for cell placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongForm {
    pub x: Vec<Ticker>,
    pub y: Vec<Ticker>,
    pub rate: Vec<Option<f64>>,
}

impl LongForm {
    pub fn from_matrix(matrix: &CorrelationMatrix) -> Self {
        let n = matrix.size();
        let mut x = Vec::with_capacity(n * n);
        let mut y = Vec::with_capacity(n * n);
        let mut rate = Vec::with_capacity(n * n);

        for (i, row_ticker) in matrix.tickers().iter().enumerate() {
            for (j, col_ticker) in matrix.tickers().iter().enumerate() {
                x.push(row_ticker.clone());
                y.push(col_ticker.clone());
                rate.push(matrix.get(i, j));
            }
        }

        Self { x, y, rate }
    }

    pub fn len(&self) -> usize {
        self.rate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rate.is_empty()
    }

    /// Regroups the cells by row label back into a square matrix.
    pub fn to_matrix(&self) -> Result<CorrelationMatrix, AnalyticsError> {
        if self.x.len() != self.rate.len() || self.y.len() != self.rate.len() {
            return Err(AnalyticsError::MalformedLongForm(
                "columns have different lengths".to_string(),
            ));
        }

        let mut tickers: Vec<Ticker> = Vec::new();
        for ticker in &self.x {
            if !tickers.contains(ticker) {
                tickers.push(ticker.clone());
            }
        }
        let n = tickers.len();
        if n * n != self.len() {
            return Err(AnalyticsError::MalformedLongForm(format!(
                "{} cells cannot form a square over {n} tickers",
                self.len()
            )));
        }

        let mut values = vec![vec![None; n]; n];
        let mut filled = vec![vec![false; n]; n];
        for ((row, col), value) in self.x.iter().zip(self.y.iter()).zip(self.rate.iter()) {
            let i = index_of(&tickers, row)?;
            let j = index_of(&tickers, col)?;
            if filled[i][j] {
                return Err(AnalyticsError::MalformedLongForm(format!(
                    "cell ({row}, {col}) appears twice"
                )));
            }
            filled[i][j] = true;
            values[i][j] = *value;
        }

        CorrelationMatrix::new(tickers, values)
    }
}

fn index_of(tickers: &[Ticker], ticker: &Ticker) -> Result<usize, AnalyticsError> {
    tickers
        .iter()
        .position(|t| t == ticker)
        .ok_or_else(|| AnalyticsError::MalformedLongForm(format!("unknown label {ticker}")))
}
