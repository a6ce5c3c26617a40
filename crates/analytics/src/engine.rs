use crate::correlation::CorrelationMatrix;
use crate::error::AnalyticsError;
use crate::pairwise::PairTable;
use crate::report::SummaryReport;
use crate::reshape::LongForm;
use crate::returns::returns_table;
use crate::window::{WindowParams, WindowSlice, slice_window};
use chrono::NaiveDate;
use core_types::PriceTable;

/// Every view derived from one window of the price table.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapView {
    pub params: WindowParams,
    pub slice: WindowSlice,
    pub matrix: CorrelationMatrix,
    pub long_form: LongForm,
}

impl HeatmapView {
    /// Start and end dates for the title.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        self.slice.display_bounds()
    }
}

/// The rolling correlation pipeline for one window start:
/// slice, percentage returns, correlation matrix, long-form reshape.
pub fn heatmap_view(table: &PriceTable, start: NaiveDate, params: WindowParams) -> HeatmapView {
    let slice = slice_window(table, start, params.window_days);
    let returns = returns_table(&slice.table);
    let matrix = CorrelationMatrix::from_returns(&returns);
    let long_form = LongForm::from_matrix(&matrix);

    HeatmapView {
        params,
        slice,
        matrix,
        long_form,
    }
}

/// Summary statistics over the four columns of `pair`.
///
/// `rows` selects a subset of row positions (e.g. a brush selection on the
/// chart); `None` uses every row. An empty subset produces an all-undefined
/// report rather than an error.
pub fn pair_statistics(pair: &PairTable, rows: Option<&[usize]>) -> Result<SummaryReport, AnalyticsError> {
    let names = pair.column_names();
    let columns = pair.columns();

    let Some(rows) = rows else {
        return Ok(SummaryReport::describe(
            names.iter().map(String::as_str).zip(columns),
        ));
    };

    if let Some(&index) = rows.iter().find(|&&i| i >= pair.len()) {
        return Err(AnalyticsError::RowOutOfRange {
            index,
            len: pair.len(),
        });
    }

    let subsets: Vec<Vec<f64>> = columns
        .iter()
        .map(|column| rows.iter().map(|&i| column[i]).collect())
        .collect();

    Ok(SummaryReport::describe(
        names
            .iter()
            .map(String::as_str)
            .zip(subsets.iter().map(Vec::as_slice)),
    ))
}
