use comfy_table::presets::NOTHING;
use comfy_table::{CellAlignment, Table};
use serde::{Deserialize, Serialize};

/// Descriptive statistics of one numeric column.
///
/// Every field except `count` is `None` when it is undefined for the sample:
/// all of them for an empty column, and `std` for a single observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    pub fn describe(name: &str, values: &[f64]) -> Self {
        let count = values.len();
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
        let std = mean.filter(|_| count > 1).map(|m| {
            let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
            (ss / (count - 1) as f64).sqrt()
        });

        Self {
            name: name.to_string(),
            count,
            mean,
            std,
            min: sorted.first().copied(),
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.50),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }

    fn stats(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("count", Some(self.count as f64)),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.q50),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Linear interpolation between the closest ranks of a sorted sample.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Summary statistics for a set of columns, rendered as a preformatted table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub columns: Vec<ColumnSummary>,
}

impl SummaryReport {
    pub fn describe<'a>(columns: impl IntoIterator<Item = (&'a str, &'a [f64])>) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|(name, values)| ColumnSummary::describe(name, values))
                .collect(),
        }
    }

    /// Renders the report with one row per statistic and one column per
    /// input column. Undefined values are shown as `NaN`.
    pub fn render(&self) -> String {
        let mut table = Table::new();
        table.load_preset(NOTHING);

        let mut header = vec![String::new()];
        header.extend(self.columns.iter().map(|c| c.name.clone()));
        table.set_header(header);

        let per_column: Vec<_> = self.columns.iter().map(ColumnSummary::stats).collect();
        for (row, label) in ["count", "mean", "std", "min", "25%", "50%", "75%", "max"]
            .iter()
            .enumerate()
        {
            let mut cells = vec![label.to_string()];
            cells.extend(per_column.iter().map(|stats| format_value(stats[row].1)));
            table.add_row(cells);
        }

        for index in 1..=self.columns.len() {
            if let Some(column) = table.column_mut(index) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }

        table.to_string()
    }
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.6}"),
        _ => "NaN".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn describe_matches_sample_statistics() {
        let summary = ColumnSummary::describe("AAPL", &[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(summary.count, 4);
        assert!(close(summary.mean, 2.5));
        // Sample variance of 1..4 is 5/3.
        assert!(close(summary.std, (5.0f64 / 3.0).sqrt()));
        assert!(close(summary.min, 1.0));
        assert!(close(summary.q25, 1.75));
        assert!(close(summary.q50, 2.5));
        assert!(close(summary.q75, 3.25));
        assert!(close(summary.max, 4.0));
    }

    #[test]
    fn empty_column_is_all_undefined() {
        let summary = ColumnSummary::describe("AAPL", &[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.std, None);
        assert_eq!(summary.min, None);
        assert_eq!(summary.q50, None);
        assert_eq!(summary.max, None);
    }

    #[test]
    fn single_observation_has_no_std() {
        let summary = ColumnSummary::describe("AAPL", &[7.0]);
        assert_eq!(summary.std, None);
        assert!(close(summary.q75, 7.0));
    }

    #[test]
    fn render_lists_every_statistic_and_column() {
        let report = SummaryReport::describe([("AMZN", &[1.0, 2.0][..]), ("GOOG", &[][..])]);
        let text = report.render();
        for label in ["count", "mean", "std", "min", "25%", "50%", "75%", "max", "AMZN", "GOOG"] {
            assert!(text.contains(label), "missing {label} in\n{text}");
        }
        assert!(text.contains("1.500000"));
        assert!(text.contains("NaN"));
    }
}
