use crate::error::EngineError;
use crate::selection::SelectionState;
use analytics::{PairTable, SummaryReport, align_pair, pair_statistics};
use api_client::{PriceProvider, load_price_table};
use configuration::ComparatorConfig;
use core_types::{PriceTable, Slot, Ticker};
use events::{ComparisonFrame, StatisticsFrame};
use std::sync::Arc;

/// State of the pairwise comparator dashboard.
pub struct ComparatorSession {
    table: PriceTable,
    selection: SelectionState,
    pair: Arc<PairTable>,
    frame: Arc<ComparisonFrame>,
}

impl ComparatorSession {
    pub fn new(table: PriceTable, first: Ticker, second: Ticker) -> Result<Self, EngineError> {
        let selection = SelectionState::new(table.tickers().to_vec(), first, second)?;
        let pair = Arc::new(align_pair(&table, selection.first(), selection.second())?);
        let frame = Arc::new(build_frame(&selection, &pair)?);

        Ok(Self {
            table,
            selection,
            pair,
            frame,
        })
    }

    pub async fn load(provider: &dyn PriceProvider, config: &ComparatorConfig) -> Result<Self, EngineError> {
        let table = load_price_table(provider, &config.tickers, config.range()?).await?;
        let session = Self::new(
            table,
            config.default_first.clone(),
            config.default_second.clone(),
        )?;
        tracing::info!(
            first = %session.selection.first(),
            second = %session.selection.second(),
            rows = session.pair.len(),
            "Comparator session ready."
        );
        Ok(session)
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn pair(&self) -> Arc<PairTable> {
        Arc::clone(&self.pair)
    }

    pub fn frame(&self) -> Arc<ComparisonFrame> {
        Arc::clone(&self.frame)
    }

    /// Changes one dropdown and republishes. A rejected selection leaves
    /// the current frame in place.
    pub fn select(&mut self, slot: Slot, ticker: Ticker) -> Result<Arc<ComparisonFrame>, EngineError> {
        let mut selection = self.selection.clone();
        if !selection.select(slot, ticker)? {
            return Ok(self.frame());
        }

        let pair = Arc::new(align_pair(&self.table, selection.first(), selection.second())?);
        let frame = Arc::new(build_frame(&selection, &pair)?);
        tracing::info!(first = %selection.first(), second = %selection.second(), rows = pair.len(), "Selection changed.");

        self.selection = selection;
        self.pair = pair;
        self.frame = frame;
        Ok(self.frame())
    }

    /// Statistics over the rows at `indices` of the joined table, or over
    /// all of them when `None`.
    pub fn statistics(&self, indices: Option<&[usize]>) -> Result<SummaryReport, EngineError> {
        Ok(pair_statistics(&self.pair, indices)?)
    }

    pub fn statistics_frame(&self, indices: Option<&[usize]>) -> Result<StatisticsFrame, EngineError> {
        let report = self.statistics(indices)?;
        Ok(StatisticsFrame {
            first: self.selection.first().clone(),
            second: self.selection.second().clone(),
            rows: indices.map_or(self.pair.len(), <[usize]>::len),
            text: report.render(),
        })
    }
}

pub fn comparison_title(first: &Ticker, second: &Ticker) -> String {
    format!("{first} (Green) vs. {second} (Blue)")
}

fn build_frame(selection: &SelectionState, pair: &PairTable) -> Result<ComparisonFrame, EngineError> {
    let statistics = pair_statistics(pair, None)?.render();
    Ok(ComparisonFrame {
        title: comparison_title(selection.first(), selection.second()),
        first: selection.first().clone(),
        second: selection.second().clone(),
        options_first: selection.options(Slot::First),
        options_second: selection.options(Slot::Second),
        columns: pair.column_names().to_vec(),
        dates: pair.dates.clone(),
        first_prices: pair.first_prices.clone(),
        second_prices: pair.second_prices.clone(),
        first_returns: pair.first_returns.clone(),
        second_returns: pair.second_returns.clone(),
        statistics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::InMemoryProvider;
    use chrono::NaiveDate;
    use core_types::PriceSeries;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 3, day).unwrap()
    }

    fn t(s: &str) -> Ticker {
        Ticker::new(s).unwrap()
    }

    fn provider() -> InMemoryProvider {
        let series = |symbol: &str, prices: &[f64]| {
            PriceSeries::new(
                t(symbol),
                prices.iter().enumerate().map(|(i, p)| (d(1 + i as u32), *p)).collect(),
            )
            .unwrap()
        };
        InMemoryProvider::new([
            series("GOOG", &[700.0, 705.0, 702.0, 710.0]),
            series("AMZN", &[550.0, 560.0, 555.0, 565.0]),
            series("VZ", &[50.0, 51.0, 52.0]),
        ])
    }

    fn config() -> ComparatorConfig {
        ComparatorConfig {
            tickers: vec![t("GOOG"), t("AMZN"), t("VZ")],
            default_first: t("AMZN"),
            default_second: t("GOOG"),
            start_date: d(1),
            end_date: d(31),
        }
    }

    #[tokio::test]
    async fn loads_the_default_pair() {
        let session = ComparatorSession::load(&provider(), &config()).await.unwrap();
        let frame = session.frame();

        assert_eq!(frame.title, "AMZN (Green) vs. GOOG (Blue)");
        assert_eq!(frame.options_first, vec![t("AMZN"), t("VZ")]);
        assert_eq!(frame.options_second, vec![t("GOOG"), t("VZ")]);
        assert_eq!(frame.dates.len(), 3);
        assert_eq!(frame.columns[3], "GOOG_returns");
        assert!(frame.statistics.contains("count"));
    }

    #[tokio::test]
    async fn selection_change_realigns() {
        let mut session = ComparatorSession::load(&provider(), &config()).await.unwrap();
        let frame = session.select(Slot::Second, t("VZ")).unwrap();

        assert_eq!(frame.title, "AMZN (Green) vs. VZ (Blue)");
        assert_eq!(frame.dates, vec![d(2), d(3)]);
        assert_eq!(frame.second_returns, vec![1.0, 1.0]);
        assert!(!frame.options_first.contains(&t("VZ")));
    }

    #[tokio::test]
    async fn conflicting_selection_keeps_the_frame() {
        let mut session = ComparatorSession::load(&provider(), &config()).await.unwrap();
        let before = session.frame();

        let err = session.select(Slot::First, t("GOOG")).unwrap_err();
        assert!(matches!(err, EngineError::SelectionConflict { .. }));
        assert!(Arc::ptr_eq(&before, &session.frame()));
    }

    #[tokio::test]
    async fn brushed_statistics() {
        let session = ComparatorSession::load(&provider(), &config()).await.unwrap();

        let all = session.statistics(None).unwrap();
        assert_eq!(all.columns[0].count, 3);

        let brushed = session.statistics_frame(Some(&[1])).unwrap();
        assert_eq!(brushed.rows, 1);
        assert!(brushed.text.contains("NaN"));

        let empty = session.statistics(Some(&[])).unwrap();
        assert!(empty.columns.iter().all(|c| c.mean.is_none()));

        assert!(matches!(
            session.statistics(Some(&[7])),
            Err(EngineError::Analytics(_))
        ));
    }
}
