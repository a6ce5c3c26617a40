use chrono::{Days, NaiveDate};
use core_types::PriceTable;
use serde::{Deserialize, Serialize};

/// Shape of the rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowParams {
    /// Length of the window in calendar days.
    pub window_days: u32,
    /// Distance between consecutive window starts. Displayed, not used for slicing.
    pub step_days: u32,
}

/// The rows of a price table that fall inside one window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSlice {
    /// First calendar day of the requested window.
    pub requested_start: NaiveDate,
    /// Last calendar day of the requested window (inclusive).
    pub requested_end: NaiveDate,
    /// First and last trading dates actually present, `None` for an empty slice.
    pub resolved: Option<(NaiveDate, NaiveDate)>,
    pub table: PriceTable,
}

impl WindowSlice {
    /// The bounds to show to the user: the resolved dates when the slice has
    /// rows, the requested ones otherwise.
    pub fn display_bounds(&self) -> (NaiveDate, NaiveDate) {
        self.resolved
            .unwrap_or((self.requested_start, self.requested_end))
    }
}

/// Restricts `table` to the calendar days `[start, start + window_days)`.
///
/// A window that runs past the end of the data simply yields fewer rows.
pub fn slice_window(table: &PriceTable, start: NaiveDate, window_days: u32) -> WindowSlice {
    let span = u64::from(window_days.saturating_sub(1));
    let requested_end = start.checked_add_days(Days::new(span)).unwrap_or(NaiveDate::MAX);

    let dates = table.dates();
    let lo = dates.partition_point(|d| *d < start);
    let hi = dates.partition_point(|d| *d <= requested_end);
    let sliced = table.slice_rows(lo..hi);

    let resolved = match (sliced.dates().first(), sliced.dates().last()) {
        (Some(first), Some(last)) => Some((*first, *last)),
        _ => None,
    };

    tracing::trace!(%start, %requested_end, rows = sliced.len(), "Window sliced.");

    WindowSlice {
        requested_start: start,
        requested_end,
        resolved,
        table: sliced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{PriceSeries, Ticker};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Weekday-only prices from 2017-01-02 for `days` calendar days.
    fn business_day_table(days: u64) -> PriceTable {
        let start = d(2017, 1, 2);
        let points = (0..days)
            .filter_map(|i| start.checked_add_days(Days::new(i)))
            .filter(|date| chrono::Datelike::weekday(date).number_from_monday() <= 5)
            .enumerate()
            .map(|(i, date)| (date, 100.0 + i as f64))
            .collect();
        let series = PriceSeries::new(Ticker::new("AAPL").unwrap(), points).unwrap();
        PriceTable::from_series(vec![series]).unwrap()
    }

    #[test]
    fn window_covers_calendar_days_inclusive_of_start() {
        let table = business_day_table(90);
        let slice = slice_window(&table, d(2017, 1, 2), 30);

        assert_eq!(slice.requested_end, d(2017, 1, 31));
        // 2017-01-02 .. 2017-01-31 holds 22 weekdays.
        assert_eq!(slice.table.len(), 22);
        assert_eq!(slice.resolved, Some((d(2017, 1, 2), d(2017, 1, 31))));
    }

    #[test]
    fn window_starting_on_weekend_resolves_to_next_trading_day() {
        let table = business_day_table(90);
        let slice = slice_window(&table, d(2017, 1, 7), 30);
        assert_eq!(slice.resolved.map(|r| r.0), Some(d(2017, 1, 9)));
    }

    #[test]
    fn window_at_data_end_is_not_padded() {
        let table = business_day_table(90);
        let last = *table.dates().last().unwrap();
        let slice = slice_window(&table, last, 30);

        assert_eq!(slice.table.len(), 1);
        assert!(slice.table.len() < 30);
        assert_eq!(slice.resolved, Some((last, last)));
    }

    #[test]
    fn window_past_data_is_empty_and_shows_requested_bounds() {
        let table = business_day_table(10);
        let slice = slice_window(&table, d(2018, 1, 1), 30);
        assert!(slice.table.is_empty());
        assert_eq!(slice.resolved, None);
        assert_eq!(slice.display_bounds(), (d(2018, 1, 1), d(2018, 1, 30)));
    }
}
