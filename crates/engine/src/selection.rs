use crate::error::EngineError;
use core_types::{Slot, Ticker};

/// The two dropdowns of the comparator.
///
/// `first` and `second` are always distinct members of the universe; each
/// dropdown offers the universe minus the other dropdown's value.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    universe: Vec<Ticker>,
    first: Ticker,
    second: Ticker,
}

impl SelectionState {
    pub fn new(universe: Vec<Ticker>, first: Ticker, second: Ticker) -> Result<Self, EngineError> {
        for ticker in [&first, &second] {
            if !universe.contains(ticker) {
                return Err(EngineError::UnknownTicker(ticker.to_string()));
            }
        }
        if first == second {
            return Err(EngineError::SelectionConflict {
                slot: Slot::Second,
                ticker: second.to_string(),
            });
        }
        Ok(Self {
            universe,
            first,
            second,
        })
    }

    pub fn first(&self) -> &Ticker {
        &self.first
    }

    pub fn second(&self) -> &Ticker {
        &self.second
    }

    pub fn get(&self, slot: Slot) -> &Ticker {
        match slot {
            Slot::First => &self.first,
            Slot::Second => &self.second,
        }
    }

    /// The dropdown contents for `slot`: the universe without the partner's
    /// current value.
    pub fn options(&self, slot: Slot) -> Vec<Ticker> {
        let excluded = self.get(slot.partner());
        self.universe
            .iter()
            .filter(|t| *t != excluded)
            .cloned()
            .collect()
    }

    /// Sets one dropdown. Returns `true` if the selection changed.
    ///
    /// A ticker outside the universe, or equal to the other dropdown's value,
    /// is rejected and leaves the state untouched.
    pub fn select(&mut self, slot: Slot, ticker: Ticker) -> Result<bool, EngineError> {
        if !self.universe.contains(&ticker) {
            return Err(EngineError::UnknownTicker(ticker.to_string()));
        }
        if *self.get(slot.partner()) == ticker {
            return Err(EngineError::SelectionConflict {
                slot,
                ticker: ticker.to_string(),
            });
        }
        let current = match slot {
            Slot::First => &mut self.first,
            Slot::Second => &mut self.second,
        };
        if *current == ticker {
            return Ok(false);
        }
        *current = ticker;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Ticker {
        Ticker::new(s).unwrap()
    }

    fn universe() -> Vec<Ticker> {
        ["GOOG", "AMZN", "T", "TMUS", "VZ"].iter().map(|s| t(s)).collect()
    }

    #[test]
    fn options_exclude_the_partner() {
        let state = SelectionState::new(universe(), t("AMZN"), t("GOOG")).unwrap();
        assert_eq!(state.options(Slot::First), vec![t("AMZN"), t("T"), t("TMUS"), t("VZ")]);
        assert_eq!(state.options(Slot::Second), vec![t("GOOG"), t("T"), t("TMUS"), t("VZ")]);
    }

    #[test]
    fn selecting_updates_the_partner_options() {
        let mut state = SelectionState::new(universe(), t("AMZN"), t("GOOG")).unwrap();
        assert!(state.select(Slot::Second, t("VZ")).unwrap());
        assert!(!state.options(Slot::First).contains(&t("VZ")));
        assert!(state.options(Slot::First).contains(&t("GOOG")));
        assert!(!state.select(Slot::Second, t("VZ")).unwrap());
    }

    #[test]
    fn selecting_the_partner_value_is_rejected() {
        let mut state = SelectionState::new(universe(), t("AMZN"), t("GOOG")).unwrap();
        let err = state.select(Slot::First, t("GOOG")).unwrap_err();
        assert!(matches!(err, EngineError::SelectionConflict { slot: Slot::First, .. }));
        assert_eq!(state.first(), &t("AMZN"));
    }

    #[test]
    fn construction_validates_tickers() {
        assert!(matches!(
            SelectionState::new(universe(), t("AMZN"), t("AMZN")),
            Err(EngineError::SelectionConflict { .. })
        ));
        assert!(matches!(
            SelectionState::new(universe(), t("AMZN"), t("S")),
            Err(EngineError::UnknownTicker(symbol)) if symbol == "S"
        ));
    }
}
