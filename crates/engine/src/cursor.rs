use crate::error::EngineError;
use chrono::NaiveDate;
use core_types::PlaybackState;

/// The slider of the heatmap dashboard: an index over the trading dates of
/// the price table, plus the Play/Pause state of its animation.
///
/// Index `i` always maps to the `i`-th trading date, so the positions are
/// fixed once the table is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceCursor {
    dates: Vec<NaiveDate>,
    index: usize,
    state: PlaybackState,
}

impl SequenceCursor {
    /// Starts at the first date, stopped.
    pub fn new(dates: Vec<NaiveDate>) -> Result<Self, EngineError> {
        if dates.is_empty() {
            return Err(EngineError::EmptyTable);
        }
        Ok(Self {
            dates,
            index: 0,
            state: PlaybackState::Stopped,
        })
    }

    /// Every `(index, date)` pair the slider can take, in order.
    pub fn positions(&self) -> impl Iterator<Item = (usize, NaiveDate)> + '_ {
        self.dates.iter().copied().enumerate()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_index(&self) -> usize {
        0
    }

    pub fn last_index(&self) -> usize {
        self.dates.len() - 1
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The window start date at the current index.
    pub fn date(&self) -> NaiveDate {
        self.dates[self.index]
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        self.state = PlaybackState::Stopped;
    }

    pub fn toggle(&mut self) -> PlaybackState {
        self.state = self.state.toggled();
        self.state
    }

    /// `"Play"` while stopped, `"Pause"` while playing.
    pub fn label(&self) -> &'static str {
        self.state.button_label()
    }

    /// Moves one position forward, wrapping from the last index to the first.
    /// Works in either state; the animator only calls it while playing.
    pub fn advance(&mut self) -> (usize, NaiveDate) {
        self.index = if self.index >= self.last_index() {
            self.first_index()
        } else {
            self.index + 1
        };
        (self.index, self.date())
    }

    /// Jumps to `index`, e.g. when the slider is dragged. Playback state is kept.
    pub fn seek(&mut self, index: usize) -> Result<(usize, NaiveDate), EngineError> {
        if index >= self.dates.len() {
            return Err(EngineError::CursorOutOfRange {
                index,
                len: self.dates.len(),
            });
        }
        self.index = index;
        Ok((self.index, self.date()))
    }
}
