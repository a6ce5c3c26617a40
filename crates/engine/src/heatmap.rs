use crate::cursor::SequenceCursor;
use crate::error::EngineError;
use analytics::{ColorMapper, HeatmapView, WindowParams, heatmap_view};
use api_client::{PriceProvider, load_price_table};
use configuration::HeatmapConfig;
use core_types::{PlaybackState, PriceTable};
use events::{CursorFrame, HeatmapFrame, PlaybackFrame};
use std::sync::Arc;

/// State of the rolling correlation dashboard.
///
/// Owns the price table loaded at startup. Every cursor move recomputes a
/// complete view and frame and swaps them in; readers holding the previous
/// `Arc` keep a consistent snapshot.
pub struct HeatmapSession {
    table: PriceTable,
    params: WindowParams,
    cursor: SequenceCursor,
    mapper: ColorMapper,
    view: Arc<HeatmapView>,
    frame: Arc<HeatmapFrame>,
}

impl HeatmapSession {
    /// Builds the session over an already loaded table, positioned at the
    /// first trading date and stopped.
    pub fn new(table: PriceTable, params: WindowParams) -> Result<Self, EngineError> {
        let cursor = SequenceCursor::new(table.dates().to_vec())?;
        let mapper = ColorMapper::diverging();
        let view = Arc::new(heatmap_view(&table, cursor.date(), params));
        let frame = Arc::new(build_frame(&view, &cursor, &mapper));

        Ok(Self {
            table,
            params,
            cursor,
            mapper,
            view,
            frame,
        })
    }

    /// Loads the configured universe from `provider` and builds the session.
    pub async fn load(provider: &dyn PriceProvider, config: &HeatmapConfig) -> Result<Self, EngineError> {
        let table = load_price_table(provider, &config.tickers, config.range()?).await?;
        let params = WindowParams {
            window_days: config.window_days,
            step_days: config.step_days,
        };
        let session = Self::new(table, params)?;
        tracing::info!(positions = session.cursor.len(), "Heatmap session ready.");
        Ok(session)
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    pub fn cursor(&self) -> &SequenceCursor {
        &self.cursor
    }

    pub fn view(&self) -> Arc<HeatmapView> {
        Arc::clone(&self.view)
    }

    pub fn frame(&self) -> Arc<HeatmapFrame> {
        Arc::clone(&self.frame)
    }

    /// Moves the slider to `index` and recomputes the window.
    pub fn seek(&mut self, index: usize) -> Result<Arc<HeatmapFrame>, EngineError> {
        let (index, date) = self.cursor.seek(index)?;
        tracing::debug!(index, %date, "Cursor moved.");
        self.recompute();
        Ok(self.frame())
    }

    /// Advances one position if playing. Returns the new frame, or `None`
    /// when stopped.
    pub fn tick(&mut self) -> Option<Arc<HeatmapFrame>> {
        if !self.cursor.is_playing() {
            return None;
        }
        let (index, date) = self.cursor.advance();
        tracing::trace!(index, %date, "Animation tick.");
        self.recompute();
        Some(self.frame())
    }

    pub fn toggle(&mut self) -> Arc<HeatmapFrame> {
        let state = self.cursor.toggle();
        tracing::info!(?state, "Playback toggled.");
        self.republish_playback(state)
    }

    pub fn play(&mut self) -> Arc<HeatmapFrame> {
        self.cursor.play();
        self.republish_playback(self.cursor.state())
    }

    pub fn pause(&mut self) -> Arc<HeatmapFrame> {
        self.cursor.pause();
        self.republish_playback(self.cursor.state())
    }

    fn recompute(&mut self) {
        let view = Arc::new(heatmap_view(&self.table, self.cursor.date(), self.params));
        self.frame = Arc::new(build_frame(&view, &self.cursor, &self.mapper));
        self.view = view;
    }

    // The window is unchanged, only the button needs redrawing.
    fn republish_playback(&mut self, state: PlaybackState) -> Arc<HeatmapFrame> {
        let mut frame = (*self.frame).clone();
        frame.playback = PlaybackFrame::from(state);
        self.frame = Arc::new(frame);
        self.frame()
    }
}

pub fn heatmap_title(view: &HeatmapView) -> String {
    let (start, end) = view.bounds();
    format!(
        "Stocks Correlation Heatmap:   Step Size: {}    Window Size: {}    Start Date: {}    End Date: {}",
        view.params.step_days, view.params.window_days, start, end
    )
}

fn build_frame(view: &HeatmapView, cursor: &SequenceCursor, mapper: &ColorMapper) -> HeatmapFrame {
    let (start_date, end_date) = view.bounds();
    HeatmapFrame {
        title: heatmap_title(view),
        tickers: view.matrix.tickers().to_vec(),
        x: view.long_form.x.clone(),
        y: view.long_form.y.clone(),
        rate: view.long_form.rate.clone(),
        color: view
            .long_form
            .rate
            .iter()
            .map(|rate| mapper.color_for(*rate).to_string())
            .collect(),
        start_date,
        end_date,
        window_days: view.params.window_days,
        step_days: view.params.step_days,
        cursor: CursorFrame {
            index: cursor.index(),
            date: cursor.date(),
            first_index: cursor.first_index(),
            last_index: cursor.last_index(),
        },
        playback: PlaybackFrame::from(cursor.state()),
    }
}
