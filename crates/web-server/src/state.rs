use crate::error::AppError;
use analytics::SummaryReport;
use core_types::{Slot, Ticker};
use engine::{ComparatorSession, HeatmapSession};
use events::{ClientCommand, ComparisonFrame, HeatmapFrame, WsMessage};
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};

/// Capacity of the frame broadcast channel. Slow clients skip frames
/// instead of holding back the others.
const BROADCAST_CAPACITY: usize = 64;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub heatmap: Arc<Mutex<HeatmapSession>>,
    pub comparator: Arc<Mutex<ComparatorSession>>,
    pub tx: broadcast::Sender<WsMessage>,
}

impl AppState {
    pub fn new(heatmap: HeatmapSession, comparator: ComparatorSession) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            heatmap: Arc::new(Mutex::new(heatmap)),
            comparator: Arc::new(Mutex::new(comparator)),
            tx,
        }
    }

    /// Sends a message to every connected WebSocket client.
    pub fn publish(&self, message: WsMessage) {
        let receivers = self.tx.send(message).unwrap_or(0);
        tracing::trace!(receivers, "Message published.");
    }

    pub async fn heatmap_frame(&self) -> Arc<HeatmapFrame> {
        self.heatmap.lock().await.frame()
    }

    pub async fn comparison_frame(&self) -> Arc<ComparisonFrame> {
        self.comparator.lock().await.frame()
    }

    // Changes are published before the session guard drops, so broadcasts
    // go out in the order the changes were applied.
    pub async fn seek(&self, index: usize) -> Result<Arc<HeatmapFrame>, AppError> {
        let mut session = self.heatmap.lock().await;
        let frame = session.seek(index)?;
        self.publish(WsMessage::HeatmapFrame((*frame).clone()));
        Ok(frame)
    }

    pub async fn toggle_playback(&self) -> Arc<HeatmapFrame> {
        let mut session = self.heatmap.lock().await;
        let frame = session.toggle();
        self.publish(WsMessage::HeatmapFrame((*frame).clone()));
        frame
    }

    pub async fn select(&self, slot: Slot, ticker: Ticker) -> Result<Arc<ComparisonFrame>, AppError> {
        let mut session = self.comparator.lock().await;
        let frame = session.select(slot, ticker)?;
        self.publish(WsMessage::ComparisonFrame((*frame).clone()));
        Ok(frame)
    }

    pub async fn statistics(&self, indices: Option<&[usize]>) -> Result<SummaryReport, AppError> {
        Ok(self.comparator.lock().await.statistics(indices)?)
    }

    /// Applies a WebSocket command.
    ///
    /// Changes to a shared session are broadcast to every client. The
    /// returned message, if any, is meant only for the sender.
    pub async fn handle_command(&self, command: ClientCommand) -> Result<Option<WsMessage>, AppError> {
        match command {
            ClientCommand::SelectTicker { slot, ticker } => {
                self.select(slot, ticker).await?;
                Ok(None)
            }
            ClientCommand::Seek { index } => {
                self.seek(index).await?;
                Ok(None)
            }
            ClientCommand::TogglePlayback => {
                self.toggle_playback().await;
                Ok(None)
            }
            ClientCommand::Brush { indices } => {
                let frame = self
                    .comparator
                    .lock()
                    .await
                    .statistics_frame(indices.as_deref())?;
                Ok(Some(WsMessage::Statistics(frame)))
            }
        }
    }
}
