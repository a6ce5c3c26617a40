use crate::heatmap::HeatmapSession;
use events::WsMessage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Drives the heatmap animation.
///
/// A single background task ticks on a fixed period. Each tick takes the
/// session lock, so a tick never overlaps a seek, a toggle or another tick,
/// and advances the cursor only while the session is playing.
pub struct Animator {
    session: Arc<Mutex<HeatmapSession>>,
    tx: broadcast::Sender<WsMessage>,
    period: Duration,
}

impl Animator {
    pub fn new(
        session: Arc<Mutex<HeatmapSession>>,
        tx: broadcast::Sender<WsMessage>,
        period: Duration,
    ) -> Self {
        Self {
            session,
            tx,
            period,
        }
    }

    /// Runs one tick: advances and publishes if playing. Returns whether a
    /// frame was published.
    pub async fn tick(&self) -> bool {
        let mut session = self.session.lock().await;
        let Some(frame) = session.tick() else {
            return false;
        };
        // No subscribers is fine; the frame is still the session's current one.
        if self.tx.send(WsMessage::HeatmapFrame((*frame).clone())).is_err() {
            tracing::trace!("No WebSocket subscribers for heatmap frame.");
        }
        true
    }

    pub async fn run(self) {
        tracing::info!(period_ms = self.period.as_millis() as u64, "Starting heatmap animator.");
        let mut timer = interval(self.period);
        // A slow recompute must not cause a burst of catch-up ticks.
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; skip it so play starts one period later.
        timer.tick().await;

        loop {
            timer.tick().await;
            self.tick().await;
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::WindowParams;
    use chrono::NaiveDate;
    use core_types::{PriceSeries, PriceTable, Ticker};

    fn session() -> Arc<Mutex<HeatmapSession>> {
        let d = |day| NaiveDate::from_ymd_opt(2017, 8, day).unwrap();
        let table = PriceTable::from_series(vec![
            PriceSeries::new(Ticker::new("AMZN").unwrap(), vec![(d(1), 1.0), (d(2), 2.0), (d(3), 4.0)]).unwrap(),
            PriceSeries::new(Ticker::new("NFLX").unwrap(), vec![(d(1), 3.0), (d(2), 2.0), (d(3), 3.0)]).unwrap(),
        ])
        .unwrap();
        let params = WindowParams {
            window_days: 30,
            step_days: 1,
        };
        Arc::new(Mutex::new(HeatmapSession::new(table, params).unwrap()))
    }

    #[tokio::test]
    async fn ticks_publish_only_while_playing() {
        let session = session();
        let (tx, mut rx) = broadcast::channel(8);
        let animator = Animator::new(Arc::clone(&session), tx, Duration::from_millis(10));

        assert!(!animator.tick().await);
        assert!(rx.try_recv().is_err());

        session.lock().await.play();
        assert!(animator.tick().await);
        match rx.try_recv().unwrap() {
            WsMessage::HeatmapFrame(frame) => assert_eq!(frame.cursor.index, 1),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_task_advances_on_each_period() {
        let session = session();
        session.lock().await.play();
        let (tx, mut rx) = broadcast::channel(8);
        let handle = Animator::new(Arc::clone(&session), tx, Duration::from_millis(1000)).spawn();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        handle.abort();

        let index = |m: WsMessage| match m {
            WsMessage::HeatmapFrame(frame) => frame.cursor.index,
            _ => usize::MAX,
        };
        assert_eq!(index(first), 1);
        assert_eq!(index(second), 2);
    }
}
