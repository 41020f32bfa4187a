//! Frame loop
//!
//! Drives an [`App`] at the configured frame rate while draining host events
//! between frames. Frames and events never interleave: each is handled to
//! completion on the loop task.

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::app::App;
use crate::config::FrameConfigExt;
use crate::event::AppEvent;
use crate::Result;

/// Counters reported when the loop exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct LoopStats {
    pub frames: u64,
    pub events: u64,
}

pub struct FrameLoop {
    events: mpsc::UnboundedReceiver<AppEvent>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl FrameLoop {
    pub fn new(events: mpsc::UnboundedReceiver<AppEvent>) -> Self {
        Self {
            events,
            shutdown: None,
        }
    }

    /// Stop when `true` is published on the channel
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Run until the event channel closes or shutdown is signalled
    ///
    /// An event the application rejects (unknown template, foreign URL) ends
    /// the loop with that error.
    pub async fn run(mut self, app: &mut App) -> Result<LoopStats> {
        let period = app.config().frame.tick_duration();
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut stats = LoopStats::default();

        info!(period_us = period.as_micros() as u64, "Frame loop started");

        loop {
            tokio::select! {
                result = wait_shutdown(self.shutdown.as_mut()) => {
                    if result {
                        info!("Frame loop received shutdown signal");
                        break;
                    }
                    // Sender gone without signalling; keep running on events
                    self.shutdown = None;
                }

                _ = interval.tick() => {
                    app.tick();
                    stats.frames += 1;
                }

                event = self.events.recv() => {
                    match event {
                        Some(event) => {
                            debug!(?event, "Handling event");
                            app.handle_event(event)?;
                            stats.events += 1;
                        }
                        None => {
                            debug!("Event channel closed");
                            break;
                        }
                    }
                }
            }
        }

        info!(frames = stats.frames, events = stats.events, "Frame loop stopped");

        Ok(stats)
    }
}

/// Resolves to `true` on shutdown and `false` when the sender is dropped;
/// never resolves without a receiver
async fn wait_shutdown(shutdown: Option<&mut watch::Receiver<bool>>) -> bool {
    let Some(shutdown) = shutdown else {
        return std::future::pending().await;
    };

    loop {
        if shutdown.changed().await.is_err() {
            return false;
        }
        if *shutdown.borrow() {
            return true;
        }
    }
}
