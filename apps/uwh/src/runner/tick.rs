//! # Tick Task
//!
//! The periodic 1 Hz tick of a running match.
//!
//! Ticks are awaited one after another, so they never overlap. A late tick
//! is absorbed by `GameEngine::catch_up`, which walks every overdue stage.

use super::{GameEvent, SharedEngine, publish};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uwh_core::primitives::TICK_INTERVAL_MS;
use uwh_core::{DisplayState, TickOutcome};

/// Owns the tick loop. Dropping it aborts the loop.
pub struct TickTask {
    handle: JoinHandle<()>,
    cancel: watch::Sender<bool>,
}

impl TickTask {
    /// Start ticking `engine` every second.
    ///
    /// The loop stops by itself once the game is over or a tick fails.
    pub fn spawn(
        engine: SharedEngine,
        display: watch::Sender<DisplayState>,
        events: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        let (cancel, mut cancelled) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancelled.changed() => break,
                    _ = interval.tick() => {}
                }

                let mut engine = engine.lock().await;
                let outcomes = match engine.catch_up(Instant::now()) {
                    Ok(outcomes) => outcomes,
                    Err(e) => {
                        tracing::error!("Tick failed, stopping the game clock: {}", e);
                        let _ = events.send(GameEvent::Failed(e));
                        break;
                    }
                };

                publish(&display, &*engine);

                for outcome in outcomes {
                    let event = match outcome {
                        TickOutcome::Transitioned { from, to } => GameEvent::StageChanged { from, to },
                        TickOutcome::Finished(saved) => GameEvent::Finished(saved),
                        TickOutcome::Idle | TickOutcome::Paused => continue,
                    };
                    let _ = events.send(event);
                }

                if engine.is_over() {
                    tracing::debug!("Game over, tick task stopping");
                    break;
                }
            }
        });

        Self { handle, cancel }
    }

    /// Stop ticking now. A tick already waiting for the engine lock never
    /// runs, so nothing ticks against a game finished by the caller.
    pub fn stop(&self) {
        let _ = self.cancel.send(true);
        self.handle.abort();
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TickTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
