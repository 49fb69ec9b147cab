//! Main application orchestration.
//!
//! Coordinates:
//! - Inbound event channel fed by the feed task
//! - Quoting engine decisions
//! - Command delivery through the sink
//! - Throttle resumption timer
//! - Metrics per event and per command

use std::time::Duration;

use rtg_core::{ExchangeCommand, ExchangeEvent};
use rtg_mm::{EngineSnapshot, QuotingEngine};
use rtg_telemetry::Metrics;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::sink::CommandSink;

/// Main application.
pub struct Application {
    engine: QuotingEngine,
    sink: Box<dyn CommandSink>,
    /// Session clock origin; engine time is milliseconds since this instant.
    started: Instant,
    dump_metrics_on_exit: bool,
    events_handled: u64,
    commands_sent: u64,
}

impl Application {
    /// Create an application with a fresh engine.
    pub fn new(config: &AppConfig, sink: Box<dyn CommandSink>) -> AppResult<Self> {
        let engine = QuotingEngine::new(config.quoter.clone())?;
        info!(
            instrument = config.quoter.instrument,
            tick_size = config.quoter.tick_size.inner(),
            quote_ceiling = config.quoter.quote_action_ceiling,
            reprice_ceiling = config.quoter.reprice_action_ceiling,
            window_ms = config.quoter.window_ms,
            "Quoting engine initialized"
        );
        Ok(Self {
            engine,
            sink,
            started: Instant::now(),
            dump_metrics_on_exit: config.telemetry.dump_metrics_on_exit,
            events_handled: 0,
            commands_sent: 0,
        })
    }

    /// Consume events until the channel closes, then settle any pending
    /// throttle pause and return the final engine state.
    pub async fn run(mut self, mut rx: mpsc::Receiver<ExchangeEvent>) -> AppResult<EngineSnapshot> {
        info!("Entering main event loop");

        loop {
            let resume_at = self.engine.resume_at_ms();
            let deadline = self.deadline(resume_at.unwrap_or(0));

            tokio::select! {
                maybe_event = rx.recv() => {
                    match maybe_event {
                        Some(event) => self.handle_event(&event)?,
                        None => break,
                    }
                }

                _ = sleep_until(deadline), if resume_at.is_some() => {
                    self.handle_resume()?;
                }
            }
        }

        while let Some(resume_at) = self.engine.resume_at_ms() {
            debug!(resume_at_ms = resume_at, "Feed ended during throttle pause, waiting");
            sleep_until(self.deadline(resume_at)).await;
            self.handle_resume()?;
        }

        let snapshot = self.engine.snapshot();
        info!(
            events = self.events_handled,
            commands = self.commands_sent,
            position = snapshot.position,
            fair_value = ?snapshot.fair_value.map(|p| p.inner()),
            bid_target = %snapshot.targets.bid,
            ask_target = %snapshot.targets.ask,
            bid_id = %snapshot.bid.id,
            ask_id = %snapshot.ask.id,
            next_order_id = %snapshot.next_order_id,
            "Shutting down"
        );

        if self.dump_metrics_on_exit {
            match Metrics::render() {
                Ok(text) => info!(metrics = %text, "Final metrics"),
                Err(e) => warn!(error = %e, "Failed to render metrics"),
            }
        }

        Ok(snapshot)
    }

    /// Feed one event to the engine and deliver the resulting commands.
    pub fn handle_event(&mut self, event: &ExchangeEvent) -> AppResult<()> {
        self.events_handled += 1;
        Metrics::event_received(event.kind());
        if let ExchangeEvent::Error { .. } = event {
            Metrics::exchange_error();
        }

        let was_paused = self.engine.resume_at_ms().is_some();
        let now_ms = self.now_ms();
        let commands = self.engine.on_event(event, now_ms);

        if !was_paused {
            if let Some(resume_at) = self.engine.resume_at_ms() {
                Metrics::throttle_paused();
                debug!(
                    wait_ms = resume_at.saturating_sub(now_ms),
                    "Resume timer armed"
                );
            }
        }

        self.dispatch(commands)?;
        self.publish_state();
        Ok(())
    }

    /// Leave a throttle pause whose deadline has passed.
    pub fn handle_resume(&mut self) -> AppResult<()> {
        let now_ms = self.now_ms();
        let commands = self.engine.on_resume(now_ms);
        self.dispatch(commands)?;
        self.publish_state();
        Ok(())
    }

    pub fn engine(&self) -> &QuotingEngine {
        &self.engine
    }

    /// Milliseconds elapsed since the session started.
    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn deadline(&self, at_ms: u64) -> Instant {
        self.started + Duration::from_millis(at_ms)
    }

    fn dispatch(&mut self, commands: Vec<ExchangeCommand>) -> AppResult<()> {
        for command in commands {
            debug!(command = %command, "Sending command");
            self.sink.send(&command)?;
            self.commands_sent += 1;
            Metrics::command_sent(command.kind());
            if let ExchangeCommand::Hedge { side, volume, .. } = &command {
                Metrics::hedge_volume(&side.to_string(), u64::from(*volume));
            }
        }
        Ok(())
    }

    fn publish_state(&self) {
        Metrics::position_set(self.engine.position());
        if let Some(fair_value) = self.engine.fair_value() {
            Metrics::fair_value_set(i64::from(fair_value.inner()));
        }
    }
}
