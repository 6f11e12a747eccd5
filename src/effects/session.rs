//! Async session driving the calculator.
//!
//! The session owns the pure [`Calculator`] and performs its side effects:
//! restoring the history at start, saving it after every append, firing
//! error resets on a tokio timer and publishing the display text.

use super::persist::{load_history, save_history, HistoryEnv};
use crate::config::CalculatorConfig;
use crate::core::{Calculator, Event, HistoryLog, StepResult};
use stillwater::effect::Effect;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// Request handled by [`Session::run`], in the order it was sent.
#[derive(Debug)]
pub enum Command {
    Event(Event),
    /// Reply with the history once every earlier command has been applied.
    History(oneshot::Sender<HistoryLog>),
}

impl From<Event> for Command {
    fn from(event: Event) -> Self {
        Self::Event(event)
    }
}

/// One UI session of the calculator.
pub struct Session<Env: HistoryEnv> {
    calculator: Calculator,
    env: Env,
    display: watch::Sender<String>,
}

impl<Env: HistoryEnv> Session<Env> {
    /// Restore the history from `env` and start with a `0` display.
    ///
    /// A history that cannot be read is logged and replaced by an empty one.
    pub async fn start(config: &CalculatorConfig, env: Env) -> Self {
        let history = match load_history::<Env>().run(&env).await {
            Ok(history) => history,
            Err(err) => {
                warn!(error = %err, "Failed to load history, starting empty");
                HistoryLog::new()
            }
        };
        let calculator = Calculator::with_history(config, history);
        let (display, _) = watch::channel(calculator.text().to_string());
        Self {
            calculator,
            env,
            display,
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn text(&self) -> &str {
        self.calculator.text()
    }

    /// Subscribe to the display. Receivers see the latest text; changes made
    /// between two reads are coalesced.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display.subscribe()
    }

    /// Apply one event now, persisting the history if it grew.
    pub async fn dispatch(&mut self, event: Event) -> StepResult {
        let step = self.calculator.apply(event, now());
        if let StepResult::Recorded(entry) = &step {
            info!(
                expression = %entry.expression,
                result = %entry.result,
                entries = self.calculator.history().len(),
                "Recorded evaluation"
            );
            self.persist().await;
        }
        self.publish();
        step
    }

    /// Fire resets that are due now. Returns `true` if the display changed.
    pub fn fire_due(&mut self) -> bool {
        let fired = self.calculator.fire_due(now());
        if fired {
            self.publish();
        }
        fired
    }

    /// Process commands until the sender side closes, firing resets as their
    /// deadlines pass. Returns the session so callers can inspect it.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Self {
        loop {
            let deadline = self.calculator.next_reset_deadline();
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Event(event)) => {
                        self.dispatch(event).await;
                    }
                    Some(Command::History(reply)) => {
                        if reply.send(self.calculator.history().clone()).is_err() {
                            debug!("History requester went away");
                        }
                    }
                    None => break,
                },
                _ = sleep_until_deadline(deadline) => {
                    self.fire_due();
                }
            }
        }
        self
    }

    /// Save the whole log inline. Saves stay in append order and the stores
    /// write one small blob, so the session task does not hand them off.
    async fn persist(&self) {
        let log = self.calculator.history().clone();
        if let Err(err) = save_history::<Env>(log).run(&self.env).await {
            warn!(error = %err, "Failed to save history");
        }
    }

    fn publish(&self) {
        let text = self.calculator.text();
        let changed = *self.display.borrow() != text;
        if changed {
            self.display.send_replace(text.to_string());
        }
    }
}

fn now() -> std::time::Instant {
    Instant::now().into_std()
}

async fn sleep_until_deadline(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => sleep_until(Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}
