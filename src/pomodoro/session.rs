use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::desktop::display::StatusDisplay;
use crate::desktop::prompt::{Alert, Prompt};
use crate::error::{Error, Result};
use crate::pomodoro::pomodoro::{Catalog, IntervalDefinition, IntervalKind};

pub const TICK: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedInterval {
    pub definition: IntervalDefinition,
    pub finished_at: DateTime<Local>,
}

pub type History = Arc<Mutex<Vec<CompletedInterval>>>;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Running(IntervalDefinition),
    AwaitingSelection,
}

/// Counts `def` down one tick at a time, then records it in `history`.
///
/// Shows `N, N-1, ..., 1`; a zero-length interval completes without any
/// display update.
pub async fn run_interval(
    def: IntervalDefinition,
    history: History,
    display: Arc<dyn StatusDisplay>,
    tick: Duration,
) -> Result<()> {
    info!(interval = %def.description, minutes = def.duration_minutes, "interval started");

    let mut remaining = def.duration_minutes;
    while remaining > 0 {
        display.set_title(&format!("{}{}", def.glyph, remaining));
        sleep(tick).await;
        remaining -= 1;
    }

    let message = format!("{} elapsed", def.description);
    {
        let mut history = history
            .lock()
            .map_err(|_| Error::msg("history lock poisoned"))?;
        history.push(CompletedInterval {
            definition: def,
            finished_at: Local::now(),
        });
        info!(completed = history.len(), "{}", message);
        match history_json(&history) {
            Ok(json) => debug!(history = %json, "history updated"),
            Err(e) => debug!("Failed to encode history: {}", e),
        }
    }

    display.announce(&message);
    Ok(())
}

pub fn history_summary(history: &[CompletedInterval]) -> String {
    let mut summary = String::from("Your pomodoro history: \n\n");
    for (i, entry) in history.iter().enumerate() {
        summary.push_str(&format!(
            "{}. {} ({})\n",
            i + 1,
            entry.definition.glyph,
            entry.definition.description
        ));
    }
    summary
}

pub fn history_json(history: &[CompletedInterval]) -> Result<String> {
    Ok(serde_json::to_string(history)?)
}

/// Asks which interval comes next. `Ok(None)` means the answer did not
/// match any catalog entry.
pub fn prompt_next(
    catalog: &Catalog,
    history: &[CompletedInterval],
    prompt: &dyn Prompt,
) -> Result<Option<IntervalDefinition>> {
    let last = history
        .last()
        .ok_or_else(|| Error::msg("cannot choose the next interval before one has elapsed"))?;

    let alert = Alert {
        message: format!("{} elapsed", last.definition.description),
        informative: history_summary(history),
        buttons: catalog
            .entries()
            .map(|(_, def)| def.description.clone())
            .collect(),
        inputs: Vec::new(),
    };

    let response = prompt.alert(&alert)?;
    Ok(catalog.nth(response.button).cloned())
}

/// Drives the countdown/selection cycle. Only one interval runs at a time:
/// the next countdown is spawned only after a selection, which in turn only
/// happens once the previous countdown has finished.
pub struct Session {
    catalog: Arc<Catalog>,
    history: History,
    display: Arc<dyn StatusDisplay>,
    prompt: Arc<dyn Prompt>,
    tick: Duration,
    state: SessionState,
}

impl Session {
    pub fn new(catalog: Catalog, display: Arc<dyn StatusDisplay>, prompt: Arc<dyn Prompt>) -> Self {
        let first = catalog.get(IntervalKind::Pomodoro).clone();
        Self {
            catalog: Arc::new(catalog),
            history: Arc::new(Mutex::new(Vec::new())),
            display,
            prompt,
            tick: TICK,
            state: SessionState::Running(first),
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    #[cfg(test)]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> Result<Vec<CompletedInterval>> {
        self.history
            .lock()
            .map(|h| h.clone())
            .map_err(|_| Error::msg("history lock poisoned"))
    }

    /// Advances by one state transition.
    pub async fn step(&mut self) -> Result<()> {
        match &self.state {
            SessionState::Running(def) => {
                let countdown = tokio::spawn(run_interval(
                    def.clone(),
                    Arc::clone(&self.history),
                    Arc::clone(&self.display),
                    self.tick,
                ));
                countdown.await??;
                self.state = SessionState::AwaitingSelection;
            }
            SessionState::AwaitingSelection => {
                let catalog = Arc::clone(&self.catalog);
                let prompt = Arc::clone(&self.prompt);
                let history = self.history()?;

                let choice = tokio::task::spawn_blocking(move || {
                    prompt_next(&catalog, &history, prompt.as_ref())
                })
                .await??;

                match choice {
                    Some(next) => self.state = SessionState::Running(next),
                    None => warn!("selection did not match any interval, asking again"),
                }
            }
        }
        Ok(())
    }

    /// Runs until a sink fails; under normal operation this never returns.
    pub async fn run(mut self) -> Result<()> {
        loop {
            self.step().await?;
        }
    }
}
