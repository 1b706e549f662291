use tracing::{info, warn};

use crate::defaults::store::ConfigStore;
use crate::desktop::prompt::{Alert, Prompt};
use crate::error::Result;
use crate::pomodoro::pomodoro::IntervalKind;

const SAVE_BUTTON: usize = 0;

/// Asks for new interval durations and stores the ones that parse.
/// Returns whether the user chose to save.
pub fn open(store: &mut dyn ConfigStore, prompt: &dyn Prompt) -> Result<bool> {
    let alert = Alert {
        message: "Set your intervals in Minutes".to_string(),
        informative: current_intervals(store)?,
        buttons: vec!["Save".to_string(), "Cancel".to_string()],
        inputs: vec![
            "Pomodoro".to_string(),
            "Short break".to_string(),
            "Long break".to_string(),
        ],
    };

    let response = prompt.alert(&alert)?;
    if response.button != SAVE_BUTTON {
        return Ok(false);
    }

    apply_inputs(store, &response.inputs)?;
    Ok(true)
}

fn current_intervals(store: &dyn ConfigStore) -> Result<String> {
    let pomodoro = store.integer(IntervalKind::Pomodoro.config_key())?;
    let short_break = store.integer(IntervalKind::ShortBreak.config_key())?;
    let long_break = store.integer(IntervalKind::LongBreak.config_key())?;

    Ok(format!(
        "Your current intervals are set to:

{} minute for each pomodoro interval {}
{} minute for short breaks {}
{} minute for long breaks {}

Attention: After saving new values, an application restart is required to take effect.
",
        pomodoro,
        IntervalKind::Pomodoro.emoji(),
        short_break,
        IntervalKind::ShortBreak.emoji(),
        long_break,
        IntervalKind::LongBreak.emoji(),
    ))
}

/// Inputs are matched to interval kinds by position. Empty fields are
/// skipped, unparsable ones are logged and skipped.
pub fn apply_inputs(store: &mut dyn ConfigStore, inputs: &[String]) -> Result<()> {
    for (kind, raw) in IntervalKind::ALL.iter().zip(inputs) {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        match raw.parse::<i64>() {
            Ok(minutes) => {
                store.set_integer(kind.config_key(), minutes)?;
                info!(key = kind.config_key(), minutes, "interval updated");
            }
            Err(e) => warn!("Ignoring {} value '{}': {}", kind.config_key(), raw, e),
        }
    }
    Ok(())
}
