use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::error::{Error, Result};

/// A modal question: a headline, a longer body, optional free-text fields
/// and the buttons to answer with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub informative: String,
    pub buttons: Vec<String>,
    pub inputs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertResponse {
    /// 0-based index into `Alert::buttons`.
    pub button: usize,
    /// One value per `Alert::inputs` label, in the same order.
    pub inputs: Vec<String>,
}

/// Blocks until the user answers an [`Alert`].
pub trait Prompt: Send + Sync {
    fn alert(&self, alert: &Alert) -> Result<AlertResponse>;
}

/// Native message boxes. They cannot hold text fields, so alerts with
/// inputs are refused.
#[derive(Debug)]
pub struct DialogPrompt {
    title: String,
}

impl DialogPrompt {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Prompt for DialogPrompt {
    fn alert(&self, alert: &Alert) -> Result<AlertResponse> {
        if !alert.inputs.is_empty() {
            return Err(Error::msg("native dialogs do not support text inputs"));
        }

        let buttons = match alert.buttons.as_slice() {
            [ok] => MessageButtons::OkCustom(ok.clone()),
            [ok, cancel] => MessageButtons::OkCancelCustom(ok.clone(), cancel.clone()),
            [yes, no, cancel] => {
                MessageButtons::YesNoCancelCustom(yes.clone(), no.clone(), cancel.clone())
            }
            other => {
                return Err(Error::msg(format!(
                    "native dialogs support 1 to 3 buttons, got {}",
                    other.len()
                )));
            }
        };

        let result = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(&self.title)
            .set_description(format!("{}\n\n{}", alert.message, alert.informative))
            .set_buttons(buttons)
            .show();

        Ok(AlertResponse {
            button: dialog_button_index(&alert.buttons, &result),
            inputs: Vec::new(),
        })
    }
}

/// Maps a dialog result back to the button that produced it. Anything that
/// cannot be matched (e.g. the dialog was dismissed) yields an index past
/// the last button.
fn dialog_button_index(buttons: &[String], result: &MessageDialogResult) -> usize {
    let positional = match result {
        MessageDialogResult::Custom(label) => buttons.iter().position(|b| b == label),
        MessageDialogResult::Ok | MessageDialogResult::Yes => Some(0),
        MessageDialogResult::No => Some(1),
        // custom buttons report their label; a bare Cancel means the window was closed
        MessageDialogResult::Cancel => None,
    };
    positional.unwrap_or(buttons.len())
}

/// Line-oriented prompt for terminals.
pub struct TerminalPrompt {
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl TerminalPrompt {
    pub fn new(input: impl BufRead + Send + 'static, output: impl Write + Send + 'static) -> Self {
        Self {
            input: Mutex::new(Box::new(input)),
            output: Mutex::new(Box::new(output)),
        }
    }

    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }
}

fn read_line(input: &mut dyn BufRead) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::msg("input closed while waiting for an answer"));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

impl Prompt for TerminalPrompt {
    fn alert(&self, alert: &Alert) -> Result<AlertResponse> {
        let mut input = self
            .input
            .lock()
            .map_err(|_| Error::msg("prompt input lock poisoned"))?;
        let mut output = self
            .output
            .lock()
            .map_err(|_| Error::msg("prompt output lock poisoned"))?;

        writeln!(output, "\n{}\n\n{}", alert.message, alert.informative)?;

        let mut inputs = Vec::with_capacity(alert.inputs.len());
        for label in &alert.inputs {
            write!(output, "{}: ", label)?;
            output.flush()?;
            inputs.push(read_line(&mut **input)?);
        }

        if alert.buttons.is_empty() {
            return Ok(AlertResponse { button: 0, inputs });
        }

        for (i, label) in alert.buttons.iter().enumerate() {
            writeln!(output, "  [{}] {}", i + 1, label)?;
        }

        loop {
            write!(output, "Choose 1-{}: ", alert.buttons.len())?;
            output.flush()?;
            let answer = read_line(&mut **input)?;
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=alert.buttons.len()).contains(&n) => {
                    return Ok(AlertResponse {
                        button: n - 1,
                        inputs,
                    });
                }
                _ => writeln!(output, "'{}' is not one of the choices", answer.trim())?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn choice_alert() -> Alert {
        Alert {
            message: "Start a new Pomodoro elapsed".into(),
            informative: "Your pomodoro history: \n\n1. 🍅 (Start a new Pomodoro)\n".into(),
            buttons: vec![
                "Start a new Pomodoro".into(),
                "Take a short break".into(),
                "Take a long break".into(),
            ],
            inputs: Vec::new(),
        }
    }

    #[test]
    fn terminal_prompt_maps_one_based_choice() {
        let out = SharedBuffer::default();
        let prompt = TerminalPrompt::new(Cursor::new("2\n"), out.clone());

        let response = prompt.alert(&choice_alert()).unwrap();

        assert_eq!(response.button, 1);
        let printed = out.contents();
        assert!(printed.contains("Start a new Pomodoro elapsed"));
        assert!(printed.contains("  [3] Take a long break"));
    }

    #[test]
    fn terminal_prompt_asks_again_after_invalid_choice() {
        let out = SharedBuffer::default();
        let prompt = TerminalPrompt::new(Cursor::new("abc\n0\n9\n3\n"), out.clone());

        let response = prompt.alert(&choice_alert()).unwrap();

        assert_eq!(response.button, 2);
        assert_eq!(out.contents().matches("is not one of the choices").count(), 3);
    }

    #[test]
    fn terminal_prompt_collects_inputs_in_order() {
        let prompt = TerminalPrompt::new(Cursor::new("10\n\nabc\n1\n"), io::sink());
        let alert = Alert {
            message: "Set your intervals in Minutes".into(),
            informative: String::new(),
            buttons: vec!["Save".into(), "Cancel".into()],
            inputs: vec!["Pomodoro".into(), "Short break".into(), "Long break".into()],
        };

        let response = prompt.alert(&alert).unwrap();

        assert_eq!(response.button, 0);
        assert_eq!(response.inputs, ["10", "", "abc"]);
    }

    #[test]
    fn terminal_prompt_fails_on_closed_input() {
        let prompt = TerminalPrompt::new(Cursor::new(""), io::sink());
        let err = prompt.alert(&choice_alert()).unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }

    #[test]
    fn dialog_results_map_back_to_buttons() {
        let buttons: Vec<String> = choice_alert().buttons;

        let custom = MessageDialogResult::Custom("Take a short break".into());
        assert_eq!(dialog_button_index(&buttons, &custom), 1);
        assert_eq!(dialog_button_index(&buttons, &MessageDialogResult::Yes), 0);
        assert_eq!(dialog_button_index(&buttons, &MessageDialogResult::No), 1);

        let unknown = MessageDialogResult::Custom("Go home".into());
        assert_eq!(dialog_button_index(&buttons, &unknown), 3);
    }

    #[test]
    fn closing_the_dialog_selects_nothing() {
        let buttons: Vec<String> = choice_alert().buttons;
        assert_eq!(dialog_button_index(&buttons, &MessageDialogResult::Cancel), 3);

        let save_cancel = vec!["Save".to_string(), "Cancel".to_string()];
        assert_eq!(dialog_button_index(&save_cancel, &MessageDialogResult::Cancel), 2);
        let clicked = MessageDialogResult::Custom("Cancel".into());
        assert_eq!(dialog_button_index(&save_cancel, &clicked), 1);
    }

    #[test]
    fn dialog_prompt_refuses_inputs() {
        let prompt = DialogPrompt::new("tomato-bar");
        let alert = Alert {
            inputs: vec!["Pomodoro".into()],
            ..choice_alert()
        };
        assert!(prompt.alert(&alert).is_err());
    }
}
