// UI layer: terminal prompt, spinner and printers. Nothing in here talks
// to the network; the binary passes results in.

use std::io::{self, BufRead, IsTerminal};
use std::time::Duration;

use anyhow::Result;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};

use crate::paste::PasteRecord;
use crate::workflow::{is_affirmative, Confirm, DeleteOutcome, UploadReport};

/// Asks on the terminal with `dialoguer` when stdin is interactive and
/// reads a plain line when it is piped. EOF or a read error counts as "no".
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        let answer = if io::stdin().is_terminal() {
            Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .ok()
        } else {
            eprintln!("{prompt}");
            read_answer(io::stdin().lock())
        };
        answer.map(|a| is_affirmative(&a)).unwrap_or(false)
    }
}

/// One line from `reader`, or `None` on EOF.
fn read_answer<R: BufRead>(mut reader: R) -> Option<String> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}

/// Run `f` while a spinner with `message` turns on stderr.
pub fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = f();
    spinner.finish_and_clear();
    Ok(out)
}

pub fn print_pastes(pastes: &[PasteRecord]) {
    if pastes.is_empty() {
        println!("No pastes found.");
        return;
    }
    for paste in pastes {
        println!("{paste}");
    }
}

pub fn print_report(report: &UploadReport) {
    for deletion in &report.deletions {
        match &deletion.outcome {
            DeleteOutcome::Skipped => {}
            DeleteOutcome::Deleted(res) => {
                println!("deleted {}: {}", deletion.paste_key, res.body.trim())
            }
            DeleteOutcome::Refused(res) => eprintln!(
                "failed to delete {}: {}",
                deletion.paste_key,
                res.body.trim()
            ),
            DeleteOutcome::Failed(e) => eprintln!("failed to delete {}: {e}", deletion.paste_key),
        }
    }
    println!("{}", report.response.body);
}
