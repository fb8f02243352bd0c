use dialoguer::{Confirm, Input, Select};

use crate::{error::InstallerError, ui};

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Everything the installer asks of the human at the keyboard. Kept behind a
/// trait so tests can script the operator's answers.
pub trait Prompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, InstallerError>;

    /// Free-form text input, empty allowed.
    fn input(&mut self, prompt: &str) -> Result<String, InstallerError>;

    /// Text input with a pre-filled default.
    fn input_default(&mut self, prompt: &str, default: &str) -> Result<String, InstallerError>;

    /// Arrow-key selection among `items`; returns the chosen index.
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize, InstallerError>;

    /// Interactive escape hatch: hand the terminal to a shell until the
    /// operator exits it.
    fn shell(&mut self) -> Result<(), InstallerError>;
}

// ── Real implementation ───────────────────────────────────────────────────────

/// Prompts on the controlling terminal via `dialoguer`.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, InstallerError> {
        Ok(Confirm::new()
            .with_prompt(prompt.to_string())
            .default(default)
            .interact()?)
    }

    fn input(&mut self, prompt: &str) -> Result<String, InstallerError> {
        Ok(Input::<String>::new()
            .with_prompt(prompt.to_string())
            .allow_empty(true)
            .interact_text()?)
    }

    fn input_default(&mut self, prompt: &str, default: &str) -> Result<String, InstallerError> {
        Ok(Input::<String>::new()
            .with_prompt(prompt.to_string())
            .default(default.to_string())
            .interact_text()?)
    }

    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize, InstallerError> {
        Ok(Select::new()
            .with_prompt(prompt.to_string())
            .items(items)
            .default(0)
            .interact()?)
    }

    fn shell(&mut self) -> Result<(), InstallerError> {
        println!();
        ui::print_info("Dropping to a shell. Type 'exit' to return to the installer.");
        println!();

        let status = std::process::Command::new("bash").status()?;
        // The shell's own exit code carries no meaning for the run.
        let _ = status;

        println!();
        ui::print_info("Back from the shell.");
        Ok(())
    }
}
