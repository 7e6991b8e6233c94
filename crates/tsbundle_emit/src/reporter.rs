use std::{fmt::Display, io::Write, sync::Mutex};

use colored::Colorize;
use log::debug;

/// User-facing progress output.
///
/// Collectors run on the rayon pool, so every line is written whole under a lock.
pub struct Reporter<W: Write> {
    out: Mutex<W>,
    verbose: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out: Mutex::new(out), verbose }
    }

    pub fn title(&self, text: &str) {
        self.line(format_args!("\n{}", text.underline()));
    }

    /// Progress step, only shown in verbose mode
    pub fn step(&self, action: &str, detail: impl Display) {
        if self.verbose {
            self.line(format_args!("  {} {}", action.blue().bold(), detail));
        }
    }

    pub fn warn(&self, detail: impl Display) {
        self.line(format_args!("  {} {}", "warn".yellow().bold(), detail));
    }

    pub fn error(&self, detail: impl Display) {
        self.line(format_args!("  {} {}", "errored".red().bold(), detail));
    }

    pub fn emitted(&self, detail: impl Display) {
        self.line(format_args!("  {} to \"{}\"\n", "emitted".green().bold(), detail));
    }

    /// Two lines: the error itself, then whatever caused it
    pub fn failure(&self, err: &anyhow::Error) {
        self.error(err);
        let causes: Vec<String> = err.chain().skip(1).map(|c| format!("    {}", c)).collect();
        self.line(format_args!("{}\n", causes.join("\n")));
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn line(&self, args: std::fmt::Arguments<'_>) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(out, "{}", args) {
            debug!("Failed to write report line: {}", e);
        }
    }
}
