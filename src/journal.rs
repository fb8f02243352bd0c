use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Local;
use console::style;

// ── Installation log ──────────────────────────────────────────────────────────

/// Append-only record of everything the installer did, kept separate from the
/// console output so it survives a cleared screen or a dropped SSH session.
///
/// The file is truncated once at startup; each line is
/// `[YYYY-MM-DD HH:MM:SS] <message>`.
pub struct Journal {
    file: File,
    path: PathBuf,
    echo: bool,
}

impl Journal {
    /// Opens (and truncates) the log file. `echo` additionally mirrors every
    /// line to the console, dimmed — enabled by `--debug`.
    pub fn create(path: impl AsRef<Path>, echo: bool) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self { file, path, echo })
    }

    /// Appends one timestamped line. A failing log write never interrupts
    /// the run.
    pub fn record(&mut self, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{}] {}", stamp, message);
        let _ = writeln!(self.file, "{}", line);
        if self.echo {
            println!("  {}", style(&line).dim());
        }
    }

    /// The last `n` lines, oldest first. Shown to the operator when a step
    /// fails, so the failure is never diagnosed blind.
    pub fn tail(&self, n: usize) -> Vec<String> {
        let content = fs::read_to_string(&self.path).unwrap_or_default();
        let lines: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(n);
        lines[start..].iter().map(|s| s.to_string()).collect()
    }
}
