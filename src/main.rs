mod cmd;
mod context;
mod device;
mod error;
mod journal;
mod prompt;
mod recovery;
mod runner;
mod steps;
mod ui;

#[cfg(test)]
mod testutil;

use cmd::SystemCommands;
use context::{Context, RunMode};
use error::InstallerError;
use journal::Journal;
use prompt::TerminalPrompter;

const LOG_PATH: &str = "/tmp/arch-installer.log";

// ── Command-line options ──────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Options {
    manual: bool,
    debug: bool,
    help: bool,
    /// Unrecognized flags, kept so they can be warned about after the banner
    /// has cleared the screen. Never fatal.
    unknown: Vec<String>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Options {
    let mut opts = Options::default();
    for arg in args {
        match arg.as_str() {
            "--manual" => opts.manual = true,
            "--debug" => opts.debug = true,
            "--help" | "-h" => opts.help = true,
            other => opts.unknown.push(other.to_string()),
        }
    }
    opts
}

fn print_usage() {
    println!("arch-installer [FLAGS]");
    println!();
    println!("  --manual   confirm each step and pick tools by hand");
    println!("  --debug    echo the installation log to the console");
    println!("  --help     show this text and exit");
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let opts = parse_args(std::env::args().skip(1));

    if opts.help {
        print_usage();
        return;
    }

    if let Err(e) = run(opts) {
        println!();
        ui::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}

fn run(opts: Options) -> Result<(), InstallerError> {
    check_root()?;

    ui::print_banner();
    for flag in &opts.unknown {
        ui::print_warning(&format!("Unknown flag '{}' ignored.", flag));
    }
    ui::print_info("This wizard will guide you through a full Arch Linux installation.");
    ui::print_info("You will be asked before each destructive operation.");

    let journal = Journal::create(LOG_PATH, opts.debug)?;

    let mut ctx = Context {
        mode: if opts.manual {
            RunMode::Manual
        } else {
            RunMode::Auto
        },
        journal,
        cmd: Box::new(SystemCommands),
        prompter: Box::new(TerminalPrompter),
        target: None,
    };
    ctx.journal.record("Installer started");

    runner::run(&mut ctx, &steps::pipeline())?;

    println!();
    ui::print_success("Installation finished. Reboot into the new system when ready.");
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Checks that the process is running as root (UID 0).
fn check_root() -> Result<(), InstallerError> {
    let uid = std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|s| {
            s.lines()
                .find(|l| l.starts_with("Uid:"))
                .and_then(|l| l.split_whitespace().nth(1))
                .and_then(|v| v.parse::<u32>().ok())
        })
        .unwrap_or(1); // default to non-root if unreadable

    if uid != 0 {
        return Err(InstallerError::NotRoot);
    }

    Ok(())
}
