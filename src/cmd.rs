use std::{
    fs::{self, OpenOptions},
    io,
    path::Path,
    process::{Command, Stdio},
};

use crate::{error::InstallerError, ui};

// ── Trait ─────────────────────────────────────────────────────────────────────

/// The narrow interface between the installer and every external tool it
/// shells out to. Steps only ever talk to this trait, so tests can swap in a
/// scripted stand-in and exercise the whole pipeline without touching a disk.
pub trait CommandRunner {
    /// Run a command that **takes over the terminal** (stdin/stdout/stderr
    /// inherited). For interactive programs: `cfdisk`, `pacstrap`,
    /// `arch-chroot`.
    fn interactive(&self, program: &str, args: &[&str]) -> Result<(), InstallerError>;

    /// Run a command **silently** behind a spinner. On success prints
    /// `done_msg` with a ✓; on failure surfaces the captured output.
    fn with_spinner(
        &self,
        program: &str,
        args: &[&str],
        spin_msg: &str,
        done_msg: &str,
    ) -> Result<(), InstallerError>;

    /// Run a command and return its stdout as a `String`.
    fn capture(&self, program: &str, args: &[&str]) -> Result<String, InstallerError>;

    /// Run a command and **append** its stdout to a file (`>> path`).
    fn append_to_file(
        &self,
        program: &str,
        args: &[&str],
        file_path: &str,
    ) -> Result<(), InstallerError>;

    /// Run a command, discarding output and ignoring any error. For cleanup
    /// where partial failure is acceptable (`umount`, `swapoff`).
    fn best_effort(&self, program: &str, args: &[&str]);

    fn write_file(&self, path: &str, contents: &str) -> Result<(), InstallerError>;

    fn create_dir(&self, path: &str) -> Result<(), InstallerError>;

    /// Whether `program` resolves in PATH.
    fn binary_exists(&self, program: &str) -> bool;

    /// Whether `path` exists on the live system (device nodes included).
    fn path_exists(&self, path: &str) -> bool;
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn not_found_or_io(program: &str, err: io::Error) -> InstallerError {
    if err.kind() == io::ErrorKind::NotFound {
        InstallerError::CommandNotFound(program.to_string())
    } else {
        InstallerError::Io(err)
    }
}

fn print_captured_output(stdout: &[u8], stderr: &[u8]) {
    let out = String::from_utf8_lossy(stdout);
    let err = String::from_utf8_lossy(stderr);
    if !out.trim().is_empty() {
        eprintln!("{}", out.trim());
    }
    if !err.trim().is_empty() {
        eprintln!("{}", err.trim());
    }
}

// ── Real implementation ───────────────────────────────────────────────────────

/// Executes commands against the live system.
pub struct SystemCommands;

impl CommandRunner for SystemCommands {
    fn interactive(&self, program: &str, args: &[&str]) -> Result<(), InstallerError> {
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| not_found_or_io(program, e))?;

        if !status.success() {
            return Err(InstallerError::CommandFailed(
                program.to_string(),
                status.code().unwrap_or(-1),
            ));
        }
        Ok(())
    }

    fn with_spinner(
        &self,
        program: &str,
        args: &[&str],
        spin_msg: &str,
        done_msg: &str,
    ) -> Result<(), InstallerError> {
        let pb = ui::spinner(spin_msg);
        let result = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| not_found_or_io(program, e));
        pb.finish_and_clear();

        match result {
            Err(e) => Err(e),
            Ok(output) if !output.status.success() => {
                print_captured_output(&output.stdout, &output.stderr);
                Err(InstallerError::CommandFailed(
                    program.to_string(),
                    output.status.code().unwrap_or(-1),
                ))
            }
            Ok(_) => {
                ui::print_success(done_msg);
                Ok(())
            }
        }
    }

    fn capture(&self, program: &str, args: &[&str]) -> Result<String, InstallerError> {
        let output = Command::new(program)
            .args(args)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| not_found_or_io(program, e))?;

        if !output.status.success() {
            return Err(InstallerError::CommandFailed(
                program.to_string(),
                output.status.code().unwrap_or(-1),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn append_to_file(
        &self,
        program: &str,
        args: &[&str],
        file_path: &str,
    ) -> Result<(), InstallerError> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(file_path)?;

        let status = Command::new(program)
            .args(args)
            .stdout(file)
            .stderr(Stdio::piped())
            .status()
            .map_err(|e| not_found_or_io(program, e))?;

        if !status.success() {
            return Err(InstallerError::CommandFailed(
                program.to_string(),
                status.code().unwrap_or(-1),
            ));
        }
        Ok(())
    }

    fn best_effort(&self, program: &str, args: &[&str]) {
        let _ = Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }

    fn write_file(&self, path: &str, contents: &str) -> Result<(), InstallerError> {
        fs::write(path, contents)?;
        Ok(())
    }

    fn create_dir(&self, path: &str) -> Result<(), InstallerError> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn binary_exists(&self, program: &str) -> bool {
        Command::new("which")
            .arg(program)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn path_exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }
}
