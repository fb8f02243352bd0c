use crate::{
    cmd::CommandRunner, device::DeviceSelection, error::InstallerError, journal::Journal,
    prompt::Prompter,
};

// ── Run mode ──────────────────────────────────────────────────────────────────

/// Whether steps run unattended or behind per-step confirmation.
///
/// `Auto` can flip to `Manual` mid-run (the recovery menu does this on the
/// first failure); the reverse never happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Auto,
    Manual,
}

// ── Run context ───────────────────────────────────────────────────────────────

/// Everything a step needs, passed explicitly instead of living in globals:
/// the run mode, the log, handles to the external world and the operator,
/// and the chosen installation target once disk selection has run.
pub struct Context {
    pub mode: RunMode,
    pub journal: Journal,
    pub cmd: Box<dyn CommandRunner>,
    pub prompter: Box<dyn Prompter>,
    pub target: Option<DeviceSelection>,
}

impl Context {
    /// The active device selection, or `NoTarget` when a step that needs one
    /// runs before disk selection has completed.
    pub fn selection(&self) -> Result<&DeviceSelection, InstallerError> {
        self.target.as_ref().ok_or(InstallerError::NoTarget)
    }
}
