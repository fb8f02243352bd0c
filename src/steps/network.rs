use crate::{
    context::{Context, RunMode},
    error::InstallerError,
    recovery::{self, ErrorDecision},
    ui,
};

const PROBE_HOST: &str = "archlinux.org";

/// Brings networking up far enough to download packages. Wireless setup is
/// delegated to `iwctl`; wired connections usually need nothing. The step
/// succeeds when a short ping probe gets through.
pub fn run(ctx: &mut Context) -> Result<(), InstallerError> {
    if !ctx.cmd.binary_exists("iwctl") {
        ctx.journal.record("iwctl not found on the live system");
        match recovery::handle_binary(ctx, "Network tool 'iwctl' not found on the live system") {
            ErrorDecision::Continue => {
                ui::print_warning("Continuing without wireless setup.");
            }
            _ => return Err(InstallerError::Aborted),
        }
    } else if ctx.mode == RunMode::Manual
        && ctx
            .prompter
            .confirm("Configure a wireless connection with iwctl first?", false)?
    {
        // iwctl is fully interactive — hand over the terminal.
        ctx.cmd.interactive("iwctl", &[])?;
    }

    ctx.cmd.with_spinner(
        "ping",
        &["-c", "3", PROBE_HOST],
        &format!("Probing connectivity ({}, 3 pings)…", PROBE_HOST),
        "Network is reachable.",
    )?;
    ctx.journal.record("Connectivity probe succeeded");

    // A skewed clock makes package signature checks fail later.
    ctx.cmd.best_effort("timedatectl", &["set-ntp", "true"]);

    Ok(())
}
