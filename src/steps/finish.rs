use crate::{context::Context, error::InstallerError, steps::MOUNT_POINT, ui};

/// Releases the installation tree. Cleanup here is best-effort: whatever
/// stays mounted is harmless once the machine reboots.
pub fn run(ctx: &mut Context) -> Result<(), InstallerError> {
    if let Some(sel) = ctx.target.clone() {
        ctx.cmd.best_effort("swapoff", &[&sel.swap]);
    }
    ctx.cmd.best_effort("umount", &["-R", MOUNT_POINT]);
    ctx.journal.record("Installation complete");

    println!();
    ui::print_success("All steps completed.");
    ui::print_info("Remove the installation medium and reboot:");
    ui::print_info("  reboot");
    println!();

    Ok(())
}
