use crate::{context::Context, error::InstallerError, steps::MOUNT_POINT};

/// Mounts all partitions into the installation tree under `/mnt`.
///
/// Mount order:
///   1. Root  → /mnt
///   2. Swap  → swapon
///   3. Create /mnt/boot
///   4. EFI   → /mnt/boot
pub fn run(ctx: &mut Context) -> Result<(), InstallerError> {
    let sel = ctx.selection()?.clone();

    ctx.cmd.with_spinner(
        "mount",
        &[&sel.root, MOUNT_POINT],
        &format!("Mounting {} → {}…", sel.root, MOUNT_POINT),
        &format!("{} mounted at {}.", sel.root, MOUNT_POINT),
    )?;
    ctx.journal.record(&format!("{} mounted at {}", sel.root, MOUNT_POINT));

    // deactivate first in case it's already active from a previous attempt
    ctx.cmd.best_effort("swapoff", &[&sel.swap]);
    ctx.cmd.with_spinner(
        "swapon",
        &[&sel.swap],
        &format!("Activating swap on {}…", sel.swap),
        &format!("Swap on {} activated.", sel.swap),
    )?;
    ctx.journal.record(&format!("Swap on {} activated", sel.swap));

    let boot = format!("{}/boot", MOUNT_POINT);
    ctx.cmd.create_dir(&boot)?;

    ctx.cmd.with_spinner(
        "mount",
        &[&sel.efi, &boot],
        &format!("Mounting {} → {}…", sel.efi, boot),
        &format!("{} mounted at {}.", sel.efi, boot),
    )?;
    ctx.journal.record(&format!("{} mounted at {}", sel.efi, boot));

    Ok(())
}
