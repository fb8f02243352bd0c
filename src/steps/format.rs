use console::style;

use crate::{
    context::{Context, RunMode},
    error::InstallerError,
    steps::MOUNT_POINT,
    ui,
};

/// Formats the three target partitions: FAT32 (EFI), swap, ext4 (root).
/// Anything still mounted or swapped on from a previous attempt is cleared
/// best-effort first, so a retried run starts from a clean slate.
pub fn run(ctx: &mut Context) -> Result<(), InstallerError> {
    let sel = ctx.selection()?.clone();

    if ctx.mode == RunMode::Manual {
        println!();
        ui::print_kv_box(
            "Partition Layout",
            &[
                ("EFI  (FAT32)", sel.efi.as_str()),
                ("Swap", sel.swap.as_str()),
                ("Root (ext4)", sel.root.as_str()),
            ],
        );
        println!();
        println!(
            "  {}",
            style("⚠  THIS WILL PERMANENTLY ERASE THE SELECTED PARTITIONS.")
                .red()
                .bold()
        );
        println!();

        if !ctx.prompter.confirm("Format these partitions?", false)? {
            return Err(InstallerError::Cancelled);
        }
    }

    // umount -R covers root + EFI (/mnt/boot) in one shot
    ctx.cmd.best_effort("umount", &["-R", MOUNT_POINT]);
    ctx.cmd.best_effort("swapoff", &[&sel.swap]);

    ctx.journal.record(&format!("Formatting {} as FAT32 (EFI)", sel.efi));
    ctx.cmd.with_spinner(
        "mkfs.fat",
        &["-F32", &sel.efi],
        &format!("Formatting {} as FAT32…", sel.efi),
        &format!("{} formatted as FAT32 (EFI).", sel.efi),
    )?;

    ctx.journal.record(&format!("Initialising swap on {}", sel.swap));
    ctx.cmd.with_spinner(
        "mkswap",
        &[&sel.swap],
        &format!("Initialising swap on {}…", sel.swap),
        &format!("{} initialised as swap.", sel.swap),
    )?;

    ctx.journal.record(&format!("Formatting {} as ext4 (root)", sel.root));
    ctx.cmd.with_spinner(
        "mkfs.ext4",
        &[&sel.root],
        &format!("Formatting {} as ext4…", sel.root),
        &format!("{} formatted as ext4 (root).", sel.root),
    )?;

    Ok(())
}
