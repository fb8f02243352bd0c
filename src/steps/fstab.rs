use crate::{context::Context, error::InstallerError, steps::MOUNT_POINT, ui};

/// Generates the target's fstab using UUIDs via `genfstab`.
///
/// Equivalent to: `genfstab -U /mnt >> /mnt/etc/fstab`
pub fn run(ctx: &mut Context) -> Result<(), InstallerError> {
    // pacstrap creates /mnt/etc, but guard just in case
    let etc = format!("{}/etc", MOUNT_POINT);
    ctx.cmd.create_dir(&etc)?;

    let fstab = format!("{}/fstab", etc);
    let pb = ui::spinner("Generating fstab (UUID-based)…");
    let result = ctx.cmd.append_to_file("genfstab", &["-U", MOUNT_POINT], &fstab);

    match result {
        Ok(()) => {
            ui::done_spinner(pb, "fstab written to /mnt/etc/fstab.");
            ctx.journal.record("fstab generated");
            Ok(())
        }
        Err(err) => {
            pb.finish_and_clear();
            Err(err)
        }
    }
}
