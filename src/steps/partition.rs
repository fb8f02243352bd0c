use crate::{
    context::{Context, RunMode},
    device::{self, DeviceSelection, PartitionPhase},
    error::InstallerError,
    ui,
};

const EDITORS: [&str; 3] = ["cfdisk", "fdisk", "parted"];

/// Hands the target disk to a partition editor, then verifies the expected
/// layout exists. The editor's own exit code is ignored: the only success
/// criterion is that the three derived partitions are present afterwards.
/// On missing partitions the operator picks between retrying the editor,
/// repairing in a shell, accepting the gap, or aborting.
pub fn run(ctx: &mut Context) -> Result<(), InstallerError> {
    let device = ctx.selection()?.device.clone();
    let mut phase = PartitionPhase::NotPartitioned;

    println!();
    ui::print_kv_box(
        "Expected Layout",
        &[
            ("Partition 1", "EFI   512M  (FAT32)"),
            ("Partition 2", "swap"),
            ("Partition 3", "root  (ext4)"),
        ],
    );
    println!();

    loop {
        match phase {
            PartitionPhase::NotPartitioned => {
                let editor = pick_editor(ctx)?;
                ctx.journal
                    .record(&format!("Launching {} on {}", editor, device));
                ui::print_info(&format!("Launching {} — write the table and quit.", editor));
                println!();

                // the editor gets the terminal; its exit code proves nothing
                // about the resulting table
                if let Err(err) = ctx.cmd.interactive(editor, &[&device]) {
                    ctx.journal
                        .record(&format!("Partition editor exited with error (ignored): {}", err));
                }
                phase = PartitionPhase::ToolInvoked;
            }

            PartitionPhase::ToolInvoked => {
                // the table may have changed, recompute the selection
                let sel = DeviceSelection::derive(&device);
                let missing = device::verify_partitions(ctx.cmd.as_ref(), &sel);

                if missing.is_empty() {
                    ctx.target = Some(sel);
                    phase = PartitionPhase::Verified;
                    continue;
                }

                ctx.journal
                    .record(&format!("Missing partitions: {}", missing.join(", ")));
                println!();
                ui::print_warning(&format!(
                    "Expected partitions not found: {}",
                    missing.join(", ")
                ));

                let answer = ctx
                    .prompter
                    .input("Recovery action [retry/shell/skip/abort]")?;
                match answer.trim().to_ascii_lowercase().as_str() {
                    "retry" | "r" => {
                        ctx.journal.record("Retrying partitioning");
                        phase = PartitionPhase::NotPartitioned;
                    }
                    "shell" | "s" => {
                        ctx.journal.record("Repairing partition table in a shell");
                        if let Err(err) = ctx.prompter.shell() {
                            ctx.journal.record(&format!("Recovery shell failed: {}", err));
                        }
                        // stay in ToolInvoked and verify again
                    }
                    "skip" => {
                        ctx.journal
                            .record("Verification skipped, proceeding with warnings");
                        ctx.target = Some(sel);
                        phase = PartitionPhase::VerifiedWithWarnings;
                    }
                    _ => {
                        ctx.journal.record("Partitioning abandoned");
                        phase = PartitionPhase::Failed;
                    }
                }
            }

            PartitionPhase::Verified => {
                ctx.journal.record("Partition layout verified");
                ui::print_success("All three partitions present.");
                return Ok(());
            }

            PartitionPhase::VerifiedWithWarnings => {
                ui::print_warning("Proceeding despite missing partitions — later steps may fail.");
                return Ok(());
            }

            PartitionPhase::Failed => {
                return Err(InstallerError::Aborted);
            }
        }
    }
}

fn pick_editor(ctx: &mut Context) -> Result<&'static str, InstallerError> {
    if ctx.mode == RunMode::Manual {
        let idx = ctx.prompter.select("Partition editor", &EDITORS)?;
        Ok(EDITORS[idx.min(EDITORS.len() - 1)])
    } else {
        Ok(EDITORS[0])
    }
}
