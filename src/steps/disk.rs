use console::style;

use crate::{
    context::Context,
    device::{self, DeviceSelection, Disk},
    error::InstallerError,
    ui,
};

/// Discovers installable disks and locks in the target. A single candidate
/// is taken without prompting; several require an explicit choice. Either
/// way the operator must type the literal `yes` before the disk is accepted
/// as a destructive target — anything else restarts discovery.
pub fn run(ctx: &mut Context) -> Result<(), InstallerError> {
    loop {
        let disks = device::discover(ctx.cmd.as_ref());
        if disks.is_empty() {
            ctx.journal.record("No installable disk found");
            return Err(InstallerError::NoDisks);
        }

        let chosen = if disks.len() == 1 {
            ui::print_info(&format!(
                "Single disk found — selecting {} automatically.",
                disks[0].path
            ));
            ctx.journal.record(&format!("Auto-selected {}", disks[0].path));
            disks[0].clone()
        } else {
            choose(ctx, &disks)?
        };

        println!();
        ui::print_kv_box(
            "Installation Target",
            &[
                ("Disk", chosen.path.as_str()),
                ("Size", chosen.size.as_str()),
                ("Model", chosen.model.as_str()),
            ],
        );
        println!();
        ui::print_warning(&format!("All data on {} will be erased.", chosen.path));

        let answer = ctx
            .prompter
            .input("Type 'yes' to confirm this disk as the installation target")?;
        if answer != "yes" {
            ctx.journal
                .record(&format!("Selection of {} cancelled", chosen.path));
            ui::print_warning("Selection cancelled — choose again.");
            continue;
        }

        let sel = DeviceSelection::derive(&chosen.path);
        ctx.journal.record(&format!(
            "Target {} (efi {}, swap {}, root {})",
            sel.device, sel.efi, sel.swap, sel.root
        ));

        println!();
        ui::print_kv_box(
            "Planned Layout",
            &[
                ("EFI", sel.efi.as_str()),
                ("Swap", sel.swap.as_str()),
                ("Root", sel.root.as_str()),
            ],
        );

        ctx.target = Some(sel);
        return Ok(());
    }
}

// ── Choice among several disks ────────────────────────────────────────────────

fn choose(ctx: &mut Context, disks: &[Disk]) -> Result<Disk, InstallerError> {
    println!();
    println!(
        "  {:<4}{:<12}  {:>8}   {}",
        style("#").dim(),
        style("DISK").dim(),
        style("SIZE").dim(),
        style("MODEL").dim()
    );
    println!("  {}", style("─".repeat(48)).dim());
    for (i, d) in disks.iter().enumerate() {
        println!("  {:<4}{}", style(i + 1).cyan().bold(), d.display());
    }
    println!();

    loop {
        let answer = ctx.prompter.input("Disk number or full path")?;
        let trimmed = answer.trim();

        if let Ok(n) = trimmed.parse::<usize>() {
            if n >= 1 && n <= disks.len() {
                return Ok(disks[n - 1].clone());
            }
        }
        if let Some(d) = disks.iter().find(|d| d.path == trimmed) {
            return Ok(d.clone());
        }

        ui::print_warning(&format!("'{}' does not match any listed disk.", trimmed));
    }
}
