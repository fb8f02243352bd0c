use console::style;

use crate::{
    context::{Context, RunMode},
    error::InstallerError,
    steps::MOUNT_POINT,
    ui,
};

// ── Package sets ──────────────────────────────────────────────────────────────

/// Everything the finished system needs on first boot, kernel aside.
const BASE_PACKAGES: &[&str] = &[
    "base",
    "base-devel",
    "linux-firmware",
    "networkmanager",
    "grub",
    "efibootmgr",
    "sudo",
    "vim",
];

/// Fallback when the full set fails (flaky mirror, tight RAM on the live
/// ISO): just enough to boot.
const MINIMAL_PACKAGES: &[&str] = &["base", "linux-firmware"];

// ── Kernel ────────────────────────────────────────────────────────────────────

/// Which Linux kernel variant to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelVariant {
    Stable,
    Lts,
    Zen,
}

impl KernelVariant {
    /// The pacman package name for this variant.
    pub fn package_name(self) -> &'static str {
        match self {
            KernelVariant::Stable => "linux",
            KernelVariant::Lts => "linux-lts",
            KernelVariant::Zen => "linux-zen",
        }
    }

    /// Human-readable label shown to the user.
    pub fn display_name(self) -> &'static str {
        match self {
            KernelVariant::Stable => "Linux stable",
            KernelVariant::Lts => "Linux LTS (long-term support)",
            KernelVariant::Zen => "Linux Zen (performance-optimized)",
        }
    }
}

// ── Step ──────────────────────────────────────────────────────────────────────

/// Installs the base system into the mounted target via `pacstrap`. The full
/// set gets one narrowing retry: if it fails, the minimal set is installed
/// instead and the remainder is attempted afterwards without failing the
/// step.
pub fn run(ctx: &mut Context) -> Result<(), InstallerError> {
    let kernel = if ctx.mode == RunMode::Manual {
        ask_kernel(ctx)?
    } else {
        KernelVariant::Stable
    };
    ctx.journal.record(&format!("Kernel: {}", kernel.package_name()));

    ui::print_kv_box(
        "Base system",
        &[
            ("kernel", kernel.display_name()),
            ("packages", &BASE_PACKAGES.join(" ")),
        ],
    );
    println!();

    let mut full: Vec<&str> = vec![kernel.package_name()];
    full.extend_from_slice(BASE_PACKAGES);

    if install(ctx, &full).is_ok() {
        ctx.journal.record("Base system installed (full set)");
        ui::print_success("Base system installed.");
        return Ok(());
    }

    ctx.journal
        .record("Full package set failed, retrying with minimal set");
    ui::print_warning("Full package set failed — retrying with a minimal set.");
    println!();

    let mut minimal: Vec<&str> = vec![kernel.package_name()];
    minimal.extend_from_slice(MINIMAL_PACKAGES);
    install(ctx, &minimal)?;
    ctx.journal.record("Minimal package set installed");

    let rest: Vec<&str> = BASE_PACKAGES
        .iter()
        .copied()
        .filter(|p| !MINIMAL_PACKAGES.contains(p))
        .collect();
    match install(ctx, &rest) {
        Ok(()) => ctx.journal.record("Remaining packages installed"),
        Err(err) => {
            // the minimal system boots without these; record and move on
            ctx.journal
                .record(&format!("Remaining packages not installed: {}", err));
            ui::print_warning(&format!(
                "Some packages were not installed: {}",
                rest.join(" ")
            ));
        }
    }

    ui::print_success("Base system installed (reduced).");
    Ok(())
}

fn install(ctx: &mut Context, packages: &[&str]) -> Result<(), InstallerError> {
    let mut args: Vec<&str> = vec![MOUNT_POINT];
    args.extend_from_slice(packages);
    // pacstrap streams download progress — keep it interactive
    ctx.cmd.interactive("pacstrap", &args)
}

fn ask_kernel(ctx: &mut Context) -> Result<KernelVariant, InstallerError> {
    println!();
    let options = [
        "linux       stable (recommended)",
        "linux-lts   long-term support",
        "linux-zen   performance-optimized",
    ];
    let idx = ctx.prompter.select("Which kernel do you want to install?", &options)?;

    let kernel = match idx {
        1 => KernelVariant::Lts,
        2 => KernelVariant::Zen,
        _ => KernelVariant::Stable,
    };
    ui::print_info(&format!(
        "Selected: {}",
        style(kernel.display_name()).cyan().bold()
    ));
    Ok(kernel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_context;

    #[test]
    fn full_set_success_needs_a_single_pacstrap() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, world) = test_context(&[], dir.path());

        run(&mut ctx).unwrap();

        let calls = world.calls_of("pacstrap");
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("pacstrap /mnt linux base"), "{}", calls[0]);
    }

    #[test]
    fn failure_narrows_to_minimal_then_adds_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, world) = test_context(&[], dir.path());
        // the full set is the only invocation naming networkmanager and base-devel
        // together with base; failing on base-devel hits the full and rest calls
        world.world().fail_counts.insert("pacstrap".to_string(), 1);

        run(&mut ctx).unwrap();

        let calls = world.calls_of("pacstrap");
        assert_eq!(calls.len(), 3);
        assert!(calls[1].contains("pacstrap /mnt linux base linux-firmware"));
        assert!(calls[2].contains("networkmanager"));
        assert!(!calls[2].contains(" base "), "rest must exclude the minimal set: {}", calls[2]);
        assert!(ctx
            .journal
            .tail(10)
            .iter()
            .any(|l| l.contains("retrying with minimal set")));
    }

    #[test]
    fn remainder_shortfall_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, world) = test_context(&[], dir.path());
        // fails the full set and the remainder, succeeds on the minimal set
        world
            .world()
            .fail_matching
            .push(("pacstrap".to_string(), "networkmanager".to_string()));

        run(&mut ctx).unwrap();

        assert!(ctx
            .journal
            .tail(10)
            .iter()
            .any(|l| l.contains("Remaining packages not installed")));
    }

    #[test]
    fn total_failure_fails_the_step() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, world) = test_context(&[], dir.path());
        world.world().fail_programs.insert("pacstrap".to_string());

        let err = run(&mut ctx).unwrap_err();
        assert!(matches!(err, InstallerError::CommandFailed(p, _) if p == "pacstrap"));
    }

    #[test]
    fn manual_mode_installs_the_chosen_kernel() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, world) = test_context(&["1"], dir.path());
        ctx.mode = RunMode::Manual;

        run(&mut ctx).unwrap();

        let calls = world.calls_of("pacstrap");
        assert!(calls[0].contains("linux-lts"), "{}", calls[0]);
    }

    #[test]
    fn kernel_variant_names_are_stable() {
        assert_eq!(KernelVariant::Stable.package_name(), "linux");
        assert_eq!(KernelVariant::Lts.package_name(), "linux-lts");
        assert_eq!(KernelVariant::Zen.package_name(), "linux-zen");
    }
}
