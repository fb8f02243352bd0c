use console::style;

use crate::{
    context::{Context, RunMode},
    error::InstallerError,
    steps::MOUNT_POINT,
    ui,
};

const DEFAULT_HOSTNAME: &str = "archbox";
const DEFAULT_TIMEZONE: &str = "UTC";

/// Path of the generated configuration script, as seen from inside the
/// chroot.
const SCRIPT_PATH: &str = "/root/configure.sh";

// ── Desktop environments ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Desktop {
    None,
    Gnome,
    Plasma,
    Xfce,
}

impl Desktop {
    fn packages(self) -> &'static str {
        match self {
            Desktop::None => "",
            Desktop::Gnome => "gnome gdm",
            Desktop::Plasma => "plasma sddm konsole",
            Desktop::Xfce => "xfce4 xfce4-goodies lightdm lightdm-gtk-greeter",
        }
    }

    fn display_manager(self) -> Option<&'static str> {
        match self {
            Desktop::None => None,
            Desktop::Gnome => Some("gdm"),
            Desktop::Plasma => Some("sddm"),
            Desktop::Xfce => Some("lightdm"),
        }
    }
}

// ── Step ──────────────────────────────────────────────────────────────────────

/// Configures the installed system from inside: timezone, locale, hostname,
/// hosts file, bootloader, optional desktop, AUR helper, root password. The
/// whole configuration is rendered into one shell script and executed
/// through `arch-chroot` as a single opaque call.
pub fn run(ctx: &mut Context) -> Result<(), InstallerError> {
    let (hostname, timezone, desktop) = if ctx.mode == RunMode::Manual {
        ask_settings(ctx)?
    } else {
        (
            DEFAULT_HOSTNAME.to_string(),
            DEFAULT_TIMEZONE.to_string(),
            Desktop::None,
        )
    };

    let device = ctx.selection()?.device.clone();
    let uefi = ctx.cmd.path_exists("/sys/firmware/efi/efivars");
    ctx.journal.record(&format!(
        "Configuring system (hostname {}, timezone {}, {} firmware)",
        hostname,
        timezone,
        if uefi { "UEFI" } else { "BIOS" }
    ));

    let script = render_script(&hostname, &timezone, desktop, uefi, &device);
    ctx.cmd
        .write_file(&format!("{}{}", MOUNT_POINT, SCRIPT_PATH), &script)?;

    println!();
    ui::print_info("Entering chroot to configure the new system…");
    println!(
        "  {}",
        style("You will be asked for the root password near the end.")
            .dim()
            .italic()
    );
    println!();

    ctx.cmd
        .interactive("arch-chroot", &[MOUNT_POINT, "/bin/bash", SCRIPT_PATH])?;
    ctx.cmd
        .best_effort("rm", &["-f", &format!("{}{}", MOUNT_POINT, SCRIPT_PATH)]);

    ctx.journal.record("System configuration finished");
    ui::print_success("System configured.");
    Ok(())
}

fn ask_settings(ctx: &mut Context) -> Result<(String, String, Desktop), InstallerError> {
    println!();
    let hostname = ctx.prompter.input_default("Hostname", DEFAULT_HOSTNAME)?;
    let timezone = ctx
        .prompter
        .input_default("Timezone (Region/City)", DEFAULT_TIMEZONE)?;

    let idx = ctx.prompter.select(
        "Desktop environment",
        &["none (console only)", "GNOME", "KDE Plasma", "Xfce"],
    )?;
    let desktop = match idx {
        1 => Desktop::Gnome,
        2 => Desktop::Plasma,
        3 => Desktop::Xfce,
        _ => Desktop::None,
    };

    Ok((hostname, timezone, desktop))
}

// ── Script templating ─────────────────────────────────────────────────────────

fn render_script(
    hostname: &str,
    timezone: &str,
    desktop: Desktop,
    uefi: bool,
    device: &str,
) -> String {
    let mut s = String::new();
    s.push_str("#!/bin/bash\nset -e\n\n");

    s.push_str(&format!(
        "ln -sf /usr/share/zoneinfo/{} /etc/localtime\n",
        timezone
    ));
    s.push_str("hwclock --systohc\n\n");

    s.push_str("sed -i 's/^#en_US.UTF-8/en_US.UTF-8/' /etc/locale.gen\n");
    s.push_str("locale-gen\n");
    s.push_str("echo 'LANG=en_US.UTF-8' > /etc/locale.conf\n\n");

    s.push_str(&format!("echo '{}' > /etc/hostname\n", hostname));
    s.push_str(&format!(
        "cat > /etc/hosts <<EOF\n\
         127.0.0.1\tlocalhost\n\
         ::1\t\tlocalhost\n\
         127.0.1.1\t{h}.localdomain\t{h}\n\
         EOF\n\n",
        h = hostname
    ));

    if uefi {
        s.push_str("grub-install --target=x86_64-efi --efi-directory=/boot --bootloader-id=GRUB\n");
    } else {
        s.push_str(&format!("grub-install --target=i386-pc {}\n", device));
    }
    s.push_str("grub-mkconfig -o /boot/grub/grub.cfg\n\n");

    s.push_str("systemctl enable NetworkManager\n\n");

    if desktop != Desktop::None {
        s.push_str(&format!(
            "pacman -S --noconfirm --needed {}\n",
            desktop.packages()
        ));
        if let Some(dm) = desktop.display_manager() {
            s.push_str(&format!("systemctl enable {}\n", dm));
        }
        s.push('\n');
    }

    // AUR helper, built by a throwaway user (makepkg refuses to run as root)
    s.push_str("pacman -S --noconfirm --needed git\n");
    s.push_str("useradd -m aurbuild\n");
    s.push_str("echo 'aurbuild ALL=(ALL) NOPASSWD: ALL' > /etc/sudoers.d/aurbuild\n");
    s.push_str(
        "su - aurbuild -c 'git clone https://aur.archlinux.org/yay-bin.git \
         && cd yay-bin && makepkg -si --noconfirm' || echo 'yay build failed, skipping'\n",
    );
    s.push_str("userdel -r aurbuild\n");
    s.push_str("rm -f /etc/sudoers.d/aurbuild\n\n");

    s.push_str("echo 'Set the root password:'\n");
    s.push_str("passwd\n");
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{device::DeviceSelection, testutil::test_context};

    #[test]
    fn auto_mode_writes_and_runs_the_script_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, world) = test_context(&[], dir.path());
        ctx.target = Some(DeviceSelection::derive("/dev/sda"));

        run(&mut ctx).unwrap();

        let written = world.world().written_files.clone();
        assert_eq!(written.len(), 1);
        let (path, script) = &written[0];
        assert_eq!(path, "/mnt/root/configure.sh");
        assert!(script.contains("echo 'archbox' > /etc/hostname"));
        assert!(script.contains("zoneinfo/UTC"));
        assert!(!script.contains("gdm"));

        let calls = world.calls_of("arch-chroot");
        assert_eq!(
            calls,
            vec!["arch-chroot /mnt /bin/bash /root/configure.sh".to_string()]
        );
    }

    #[test]
    fn firmware_mode_selects_the_grub_target() {
        let bios = render_script("host", "UTC", Desktop::None, false, "/dev/sda");
        assert!(bios.contains("grub-install --target=i386-pc /dev/sda"));

        let uefi = render_script("host", "UTC", Desktop::None, true, "/dev/sda");
        assert!(uefi.contains("--target=x86_64-efi"));
        assert!(!uefi.contains("i386-pc"));
    }

    #[test]
    fn manual_settings_flow_into_the_script() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, world) = test_context(&["myhost", "Europe/Vienna", "2"], dir.path());
        ctx.mode = RunMode::Manual;
        ctx.target = Some(DeviceSelection::derive("/dev/sda"));

        run(&mut ctx).unwrap();

        let written = world.world().written_files.clone();
        let script = &written[0].1;
        assert!(script.contains("echo 'myhost' > /etc/hostname"));
        assert!(script.contains("myhost.localdomain"));
        assert!(script.contains("zoneinfo/Europe/Vienna"));
        assert!(script.contains("plasma sddm"));
        assert!(script.contains("systemctl enable sddm"));
    }

    #[test]
    fn hosts_file_names_the_machine() {
        let script = render_script("box", "UTC", Desktop::None, true, "/dev/sda");
        assert!(script.contains("127.0.1.1\tbox.localdomain\tbox"));
    }
}
