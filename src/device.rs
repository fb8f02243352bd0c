use std::collections::HashMap;

use crate::cmd::CommandRunner;

// ── Data types ────────────────────────────────────────────────────────────────

/// A block device eligible as installation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disk {
    pub path: String,  // /dev/sda
    pub size: String,  // 20G
    pub model: String, // SAMSUNG SSD 870
}

impl Disk {
    /// One-line label shown in the disk table.
    pub fn display(&self) -> String {
        format!("{:<12}  {:>8}   {}", self.path, self.size, self.model)
    }
}

/// The chosen target disk and its three fixed partitions. The layout is a
/// design constant: partition 1 is EFI, 2 is swap, 3 is root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSelection {
    pub device: String,
    pub efi: String,
    pub swap: String,
    pub root: String,
}

impl DeviceSelection {
    /// Derives the three partition paths from the disk path. Pure — safe to
    /// recompute after the disk has been repartitioned.
    pub fn derive(device: &str) -> Self {
        Self {
            device: device.to_string(),
            efi: part_path(device, 1),
            swap: part_path(device, 2),
            root: part_path(device, 3),
        }
    }
}

/// Progress of the partitioning phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionPhase {
    NotPartitioned,
    ToolInvoked,
    Verified,
    /// The operator chose to proceed although partitions are missing.
    VerifiedWithWarnings,
    Failed,
}

// ── Partition naming ──────────────────────────────────────────────────────────

/// Path of partition `index` on `device`. NVMe namespaces separate the
/// partition number with a `p` (`/dev/nvme0n1p2`); traditional disks append
/// it directly (`/dev/sda2`).
pub fn part_path(device: &str, index: u32) -> String {
    let name = device.rsplit('/').next().unwrap_or(device);
    if name.starts_with("nvme") {
        format!("{}p{}", device, index)
    } else {
        format!("{}{}", device, index)
    }
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Returns all installable disks visible to the system, in `lsblk` order.
/// Unparseable or unavailable `lsblk` output yields an empty list.
pub fn discover(cmd: &dyn CommandRunner) -> Vec<Disk> {
    let output = match cmd.capture(
        "lsblk",
        &["--pairs", "--output", "NAME,SIZE,TYPE,MODEL", "--nodeps"],
    ) {
        Ok(o) => o,
        Err(_) => return vec![],
    };

    parse_disks(&output)
}

/// Parses `lsblk --pairs` output, keeping only whole disks whose names match
/// the accepted conventions (sdX/hdX/vdX and NVMe namespaces).
pub fn parse_disks(output: &str) -> Vec<Disk> {
    output
        .lines()
        .filter_map(|line| {
            let m = parse_pairs(line);
            if m.get("TYPE").map(String::as_str) != Some("disk") {
                return None;
            }
            let name = m.get("NAME").map(String::as_str).unwrap_or("");
            if !is_disk_name(name) {
                return None;
            }
            Some(Disk {
                path: format!("/dev/{}", name),
                size: m.get("SIZE").cloned().unwrap_or_default(),
                model: {
                    let s = m.get("MODEL").cloned().unwrap_or_default();
                    if s.is_empty() { "—".to_string() } else { s }
                },
            })
        })
        .collect()
}

/// Accepted device names: `sd`/`hd`/`vd` followed by letters, or an NVMe
/// namespace (`nvme<ctrl>n<ns>`). Everything else (loop devices, mapper
/// nodes, mmc cards) is rejected.
fn is_disk_name(name: &str) -> bool {
    if let Some(rest) = name.strip_prefix("nvme") {
        let mut halves = rest.splitn(2, 'n');
        return match (halves.next(), halves.next()) {
            (Some(ctrl), Some(ns)) => {
                !ctrl.is_empty()
                    && !ns.is_empty()
                    && ctrl.chars().all(|c| c.is_ascii_digit())
                    && ns.chars().all(|c| c.is_ascii_digit())
            }
            _ => false,
        };
    }

    ["sd", "hd", "vd"].iter().any(|prefix| {
        name.strip_prefix(prefix)
            .map(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_lowercase()))
            .unwrap_or(false)
    })
}

// ── Verification ──────────────────────────────────────────────────────────────

/// Checks that the three derived partitions exist. Returns the missing
/// paths; empty means the layout is complete. No side effects.
pub fn verify_partitions(cmd: &dyn CommandRunner, sel: &DeviceSelection) -> Vec<String> {
    [sel.efi.as_str(), sel.swap.as_str(), sel.root.as_str()]
        .iter()
        .filter(|p| !cmd.path_exists(p))
        .map(|p| p.to_string())
        .collect()
}

// ── lsblk --pairs parser ──────────────────────────────────────────────────────
//
// Each line looks like:   NAME="sda" SIZE="20G" TYPE="disk" MODEL="QEMU HARDDISK"

fn parse_pairs(line: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let mut rest = line.trim();

    while !rest.is_empty() {
        let Some(eq) = rest.find('=') else { break };
        let key = rest[..eq].split_whitespace().last().unwrap_or("").to_string();
        rest = &rest[eq + 1..];

        if !rest.starts_with('"') {
            break;
        }
        rest = &rest[1..]; // skip opening "

        let Some(close) = rest.find('"') else { break };
        let value = rest[..close].to_string();
        rest = &rest[close + 1..]; // skip closing "

        if !key.is_empty() {
            map.insert(key, value);
        }
    }

    map
}
