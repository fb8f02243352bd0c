pub mod chroot;
pub mod disk;
pub mod finish;
pub mod format;
pub mod fstab;
pub mod mount;
pub mod network;
pub mod packages;
pub mod partition;

use crate::runner::Step;

/// Filesystem root the new system is assembled under.
pub const MOUNT_POINT: &str = "/mnt";

/// The fixed installation pipeline, in execution order.
pub fn pipeline() -> Vec<Step> {
    vec![
        Step::new("Network Setup", network::run),
        Step::new("Disk Selection", disk::run),
        Step::new("Disk Partitioning", partition::run),
        Step::new("Formatting Partitions", format::run),
        Step::new("Mounting Partitions", mount::run),
        Step::new("Base System Installation", packages::run),
        Step::new("Generating fstab", fstab::run),
        Step::new("System Configuration", chroot::run),
        Step::new("Finalization", finish::run),
    ]
}
