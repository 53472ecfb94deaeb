// Wed Jan 15 2026 - Alex

pub mod linux;
pub mod windows;

use crate::profile::LayoutPatch;
use once_cell::sync::Lazy;

static BUILTIN: Lazy<Vec<LayoutPatch>> = Lazy::new(|| {
    let mut patches = linux::patches();
    patches.extend(windows::patches());
    patches
});

/// Layout patches that ship with the crate. Kernel-build-specific offsets are
/// not among them; those come from JSON documents.
pub fn patches() -> Vec<LayoutPatch> {
    BUILTIN.clone()
}
