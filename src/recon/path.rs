// Fri Jan 17 2026 - Alex

use crate::config::AnalysisConfig;
use crate::view::TypedView;
use crate::walk::ParentClimb;
use itertools::Itertools;

const SPECIAL_PREFIXES: [&str; 2] = ["socket:", "pipe:"];
const PASSTHROUGH: &str = "inotify";

fn entry_name(entry: &TypedView<'_>, config: &AnalysisConfig) -> Option<String> {
    entry.read_string("d_name.name", config.max_string_length)
}

/// Absolute path of `entry` on `mount` as seen from `root` on `root_mount`.
///
/// Returns an empty string when either the root or the entry is invalid or
/// when nothing could be named.
pub fn path_of(
    root: TypedView<'_>,
    root_mount: TypedView<'_>,
    entry: TypedView<'_>,
    mount: TypedView<'_>,
    config: &AnalysisConfig,
) -> String {
    if !root.is_valid() || !entry.is_valid() {
        return String::new();
    }
    let inode = entry.deref("d_inode").read_uint("i_ino");

    let climb = ParentClimb::new(entry, Some(mount))
        .with_target(root.offset(), root_mount.offset())
        .with_limit(config.max_climb_depth);

    let mut components = Vec::new();
    for step in climb {
        match entry_name(&step.entry, config) {
            Some(name) => components.push(name.trim_matches('/').to_string()),
            None => break,
        }
    }
    if components.is_empty() {
        return String::new();
    }

    let joined = components.iter().rev().filter(|c| !c.is_empty()).join("/");
    finish_path(joined, inode)
}

fn finish_path(joined: String, inode: Option<u64>) -> String {
    if SPECIAL_PREFIXES.iter().any(|p| joined.starts_with(p)) {
        if joined.contains(']') {
            joined.replace('/', "")
        } else {
            let mut trimmed = joined;
            trimmed.pop();
            format!("{}:[{}]", trimmed, inode.unwrap_or(0))
        }
    } else if joined == PASSTHROUGH {
        joined
    } else {
        format!("/{}", joined)
    }
}

/// Names from `entry` up to, but not including, the first entry that is its
/// own parent. No mount is crossed. Unnamed entries are skipped.
pub fn partial_path(entry: TypedView<'_>, config: &AnalysisConfig) -> String {
    let names: Vec<String> = ParentClimb::new(entry, None)
        .with_limit(config.max_climb_depth)
        .take_while(|step| !step.is_root)
        .filter_map(|step| entry_name(&step.entry, config))
        .collect();
    names.iter().rev().join("/")
}

/// Path of an open `file` relative to the root directory of `task`.
pub fn file_path(task: TypedView<'_>, file: TypedView<'_>, config: &AnalysisConfig) -> String {
    let root = task.deref("fs").member("root");
    let f_path = file.member("f_path");
    path_of(
        root.deref("dentry"),
        root.deref("mnt"),
        f_path.deref("dentry"),
        f_path.deref("mnt"),
        config,
    )
}
