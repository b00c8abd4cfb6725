// git-clone-rs: Git repository sync for Kubernetes init containers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Execution environment report, logged before syncing.
//!
//! ```text
//! uid of the process          -> owner annotation
//! ls of cwd and cwd/..        -> path annotation
//! /proc/self/mountinfo        -> mounted volumes
//! ```
//!
//! When the init container fails on permissions or a wrong path, this is the
//! only place the pod logs show what the container actually sees. Nothing in
//! here is fatal.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Pod annotation that sets the owner of the checked out files.
pub const OWNER_ANNOTATION: &str = "git-clone-controller/owner";

/// Pod annotation that sets the target path.
pub const PATH_ANNOTATION: &str = "git-clone-controller/path";

const MOUNTINFO: &str = "/proc/self/mountinfo";

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub name: String,
    /// `ls -l` style permissions, e.g. `drwxr-xr-x`.
    pub mode: String,
    pub uid: u32,
    pub gid: u32,
}

/// A mounted filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    pub path: String,
    pub fs_type: String,
}

/// Log uid, directory listings of `cwd` and its parent, and mount points.
pub fn inspect_environment(cwd: &Path) {
    match current_uid() {
        Some(uid) => info!(
            uid,
            "Running as uid={uid} (to adjust set annotation: {OWNER_ANNOTATION})"
        ),
        None => info!("Running user is not available on this platform"),
    }

    for dir in [cwd.to_path_buf(), cwd.join("..")] {
        log_directory(&dir);
    }

    info!("Inspecting volume mount points");
    match fs::read_to_string(MOUNTINFO) {
        Ok(content) => {
            for mount in parse_mountinfo(&content) {
                info!(
                    "Found volume mounted at '{}' ({})",
                    mount.path, mount.fs_type
                );
            }
        }
        Err(e) => warn!(error = %e, "cannot read {MOUNTINFO}"),
    }
}

fn log_directory(dir: &Path) {
    info!(
        "Looking around in '{}' (annotation: {PATH_ANNOTATION})",
        dir.display()
    );
    match list_directory(dir) {
        Ok(entries) => {
            for entry in entries {
                info!("{} {}:{} {}", entry.mode, entry.uid, entry.gid, entry.name);
            }
        }
        Err(e) => warn!(path = %dir.display(), error = %e, "cannot list directory"),
    }
}

#[cfg(unix)]
fn current_uid() -> Option<u32> {
    // SAFETY: getuid has no preconditions and cannot fail.
    Some(unsafe { libc::getuid() })
}

#[cfg(not(unix))]
const fn current_uid() -> Option<u32> {
    None
}

/// List `dir` sorted by name, without following symlinks.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_directory(dir: &Path) -> io::Result<Vec<EntryInfo>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = fs::symlink_metadata(entry.path())?;
        entries.push(describe(
            entry.file_name().to_string_lossy().into_owned(),
            &metadata,
        ));
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(unix)]
fn describe(name: String, metadata: &fs::Metadata) -> EntryInfo {
    use std::os::unix::fs::MetadataExt;
    EntryInfo {
        name,
        mode: format_mode(metadata.mode()),
        uid: metadata.uid(),
        gid: metadata.gid(),
    }
}

#[cfg(not(unix))]
fn describe(name: String, metadata: &fs::Metadata) -> EntryInfo {
    let kind = if metadata.is_dir() { 'd' } else { '-' };
    EntryInfo {
        name,
        mode: format!("{kind}?????????"),
        uid: 0,
        gid: 0,
    }
}

/// Render a `st_mode` value like `ls -l` does.
#[must_use]
pub fn format_mode(mode: u32) -> String {
    let kind = match mode & 0o170_000 {
        0o040_000 => 'd',
        0o120_000 => 'l',
        0o020_000 => 'c',
        0o060_000 => 'b',
        0o010_000 => 'p',
        0o140_000 => 's',
        _ => '-',
    };

    let mut out = String::with_capacity(10);
    out.push(kind);
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 == 0 { '-' } else { 'r' });
        out.push(if bits & 0o2 == 0 { '-' } else { 'w' });
        out.push(if bits & 0o1 == 0 { '-' } else { 'x' });
    }
    out
}

/// Extract mount points and filesystem types from `/proc/<pid>/mountinfo`.
///
/// Malformed lines are skipped.
#[must_use]
pub fn parse_mountinfo(content: &str) -> Vec<MountPoint> {
    content
        .lines()
        .filter_map(|line| {
            let (mount, fs) = line.split_once(" - ")?;
            let path = mount.split_whitespace().nth(4)?;
            let fs_type = fs.split_whitespace().next()?;
            Some(MountPoint {
                path: unescape_octal(path),
                fs_type: fs_type.to_string(),
            })
        })
        .collect()
}

/// Decode the `\NNN` octal escapes the kernel uses for spaces and tabs.
fn unescape_octal(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\'
            && let Some(digits) = bytes.get(i + 1..i + 4)
            && digits.iter().all(|d| (b'0'..=b'7').contains(d))
        {
            let value = digits
                .iter()
                .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
            if let Ok(byte) = u8::try_from(value) {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
