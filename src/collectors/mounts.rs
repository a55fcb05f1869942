use anyhow::Result;
use std::path::{Path, PathBuf};

pub const PROC_MOUNTS: &str = "/proc/mounts";

/// Where desktop automounters put removable media.
const MEDIA_PREFIXES: &[&str] = &["/media", "/run/media"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device:  String,
    pub mount:   PathBuf,
    pub fs_type: String,
}

pub fn read_mounts(table: &Path) -> Result<Vec<MountEntry>> {
    let content = std::fs::read_to_string(table)?;
    Ok(parse_mounts(&content))
}

pub fn parse_mounts(content: &str) -> Vec<MountEntry> {
    let mut v = Vec::new();
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 { continue; }
        v.push(MountEntry {
            device:  unescape(fields[0]),
            mount:   PathBuf::from(unescape(fields[1])),
            fs_type: fields[2].to_string(),
        });
    }
    v
}

/// First block-device mount below a media prefix, by mount point.
pub fn find_media_mount(mounts: &[MountEntry]) -> Option<PathBuf> {
    let mut found: Vec<&PathBuf> = mounts.iter()
        .filter(|m| m.device.starts_with("/dev/") && !m.device.starts_with("/dev/loop"))
        .map(|m| &m.mount)
        .filter(|mount| MEDIA_PREFIXES.iter().any(|p| mount.starts_with(p) && mount.as_path() != Path::new(p)))
        .collect();
    found.sort();
    found.first().map(|p| (*p).clone())
}

/// Longest mount point that is a path prefix of `path`.
pub fn containing_mount<'a>(mounts: &'a [MountEntry], path: &Path) -> Option<&'a MountEntry> {
    mounts.iter()
        .filter(|m| path.starts_with(&m.mount))
        .max_by_key(|m| m.mount.components().count())
}

/// The kernel writes space, tab, newline and backslash as `\ooo`.
fn unescape(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() && is_octal(&bytes[i + 1..i + 4]) {
            let code = (bytes[i + 1] - b'0') * 64 + (bytes[i + 2] - b'0') * 8 + (bytes[i + 3] - b'0');
            out.push(code);
            i += 4;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn is_octal(digits: &[u8]) -> bool {
    digits.len() == 3 && digits[0] <= b'3' && digits.iter().all(|d| (b'0'..=b'7').contains(d))
}
