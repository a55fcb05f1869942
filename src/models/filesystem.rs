use super::volume::Volume;
use serde::Serialize;
use std::path::PathBuf;

/// One binary megabyte.
pub const MIB: u64 = 1_048_576;

/// Raw block counts from a single statvfs call. Never kept past the query
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsSnapshot {
    pub block_size:       u64,
    pub blocks:           u64,
    pub blocks_available: u64,
}

impl FsSnapshot {
    pub fn total_bytes(&self) -> u64 {
        self.blocks.saturating_mul(self.block_size)
    }

    /// Bytes available to unprivileged callers.
    pub fn free_bytes(&self) -> u64 {
        self.blocks_available.saturating_mul(self.block_size)
    }

    pub fn used_bytes(&self) -> u64 {
        self.total_bytes().saturating_sub(self.free_bytes())
    }

    pub fn total_mib(&self) -> i32 { to_mib(self.total_bytes()) }
    pub fn free_mib(&self)  -> i32 { to_mib(self.free_bytes()) }

    /// Derived from raw bytes, then truncated once. Can differ from
    /// `total_mib() - free_mib()` by one.
    pub fn used_mib(&self)  -> i32 { to_mib(self.used_bytes()) }
}

/// Whole MiB, truncated toward zero, clamped to `i32::MAX`.
pub fn to_mib(bytes: u64) -> i32 {
    let mib = bytes / MIB;
    i32::try_from(mib).unwrap_or_else(|_| {
        tracing::warn!(mib, "capacity exceeds i32 MiB range, clamping");
        i32::MAX
    })
}

/// All three metrics of one volume, derived from one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeUsage {
    pub volume:      Volume,
    pub path:        PathBuf,
    pub total_mib:   i32,
    pub free_mib:    i32,
    pub used_mib:    i32,
    pub total_bytes: u64,
    pub free_bytes:  u64,
    pub used_bytes:  u64,
}

impl VolumeUsage {
    pub fn from_snapshot(volume: Volume, path: PathBuf, snap: &FsSnapshot) -> Self {
        Self {
            volume,
            path,
            total_mib:   snap.total_mib(),
            free_mib:    snap.free_mib(),
            used_mib:    snap.used_mib(),
            total_bytes: snap.total_bytes(),
            free_bytes:  snap.free_bytes(),
            used_bytes:  snap.used_bytes(),
        }
    }

    pub fn use_pct(&self) -> f64 {
        if self.total_bytes == 0 { return 0.0; }
        self.used_bytes as f64 / self.total_bytes as f64 * 100.0
    }
}
