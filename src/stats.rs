use crate::collectors::filesystem::{StatSource, StatvfsSource};
use crate::collectors::roots::{PlatformRoots, RootResolver};
use crate::config::Config;
use crate::error::StatError;
use crate::models::filesystem::{FsSnapshot, VolumeUsage};
use crate::models::volume::Volume;
use std::path::PathBuf;
use tracing::debug;

/// Capacity queries in whole MiB over one of the two storage roles.
///
/// Holds no state besides its two capabilities: every call resolves the root
/// and takes a fresh snapshot, so back-to-back calls never share a result.
#[derive(Debug, Clone)]
pub struct StorageStats<R = PlatformRoots, S = StatvfsSource> {
    resolver: R,
    source:   S,
}

impl StorageStats {
    /// Roots from the user's config file, statvfs for the numbers.
    pub fn platform() -> Self {
        Self::from_config(&Config::load())
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(PlatformRoots::new(cfg.roots.clone()), StatvfsSource)
    }
}

impl<R: RootResolver, S: StatSource> StorageStats<R, S> {
    pub fn new(resolver: R, source: S) -> Self {
        Self { resolver, source }
    }

    pub fn total_space(&self, removable: bool) -> Result<i32, StatError> {
        Ok(self.snapshot(Volume::from(removable))?.1.total_mib())
    }

    pub fn free_space(&self, removable: bool) -> Result<i32, StatError> {
        Ok(self.snapshot(Volume::from(removable))?.1.free_mib())
    }

    /// (total bytes - free bytes) / MiB, truncated once.
    pub fn used_space(&self, removable: bool) -> Result<i32, StatError> {
        Ok(self.snapshot(Volume::from(removable))?.1.used_mib())
    }

    /// All three metrics from a single snapshot.
    pub fn usage(&self, volume: Volume) -> Result<VolumeUsage, StatError> {
        let (path, snap) = self.snapshot(volume)?;
        Ok(VolumeUsage::from_snapshot(volume, path, &snap))
    }

    fn snapshot(&self, volume: Volume) -> Result<(PathBuf, FsSnapshot), StatError> {
        let path = self.resolver.root(volume)?;
        let snap = self.source.snapshot(&path)
            .map_err(|e| StatError::unavailable(volume, &path, e))?;
        if snap.block_size == 0 {
            return Err(StatError::unavailable(volume, &path, "filesystem reports zero block size"));
        }
        debug!(
            %volume,
            path = %path.display(),
            block_size = snap.block_size,
            blocks = snap.blocks,
            blocks_available = snap.blocks_available,
            "statvfs snapshot"
        );
        Ok((path, snap))
    }
}

// ── Free functions ───────────────────────────────────────────────────

/// Total capacity in MiB; `removable` selects the removable volume.
pub fn total_space(removable: bool) -> Result<i32, StatError> {
    StorageStats::platform().total_space(removable)
}

/// Space available to unprivileged callers, in MiB.
pub fn free_space(removable: bool) -> Result<i32, StatError> {
    StorageStats::platform().free_space(removable)
}

/// Used space in MiB, from raw bytes and truncated once.
pub fn used_space(removable: bool) -> Result<i32, StatError> {
    StorageStats::platform().used_space(removable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::path::Path;
    use std::sync::Mutex;

    const PRIMARY: &str = "/system";
    const CARD: &str = "/storage/sdcard";

    /// Fixed roots; `None` = removable media not inserted.
    struct FixedRoots {
        removable: Option<PathBuf>,
    }

    impl RootResolver for FixedRoots {
        fn root(&self, volume: Volume) -> Result<PathBuf, StatError> {
            match volume {
                Volume::Primary   => Ok(PathBuf::from(PRIMARY)),
                Volume::Removable => self.removable.clone()
                    .ok_or_else(|| StatError::unavailable(volume, CARD, "not mounted")),
            }
        }
    }

    #[derive(Default)]
    struct FakeSource {
        snaps:   HashMap<PathBuf, FsSnapshot>,
        queried: Mutex<Vec<PathBuf>>,
    }

    impl FakeSource {
        fn with(mut self, path: &str, block_size: u64, blocks: u64, blocks_available: u64) -> Self {
            self.snaps.insert(PathBuf::from(path), FsSnapshot { block_size, blocks, blocks_available });
            self
        }

        fn queried(&self) -> Vec<PathBuf> {
            self.queried.lock().unwrap().clone()
        }
    }

    impl StatSource for FakeSource {
        fn snapshot(&self, path: &Path) -> io::Result<FsSnapshot> {
            self.queried.lock().unwrap().push(path.to_path_buf());
            self.snaps.get(path).copied()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such filesystem"))
        }
    }

    fn stats(source: FakeSource, card_inserted: bool) -> StorageStats<FixedRoots, FakeSource> {
        let removable = card_inserted.then(|| PathBuf::from(CARD));
        StorageStats::new(FixedRoots { removable }, source)
    }

    #[test]
    fn boundary_values() {
        let s = stats(FakeSource::default().with(PRIMARY, 4096, 1000, 500), false);
        assert_eq!(s.total_space(false).unwrap(), 3);
        assert_eq!(s.free_space(false).unwrap(), 1);
        assert_eq!(s.used_space(false).unwrap(), 1);
    }

    #[test]
    fn used_is_not_total_minus_free() {
        let s = stats(FakeSource::default().with(PRIMARY, 262_144, 10, 3), false);
        let (total, free, used) = (
            s.total_space(false).unwrap(),
            s.free_space(false).unwrap(),
            s.used_space(false).unwrap(),
        );
        assert_eq!((total, free, used), (2, 0, 1));
        assert_ne!(used, total - free);
    }

    #[test]
    fn every_call_takes_its_own_snapshot() {
        let s = stats(FakeSource::default().with(PRIMARY, 4096, 1000, 500), false);
        let first = s.total_space(false).unwrap();
        let second = s.total_space(false).unwrap();
        s.free_space(false).unwrap();
        s.used_space(false).unwrap();

        assert_eq!(first, second);
        assert_eq!(s.source.queried().len(), 4);
    }

    #[test]
    fn selectors_query_distinct_roots() {
        let source = FakeSource::default()
            .with(PRIMARY, 4096, 2_000_000, 1_000_000)
            .with(CARD, 32_768, 1_000_000, 999_000);
        let s = stats(source, true);

        assert_eq!(s.total_space(false).unwrap(), 7812);
        assert_eq!(s.total_space(true).unwrap(), 31_250);
        assert_eq!(s.source.queried(), vec![PathBuf::from(PRIMARY), PathBuf::from(CARD)]);
    }

    #[test]
    fn missing_card_fails_every_query() {
        let s = stats(FakeSource::default().with(PRIMARY, 4096, 1000, 500), false);
        for result in [s.total_space(true), s.free_space(true), s.used_space(true)] {
            let err = result.unwrap_err();
            assert!(matches!(err, StatError::VolumeUnavailable { volume: Volume::Removable, .. }));
        }
        assert!(s.source.queried().is_empty());
        assert!(s.usage(Volume::Removable).is_err());
    }

    #[test]
    fn stat_failure_is_unavailable() {
        // card resolves but nothing answers for it
        let s = stats(FakeSource::default(), true);
        let err = s.free_space(true).unwrap_err();
        assert_eq!(err.volume(), Volume::Removable);
        assert!(err.to_string().contains(CARD));
        assert!(err.to_string().contains("no such filesystem"));
    }

    #[test]
    fn zero_block_size_is_unavailable() {
        let s = stats(FakeSource::default().with(PRIMARY, 0, 1000, 500), false);
        assert!(s.total_space(false).is_err());
    }

    #[test]
    fn usage_matches_individual_queries() {
        let s = stats(FakeSource::default().with(PRIMARY, 4096, 1000, 500), false);
        let u = s.usage(Volume::Primary).unwrap();
        assert_eq!(u.path, PathBuf::from(PRIMARY));
        assert_eq!((u.total_mib, u.free_mib, u.used_mib), (3, 1, 1));
        assert_eq!(u.used_bytes, 2_048_000);
    }

    #[cfg(unix)]
    #[test]
    fn platform_primary_root() {
        let total = total_space(false).unwrap();
        let free = free_space(false).unwrap();
        let used = used_space(false).unwrap();
        assert!(total >= free);
        assert!(free >= 0);
        assert!(used >= 0);
    }

    #[cfg(unix)]
    #[test]
    fn real_statvfs_on_temp_dir() {
        struct TempRoot(PathBuf);
        impl RootResolver for TempRoot {
            fn root(&self, _volume: Volume) -> Result<PathBuf, StatError> {
                Ok(self.0.clone())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let s = StorageStats::new(TempRoot(dir.path().to_path_buf()), StatvfsSource);
        let total = s.total_space(false).unwrap();
        let free = s.free_space(false).unwrap();
        assert!(total >= free);
        assert!(free >= 0);
        assert!(s.used_space(false).unwrap() >= 0);
    }
}
