use crate::models::filesystem::FsSnapshot;
use std::io;
use std::path::Path;

/// Turns a path into block counts for the filesystem containing it.
pub trait StatSource: Send + Sync {
    fn snapshot(&self, path: &Path) -> io::Result<FsSnapshot>;
}

/// statvfs(3) through nix.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatvfsSource;

#[cfg(unix)]
impl StatSource for StatvfsSource {
    fn snapshot(&self, path: &Path) -> io::Result<FsSnapshot> {
        use nix::sys::statvfs::statvfs;
        let stat = statvfs(path)?;

        Ok(FsSnapshot {
            block_size:       stat.fragment_size() as u64,
            blocks:           stat.blocks() as u64,
            blocks_available: stat.blocks_available() as u64,
        })
    }
}

#[cfg(not(unix))]
impl StatSource for StatvfsSource {
    fn snapshot(&self, _path: &Path) -> io::Result<FsSnapshot> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "statvfs is unix-only"))
    }
}
