use crate::collectors::mounts::{self, MountEntry};
use crate::config::RootsConfig;
use crate::error::{StatError, UNRESOLVED};
use crate::models::volume::Volume;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Android-style variable naming the external storage root.
pub const EXTERNAL_STORAGE_VAR: &str = "EXTERNAL_STORAGE";

/// Maps a storage role to the root path that gets queried.
pub trait RootResolver: Send + Sync {
    fn root(&self, volume: Volume) -> Result<PathBuf, StatError>;
}

/// Config file, then `$EXTERNAL_STORAGE`, then the mount table.
#[derive(Debug, Clone)]
pub struct PlatformRoots {
    roots:            RootsConfig,
    external_storage: Option<PathBuf>,
}

impl PlatformRoots {
    pub fn new(roots: RootsConfig) -> Self {
        let external_storage = std::env::var_os(EXTERNAL_STORAGE_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self { roots, external_storage }
    }

    pub fn with_external_storage(mut self, path: Option<PathBuf>) -> Self {
        self.external_storage = path;
        self
    }

    fn primary_root(&self) -> PathBuf {
        PathBuf::from(&self.roots.primary)
    }

    fn removable_root(&self) -> Result<PathBuf, StatError> {
        let table = Path::new(&self.roots.mount_table);
        let entries: Option<Vec<MountEntry>> = match mounts::read_mounts(table) {
            Ok(m)  => Some(m),
            Err(e) => {
                debug!("mount table {} unreadable: {}", table.display(), e);
                None
            }
        };

        let candidate = if !self.roots.removable.is_empty() {
            PathBuf::from(&self.roots.removable)
        } else if let Some(ext) = &self.external_storage {
            ext.clone()
        } else {
            entries.as_deref()
                .and_then(mounts::find_media_mount)
                .ok_or_else(|| StatError::unavailable(
                    Volume::Removable, UNRESOLVED, "no removable storage root found",
                ))?
        };

        if same_path(&candidate, &self.primary_root()) {
            return Err(StatError::unavailable(
                Volume::Removable, &candidate, "resolves to the primary root",
            ));
        }

        if self.roots.require_removable_mount {
            if let Some(entries) = &entries {
                let card = deepest_mount(entries, &candidate);
                let system = deepest_mount(entries, &self.primary_root());
                match card {
                    Some(card) if Some(card) != system => {
                        debug!("removable root {} lives on {}", candidate.display(), card.mount.display());
                    }
                    _ => return Err(StatError::unavailable(Volume::Removable, &candidate, "not mounted")),
                }
            }
        }

        Ok(candidate)
    }
}

impl RootResolver for PlatformRoots {
    fn root(&self, volume: Volume) -> Result<PathBuf, StatError> {
        let root = match volume {
            Volume::Primary   => Ok(self.primary_root()),
            Volume::Removable => self.removable_root(),
        }?;
        debug!(%volume, root = %root.display(), "resolved root");
        Ok(root)
    }
}

/// Mount holding `path`, checked both as given and canonicalized.
fn deepest_mount<'a>(entries: &'a [MountEntry], path: &Path) -> Option<&'a MountEntry> {
    let real = std::fs::canonicalize(path).ok();
    let found = [Some(path), real.as_deref()]
        .into_iter()
        .flatten()
        .filter_map(|p| mounts::containing_mount(entries, p));
    found.max_by_key(|m| m.mount.components().count())
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _              => a == b,
    }
}
