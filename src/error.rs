use crate::models::volume::Volume;
use std::path::Path;
use thiserror::Error;

/// Placeholder path for a volume whose root never resolved.
pub const UNRESOLVED: &str = "(unresolved)";

#[derive(Debug, Error)]
pub enum StatError {
    /// Root missing, not mounted, not permitted, or statvfs failed.
    #[error("{volume} volume unavailable at {path}: {reason}")]
    VolumeUnavailable {
        volume: Volume,
        path:   String,
        reason: String,
    },
}

impl StatError {
    pub fn unavailable(volume: Volume, path: impl AsRef<Path>, reason: impl ToString) -> Self {
        StatError::VolumeUnavailable {
            volume,
            path:   path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn volume(&self) -> Volume {
        match self {
            StatError::VolumeUnavailable { volume, .. } => *volume,
        }
    }
}
