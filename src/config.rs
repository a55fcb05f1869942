use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub roots: RootsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RootsConfig {
    /// Root of the primary volume.
    pub primary: String,
    /// Root of the removable volume. Empty = $EXTERNAL_STORAGE, then the first /media mount.
    pub removable: String,
    /// Report the removable volume unavailable unless its root sits on a mount other than the primary one.
    pub require_removable_mount: bool,
    /// Kernel mount table used for detection and the mount check.
    pub mount_table: String,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for RootsConfig {
    fn default() -> Self {
        Self {
            primary:                 "/".into(),
            removable:               String::new(),
            require_removable_mount: true,
            mount_table:             crate::collectors::mounts::PROC_MOUNTS.into(),
        }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    /// Read-only load; missing or broken files fall back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Config::default();
        };
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Config::default();
        }
        match Self::load_from(&path) {
            Ok(c)  => c,
            Err(e) => {
                warn!("failed to load {}: {}. Using defaults.", path.display(), e);
                Config::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&text)?;
        Ok(cfg)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("volstat").join("volstat.toml"))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, format!("# volstat configuration\n\n{}", text))?;
        Ok(())
    }
}

/// Writes the defaults unless a config already exists. Returns true if written.
pub fn write_defaults_if_missing() -> Result<bool> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    write_defaults_at(&path)
}

pub fn write_defaults_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    Config::default().write_to(path)?;
    Ok(true)
}
