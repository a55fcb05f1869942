//! Total, free and used space in whole MiB for the primary and removable
//! storage roots.
//!
//! ```no_run
//! let free = volstat::free_space(false)?;
//! println!("{} MiB free on the primary volume", free);
//! # Ok::<(), volstat::StatError>(())
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod models;
pub mod stats;
pub mod util;

pub use collectors::filesystem::{StatSource, StatvfsSource};
pub use collectors::roots::{PlatformRoots, RootResolver};
pub use error::StatError;
pub use models::filesystem::{FsSnapshot, VolumeUsage, MIB};
pub use models::volume::Volume;
pub use stats::{free_space, total_space, used_space, StorageStats};
