pub mod filesystem;
pub mod volume;
