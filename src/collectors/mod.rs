pub mod filesystem;
pub mod mounts;
pub mod roots;
