pub mod human;
pub mod logger;
pub mod report;
