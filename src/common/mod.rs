pub mod config;
pub mod errors;
pub mod exec;
pub mod format;
pub mod paths;
pub mod safety;
