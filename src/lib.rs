//! # clean-my-mac
//!
//! An open source CLI tool to reclaim disk space on your Mac.
//!
//! clean-my-mac discovers reclaimable artifacts across independent
//! categories — Docker resources, the Homebrew download cache, log files,
//! stale `node_modules` trees, and duplicate files — and removes them
//! under an explicit safety contract:
//!
//! - **Scan never fails**: a missing tool or directory is a valid
//!   environment state, not an error
//! - **Dry-run previews**: see exactly what would be freed before touching
//!   anything
//! - **Backup before destruction**: risky categories are copied into a
//!   retained backup batch before deletion; anything that could not be
//!   backed up is never deleted
//! - **Honest accounting**: every clean reports exactly what succeeded,
//!   what failed, and why

pub mod cli;
pub mod cleaner;
pub mod common;
pub mod duplicates;
pub mod scanner;
