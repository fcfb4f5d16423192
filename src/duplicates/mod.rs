pub mod detector;
pub mod hasher;

pub use detector::{find_duplicate_groups, DuplicateGroup};
