use super::types::{CategoryGroup, CategoryInfo, CleanResult, ReclaimableItem, SafetyLevel, ScanResult};
use super::{clean_filesystem_items, Scanner};
use crate::common::format::format_path;
use crate::common::paths::ScanPaths;
use crate::duplicates::find_duplicate_groups;

const CATEGORY: CategoryInfo = CategoryInfo {
    id: "duplicates",
    name: "Duplicate Files",
    group: CategoryGroup::Storage,
    safety_level: SafetyLevel::Risky,
};

/// Default minimum file size considered, matching the config default.
/// Tiny files dominate any tree and their dedup savings are noise.
const DEFAULT_MIN_SIZE: u64 = 1024;

/// Scanner that proposes all-but-one member of each duplicate group for
/// removal. Deleting a "duplicate" that was actually the last copy would
/// be unrecoverable, hence `risky`: the orchestrator forces a backup
/// before any real clean of this category.
pub struct DuplicatesScanner {
    min_size: u64,
}

impl DuplicatesScanner {
    pub fn new() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
        }
    }

    pub fn with_min_size(min_size: u64) -> Self {
        Self { min_size }
    }
}

impl Default for DuplicatesScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for DuplicatesScanner {
    fn category(&self) -> CategoryInfo {
        CATEGORY
    }

    fn scan(&self, paths: &ScanPaths) -> ScanResult {
        let groups = find_duplicate_groups(&paths.duplicate_roots, self.min_size, &paths.exclusions);

        let mut items = Vec::new();
        for group in &groups {
            // paths[0] is the kept representative
            for path in group.paths.iter().skip(1) {
                items.push(ReclaimableItem::file(
                    path,
                    group.size,
                    format!("{} (copy of {})", format_path(path), format_path(&group.paths[0])),
                ));
            }
        }

        ScanResult::from_items(CATEGORY, items)
    }

    fn clean(&self, items: &[ReclaimableItem], dry_run: bool) -> CleanResult {
        clean_filesystem_items(CATEGORY, items, dry_run)
    }
}
