use std::path::Path;
use walkdir::WalkDir;

use super::types::{CategoryGroup, CategoryInfo, CleanResult, ReclaimableItem, SafetyLevel, ScanResult};
use super::{clean_filesystem_items, Scanner};
use crate::common::paths::ScanPaths;

const CATEGORY: CategoryInfo = CategoryInfo {
    id: "system-logs",
    name: "System Log Files",
    group: CategoryGroup::SystemJunk,
    safety_level: SafetyLevel::Moderate,
};

/// Scanner for user-level and system-level log directories.
///
/// Sizes are exact on-disk byte lengths, no estimation. A missing log
/// directory contributes zero items silently: a fresh machine simply has
/// no logs yet.
pub struct SystemLogsScanner;

impl SystemLogsScanner {
    pub fn new() -> Self {
        Self
    }

    fn collect_log_files(dir: &Path, paths: &ScanPaths, items: &mut Vec<ReclaimableItem>) {
        if !dir.is_dir() {
            return;
        }

        for entry in WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            if paths.is_excluded(entry.path()) {
                continue;
            }
            let size = match entry.metadata() {
                Ok(m) => m.len(),
                Err(_) => continue,
            };
            let name = entry.file_name().to_string_lossy().to_string();
            items.push(ReclaimableItem::file(entry.path(), size, name));
        }
    }
}

impl Default for SystemLogsScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for SystemLogsScanner {
    fn category(&self) -> CategoryInfo {
        CATEGORY
    }

    fn scan(&self, paths: &ScanPaths) -> ScanResult {
        let mut items = Vec::new();
        Self::collect_log_files(&paths.user_logs, paths, &mut items);
        Self::collect_log_files(&paths.system_logs, paths, &mut items);
        items.sort_by(|a, b| a.path.cmp(&b.path));
        ScanResult::from_items(CATEGORY, items)
    }

    fn clean(&self, items: &[ReclaimableItem], dry_run: bool) -> CleanResult {
        clean_filesystem_items(CATEGORY, items, dry_run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_metadata() {
        let cat = SystemLogsScanner::new().category();
        assert_eq!(cat.id, "system-logs");
        assert_eq!(cat.name, "System Log Files");
        assert_eq!(cat.group, CategoryGroup::SystemJunk);
        assert_eq!(cat.safety_level, SafetyLevel::Moderate);
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let result = SystemLogsScanner::new().clean(&[], false);
        assert_eq!(result.cleaned_items, 0);
        assert_eq!(result.freed_space, 0);
        assert!(result.errors.is_empty());
    }
}
