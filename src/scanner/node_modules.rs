use walkdir::WalkDir;

use super::types::{CategoryGroup, CategoryInfo, CleanResult, ReclaimableItem, SafetyLevel, ScanResult};
use super::{clean_filesystem_items, dir_size, Scanner};
use crate::common::format::format_path;
use crate::common::paths::ScanPaths;

const CATEGORY: CategoryInfo = CategoryInfo {
    id: "node-modules",
    name: "Node Modules",
    group: CategoryGroup::Development,
    safety_level: SafetyLevel::Moderate,
};

/// Default search depth below each project root. node_modules trees are
/// huge; an unbounded walk over a home directory is not acceptable scan
/// cost, and real projects sit near the top of their root.
const DEFAULT_MAX_DEPTH: usize = 4;

/// Scanner for `node_modules` dependency trees under project roots.
///
/// Removal is safe (npm/yarn regenerate them) but regeneration costs time
/// and network, hence `moderate`.
pub struct NodeModulesScanner {
    max_depth: usize,
}

impl NodeModulesScanner {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for NodeModulesScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for NodeModulesScanner {
    fn category(&self) -> CategoryInfo {
        CATEGORY
    }

    fn scan(&self, paths: &ScanPaths) -> ScanResult {
        let mut items = Vec::new();

        for root in &paths.node_search_roots {
            if !root.is_dir() {
                continue;
            }

            let mut walker = WalkDir::new(root)
                .follow_links(false)
                .max_depth(self.max_depth)
                .into_iter();

            while let Some(entry) = walker.next() {
                let entry = match entry {
                    Ok(e) => e,
                    Err(_) => continue,
                };
                if !entry.file_type().is_dir() || entry.depth() == 0 {
                    continue;
                }

                if paths.is_excluded(entry.path()) {
                    walker.skip_current_dir();
                    continue;
                }

                let name = entry.file_name().to_string_lossy();
                if name == "node_modules" {
                    let path = entry.path();
                    let size = dir_size(path);
                    items.push(ReclaimableItem::directory(path, size, format_path(path)));
                    // The tree is reported as one unit; never walk inside
                    walker.skip_current_dir();
                } else if name.starts_with('.') {
                    walker.skip_current_dir();
                }
            }
        }

        items.sort_by(|a, b| a.path.cmp(&b.path));
        ScanResult::from_items(CATEGORY, items)
    }

    fn clean(&self, items: &[ReclaimableItem], dry_run: bool) -> CleanResult {
        clean_filesystem_items(CATEGORY, items, dry_run)
    }
}
