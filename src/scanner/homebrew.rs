use std::path::Path;

use super::types::{CategoryGroup, CategoryInfo, CleanResult, ReclaimableItem, SafetyLevel, ScanResult};
use super::{dir_size, Scanner};
use crate::common::exec::{CommandRunner, SystemRunner};
use crate::common::paths::ScanPaths;

const CATEGORY: CategoryInfo = CategoryInfo {
    id: "homebrew",
    name: "Homebrew Cache",
    group: CategoryGroup::Development,
    safety_level: SafetyLevel::Safe,
};

/// Scanner for the Homebrew download cache.
///
/// The cache directory is resolved through `brew --cache` on every scan so
/// a relocated installation is always picked up. Cleaning goes through
/// `brew cleanup` rather than deleting files directly, with the same
/// all-or-nothing accounting as Docker.
pub struct HomebrewScanner {
    runner: Box<dyn CommandRunner>,
}

impl HomebrewScanner {
    pub fn new() -> Self {
        Self {
            runner: Box::new(SystemRunner),
        }
    }

    pub fn with_runner(runner: Box<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn scan_cache_dir(&self, cache_dir: &Path) -> Vec<ReclaimableItem> {
        let entries = match std::fs::read_dir(cache_dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut items = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();

            let item = if path.is_dir() {
                ReclaimableItem::directory(&path, dir_size(&path), name)
            } else {
                let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                ReclaimableItem::file(&path, size, name)
            };
            items.push(item);
        }

        items.sort_by(|a, b| a.path.cmp(&b.path));
        items
    }
}

impl Default for HomebrewScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for HomebrewScanner {
    fn category(&self) -> CategoryInfo {
        CATEGORY
    }

    fn scan(&self, _paths: &ScanPaths) -> ScanResult {
        let output = match self.runner.run("brew", &["--cache"]) {
            Ok(out) => out,
            Err(e) => {
                tracing::debug!(error = %e, "brew unavailable, skipping");
                return ScanResult::empty(CATEGORY);
            }
        };

        let cache_dir = Path::new(output.stdout.trim()).to_path_buf();
        if cache_dir.as_os_str().is_empty() || !cache_dir.exists() {
            return ScanResult::empty(CATEGORY);
        }

        ScanResult::from_items(CATEGORY, self.scan_cache_dir(&cache_dir))
    }

    fn clean(&self, items: &[ReclaimableItem], dry_run: bool) -> CleanResult {
        if items.is_empty() {
            return CleanResult::empty(CATEGORY);
        }
        if dry_run {
            return CleanResult::dry_run(CATEGORY, items);
        }

        match self.runner.run("brew", &["cleanup", "--prune=all", "-s"]) {
            Ok(_) => CleanResult {
                category: CATEGORY,
                cleaned_items: items.len(),
                freed_space: items.iter().map(|i| i.size).sum(),
                errors: Vec::new(),
            },
            Err(e) => CleanResult {
                category: CATEGORY,
                cleaned_items: 0,
                freed_space: 0,
                errors: vec![e.to_string()],
            },
        }
    }
}
