pub mod docker;
pub mod duplicates;
pub mod homebrew;
pub mod node_modules;
pub mod system_logs;
pub mod types;

use rayon::prelude::*;
use std::path::Path;
use walkdir::WalkDir;

use crate::common::config::Config;
use crate::common::errors::CleanMyMacError;
use crate::common::paths::ScanPaths;
use crate::common::safety;
use types::{CategoryInfo, CleanResult, ReclaimableItem, ScanResult};

pub use docker::DockerScanner;
pub use duplicates::DuplicatesScanner;
pub use homebrew::HomebrewScanner;
pub use node_modules::NodeModulesScanner;
pub use system_logs::SystemLogsScanner;

/// The uniform contract every category implementation satisfies.
///
/// `scan` must never fail the caller: any probe error (tool absent, daemon
/// down, permission denied, directory missing) degrades to an empty result.
/// `clean` contains every failure inside the returned result; the call
/// itself is infallible.
pub trait Scanner: Send + Sync {
    fn category(&self) -> CategoryInfo;

    /// Discover reclaimable items. Path configuration is read fresh on
    /// every call so overrides apply per call.
    fn scan(&self, paths: &ScanPaths) -> ScanResult;

    /// Reclaim a caller-selected subset of previously scanned items.
    /// Under dry-run, no filesystem mutation and no command execution
    /// occurs; every item is counted as cleaned.
    fn clean(&self, items: &[ReclaimableItem], dry_run: bool) -> CleanResult;
}

/// Closed set of category implementations behind the `Scanner` interface
pub enum CategoryScanner {
    Docker(DockerScanner),
    Homebrew(HomebrewScanner),
    SystemLogs(SystemLogsScanner),
    NodeModules(NodeModulesScanner),
    Duplicates(DuplicatesScanner),
}

impl Scanner for CategoryScanner {
    fn category(&self) -> CategoryInfo {
        match self {
            CategoryScanner::Docker(s) => s.category(),
            CategoryScanner::Homebrew(s) => s.category(),
            CategoryScanner::SystemLogs(s) => s.category(),
            CategoryScanner::NodeModules(s) => s.category(),
            CategoryScanner::Duplicates(s) => s.category(),
        }
    }

    fn scan(&self, paths: &ScanPaths) -> ScanResult {
        match self {
            CategoryScanner::Docker(s) => s.scan(paths),
            CategoryScanner::Homebrew(s) => s.scan(paths),
            CategoryScanner::SystemLogs(s) => s.scan(paths),
            CategoryScanner::NodeModules(s) => s.scan(paths),
            CategoryScanner::Duplicates(s) => s.scan(paths),
        }
    }

    fn clean(&self, items: &[ReclaimableItem], dry_run: bool) -> CleanResult {
        match self {
            CategoryScanner::Docker(s) => s.clean(items, dry_run),
            CategoryScanner::Homebrew(s) => s.clean(items, dry_run),
            CategoryScanner::SystemLogs(s) => s.clean(items, dry_run),
            CategoryScanner::NodeModules(s) => s.clean(items, dry_run),
            CategoryScanner::Duplicates(s) => s.clean(items, dry_run),
        }
    }
}

/// All registered category scanners, with default settings
pub fn all_scanners() -> Vec<CategoryScanner> {
    scanners_from_config(&Config::default())
}

/// All registered category scanners, with the config's knobs applied:
/// duplicate minimum size and node_modules search depth.
pub fn scanners_from_config(config: &Config) -> Vec<CategoryScanner> {
    vec![
        CategoryScanner::Docker(DockerScanner::new()),
        CategoryScanner::Homebrew(HomebrewScanner::new()),
        CategoryScanner::SystemLogs(SystemLogsScanner::new()),
        CategoryScanner::NodeModules(NodeModulesScanner::with_max_depth(config.node_scan_depth)),
        CategoryScanner::Duplicates(DuplicatesScanner::with_min_size(config.min_duplicate_size)),
    ]
}

/// Look up a scanner by its category id
pub fn scanner_for(id: &str) -> Option<CategoryScanner> {
    all_scanners().into_iter().find(|s| s.category().id == id)
}

/// Run every scanner's `scan()` in parallel. Scanners own disjoint
/// resources and share no mutable state, so this is safe.
pub fn scan_all(scanners: &[CategoryScanner], paths: &ScanPaths) -> Vec<ScanResult> {
    scanners.par_iter().map(|s| s.scan(paths)).collect()
}

/// Total size of a directory tree in bytes (logical file lengths)
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.metadata().map(|m| m.len()).unwrap_or(0))
        .sum()
}

/// Shared clean path for scanners backed by direct filesystem deletion:
/// success is evaluated per item, one failure never aborts the rest.
pub(crate) fn clean_filesystem_items(
    category: CategoryInfo,
    items: &[ReclaimableItem],
    dry_run: bool,
) -> CleanResult {
    if items.is_empty() {
        return CleanResult::empty(category);
    }
    if dry_run {
        return CleanResult::dry_run(category, items);
    }

    let mut result = CleanResult::empty(category);

    for item in items {
        match delete_path(&item.path, item.is_directory) {
            Ok(()) => {
                result.cleaned_items += 1;
                result.freed_space += item.size;
            }
            Err(e) => {
                tracing::warn!(path = %item.path.display(), error = %e, "failed to clean item");
                // Error variants already carry the offending path
                result.errors.push(e.to_string());
            }
        }
    }

    result
}

fn delete_path(path: &Path, is_directory: bool) -> Result<(), CleanMyMacError> {
    if safety::is_protected(path) {
        return Err(CleanMyMacError::Protected {
            path: path.to_path_buf(),
        });
    }
    if !path.exists() {
        return Err(CleanMyMacError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "path does not exist"),
        ));
    }

    let outcome = if is_directory || path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    outcome.map_err(|e| CleanMyMacError::io(path, e))
}
