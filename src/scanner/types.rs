use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Risk classification for cleaning a category.
///
/// The level carries no behavior inside a scanner itself; the orchestrator
/// uses it to decide whether confirmation and backup are mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
    /// Tool-managed caches, regenerable with no data loss (Docker, Homebrew)
    Safe,
    /// User-recognizable artifacts whose regeneration costs time (logs, node_modules)
    Moderate,
    /// Operations that can destroy unique user data (duplicate removal)
    Risky,
}

impl std::fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SafetyLevel::Safe => write!(f, "safe"),
            SafetyLevel::Moderate => write!(f, "moderate"),
            SafetyLevel::Risky => write!(f, "risky"),
        }
    }
}

/// Coarse bucket used only for grouping categories in output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryGroup {
    Development,
    Storage,
    SystemJunk,
}

impl std::fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryGroup::Development => write!(f, "Development"),
            CategoryGroup::Storage => write!(f, "Storage"),
            CategoryGroup::SystemJunk => write!(f, "System Junk"),
        }
    }
}

/// Static metadata attached to each scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    /// Unique stable slug, e.g. "docker"
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    pub group: CategoryGroup,
    pub safety_level: SafetyLevel,
}

/// One deletable unit: a file, a directory, or a pseudo-path standing in
/// for an aggregate resource managed by an external tool (`docker:images`).
///
/// Items are immutable value objects; a scan produces them and nothing
/// mutates them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReclaimableItem {
    pub path: PathBuf,
    /// Bytes; for pseudo-paths an estimate parsed from the tool's report
    pub size: u64,
    /// Human-readable label
    pub name: String,
    /// Directories are removed recursively
    pub is_directory: bool,
}

impl ReclaimableItem {
    pub fn file(path: impl Into<PathBuf>, size: u64, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            size,
            name: name.into(),
            is_directory: false,
        }
    }

    pub fn directory(path: impl Into<PathBuf>, size: u64, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            size,
            name: name.into(),
            is_directory: true,
        }
    }
}

/// Result of one `scan()` call, produced fresh every time
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub category: CategoryInfo,
    pub items: Vec<ReclaimableItem>,
    /// Always the arithmetic sum of `items[].size`
    pub total_size: u64,
}

impl ScanResult {
    /// An empty-but-valid result: the degraded outcome for every probe
    /// failure (tool absent, daemon down, directory missing).
    pub fn empty(category: CategoryInfo) -> Self {
        Self {
            category,
            items: Vec::new(),
            total_size: 0,
        }
    }

    /// Build a result from items, computing the total so the size
    /// invariant cannot drift.
    pub fn from_items(category: CategoryInfo, items: Vec<ReclaimableItem>) -> Self {
        let total_size = items.iter().map(|i| i.size).sum();
        Self {
            category,
            items,
            total_size,
        }
    }
}

/// Result of one `clean()` call
#[derive(Debug, Clone, Serialize)]
pub struct CleanResult {
    pub category: CategoryInfo,
    /// Items actually reclaimed (or simulated under dry-run)
    pub cleaned_items: usize,
    /// Sum of sizes of successfully reclaimed items
    pub freed_space: u64,
    /// One entry per failed item or failed aggregate operation
    pub errors: Vec<String>,
}

impl CleanResult {
    /// No-op success, e.g. for an empty selection
    pub fn empty(category: CategoryInfo) -> Self {
        Self {
            category,
            cleaned_items: 0,
            freed_space: 0,
            errors: Vec::new(),
        }
    }

    /// Dry-run simulation: every item optimistically counted as cleaned
    pub fn dry_run(category: CategoryInfo, items: &[ReclaimableItem]) -> Self {
        Self {
            category,
            cleaned_items: items.len(),
            freed_space: items.iter().map(|i| i.size).sum(),
            errors: Vec::new(),
        }
    }
}
