use std::path::PathBuf;

/// Well-known directory roles consumed by the scanners.
///
/// Built once by the orchestrator and passed into every `scan()` call, so
/// overrides (tests, future per-run flags) apply per call instead of
/// through hidden global state.
#[derive(Debug, Clone)]
pub struct ScanPaths {
    /// Per-user application log directory (~/Library/Logs)
    pub user_logs: PathBuf,
    /// System-wide log directory (/Library/Logs)
    pub system_logs: PathBuf,
    /// Roots searched for node_modules directories
    pub node_search_roots: Vec<PathBuf>,
    /// Roots searched for duplicate files
    pub duplicate_roots: Vec<PathBuf>,
    /// Substrings that exclude a path from every scan
    pub exclusions: Vec<String>,
}

impl Default for ScanPaths {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
        Self {
            user_logs: home.join("Library/Logs"),
            system_logs: PathBuf::from("/Library/Logs"),
            node_search_roots: expand_existing(&home, &["Projects", "Developer", "Documents", "Desktop"]),
            duplicate_roots: expand_existing(&home, &["Downloads", "Documents", "Desktop", "Pictures"]),
            exclusions: Vec::new(),
        }
    }
}

impl ScanPaths {
    /// Default paths with the config's exclusion patterns applied
    pub fn from_config(config: &crate::common::config::Config) -> Self {
        Self {
            exclusions: config.exclude_paths.clone(),
            ..Self::default()
        }
    }

    /// Whether a path is excluded from scanning (substring match)
    pub fn is_excluded(&self, path: &std::path::Path) -> bool {
        let path_str = path.to_string_lossy();
        self.exclusions.iter().any(|p| path_str.contains(p.as_str()))
    }
}

fn expand_existing(home: &std::path::Path, names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|n| home.join(n)).collect()
}

/// Expand ~ and glob patterns in user-supplied path strings
pub fn expand_paths(paths: &[String]) -> Vec<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/Users/unknown"));
    let mut expanded = Vec::new();

    for path_str in paths {
        let resolved = path_str.replace('~', &home.to_string_lossy());

        if resolved.contains('*') {
            if let Ok(entries) = glob::glob(&resolved) {
                for entry in entries.filter_map(|e| e.ok()) {
                    expanded.push(entry);
                }
            }
        } else {
            expanded.push(PathBuf::from(resolved));
        }
    }

    expanded
}
