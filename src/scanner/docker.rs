use std::path::PathBuf;

use super::types::{CategoryGroup, CategoryInfo, CleanResult, ReclaimableItem, SafetyLevel, ScanResult};
use super::Scanner;
use crate::common::exec::{CommandRunner, SystemRunner};
use crate::common::format::parse_size;
use crate::common::paths::ScanPaths;

const CATEGORY: CategoryInfo = CategoryInfo {
    id: "docker",
    name: "Docker",
    group: CategoryGroup::Development,
    safety_level: SafetyLevel::Safe,
};

/// Scanner for Docker disk usage.
///
/// This is an aggregate-command category: items carry pseudo-paths like
/// `docker:images` and the whole selection is reclaimed by a single
/// `docker system prune`. Docker's own report cannot attribute a partial
/// prune to individual resource kinds, so accounting is all-or-nothing.
pub struct DockerScanner {
    runner: Box<dyn CommandRunner>,
}

impl DockerScanner {
    pub fn new() -> Self {
        Self {
            runner: Box::new(SystemRunner),
        }
    }

    /// Replace the command runner (tests stand in for the daemon here)
    pub fn with_runner(runner: Box<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn parse_df_output(&self, stdout: &str) -> Vec<ReclaimableItem> {
        let mut items = Vec::new();

        for line in stdout.lines() {
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() < 3 {
                continue;
            }

            let (tag, label) = match parts[0].trim() {
                "Images" => ("docker:images", "Docker Images"),
                "Containers" => ("docker:containers", "Docker Containers"),
                "Local Volumes" | "Volumes" => ("docker:volumes", "Docker Volumes"),
                "Build Cache" => ("docker:build-cache", "Docker Build Cache"),
                _ => continue,
            };

            // Reclaimable column reads like "2.1GB (38%)"
            let reclaimable = parts[2].split('(').next().unwrap_or("").trim();
            let size = parse_size(reclaimable);
            if size == 0 {
                continue;
            }

            items.push(ReclaimableItem::file(PathBuf::from(tag), size, label));
        }

        items
    }
}

impl Default for DockerScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for DockerScanner {
    fn category(&self) -> CategoryInfo {
        CATEGORY
    }

    fn scan(&self, _paths: &ScanPaths) -> ScanResult {
        let output = match self.runner.run(
            "docker",
            &["system", "df", "--format", "{{.Type}}\t{{.Size}}\t{{.Reclaimable}}"],
        ) {
            Ok(out) => out,
            Err(e) => {
                // Daemon not running or docker not installed: valid state
                tracing::debug!(error = %e, "docker unavailable, skipping");
                return ScanResult::empty(CATEGORY);
            }
        };

        ScanResult::from_items(CATEGORY, self.parse_df_output(&output.stdout))
    }

    fn clean(&self, items: &[ReclaimableItem], dry_run: bool) -> CleanResult {
        if items.is_empty() {
            return CleanResult::empty(CATEGORY);
        }
        if dry_run {
            return CleanResult::dry_run(CATEGORY, items);
        }

        // Item paths are synthetic; the whole selection maps to one prune.
        // Volumes hold data docker cannot re-pull, so they are only pruned
        // when the volumes item was explicitly selected.
        let prune_volumes = items
            .iter()
            .any(|i| i.path.to_string_lossy() == "docker:volumes");
        let mut args = vec!["system", "prune", "-f"];
        if prune_volumes {
            args.push("--volumes");
        }

        match self.runner.run("docker", &args) {
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
