use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::hasher;

/// A set of two-or-more paths whose content is byte-identical.
///
/// The detector owns no files: it only reports groupings. Members are in
/// lexicographic path order, so `paths[0]` is the stable representative
/// the pipeline keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub paths: Vec<PathBuf>,
    /// Size of one member (all members are identical)
    pub size: u64,
}

impl DuplicateGroup {
    /// Bytes wasted by the redundant copies
    pub fn wasted_bytes(&self) -> u64 {
        self.size * (self.paths.len() as u64 - 1)
    }
}

/// Find groups of byte-identical files under the given roots.
///
/// Files whose path contains one of the `exclude` substrings never
/// participate. Pipeline: collect → group by size → 4KB quick hash →
/// full SHA-256 → byte-for-byte verification. Pure over the file set and
/// deterministic: the same tree produces the same groups in the same
/// order regardless of walk order.
pub fn find_duplicate_groups(
    roots: &[PathBuf],
    min_size: u64,
    exclude: &[String],
) -> Vec<DuplicateGroup> {
    let files = collect_files(roots, min_size, exclude);
    let mut groups = Vec::new();

    for (_size, candidates) in hasher::group_by_size(&files) {
        for (_hash, quick_group) in hasher::group_by_quick_hash(&candidates) {
            for (_hash, hash_group) in hasher::group_by_full_hash(&quick_group) {
                for verified in verify_group(&hash_group) {
                    let size = std::fs::metadata(&verified[0]).map(|m| m.len()).unwrap_or(0);
                    groups.push(DuplicateGroup {
                        paths: verified,
                        size,
                    });
                }
            }
        }
    }

    // HashMap iteration order is arbitrary; fix it here
    groups.sort_by(|a, b| a.paths[0].cmp(&b.paths[0]));
    groups
}

/// Split a hash-confirmed group into byte-verified subgroups.
/// Practically this is always one group per hash; it exists so a SHA-256
/// collision can never mark two different files as duplicates.
fn verify_group(paths: &[PathBuf]) -> Vec<Vec<PathBuf>> {
    let mut sorted: Vec<PathBuf> = paths.to_vec();
    sorted.sort();

    let mut subgroups: Vec<Vec<PathBuf>> = Vec::new();
    for path in sorted {
        let matched = subgroups
            .iter_mut()
            .find(|g| hasher::bytes_equal(&g[0], &path).unwrap_or(false));
        match matched {
            Some(group) => group.push(path),
            None => subgroups.push(vec![path]),
        }
    }

    subgroups.retain(|g| g.len() > 1);
    subgroups
}

/// Collect candidate files under the roots, skipping hidden directories,
/// dependency trees, the Library folder and excluded paths
fn collect_files(roots: &[PathBuf], min_size: u64, exclude: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for root in roots {
        if !root.exists() {
            continue;
        }
        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_skipped_dir(e.path(), e.depth()))
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() {
                let path_str = entry.path().to_string_lossy();
                if exclude.iter().any(|p| path_str.contains(p.as_str())) {
                    continue;
                }
                if let Ok(meta) = entry.metadata() {
                    if meta.len() >= min_size {
                        files.push(entry.path().to_path_buf());
                    }
                }
            }
        }
    }

    files
}

fn is_skipped_dir(path: &Path, depth: usize) -> bool {
    if depth == 0 {
        return false;
    }
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.starts_with('.') || name == "node_modules" || name == "Library",
        None => false,
    }
}
