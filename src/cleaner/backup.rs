use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::common::config::Config;
use crate::common::errors::CleanMyMacError;
use crate::scanner::dir_size;
use crate::scanner::types::ReclaimableItem;

/// Timestamp layout used for batch directory names
const BATCH_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Progress callback invoked after each item completes backup:
/// (item, completed count, total count)
pub type ProgressFn<'a> = &'a mut dyn FnMut(&ReclaimableItem, usize, usize);

/// Copies items into a retained staging area before deletion.
///
/// Each `backup_items` call produces one timestamped batch directory under
/// the backup root, holding a copy of every item plus a `manifest.json`
/// recording the original paths. Batches are purged once older than the
/// retention window.
pub struct BackupManager {
    root: PathBuf,
    retention_days: u32,
}

/// Outcome of backing up one batch of items
#[derive(Debug)]
pub struct BackupReport {
    /// The batch directory that now holds the copies
    pub batch_dir: PathBuf,
    /// Items successfully copied
    pub backed_up: Vec<ReclaimableItem>,
    /// Items skipped because the source no longer exists
    pub skipped: Vec<ReclaimableItem>,
    /// One entry per item whose copy failed
    pub errors: Vec<String>,
}

/// One existing backup batch, for listing
#[derive(Debug, Clone, Serialize)]
pub struct BackupBatch {
    pub path: PathBuf,
    pub created: DateTime<Utc>,
    pub size: u64,
    pub item_count: usize,
}

/// Per-batch manifest written alongside the copies
#[derive(Debug, Serialize, Deserialize)]
struct BatchManifest {
    created: DateTime<Utc>,
    items: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ManifestEntry {
    original_path: PathBuf,
    backup_path: PathBuf,
    size: u64,
    is_directory: bool,
}

impl BackupManager {
    pub fn new(root: impl Into<PathBuf>, retention_days: u32) -> Self {
        Self {
            root: root.into(),
            retention_days,
        }
    }

    /// Manager rooted at ~/.clean-my-mac/backup
    pub fn with_default_location(retention_days: u32) -> Self {
        Self::new(Config::backup_dir(), retention_days)
    }

    /// The backup root path, without side effects
    pub fn backup_dir(&self) -> &Path {
        &self.root
    }

    /// Create the backup root if absent and return it
    pub fn ensure_backup_dir(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create backup dir: {}", self.root.display()))?;
        Ok(self.root.clone())
    }

    /// Copy one item into the given batch directory.
    ///
    /// A missing source is not an error: backup runs right before a clean
    /// and the item may legitimately be gone already. Returns `false` for
    /// that single item so the caller can exclude it from deletion.
    pub fn backup_item(&self, item: &ReclaimableItem, batch_dir: &Path) -> Result<bool> {
        Ok(self.copy_into_batch(item, batch_dir)?.is_some())
    }

    /// Returns the destination the item was copied to, or `None` when the
    /// source no longer exists
    fn copy_into_batch(&self, item: &ReclaimableItem, batch_dir: &Path) -> Result<Option<PathBuf>> {
        if !item.path.exists() {
            return Ok(None);
        }

        let dest = unique_destination(batch_dir, &item.path);
        let copied = if item.path.is_dir() {
            copy_dir_recursive(&item.path, &dest).map_err(|e| e.to_string())
        } else {
            std::fs::copy(&item.path, &dest)
                .map(|_| ())
                .map_err(|e| e.to_string())
        };
        copied.map_err(|message| CleanMyMacError::Backup {
            path: item.path.clone(),
            message,
        })?;

        Ok(Some(dest))
    }

    /// Back up a batch of items into a fresh timestamped batch directory.
    ///
    /// Per-item failures do not cancel the batch; they are reported so the
    /// caller can gate those items out of deletion. The progress callback,
    /// when given, fires after each item completes (copied or skipped).
    pub fn backup_items(
        &self,
        items: &[ReclaimableItem],
        mut progress: Option<ProgressFn<'_>>,
    ) -> Result<BackupReport> {
        self.ensure_backup_dir()?;
        let batch_dir = self.create_batch_dir()?;

        let mut report = BackupReport {
            batch_dir: batch_dir.clone(),
            backed_up: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
        };
        let mut manifest = BatchManifest {
            created: Utc::now(),
            items: Vec::new(),
        };

        for (i, item) in items.iter().enumerate() {
            match self.copy_into_batch(item, &batch_dir) {
                Ok(Some(backup_path)) => {
                    manifest.items.push(ManifestEntry {
                        original_path: item.path.clone(),
                        backup_path,
                        size: item.size,
                        is_directory: item.is_directory,
                    });
                    report.backed_up.push(item.clone());
                }
                Ok(None) => report.skipped.push(item.clone()),
                Err(e) => {
                    report
                        .errors
                        .push(format!("{}: {}", item.path.display(), e));
                    report.skipped.push(item.clone());
                }
            }

            if let Some(cb) = progress.as_mut() {
                cb(item, i + 1, items.len());
            }
        }

        let manifest_path = batch_dir.join("manifest.json");
        let json = serde_json::to_string_pretty(&manifest).context("Failed to serialize backup manifest")?;
        std::fs::write(&manifest_path, json)
            .with_context(|| format!("Failed to write manifest: {}", manifest_path.display()))?;

        Ok(report)
    }

    /// Enumerate existing batch directories, most recent first
    pub fn list_backups(&self) -> Result<Vec<BackupBatch>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut batches = Vec::new();
        for entry in std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read backup dir: {}", self.root.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let created = match batch_timestamp(&path) {
                Some(ts) => ts,
                None => continue, // Not a batch directory
            };

            let item_count = read_manifest(&path).map(|m| m.items.len()).unwrap_or(0);
            batches.push(BackupBatch {
                size: dir_size(&path),
                path,
                created,
                item_count,
            });
        }

        batches.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(batches)
    }

    /// Delete batches older than the retention window; returns how many
    /// were removed. Safe to run alongside active backups: a batch being
    /// written is by definition inside the window.
    pub fn clean_old_backups(&self) -> Result<usize> {
        let cutoff = Utc::now() - Duration::days(i64::from(self.retention_days));
        let mut removed = 0usize;

        for batch in self.list_backups()? {
            if batch.created < cutoff {
                std::fs::remove_dir_all(&batch.path).with_context(|| {
                    format!("Failed to remove old backup: {}", batch.path.display())
                })?;
                removed += 1;
            }
        }

        Ok(removed)
    }

    fn create_batch_dir(&self) -> Result<PathBuf> {
        let stamp = Utc::now().format(BATCH_FORMAT).to_string();
        let mut dir = self.root.join(&stamp);

        // Two batches within the same second get a numeric suffix
        let mut n = 1;
        while dir.exists() {
            n += 1;
            dir = self.root.join(format!("{}-{}", stamp, n));
        }

        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create batch dir: {}", dir.display()))?;
        Ok(dir)
    }
}

/// Destination inside the batch for an item, disambiguated on name clash
fn unique_destination(batch_dir: &Path, source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "item".to_string());

    let mut dest = batch_dir.join(&name);
    let mut n = 1;
    while dest.exists() {
        n += 1;
        dest = batch_dir.join(format!("{}.{}", name, n));
    }
    dest
}

fn batch_timestamp(path: &Path) -> Option<DateTime<Utc>> {
    let name = path.file_name()?.to_str()?;
    let stamp = name.get(..19)?;
    let naive = NaiveDateTime::parse_from_str(stamp, BATCH_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

fn read_manifest(batch_dir: &Path) -> Option<BatchManifest> {
    let contents = std::fs::read_to_string(batch_dir.join("manifest.json")).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Recursively copy a directory
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;

    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }

    Ok(())
}
