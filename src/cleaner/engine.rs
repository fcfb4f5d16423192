use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::cleaner::backup::BackupManager;
use crate::scanner::types::{CleanResult, ReclaimableItem, SafetyLevel, ScanResult};
use crate::scanner::{CategoryScanner, Scanner};

/// Options for one clean run
#[derive(Debug, Clone, Copy)]
pub struct CleanOptions {
    /// Simulate only: nothing on disk changes, no commands run
    pub dry_run: bool,
    /// Back up moderate-level categories before deletion.
    /// Risky categories are always backed up; safe ones never are.
    pub backup: bool,
    /// Show progress bars during backup
    pub show_progress: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup: true,
            show_progress: true,
        }
    }
}

/// Outcome for one category within a pipeline run
#[derive(Debug, Serialize)]
pub struct CategoryOutcome {
    pub result: CleanResult,
    /// Batch directory holding this category's backups, when one was taken
    pub backup_dir: Option<std::path::PathBuf>,
    /// Items excluded from deletion because their backup failed or the
    /// source vanished between scan and clean
    pub not_backed_up: usize,
}

/// Aggregate outcome of a full clean run
#[derive(Debug, Serialize)]
pub struct PipelineReport {
    pub outcomes: Vec<CategoryOutcome>,
    pub total_cleaned_items: usize,
    pub total_freed_space: u64,
    /// Old backup batches purged at the end of the run
    pub purged_backups: usize,
}

/// Whether a category of this safety level gets a backup pass
fn wants_backup(level: SafetyLevel, opts: &CleanOptions) -> bool {
    if opts.dry_run {
        return false;
    }
    match level {
        SafetyLevel::Risky => true,
        SafetyLevel::Moderate => opts.backup,
        SafetyLevel::Safe => false,
    }
}

/// Clean one category's selected items, backing them up first when the
/// safety policy requires it.
///
/// Items that could not be backed up (missing source, copy failure) are
/// withheld from deletion entirely; each one surfaces as an error entry so
/// the run never silently drops work.
pub fn clean_category(
    scanner: &CategoryScanner,
    items: &[ReclaimableItem],
    opts: &CleanOptions,
    backups: &BackupManager,
) -> Result<CategoryOutcome> {
    let category = scanner.category();

    if items.is_empty() || !wants_backup(category.safety_level, opts) {
        return Ok(CategoryOutcome {
            result: scanner.clean(items, opts.dry_run),
            backup_dir: None,
            not_backed_up: 0,
        });
    }

    let bar = progress_bar(opts, items.len(), category.name);
    let mut tick = |_: &ReclaimableItem, done: usize, _: usize| {
        if let Some(pb) = &bar {
            pb.set_position(done as u64);
        }
    };
    let report = backups.backup_items(items, Some(&mut tick))?;
    if let Some(pb) = &bar {
        pb.finish_and_clear();
    }

    tracing::info!(
        category = category.id,
        backed_up = report.backed_up.len(),
        skipped = report.skipped.len(),
        batch = %report.batch_dir.display(),
        "backup complete"
    );

    let not_backed_up = report.skipped.len();
    let mut result = scanner.clean(&report.backed_up, opts.dry_run);
    for item in &report.skipped {
        result
            .errors
            .push(format!("{}: not backed up, skipped", item.path.display()));
    }

    Ok(CategoryOutcome {
        result,
        backup_dir: Some(report.batch_dir),
        not_backed_up,
    })
}

/// Run the clean pipeline over a set of per-category selections, then
/// purge backup batches past retention.
pub fn run_pipeline(
    selections: &[(CategoryScanner, Vec<ReclaimableItem>)],
    opts: &CleanOptions,
    backups: &BackupManager,
) -> Result<PipelineReport> {
    let mut outcomes = Vec::with_capacity(selections.len());

    for (scanner, items) in selections {
        outcomes.push(clean_category(scanner, items, opts, backups)?);
    }

    // A dry run has zero side effects, including backup maintenance
    let purged_backups = if opts.dry_run {
        0
    } else {
        match backups.clean_old_backups() {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "failed to purge old backups");
                0
            }
        }
    };

    Ok(PipelineReport {
        total_cleaned_items: outcomes.iter().map(|o| o.result.cleaned_items).sum(),
        total_freed_space: outcomes.iter().map(|o| o.result.freed_space).sum(),
        outcomes,
        purged_backups,
    })
}

/// Pair scan results with their scanners, keeping only non-empty ones
pub fn selections_from_scans(
    scanners: Vec<CategoryScanner>,
    results: Vec<ScanResult>,
) -> Vec<(CategoryScanner, Vec<ReclaimableItem>)> {
    scanners
        .into_iter()
        .zip(results)
        .filter(|(_, r)| !r.items.is_empty())
        .map(|(s, r)| (s, r.items))
        .collect()
}

fn progress_bar(opts: &CleanOptions, total: usize, name: &str) -> Option<ProgressBar> {
    if !opts.show_progress {
        return None;
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(format!("Backing up {}", name));
    Some(pb)
}
