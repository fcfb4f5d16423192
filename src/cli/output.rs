use colored::*;

use crate::cleaner::backup::BackupBatch;
use crate::cleaner::engine::PipelineReport;
use crate::common::format::{format_count, format_path, format_size, format_size_colored, truncate};
use crate::duplicates::DuplicateGroup;
use crate::scanner::types::{SafetyLevel, ScanResult};

fn rule() -> String {
    "─".repeat(60).dimmed().to_string()
}

fn safety_dot(level: SafetyLevel) -> ColoredString {
    match level {
        SafetyLevel::Safe => "●".green(),
        SafetyLevel::Moderate => "●".yellow(),
        SafetyLevel::Risky => "●".red(),
    }
}

/// Print scan results in human-readable format
pub fn print_scan_results(results: &[ScanResult], detailed: bool) {
    let total: u64 = results.iter().map(|r| r.total_size).sum();
    let item_count: usize = results.iter().map(|r| r.items.len()).sum();

    println!();
    println!("  Scan Results");
    println!("{}", rule());
    println!(
        "  {} reclaimable  •  {}",
        format_size_colored(total),
        format_count(item_count).dimmed()
    );
    println!("{}", rule());
    println!();

    if item_count == 0 {
        println!("  {} Nothing to reclaim!", "✨".to_string());
        println!();
        return;
    }

    for result in results {
        if result.items.is_empty() {
            continue;
        }
        println!(
            "  {} {} ({}, {})",
            safety_dot(result.category.safety_level),
            result.category.name.bold(),
            format_size_colored(result.total_size),
            format_count(result.items.len()).dimmed()
        );
        if detailed {
            for item in &result.items {
                println!(
                    "      {}  {}",
                    format_size(item.size).dimmed(),
                    truncate(&format_path(&item.path), 70)
                );
            }
        }
        println!();
    }

    println!("{}", rule());
    println!(
        "  Run {} to reclaim this space",
        "clean-my-mac clean".cyan()
    );
    println!();
}

pub fn print_scan_json(results: &[ScanResult]) {
    match serde_json::to_string_pretty(results) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize results: {}", e),
    }
}

/// One line per category: id, bytes, item count
pub fn print_scan_quiet(results: &[ScanResult]) {
    for result in results {
        println!(
            "{}\t{}\t{}",
            result.category.id,
            result.total_size,
            result.items.len()
        );
    }
}

/// Print the outcome of a clean run
pub fn print_clean_report(report: &PipelineReport, dry_run: bool) {
    println!();
    if dry_run {
        println!("  {} (no changes were made)", "Dry Run".yellow().bold());
    } else {
        println!("  {}", "Clean Complete".green().bold());
    }
    println!("{}", rule());

    for outcome in &report.outcomes {
        let r = &outcome.result;
        println!(
            "  {} {}: {} freed, {}",
            safety_dot(r.category.safety_level),
            r.category.name,
            format_size_colored(r.freed_space),
            format_count(r.cleaned_items).dimmed()
        );
        for error in &r.errors {
            println!("      {} {}", "→".dimmed(), error.yellow());
        }
    }

    println!("{}", rule());
    println!(
        "  Total: {} across {}",
        format_size_colored(report.total_freed_space),
        format_count(report.total_cleaned_items)
    );
    if report.purged_backups > 0 {
        println!(
            "  {}",
            format!("Purged {} expired backup batch(es)", report.purged_backups).dimmed()
        );
    }
    println!();
}

pub fn print_clean_json(report: &PipelineReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize report: {}", e),
    }
}

/// Print duplicate groups found by the `dup` command
pub fn print_dup_groups(groups: &[DuplicateGroup], detailed: bool) {
    let wasted: u64 = groups.iter().map(|g| g.wasted_bytes()).sum();

    println!();
    println!("  Duplicate Files");
    println!("{}", rule());

    if groups.is_empty() {
        println!("  {} No duplicates found", "✨".to_string());
        println!();
        return;
    }

    println!(
        "  {} groups  •  {} wasted",
        groups.len(),
        format_size_colored(wasted)
    );
    println!();

    for (i, group) in groups.iter().enumerate() {
        println!(
            "  {} {} each, {} copies ({} wasted)",
            format!("#{}", i + 1).dimmed(),
            format_size(group.size),
            group.paths.len(),
            format_size(group.wasted_bytes())
        );
        if detailed {
            println!("      {} {}", "keep".green(), format_path(&group.paths[0]));
            for path in group.paths.iter().skip(1) {
                println!("      {}  {}", "dup".red(), format_path(path));
            }
        } else {
            println!("      {}", format_path(&group.paths[0]).dimmed());
        }
        println!();
    }
}

pub fn print_backup_list(batches: &[BackupBatch]) {
    println!();
    println!("  Backup Batches");
    println!("{}", rule());

    if batches.is_empty() {
        println!("  No backups yet");
        println!();
        return;
    }

    for batch in batches {
        println!(
            "  {}  {}  {}",
            batch.created.format("%Y-%m-%d %H:%M:%S").to_string().cyan(),
            format_size(batch.size),
            format_count(batch.item_count).dimmed()
        );
        println!("      {}", format_path(&batch.path).dimmed());
    }
    println!();
}
