use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use std::io::Write;

use clean_my_mac::cleaner::backup::BackupManager;
use clean_my_mac::cleaner::engine::{self, CleanOptions};
use clean_my_mac::cli::args::{
    BackupsAction, Cli, Commands, CompletionShell, ConfigAction, OutputFormat,
};
use clean_my_mac::cli::output;
use clean_my_mac::common::config::Config;
use clean_my_mac::common::format::format_size;
use clean_my_mac::common::paths::{expand_paths, ScanPaths};
use clean_my_mac::duplicates::find_duplicate_groups;
use clean_my_mac::scanner::{self, CategoryScanner, Scanner};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("clean_my_mac=debug")
            .init();
    }

    match cli.command {
        Commands::Scan {
            ref categories,
            detailed,
        } => cmd_scan(&cli, categories.as_deref(), detailed),

        Commands::Clean {
            ref categories,
            dry_run,
            yes,
            no_backup,
        } => cmd_clean(&cli, categories.as_deref(), dry_run, yes, no_backup),

        Commands::Dup {
            ref path,
            min_size,
            detailed,
        } => cmd_dup(&cli, path, min_size, detailed),

        Commands::Backups { ref action } => cmd_backups(&cli, action),

        Commands::Config { ref action } => cmd_config(&cli, action),

        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                CompletionShell::Bash => clap_complete::Shell::Bash,
                CompletionShell::Zsh => clap_complete::Shell::Zsh,
                CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "clean-my-mac", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Resolve category ids into config-tuned scanners, failing on unknown
/// ids. When no ids are given, `default_risky` decides whether risky
/// categories are part of the default set.
fn resolve_scanners(
    categories: Option<&[String]>,
    default_risky: bool,
    config: &Config,
) -> Result<Vec<CategoryScanner>> {
    let mut scanners = scanner::scanners_from_config(config);
    match categories {
        Some(ids) => {
            let known: Vec<&str> = scanners.iter().map(|s| s.category().id).collect();
            for id in ids {
                if !known.contains(&id.as_str()) {
                    bail!("unknown category '{}' (available: {})", id, known.join(", "));
                }
            }
            scanners.retain(|s| ids.iter().any(|id| id == s.category().id));
        }
        None => {
            if !default_risky {
                scanners.retain(|s| {
                    s.category().safety_level != clean_my_mac::scanner::types::SafetyLevel::Risky
                });
            }
        }
    }
    Ok(scanners)
}

// ─── Scan ─────────────────────────────────────────────────────────────────────

fn cmd_scan(cli: &Cli, categories: Option<&[String]>, detailed: bool) -> Result<()> {
    let config = Config::load()?;
    let scanners = resolve_scanners(categories, true, &config)?;
    let paths = ScanPaths::from_config(&config);

    if !cli.quiet && matches!(cli.format, OutputFormat::Human) {
        println!("Scanning {} categories...", scanners.len());
    }

    let results = scanner::scan_all(&scanners, &paths);

    match cli.format {
        OutputFormat::Human => output::print_scan_results(&results, detailed),
        OutputFormat::Json => output::print_scan_json(&results),
        OutputFormat::Quiet => output::print_scan_quiet(&results),
    }

    Ok(())
}

// ─── Clean ────────────────────────────────────────────────────────────────────

fn cmd_clean(
    cli: &Cli,
    categories: Option<&[String]>,
    dry_run: bool,
    yes: bool,
    no_backup: bool,
) -> Result<()> {
    let config = Config::load()?;

    // Risky categories are opt-in by explicit name, never part of a bare
    // `clean`
    let scanners = resolve_scanners(categories, false, &config)?;
    let paths = ScanPaths::from_config(&config);

    if !cli.quiet && matches!(cli.format, OutputFormat::Human) {
        println!("Scanning {} categories...", scanners.len());
    }
    let results = scanner::scan_all(&scanners, &paths);

    let total: u64 = results.iter().map(|r| r.total_size).sum();
    let selections = engine::selections_from_scans(scanners, results);

    if selections.is_empty() {
        if !cli.quiet {
            println!("Nothing to clean.");
        }
        return Ok(());
    }

    if !dry_run && !yes && !confirm(&format!("Reclaim {}?", format_size(total)))? {
        println!("Aborted.");
        return Ok(());
    }

    let opts = CleanOptions {
        dry_run,
        backup: config.backup_by_default && !no_backup,
        show_progress: !cli.quiet && matches!(cli.format, OutputFormat::Human),
    };
    let backups = BackupManager::with_default_location(config.backup_retention_days);

    let report = engine::run_pipeline(&selections, &opts, &backups)?;

    match cli.format {
        OutputFormat::Human => output::print_clean_report(&report, dry_run),
        OutputFormat::Json => output::print_clean_json(&report),
        OutputFormat::Quiet => {
            println!("{}\t{}", report.total_freed_space, report.total_cleaned_items)
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt.bold());
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

// ─── Dup ──────────────────────────────────────────────────────────────────────

fn cmd_dup(cli: &Cli, path: &str, min_size: Option<u64>, detailed: bool) -> Result<()> {
    let config = Config::load()?;
    let min_size = min_size.unwrap_or(config.min_duplicate_size);

    let roots = expand_paths(&[path.to_string()]);
    if roots.iter().all(|r| !r.exists()) {
        bail!("path does not exist: {}", path);
    }

    let spinner = if !cli.quiet && matches!(cli.format, OutputFormat::Human) {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_message("Hashing files...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let groups = find_duplicate_groups(&roots, min_size, &config.exclude_paths);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match cli.format {
        OutputFormat::Human => output::print_dup_groups(&groups, detailed),
        OutputFormat::Json => {
            let wasted: u64 = groups.iter().map(|g| g.wasted_bytes()).sum();
            let json = serde_json::json!({
                "groups": groups.iter().map(|g| serde_json::json!({
                    "size": g.size,
                    "wasted_bytes": g.wasted_bytes(),
                    "paths": g.paths,
                })).collect::<Vec<_>>(),
                "total_wasted": wasted,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Quiet => {
            for group in &groups {
                for path in group.paths.iter().skip(1) {
                    println!("{}\t{}", group.size, path.display());
                }
            }
        }
    }

    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(cli: &Cli, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                _ => print!("{}", toml::to_string_pretty(&config)?),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            if !cli.quiet {
                println!("Set {} = {}", key, value);
            }
        }
    }
    Ok(())
}

// ─── Backups ──────────────────────────────────────────────────────────────────

fn cmd_backups(cli: &Cli, action: &BackupsAction) -> Result<()> {
    let config = Config::load()?;
    let backups = BackupManager::with_default_location(config.backup_retention_days);

    match action {
        BackupsAction::List => {
            let batches = backups.list_backups()?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&batches)?),
                _ => output::print_backup_list(&batches),
            }
        }
        BackupsAction::Purge => {
            let removed = backups.clean_old_backups()?;
            if !cli.quiet {
                println!(
                    "Removed {} backup batch(es) older than {} days.",
                    removed, config.backup_retention_days
                );
            }
        }
    }

    Ok(())
}
