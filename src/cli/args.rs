use clap::{Parser, Subcommand, ValueEnum};

/// clean-my-mac — reclaim disk space from caches, logs, and duplicates
#[derive(Parser, Debug)]
#[command(
    name = "clean-my-mac",
    version,
    about = "Reclaim disk space from developer caches, logs, and duplicate files",
    long_about = "clean-my-mac scans your Mac for reclaimable space: Docker artifacts,\n\
                   Homebrew caches, log files, node_modules trees, and duplicate files.\n\
                   Clean safely with dry-run and automatic backups for risky categories.",
    after_help = "EXAMPLES:\n  \
        clean-my-mac scan                          Scan all categories\n  \
        clean-my-mac scan --categories docker      Scan only Docker\n  \
        clean-my-mac scan --format json            Machine-readable results\n  \
        clean-my-mac clean --dry-run               Preview without deleting\n  \
        clean-my-mac clean --categories system-logs,node-modules\n  \
        clean-my-mac dup ~/Pictures --min-size 4096  Find duplicate files\n  \
        clean-my-mac backups list                  Show backup batches\n  \
        clean-my-mac backups purge                 Remove expired backups"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode — minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan for reclaimable space
    Scan {
        /// Only scan specific categories (comma-separated ids)
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<String>>,

        /// Show individual items in results
        #[arg(long)]
        detailed: bool,
    },

    /// Reclaim scanned space
    Clean {
        /// Only clean specific categories (comma-separated ids)
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<String>>,

        /// Simulate — show what would be cleaned without deleting
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Skip backup for moderate-risk categories (risky ones are always backed up)
        #[arg(long)]
        no_backup: bool,
    },

    /// Find duplicate files
    Dup {
        /// Directory to scan for duplicates
        #[arg(default_value = "~")]
        path: String,

        /// Minimum file size to consider, in bytes (defaults to the
        /// configured min_duplicate_size)
        #[arg(long)]
        min_size: Option<u64>,

        /// Show every file in each group
        #[arg(long)]
        detailed: bool,
    },

    /// Manage backup batches
    Backups {
        #[command(subcommand)]
        action: BackupsAction,
    },

    /// View or edit configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum BackupsAction {
    /// List existing backup batches
    List,
    /// Remove batches older than the retention window
    Purge,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,
    /// Set a configuration value and save it
    Set { key: String, value: String },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
