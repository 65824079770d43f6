mod cmd_fix;
mod cmd_scan;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "basefix")]
#[command(about = "Repair test fixtures from the base/result mismatches in a build log")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

/// Options shared by every command that reads a log.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Build log to scan
    #[arg(default_value = basefix::DEFAULT_LOG)]
    pub log: PathBuf,

    /// Directory name where project-relative fixture paths begin
    #[arg(long, default_value = basefix::paths::DEFAULT_ANCHOR)]
    pub anchor: String,

    /// Forget captured base/result values when a different fixture path replaces a pending one
    #[arg(long)]
    pub reset_on_new_path: bool,
}

impl ScanArgs {
    pub fn stale_policy(&self) -> basefix::StalePolicy {
        if self.reset_on_new_path {
            basefix::StalePolicy::ResetOnNewPath
        } else {
            basefix::StalePolicy::Preserve
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Overwrite each fixture reported in the log with its actual value
    Fix {
        #[command(flatten)]
        scan: ScanArgs,

        /// Directory the fixture paths are relative to
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Show a unified diff for each pending change (implies --dry-run)
        #[arg(long)]
        diff: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the records found in the log without touching any fixture
    Scan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fix {
            scan,
            root,
            dry_run,
            diff,
            json,
        } => cmd_fix::run(
            scan,
            cmd_fix::FixOptions {
                root,
                dry_run: dry_run || diff,
                diff,
                json,
            },
            cli.pretty,
        ),
        Commands::Scan { scan, json } => cmd_scan::run(scan, json, cli.pretty),
    }
}
