use crate::ScanArgs;
use anyhow::{Context, Result};
use basefix::{BaseFix, FixError, FixReport};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FixOptions {
    pub root: PathBuf,
    pub dry_run: bool,
    pub diff: bool,
    pub json: bool,
}

pub fn run(scan: ScanArgs, opts: FixOptions, pretty: bool) -> Result<()> {
    let fixer = BaseFix::new()
        .with_anchor(scan.anchor.as_str())
        .context("Invalid --anchor")?
        .with_stale_policy(scan.stale_policy())
        .with_root(&opts.root)
        .dry_run(opts.dry_run)
        .with_diff(opts.diff);

    let report = match fixer.fix_log(&scan.log) {
        Ok(report) => report,
        // A missing log is not a failure; there is nothing to fix.
        Err(FixError::LogNotFound(path)) => {
            eprintln!("Log file not found: {}", path.display());
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to fix fixtures from {:?}", scan.log));
        }
    };

    println!("{}", render(&report, opts.json, pretty)?);
    Ok(())
}

fn render(report: &FixReport, json: bool, pretty: bool) -> Result<String> {
    if !json {
        return Ok(report.to_string());
    }
    let out = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    out.context("Failed to serialize fix report")
}
