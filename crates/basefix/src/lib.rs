#![doc = include_str!("../README.md")]

pub mod error;
pub mod paths;
pub mod report;
pub mod scanner;
pub mod writer;

pub use error::{FixError, Result};
pub use paths::PathResolver;
pub use report::FixReport;
pub use scanner::{
    CompletedRecord, PendingRecord, RecordScanner, Records, ScanConfig, StalePolicy, scan,
};
pub use writer::{FixOutcome, FixtureWriter};

use std::path::{Path, PathBuf};

/// Default log file name, relative to the working directory.
pub const DEFAULT_LOG: &str = "build_log.txt";

/// High-level interface: scan a build log and rewrite the fixtures it reports.
///
/// # Example
///
/// ```rust
/// use basefix::BaseFix;
///
/// let log = "curBaseFile:\nfile:///repo/test/cases/t1.cj\ninBase={old}\nresult={new}\n";
/// let records: Vec<_> = BaseFix::new().records(log).collect();
///
/// assert_eq!(records[0].fixture_path, "./cases/t1.cj");
/// assert_eq!(records[0].actual, "{new}");
/// ```
#[derive(Debug, Clone)]
pub struct BaseFix {
    scan: ScanConfig,
    root: PathBuf,
    dry_run: bool,
    diff: bool,
}

impl Default for BaseFix {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseFix {
    pub fn new() -> Self {
        Self {
            scan: ScanConfig::default(),
            root: PathBuf::from("."),
            dry_run: false,
            diff: false,
        }
    }

    /// Directory the `./...` fixture paths are relative to.
    pub fn with_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_anchor<S: Into<String>>(mut self, anchor: S) -> Result<Self> {
        self.scan.resolver = self.scan.resolver.with_anchor(anchor)?;
        Ok(self)
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.scan.stale_policy = policy;
        self
    }

    /// Report what would be written without touching any fixture.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_diff(mut self, diff: bool) -> Self {
        self.diff = diff;
        self
    }

    pub fn scan_config(&self) -> &ScanConfig {
        &self.scan
    }

    pub fn writer(&self) -> FixtureWriter {
        FixtureWriter::new(&self.root)
            .dry_run(self.dry_run)
            .with_diff(self.diff)
    }

    pub fn records<'a>(&self, text: &'a str) -> Records<'a> {
        scan(text, &self.scan)
    }

    /// Apply every completed record in `text`. Missing fixtures are recorded
    /// and skipped; write failures abort the run.
    pub fn fix_text(&self, text: &str) -> Result<FixReport> {
        let writer = self.writer();
        let mut report = FixReport::new();
        for record in self.records(text) {
            report.record(writer.apply(&record)?);
        }
        Ok(report)
    }

    pub fn fix_log<P: AsRef<Path>>(&self, log: P) -> Result<FixReport> {
        let text = read_log(log)?;
        self.fix_text(&text)
    }
}

/// Read a whole log into memory. Invalid UTF-8 is replaced rather than
/// rejected.
pub fn read_log<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FixError::LogNotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| FixError::ReadLog {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
