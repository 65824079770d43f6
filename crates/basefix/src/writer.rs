use crate::error::{FixError, Result};
use crate::scanner::CompletedRecord;
use serde::Serialize;
use similar::TextDiff;
use std::path::{Path, PathBuf};

/// What happened to one completed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FixOutcome {
    /// The fixture was overwritten. `changed` is false when it already held
    /// the actual value.
    Updated { path: String, changed: bool },
    /// Dry run: the fixture exists and would be overwritten.
    WouldUpdate {
        path: String,
        changed: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        diff: Option<String>,
    },
    /// No fixture file at the resolved path.
    Missing { path: String },
}

impl FixOutcome {
    pub fn path(&self) -> &str {
        match self {
            FixOutcome::Updated { path, .. }
            | FixOutcome::WouldUpdate { path, .. }
            | FixOutcome::Missing { path } => path,
        }
    }
}

/// Overwrites fixture files with the actual values of completed records.
#[derive(Debug, Clone)]
pub struct FixtureWriter {
    root: PathBuf,
    dry_run: bool,
    diff: bool,
}

impl Default for FixtureWriter {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FixtureWriter {
    /// Fixture paths are resolved against `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
            diff: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Attach a unified diff to dry-run outcomes.
    pub fn with_diff(mut self, diff: bool) -> Self {
        self.diff = diff;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn target(&self, record: &CompletedRecord) -> PathBuf {
        self.root.join(&record.fixture_path)
    }

    pub fn apply(&self, record: &CompletedRecord) -> Result<FixOutcome> {
        let target = self.target(record);
        let path = record.fixture_path.clone();
        if !target.is_file() {
            return Ok(FixOutcome::Missing { path });
        }

        let current = std::fs::read(&target).map_err(|source| FixError::ReadFixture {
            path: target.clone(),
            source,
        })?;
        let changed = current != record.actual.as_bytes();

        if self.dry_run {
            let diff = if self.diff && changed {
                compute_diff(&String::from_utf8_lossy(&current), &record.actual)
            } else {
                None
            };
            return Ok(FixOutcome::WouldUpdate {
                path,
                changed,
                diff,
            });
        }

        std::fs::write(&target, &record.actual).map_err(|source| FixError::Write {
            path: target.clone(),
            source,
        })?;
        Ok(FixOutcome::Updated { path, changed })
    }
}

fn compute_diff(old: &str, new: &str) -> Option<String> {
    let diff = TextDiff::from_lines(old, new);
    let unified = diff.unified_diff().context_radius(3).to_string();
    if unified.is_empty() {
        None
    } else {
        Some(unified)
    }
}
