//! Line-oriented recognition of base/result mismatch records.
//!
//! A record is spread over a few log lines:
//!
//! ```text
//! curBaseFile:
//!     file:///home/dev/lsp/test/cases/t1.cj
//! ... inBase={old} ...
//! ... result={new} ...
//! ```
//!
//! [`RecordScanner`] accumulates the three fields in a [`PendingRecord`] and
//! emits a [`CompletedRecord`] once all of them are known. [`scan`] drives it
//! over a whole log.

use crate::paths::{PathResolver, extract_uri};
use regex::Regex;
use serde::Serialize;
use std::iter::Peekable;
use std::str::Lines;
use std::sync::LazyLock;

pub const PATH_MARKER: &str = "curBaseFile:";
pub const EXPECTED_MARKER: &str = "inBase={";
pub const ACTUAL_MARKER: &str = "result={";

static EXPECTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"inBase=\{(.+?)\}").expect("expected-marker regex is valid"));
static ACTUAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"result=\{(.*)\}").expect("actual-marker regex is valid"));

/// What happens to an already captured expected/actual value when a new path
/// marker shows up before the record completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Keep them; a later marker may complete the record for the new path.
    #[default]
    Preserve,
    /// Drop captured expected/actual values when the new path replaces a
    /// different pending path. A path arriving after its values (the order
    /// the test harness prints them in) still completes the record.
    ResetOnNewPath,
}

#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    pub resolver: PathResolver,
    pub stale_policy: StalePolicy,
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }
}

/// The in-progress accumulator for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingRecord {
    pub fixture_path: Option<String>,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl PendingRecord {
    pub fn is_empty(&self) -> bool {
        self.fixture_path.is_none() && self.expected.is_none() && self.actual.is_none()
    }

    pub fn is_complete(&self) -> bool {
        [&self.fixture_path, &self.expected, &self.actual]
            .iter()
            .all(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Take the fields out if the record is complete, leaving it empty.
    fn take_complete(&mut self, line: usize) -> Option<CompletedRecord> {
        if !self.is_complete() {
            return None;
        }
        let PendingRecord {
            fixture_path,
            expected,
            actual,
        } = std::mem::take(self);
        Some(CompletedRecord {
            fixture_path: fixture_path?,
            expected: expected?,
            actual: actual?,
            line,
        })
    }
}

/// A fully recognized record, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedRecord {
    /// Project-relative fixture path, e.g. `./cases/t1.cj`.
    pub fixture_path: String,
    /// The `inBase={...}` text that gated completion.
    pub expected: String,
    /// Brace-wrapped actual value; this is what gets written.
    pub actual: String,
    /// 1-based log line on which the record completed.
    pub line: usize,
}

/// Result of feeding one line to the scanner.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Feed {
    pub record: Option<CompletedRecord>,
    /// The lookahead line was consumed as a path continuation and must not be
    /// fed on its own.
    pub skip_next: bool,
}

#[derive(Debug, Clone)]
pub struct RecordScanner {
    config: ScanConfig,
    pending: PendingRecord,
    line_no: usize,
}

impl RecordScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            pending: PendingRecord::default(),
            line_no: 0,
        }
    }

    pub fn pending(&self) -> &PendingRecord {
        &self.pending
    }

    /// Number of log lines consumed so far, lookahead lines included.
    pub fn lines_seen(&self) -> usize {
        self.line_no
    }

    /// Process `line`. `lookahead` is the line that follows it, needed when
    /// `line` is a path marker.
    pub fn feed(&mut self, line: &str, lookahead: Option<&str>) -> Feed {
        self.line_no += 1;
        let current = self.line_no;
        let mut skip_next = false;

        if line.trim().ends_with(PATH_MARKER) {
            if let Some(next) = lookahead {
                self.take_path(next);
                self.line_no += 1;
                skip_next = true;
            }
        }

        if line.contains(EXPECTED_MARKER)
            && let Some(m) = EXPECTED_RE.find(line)
        {
            self.pending.expected = Some(m.as_str().trim().to_string());
        }

        if line.contains(ACTUAL_MARKER)
            && self.pending.expected.is_some()
            && let Some(payload) = ACTUAL_RE.captures(line).and_then(|c| c.get(1))
        {
            self.pending.actual = Some(format!("{{{}}}", payload.as_str().trim()));
        }

        Feed {
            record: self.pending.take_complete(current),
            skip_next,
        }
    }

    fn take_path(&mut self, next: &str) {
        let Some(uri) = extract_uri(next) else {
            if debug_enabled() {
                eprintln!(
                    "Debug: line {}: path marker without a file URI",
                    self.line_no
                );
            }
            return;
        };
        let resolved = self.config.resolver.resolve(uri);
        if resolved.is_none() && debug_enabled() {
            eprintln!(
                "Debug: line {}: no `{}/` segment in {}",
                self.line_no + 1,
                self.config.resolver.anchor(),
                uri
            );
        }
        if self.config.stale_policy == StalePolicy::ResetOnNewPath
            && self.pending.fixture_path.is_some()
            && self.pending.fixture_path != resolved
        {
            self.pending.expected = None;
            self.pending.actual = None;
        }
        self.pending.fixture_path = resolved;
    }

    /// End of input. Returns whatever was left unfinished; it is never written.
    pub fn finish(self) -> PendingRecord {
        if !self.pending.is_empty() && debug_enabled() {
            eprintln!(
                "Debug: dropping incomplete record at end of log: {:?}",
                self.pending
            );
        }
        self.pending
    }
}

/// Iterator over the completed records of a log.
pub struct Records<'a> {
    lines: Peekable<Lines<'a>>,
    scanner: Option<RecordScanner>,
}

impl Iterator for Records<'_> {
    type Item = CompletedRecord;

    fn next(&mut self) -> Option<CompletedRecord> {
        let scanner = self.scanner.as_mut()?;
        while let Some(line) = self.lines.next() {
            let feed = scanner.feed(line, self.lines.peek().copied());
            if feed.skip_next {
                self.lines.next();
            }
            if feed.record.is_some() {
                return feed.record;
            }
        }
        if let Some(scanner) = self.scanner.take() {
            scanner.finish();
        }
        None
    }
}

/// Scan `text` line by line for completed records.
pub fn scan<'a>(text: &'a str, config: &ScanConfig) -> Records<'a> {
    Records {
        lines: text.lines().peekable(),
        scanner: Some(RecordScanner::new(config.clone())),
    }
}

fn debug_enabled() -> bool {
    std::env::var_os("BASEFIX_DEBUG").is_some()
}
