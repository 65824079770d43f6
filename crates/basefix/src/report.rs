use crate::writer::FixOutcome;
use serde::Serialize;
use std::fmt;

/// Tally of one run over a build log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixReport {
    outcomes: Vec<FixOutcome>,
    fixed: usize,
}

impl FixReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: FixOutcome) {
        if matches!(outcome, FixOutcome::Updated { .. }) {
            self.fixed += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[FixOutcome] {
        &self.outcomes
    }

    /// Number of fixtures written.
    pub fn fixed(&self) -> usize {
        self.fixed
    }

    pub fn missing(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FixOutcome::Missing { .. }))
            .count()
    }

    pub fn would_update(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FixOutcome::WouldUpdate { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn summary(&self) -> String {
        let noun = if self.fixed == 1 {
            "test case"
        } else {
            "test cases"
        };
        format!("Fixed {} {}", self.fixed, noun)
    }
}

impl fmt::Display for FixOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixOutcome::Updated { path, .. } => write!(f, "Updated file: {path}"),
            FixOutcome::WouldUpdate { path, .. } => write!(f, "Would update file: {path}"),
            FixOutcome::Missing { path } => write!(f, "File not found: {path}"),
        }
    }
}

/// One line per outcome, then the summary.
impl fmt::Display for FixReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{outcome}")?;
            if let FixOutcome::WouldUpdate {
                diff: Some(diff), ..
            } = outcome
            {
                write!(f, "{diff}")?;
            }
        }
        write!(f, "{}", self.summary())
    }
}
