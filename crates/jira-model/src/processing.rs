use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Pipeline phases, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PhaseKind {
    Extract,
    ResolveUsers,
    ResolveIssueTypes,
    Substitute,
    Split,
    Prune,
}

impl PhaseKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Extract => "Extract identifiers",
            Self::ResolveUsers => "User mapping",
            Self::ResolveIssueTypes => "Issue type mapping",
            Self::Substitute => "Substitute",
            Self::Split => "Split",
            Self::Prune => "Prune empty columns",
        }
    }
}

/// Best-effort result of one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseReport {
    pub phase: PhaseKind,
    /// Number of items the phase produced (identifiers, entries, lines, files).
    pub items: usize,
    pub output: Option<PathBuf>,
    pub failed: bool,
    pub message: Option<String>,
}

impl PhaseReport {
    pub fn completed(phase: PhaseKind, items: usize, output: Option<PathBuf>) -> Self {
        Self {
            phase,
            items,
            output,
            failed: false,
            message: None,
        }
    }

    pub fn failed(phase: PhaseKind, items: usize, message: impl Into<String>) -> Self {
        Self {
            phase,
            items,
            output: None,
            failed: true,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub phases: Vec<PhaseReport>,
}

impl RunReport {
    pub fn push(&mut self, report: PhaseReport) {
        self.phases.push(report);
    }

    pub fn has_failures(&self) -> bool {
        self.phases.iter().any(|phase| phase.failed)
    }
}
