//! Per-check diagnostic messages kept across evaluations

use super::checks::{CheckName, CheckOutcome, CheckResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub outcome: CheckOutcome,
    /// Evaluation number (1-based) that wrote this entry.
    pub cycle: u64,
    pub recorded_at: DateTime<Utc>,
    pub response_time_ms: u64,
}

/// Last message written by each sub-check.
///
/// Entries are only overwritten by a check that actually ran. A check that
/// was skipped keeps whatever an earlier evaluation left, so compare
/// [`Diagnostic::cycle`] against the latest cycle (or use [`is_fresh`]) to
/// tell a stale entry from a fresh one.
///
/// [`is_fresh`]: DiagnosticMessages::is_fresh
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DiagnosticMessages {
    entries: BTreeMap<CheckName, Diagnostic>,
}

impl DiagnosticMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &CheckResult, cycle: u64) {
        let diagnostic = Diagnostic {
            message: result.message.clone(),
            outcome: result.outcome,
            cycle,
            recorded_at: Utc::now(),
            response_time_ms: result.response_time_ms,
        };

        self.entries.insert(result.check, diagnostic);
    }

    pub fn get(&self, check: CheckName) -> Option<&Diagnostic> {
        self.entries.get(&check)
    }

    pub fn message(&self, check: CheckName) -> Option<&str> {
        self.get(check).map(|d| d.message.as_str())
    }

    pub fn is_fresh(&self, check: CheckName, cycle: u64) -> bool {
        self.get(check).map_or(false, |d| d.cycle == cycle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CheckName, &Diagnostic)> {
        self.entries.iter().map(|(check, diagnostic)| (*check, diagnostic))
    }

    /// Plain messages keyed by the reporting names of the checks.
    pub fn to_status_messages(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(check, d)| (check.as_str().to_string(), d.message.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
