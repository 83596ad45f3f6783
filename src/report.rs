//! Result records produced by one analysis run.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::analysis::{DeadlockResult, Optimum};

#[derive(Debug, Clone, Serialize)]
pub struct DeadlockReportEntry {
    pub strategy: String,
    pub found: bool,
    /// Token vector of the witness, when one was found.
    pub marking: Option<Vec<u64>>,
    /// Reason classification, when no deadlock was reported.
    pub reason: Option<String>,
    pub iterations: Option<usize>,
}

impl DeadlockReportEntry {
    pub fn from_result(strategy: &str, result: &DeadlockResult) -> Self {
        match result {
            DeadlockResult::Found {
                marking,
                iterations,
            } => Self {
                strategy: strategy.to_string(),
                found: true,
                marking: Some(marking.iter().map(|(_, &tokens)| tokens).collect()),
                reason: None,
                iterations: Some(*iterations),
            },
            DeadlockResult::NotFound(reason) => Self {
                strategy: strategy.to_string(),
                found: false,
                marking: None,
                reason: Some(reason.to_string()),
                iterations: None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimumReport {
    pub marking: Vec<u64>,
    pub value: i64,
}

impl From<&Optimum> for OptimumReport {
    fn from(optimum: &Optimum) -> Self {
        Self {
            marking: optimum.marking.iter().map(|(_, &tokens)| tokens).collect(),
            value: optimum.value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub model: String,
    pub places: usize,
    pub transitions: usize,
    /// Exact count, as a decimal string (it can exceed u64).
    pub reachable_count: String,
    pub fixed_point_passes: usize,
    /// Explicit-state count, when the compare mode ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_count: Option<usize>,
    pub deadlock: Vec<DeadlockReportEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimum: Option<OptimumReport>,
    pub elapsed_ms: u128,
}

impl AnalysisReport {
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        let content = serde_json::to_string_pretty(self)?;
        file.write_all(content.as_bytes())?;
        file.write_all(b"\n")
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} places, {} transitions",
            self.model, self.places, self.transitions
        )?;
        writeln!(
            f,
            "reachable markings: {} ({} fixed-point passes)",
            self.reachable_count, self.fixed_point_passes
        )?;
        if let Some(explicit) = self.explicit_count {
            writeln!(f, "explicit baseline:  {explicit}")?;
        }
        for entry in &self.deadlock {
            match (&entry.marking, &entry.reason) {
                (Some(marking), _) => {
                    writeln!(f, "deadlock [{}]: found at {marking:?}", entry.strategy)?
                }
                (None, Some(reason)) => {
                    writeln!(f, "deadlock [{}]: none ({reason})", entry.strategy)?
                }
                (None, None) => writeln!(f, "deadlock [{}]: none", entry.strategy)?,
            }
        }
        if let Some(optimum) = &self.optimum {
            writeln!(
                f,
                "optimum: value {} at {:?}",
                optimum.value, optimum.marking
            )?;
        }
        write!(f, "elapsed: {} ms", self.elapsed_ms)
    }
}
