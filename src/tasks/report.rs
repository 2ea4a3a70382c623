//! Task reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to a single step of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Succeeded,
    Failed { code: i32 },
    /// Failed, but the failure is expected and ignored (e.g. nothing to stop)
    Tolerated { code: i32 },
    /// Not executed: an earlier step failed, or there was nothing to do
    Skipped,
    /// Dry-run: would have been executed
    Planned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: String,
    pub command: String,
    #[serde(flatten)]
    pub status: StepStatus,
}

/// Outcome of one task invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReport {
    pub task: String,
    pub dry_run: bool,
    pub success: bool,
    pub steps: Vec<StepOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Raw payload printed verbatim in human mode (e.g. a rendered Dockerfile)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reclaimed_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl TaskReport {
    pub fn new(task: &str, dry_run: bool) -> Self {
        Self {
            task: task.to_string(),
            dry_run,
            success: false,
            steps: Vec::new(),
            details: Vec::new(),
            message: None,
            output: None,
            reclaimed_bytes: None,
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn push(&mut self, step: &str, command: String, status: StepStatus) {
        self.steps.push(StepOutcome {
            step: step.to_string(),
            command,
            status,
        });
    }

    pub fn add_reclaimed(&mut self, bytes: u64) {
        *self.reclaimed_bytes.get_or_insert(0) += bytes;
    }

    #[cfg(test)]
    pub fn step(&self, name: &str) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.step == name)
    }
}
