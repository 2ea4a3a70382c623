//! Human-readable output formatting

use bytesize::ByteSize;

use crate::tasks::{StepOutcome, StepStatus, TaskReport};

pub fn format_human(report: &TaskReport) -> String {
    // raw payloads (a rendered Dockerfile) are printed as-is so they can be piped
    if let Some(ref output) = report.output {
        return output.trim_end().to_string();
    }

    let title = format!("Task: {}", report.task);
    let mut output = format!("{}\n{}\n", title, "-".repeat(title.len()));

    if report.dry_run {
        output.push_str("[DRY RUN] No commands were executed\n\n");
    }

    if !report.steps.is_empty() {
        let width = report.steps.iter().map(|s| s.step.len()).max().unwrap_or(0);
        for step in &report.steps {
            output.push_str(&format_step(step, width));
            output.push('\n');
        }
    }

    if !report.details.is_empty() {
        output.push('\n');
        for detail in &report.details {
            output.push_str(&format!("  {}\n", detail));
        }
    }

    if let Some(bytes) = report.reclaimed_bytes {
        output.push_str(&format!("\nReclaimed: {}\n", ByteSize(bytes)));
    }

    if let Some(ref msg) = report.message {
        output.push('\n');
        output.push_str(msg);
        output.push('\n');
    }

    if let Some(ref err) = report.error {
        output.push_str(&format!("\nFAILED: {}\n", err));
    }

    if let Some(finished) = report.finished_at {
        let elapsed = finished - report.started_at;
        output.push_str(&format!(
            "\nFinished in {:.1}s\n",
            elapsed.num_milliseconds() as f64 / 1000.0
        ));
    }

    output.trim_end().to_string()
}

fn format_step(step: &StepOutcome, width: usize) -> String {
    let status = match &step.status {
        StepStatus::Succeeded => "ok".to_string(),
        StepStatus::Failed { code } => format!("FAILED ({})", code),
        StepStatus::Tolerated { code } => format!("ignored ({})", code),
        StepStatus::Skipped => "skipped".to_string(),
        StepStatus::Planned => "planned".to_string(),
    };
    format!(
        "  {:<12} {:<width$}  {}",
        status,
        step.step,
        truncate(&step.command, 100),
        width = width
    )
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
