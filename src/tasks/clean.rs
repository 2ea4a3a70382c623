//! Best-effort cleanup (`clean`)
//!
//! Every removal tolerates its target being absent; the task always succeeds.

use std::fs;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::container::remove_instance;
use super::{StepStatus, TaskContext};
use crate::config::VENV_DIR;
use crate::error::Result;

/// Tool caches removed from the project root
const TOOL_CACHES: [&str; 2] = [".mypy_cache", ".pytest_cache"];

/// Directories never descended into while collecting bytecode
const PRUNED_DIRS: [&str; 3] = [".git", VENV_DIR, "node_modules"];

pub fn clean(ctx: &mut TaskContext<'_>) -> Result<()> {
    let pipenv_rm = ctx.pipenv().arg("--rm");
    ctx.tolerate("pipenv-rm", pipenv_rm);

    let venv = ctx.config.venv_dir();
    remove_path(ctx, "remove-venv", &venv);

    for cache in TOOL_CACHES {
        let path = ctx.config.root.join(cache);
        remove_path(ctx, "remove-tool-cache", &path);
    }

    let bytecode = find_bytecode(&ctx.config.root);
    if bytecode.is_empty() {
        ctx.report
            .push("remove-bytecode", "find . -name __pycache__".to_string(), StepStatus::Skipped);
    }
    for path in &bytecode {
        remove_path(ctx, "remove-bytecode", path);
    }

    remove_instance(ctx);

    let reclaimed = ctx.report.reclaimed_bytes.unwrap_or(0);
    let verb = if ctx.dry_run() { "Would reclaim" } else { "Reclaimed" };
    ctx.message(format!("Clean complete. {} {}", verb, ByteSize(reclaimed)));
    Ok(())
}

/// `__pycache__` directories and stray `.pyc`/`.pyo` files outside them
pub fn find_bytecode(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(root).min_depth(1).into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().is_dir() {
            if PRUNED_DIRS.contains(&name.as_str()) {
                walker.skip_current_dir();
            } else if name == "__pycache__" {
                found.push(entry.path().to_path_buf());
                walker.skip_current_dir();
            }
        } else if name.ends_with(".pyc") || name.ends_with(".pyo") {
            found.push(entry.path().to_path_buf());
        }
    }

    found
}

fn disk_usage(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|e| e.metadata().ok())
        .filter(|m| m.is_file())
        .map(|m| m.len())
        .sum()
}

fn remove_path(ctx: &mut TaskContext<'_>, step: &str, path: &Path) {
    let command = format!("rm -rf {}", path.display());
    if !path.exists() {
        ctx.report.push(step, command, StepStatus::Skipped);
        return;
    }

    let size = disk_usage(path);
    if ctx.dry_run() {
        ctx.report.add_reclaimed(size);
        ctx.report.push(step, command, StepStatus::Planned);
        return;
    }

    let removed = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match removed {
        Ok(()) => {
            ctx.report.add_reclaimed(size);
            ctx.report.push(step, command, StepStatus::Succeeded);
        }
        Err(e) => {
            warn!("could not remove {}: {}", path.display(), e);
            ctx.report.push(step, command, StepStatus::Tolerated { code: 1 });
        }
    }
}
