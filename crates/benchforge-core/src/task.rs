//! Task registry: loads per-task configuration from a task directory.
//!
//! Reads happen synchronously at startup, before any submission can be
//! admitted, mirroring the teacher's two-phase startup (construct
//! configuration, then hand it to async handlers behind an `Arc`).

use std::path::Path;

use crate::error::TaskError;
use crate::types::TaskSpec;

const DEFAULT_MAX_ERROR: f64 = 1e-6;

/// Load a single task's configuration from `tasks/<name>/`.
///
/// Fails fatally (per spec.md §4.A) if the task directory or its `symbol`
/// file is missing. `bad_code.regex` and `max_error` are both optional.
pub fn load_task(tasks_root: &Path, name: &str) -> Result<TaskSpec, TaskError> {
    let dir = tasks_root.join(name);
    if !dir.is_dir() {
        return Err(TaskError::MissingTaskDir(dir));
    }

    let symbol_path = dir.join("symbol");
    if !symbol_path.is_file() {
        return Err(TaskError::MissingSymbol(symbol_path));
    }
    let symbol = std::fs::read_to_string(&symbol_path)?.trim().to_string();

    let benchmark_path = dir.join("benchmark.cpp");

    let extra_denylist = read_denylist(&dir.join("bad_code.regex"))?;
    let compiled_extra_denylist = extra_denylist
        .iter()
        .map(|pattern| regex::Regex::new(pattern))
        .collect::<Result<Vec<_>, _>>()?;

    let max_error = std::fs::read_to_string(dir.join("max_error"))
        .ok()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(DEFAULT_MAX_ERROR);

    Ok(TaskSpec {
        name: name.to_string(),
        symbol,
        benchmark_path,
        extra_denylist,
        compiled_extra_denylist,
        max_error,
    })
}

fn read_denylist(path: &Path) -> Result<Vec<String>, TaskError> {
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
