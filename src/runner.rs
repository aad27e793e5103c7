//! Command runner: executes one external step, captures its output, persists
//! the optional log artifact, and gates the flow on the exit status.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::error::FlowError;

pub(crate) const BANNER: &str =
    "============================================================";

/// Outcome of a single external command invocation. Transient: reported to
/// the console, optionally persisted to the log artifact, then dropped.
#[derive(Debug, Clone)]
pub struct ExecutionRecord {
    pub command: Vec<String>,
    pub step_label: String,
    pub log_target: Option<PathBuf>,
    pub stdout_text: String,
    pub stderr_text: String,
    pub exit_status: i32,
}

/// Run one step synchronously and check its exit status.
///
/// Arguments are passed as discrete tokens, never through a shell. Output is
/// fully buffered, not streamed. When `log_target` is given, the structured
/// log (command line, stdout, stderr, exit status) is flushed to disk before
/// this returns, so the artifact survives whatever happens next. A non-zero
/// exit yields `FlowError::StepFailed`; the caller stops the flow there.
pub fn run_step(
    command: &[String],
    step_label: &str,
    log_target: Option<&Path>,
    cwd: &Path,
) -> Result<ExecutionRecord> {
    println!("\n{BANNER}");
    println!("Step: {step_label}");
    println!("Command: {}", command.join(" "));
    if let Some(log) = log_target {
        println!("Log file: {}", log.display());
    }
    println!("{BANNER}");

    let (program, args) = command.split_first().context("empty command")?;
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("failed to launch '{program}'"))?;

    let record = ExecutionRecord {
        command: command.to_vec(),
        step_label: step_label.to_string(),
        log_target: log_target.map(Path::to_path_buf),
        stdout_text: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr_text: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_status: output.status.code().unwrap_or(-1),
    };

    if let Some(log) = &record.log_target {
        write_log(log, &record)
            .with_context(|| format!("failed to write log '{}'", log.display()))?;
    }

    // Re-emit captured streams so the live console matches the log.
    if !record.stdout_text.is_empty() {
        print!("{}", record.stdout_text);
    }
    if !record.stderr_text.is_empty() {
        eprint!("{}", record.stderr_text);
    }

    if record.exit_status != 0 {
        eprintln!(
            "\n{} {} failed with return code {}",
            "ERROR:".red().bold(),
            record.step_label,
            record.exit_status
        );
        if let Some(log) = &record.log_target {
            eprintln!("Check {} for details", log.display());
        }
        return Err(FlowError::StepFailed {
            step: record.step_label,
            status: record.exit_status,
            log: record.log_target,
        }
        .into());
    }

    println!("{} {} completed successfully", "✓".green(), record.step_label);
    if let Some(log) = &record.log_target {
        println!("{} Log saved to {}", "✓".green(), log.display());
    }
    Ok(record)
}

/// Fixed artifact layout: command line, separator, stdout, stderr, exit
/// status. The log is the only persistent record of a run, so it is synced
/// before control returns.
fn write_log(path: &Path, record: &ExecutionRecord) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "Command: {}", record.command.join(" "))?;
    writeln!(file, "{BANNER}")?;
    writeln!(file)?;
    if !record.stdout_text.is_empty() {
        writeln!(file, "STDOUT:")?;
        file.write_all(record.stdout_text.as_bytes())?;
        writeln!(file)?;
    }
    if !record.stderr_text.is_empty() {
        writeln!(file, "STDERR:")?;
        file.write_all(record.stderr_text.as_bytes())?;
        writeln!(file)?;
    }
    writeln!(file, "\nReturn code: {}", record.exit_status)?;
    file.sync_all()?;
    Ok(())
}
