use std::path::PathBuf;

use thiserror::Error;

/// Failures the flow can surface. Every failure is terminal: no retries,
/// the top-level handler in `main` prints the message and exits non-zero.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("input file '{}' not found", .path.display())]
    MissingInputFile { path: PathBuf },

    #[error("{step} failed with exit code {status}{}", log_hint(.log))]
    StepFailed {
        step: String,
        status: i32,
        log: Option<PathBuf>,
    },
}

fn log_hint(log: &Option<PathBuf>) -> String {
    match log {
        Some(path) => format!(" (see {})", path.display()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_failed_mentions_log_when_present() {
        let err = FlowError::StepFailed {
            step: "Compiling ../uart.sv".into(),
            status: 2,
            log: Some(PathBuf::from("uart_compile_design.log")),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit code 2"));
        assert!(msg.contains("uart_compile_design.log"));
    }

    #[test]
    fn step_failed_without_log_has_no_hint() {
        let err = FlowError::StepFailed {
            step: "Merging section PDFs".into(),
            status: 1,
            log: None,
        };
        assert_eq!(
            err.to_string(),
            "Merging section PDFs failed with exit code 1"
        );
    }
}
