//! Invocation execution port.

use std::process::{Command, Stdio};

use thiserror::Error;

use crate::compile::Invocation;

/// Why an invocation did not complete successfully.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationFailure {
    #[error("failed to start {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("{program} exited with {}", describe_exit(.code))]
    Exit { program: String, code: Option<i32> },

    #[error("interrupted before {program} could run")]
    Cancelled { program: String },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Runs compiled invocations.
///
/// Implementations:
/// - `SystemExecutor` - spawns the process with the terminal attached
/// - test fakes that record calls and script exit codes
pub trait Executor {
    fn execute(&self, invocation: &Invocation) -> Result<(), InvocationFailure>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<(), InvocationFailure> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| InvocationFailure::Spawn {
                program: invocation.program.clone(),
                message: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(InvocationFailure::Exit {
                program: invocation.program.clone(),
                code: status.code(),
            })
        }
    }
}

/// Whether `rsync` can be started at all.
pub fn rsync_available() -> bool {
    Command::new(crate::compile::TRANSFER_PROGRAM)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
