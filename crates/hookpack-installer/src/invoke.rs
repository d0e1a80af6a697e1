use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, warn};

pub const INSTALL_ARGS: [&str; 2] = ["install", "-f"];

#[derive(Debug)]
pub enum InvokeOutcome {
    Succeeded,
    /// `None` when the child was terminated by a signal.
    ChildFailed(Option<i32>),
    SpawnFailed(io::Error),
}

impl InvokeOutcome {
    fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            Self::Succeeded
        } else {
            Self::ChildFailed(status.code())
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Succeeded | Self::SpawnFailed(_) => 0,
            Self::ChildFailed(_) => 1,
        }
    }
}

/// Runs the acquired binary's hook installation in the consumer's project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallInvoker {
    binary: PathBuf,
    project_root: PathBuf,
}

impl InstallInvoker {
    pub fn new(binary: impl Into<PathBuf>, project_root: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            project_root: project_root.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .args(INSTALL_ARGS)
            .current_dir(&self.project_root)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }

    pub fn invoke(&self) -> InvokeOutcome {
        debug!(
            binary = %self.binary.display(),
            cwd = %self.project_root.display(),
            "running hook installation"
        );
        match self.command().status() {
            Ok(status) => InvokeOutcome::from_status(status),
            Err(err) => {
                warn!(binary = %self.binary.display(), %err, "failed to spawn hook installation");
                InvokeOutcome::SpawnFailed(err)
            }
        }
    }
}

/// Re-runs `binary` with `args` verbatim and inherited stdio, returning the
/// exit code the forwarder should use: 0 on success, 1 otherwise.
pub fn forward<I>(binary: &Path, args: I) -> io::Result<i32>
where
    I: IntoIterator<Item = OsString>,
{
    let status = Command::new(binary)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;
    debug!(binary = %binary.display(), code = ?status.code(), "forwarded command exited");
    Ok(if status.success() { 0 } else { 1 })
}
