use std::ffi::{OsStr, OsString};
use std::io;

use nix::errno::Errno;
use thiserror::Error;
use tracing::debug;

use crate::config::Invocation;
use crate::exit::{EXIT_NOEXEC, EXIT_NOTFOUND};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecError {
    /// The command could not be resolved at all.
    #[error("{}: {}", .command.to_string_lossy(), .errno.desc())]
    NotFound { command: OsString, errno: Errno },
    /// The command was found but could not be invoked.
    #[error("execvp: {}", .0.desc())]
    NotExecutable(Errno),
}

impl ExecError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ExecError::NotFound { .. } => EXIT_NOTFOUND,
            ExecError::NotExecutable(_) => EXIT_NOEXEC,
        }
    }

    fn classify(command: &OsStr, err: &io::Error) -> Self {
        // Failures std detects before calling execvp (e.g. a NUL byte in an
        // argument) carry no errno.
        let errno = err.raw_os_error().map_or(Errno::EINVAL, Errno::from_raw);
        if errno == Errno::ENOENT {
            ExecError::NotFound {
                command: command.to_os_string(),
                errno,
            }
        } else {
            ExecError::NotExecutable(errno)
        }
    }
}

/// Replace the current process image with the target command.
///
/// Names without a `/` are searched on `PATH`, as `execvp(3)` does. The
/// target's `argv[0]` is the command exactly as given. Only returns on
/// failure; the environment and open descriptors pass through unchanged.
/// std resets SIGPIPE to its default and clears the signal mask first, so
/// the launcher's own ignored SIGPIPE never reaches the target.
pub fn replace_image(invocation: &Invocation) -> ExecError {
    use std::os::unix::process::CommandExt;

    debug!(command = ?invocation.command, argc = invocation.args.len(), "exec");
    let err = std::process::Command::new(&invocation.command)
        .args(invocation.args.iter().skip(1))
        .exec();
    ExecError::classify(&invocation.command, &err)
}
