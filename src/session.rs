use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, getpgrp, getpid, setsid, ForkResult, Pid};
use thiserror::Error;
use tracing::debug;

use crate::exit::EXIT_MISC;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("fork: {}", .0.desc())]
    Fork(Errno),
    #[error("wait: {}", .0.desc())]
    Wait(Errno),
    #[error("wait: reaped {actual:?}, expected child {expected}")]
    UnexpectedChild { expected: Pid, actual: Option<Pid> },
    #[error("child did not exit normally: killed by {}{}", .signal.as_str(), core_note(.core_dumped))]
    Signaled { signal: Signal, core_dumped: bool },
    #[error("child did not exit normally: stopped by {}", .signal.as_str())]
    Stopped { signal: Signal },
    #[error("child did not exit normally: {0}")]
    Abnormal(String),
    #[error("setsid: {}", .0.desc())]
    Setsid(Errno),
}

impl SessionError {
    /// Abnormal terminations exit with the low byte of the raw wait status,
    /// the value `exit(status)` would have produced.
    pub fn exit_code(&self) -> u8 {
        match self {
            SessionError::Signaled {
                signal,
                core_dumped,
            } => {
                let sig = (*signal as i32 & 0x7f) as u8;
                if *core_dumped {
                    sig | 0x80
                } else {
                    sig
                }
            }
            SessionError::Stopped { .. } => 0x7f,
            _ => EXIT_MISC,
        }
    }
}

fn core_note(core_dumped: &bool) -> &'static str {
    if *core_dumped {
        " (core dumped)"
    } else {
        ""
    }
}

/// The caller's pid and process group, read once before any fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessIdentity {
    pub pid: Pid,
    pub pgid: Pid,
}

impl ProcessIdentity {
    pub fn current() -> Self {
        let identity = Self {
            pid: getpid(),
            pgid: getpgrp(),
        };
        debug!(pid = %identity.pid, pgid = %identity.pgid, "process identity");
        identity
    }

    /// A group leader cannot call setsid(2) and has to fork first.
    pub fn needs_fork(&self) -> bool {
        self.pid == self.pgid
    }
}

/// Which side of the fork the caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// Continue to session creation.
    Child,
    /// The child was reaped; exit with its code and do nothing else.
    Parent { exit_code: u8 },
}

/// Fork once. The child returns `Branch::Child`; the parent blocks until that
/// child terminates and returns its relayed exit code.
pub fn fork_and_relay() -> Result<Branch, SessionError> {
    // SAFETY: the launcher is single-threaded here, so the child inherits no
    // locks held by other threads.
    match unsafe { fork() } {
        Ok(ForkResult::Child) => Ok(Branch::Child),
        Ok(ForkResult::Parent { child }) => {
            debug!(%child, "forked, waiting for child");
            let status = waitpid(child, None).map_err(SessionError::Wait)?;
            debug!(?status, "child reaped");
            relay_status(child, status).map(|exit_code| Branch::Parent { exit_code })
        }
        Err(errno) => Err(SessionError::Fork(errno)),
    }
}

/// Translate the child's wait status into this process's exit code.
pub fn relay_status(child: Pid, status: WaitStatus) -> Result<u8, SessionError> {
    if status.pid() != Some(child) {
        return Err(SessionError::UnexpectedChild {
            expected: child,
            actual: status.pid(),
        });
    }
    match status {
        WaitStatus::Exited(_, code) => Ok((code & 0xff) as u8),
        WaitStatus::Signaled(_, signal, core_dumped) => Err(SessionError::Signaled {
            signal,
            core_dumped,
        }),
        WaitStatus::Stopped(_, signal) => Err(SessionError::Stopped { signal }),
        other => Err(SessionError::Abnormal(format!("{other:?}"))),
    }
}

/// Start a new session with the caller as leader, dropping the controlling
/// terminal. Returns the new session id.
pub fn create_session() -> Result<Pid, SessionError> {
    let sid = setsid().map_err(SessionError::Setsid)?;
    debug!(%sid, "session created");
    Ok(sid)
}
