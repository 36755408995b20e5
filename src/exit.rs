//! Exit codes follow nohup(1): 126 when the utility was found but could not
//! be invoked, 127 when it could not be found or the launcher itself failed.

use thiserror::Error;

use crate::config::UsageError;
use crate::exec::ExecError;
use crate::session::SessionError;

pub const EXIT_NOEXEC: u8 = 126;
pub const EXIT_NOTFOUND: u8 = 127;
pub const EXIT_MISC: u8 = 127;

/// Every way a launch can end other than a successful exec or a relayed exit.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Exec(#[from] ExecError),
}

impl LaunchError {
    pub fn exit_code(&self) -> u8 {
        match self {
            LaunchError::Usage(e) => e.exit_code(),
            LaunchError::Session(e) => e.exit_code(),
            LaunchError::Exec(e) => e.exit_code(),
        }
    }

    /// Usage text is printed bare; everything else gets the `err(3)` prefix.
    pub fn is_usage(&self) -> bool {
        matches!(self, LaunchError::Usage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;
    use nix::sys::signal::Signal;
    use std::ffi::OsString;

    #[test]
    fn exit_codes_by_failure_kind() {
        let usage: LaunchError = UsageError {
            program_name: "setsid".into(),
        }
        .into();
        assert_eq!(usage.exit_code(), EXIT_MISC);
        assert!(usage.is_usage());

        let fork: LaunchError = SessionError::Fork(Errno::EAGAIN).into();
        assert_eq!(fork.exit_code(), EXIT_MISC);
        assert!(!fork.is_usage());

        let setsid: LaunchError = SessionError::Setsid(Errno::EPERM).into();
        assert_eq!(setsid.exit_code(), EXIT_MISC);

        let killed: LaunchError = SessionError::Signaled {
            signal: Signal::SIGTERM,
            core_dumped: false,
        }
        .into();
        assert_eq!(killed.exit_code(), 15);

        let missing: LaunchError = ExecError::NotFound {
            command: OsString::from("nope"),
            errno: Errno::ENOENT,
        }
        .into();
        assert_eq!(missing.exit_code(), EXIT_NOTFOUND);

        let denied: LaunchError = ExecError::NotExecutable(Errno::EACCES).into();
        assert_eq!(denied.exit_code(), EXIT_NOEXEC);
    }

    #[test]
    fn display_is_transparent() {
        let err: LaunchError = SessionError::Fork(Errno::EAGAIN).into();
        assert_eq!(err.to_string(), format!("fork: {}", Errno::EAGAIN.desc()));
    }
}
