// main.rs: argument validation and orchestration only.
// Each step of the launch lives in the modules below.
#[cfg(not(unix))]
compile_error!("setsid relies on POSIX sessions and only builds on unix targets");

mod config;
mod exec;
mod exit;
mod logging;
mod session;

use std::process::ExitCode;

use config::{parse_invocation, Invocation};
use exec::replace_image;
use exit::LaunchError;
use session::{create_session, fork_and_relay, Branch, ProcessIdentity};

fn main() -> ExitCode {
    let invocation = match parse_invocation(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(usage) => {
            let program_name = usage.program_name.clone();
            return fail(&program_name, &usage.into());
        }
    };

    if let Err(e) = logging::init_logging() {
        eprintln!("{}: {e}", invocation.program_name);
    }

    match launch(&invocation) {
        Ok(code) => ExitCode::from(code),
        Err(e) => fail(&invocation.program_name, &e),
    }
}

/// Detach and exec. Returns only with the exit code of a reaped child (fork
/// path, parent side) or with the error that ended the launch.
fn launch(invocation: &Invocation) -> Result<u8, LaunchError> {
    if ProcessIdentity::current().needs_fork() {
        match fork_and_relay()? {
            Branch::Parent { exit_code } => return Ok(exit_code),
            Branch::Child => {}
        }
    }
    create_session()?;
    Err(replace_image(invocation).into())
}

/// Print an `err(3)`-style diagnostic (`<program>: <context>: <reason>`)
/// and pick the matching exit code.
fn fail(program_name: &str, err: &LaunchError) -> ExitCode {
    if err.is_usage() {
        eprintln!("{err}");
    } else {
        eprintln!("{program_name}: {err}");
    }
    ExitCode::from(err.exit_code())
}
