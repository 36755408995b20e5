use std::ffi::{OsStr, OsString};
use std::path::Path;
use thiserror::Error;

use crate::exit::EXIT_MISC;

/// Name used in diagnostics when `argv[0]` is missing or empty.
const DEFAULT_PROGRAM_NAME: &str = "setsid";

/// A validated command line. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program_name: String, // basename of argv[0], prefixes every diagnostic
    pub command: OsString,    // first operand, resolved through PATH by exec
    pub args: Vec<OsString>,  // full target argv, args[0] == command
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("usage: {program_name} program [argument ...]")]
pub struct UsageError {
    pub program_name: String,
}

impl UsageError {
    pub fn exit_code(&self) -> u8 {
        EXIT_MISC
    }
}

/// Validate the raw argument list (including `argv[0]`).
///
/// No options are recognised: any dash token before the first operand,
/// `--` included, is rejected. A lone `-` is an operand, and everything after
/// the first operand belongs to the command.
pub fn parse_invocation<I>(raw: I) -> Result<Invocation, UsageError>
where
    I: IntoIterator<Item = OsString>,
{
    let mut raw = raw.into_iter();
    let program_name = program_name(raw.next().as_deref());
    let rest: Vec<OsString> = raw.collect();

    if rest.first().is_some_and(|a| is_flag(a)) {
        return Err(UsageError { program_name });
    }

    let Some(command) = rest.first().cloned() else {
        return Err(UsageError { program_name });
    };

    Ok(Invocation {
        program_name,
        command,
        args: rest,
    })
}

/// Final path component of `argv[0]`, like `getprogname(3)`.
fn program_name(argv0: Option<&OsStr>) -> String {
    argv0
        .and_then(|a| Path::new(a).file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_string())
}

fn is_flag(arg: &OsStr) -> bool {
    let bytes = arg.as_encoded_bytes();
    bytes.len() > 1 && bytes[0] == b'-'
}
