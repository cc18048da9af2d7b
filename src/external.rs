//! `!command args...`: running an external program and capturing what it prints.

use anyhow::{Context, Result, bail};
use std::process::{Command, Stdio};

/// Leading character of a statement's first token that requests an external program.
pub const SHELL_ESCAPE: char = '!';

/// Runs `argv` synchronously and returns its standard output followed by its
/// standard error.
///
/// The child's standard input is closed. There is no timeout: a child that never
/// exits blocks the caller.
pub fn run_captured<S: AsRef<str>>(argv: &[S]) -> Result<Vec<u8>> {
    let Some((program, args)) = argv.split_first() else {
        bail!("no program given");
    };
    let program = program.as_ref();

    let output = Command::new(program)
        .args(args.iter().map(AsRef::as_ref))
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("cannot run {program}"))?;

    tracing::debug!(program, status = %output.status, "external command finished");
    let mut captured = output.stdout;
    captured.extend_from_slice(&output.stderr);
    Ok(captured)
}

/// Turns a statement starting with `!` into the external argument vector.
///
/// `!ls -l` and `! ls -l` both give `["ls", "-l"]`. Returns `None` when the
/// statement does not start with the marker.
pub fn escape_argv(tokens: &[String]) -> Option<Vec<String>> {
    let (first, rest) = tokens.split_first()?;
    let program = first.strip_prefix(SHELL_ESCAPE)?;

    let mut argv = Vec::with_capacity(tokens.len());
    if !program.is_empty() {
        argv.push(program.to_string());
    }
    argv.extend(rest.iter().cloned());
    Some(argv)
}
