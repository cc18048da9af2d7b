//! Turning a statement's positional tokens into one handler call.

use crate::command::CommandError;
use crate::external;
use crate::format;
use crate::registry::Registry;
use crate::state::Context;
use std::io;

/// Notice written when a statement consisted of options only.
pub const NO_COMMAND_NOTICE: &str = "options set";

/// Whether `tokens` is a shell escape or a help request.
///
/// Such statements go to [`dispatch`] untouched, so `-flags` belong to the
/// external program instead of being run as options.
pub fn takes_raw_arguments(help_keyword: &str, tokens: &[String]) -> bool {
    tokens.first().is_some_and(|first| {
        first.starts_with(external::SHELL_ESCAPE) || first.eq_ignore_ascii_case(help_keyword)
    })
}

/// Dispatches `tokens` (options already removed).
///
/// In order: a `!` shell escape, the help keyword, an empty statement, and
/// finally the longest registered command name. Everything that goes wrong is
/// reported on the context's output; only a failure to write that output is
/// returned as an error.
pub fn dispatch(
    registry: &Registry,
    help_keyword: &str,
    ctx: &mut Context<'_>,
    tokens: &[String],
) -> io::Result<()> {
    if let Some(argv) = external::escape_argv(tokens) {
        return shell_escape(ctx, &argv);
    }

    let Some(first) = tokens.first() else {
        return format::report(ctx.out(), None, NO_COMMAND_NOTICE);
    };

    if first.eq_ignore_ascii_case(help_keyword) {
        return registry.write_help(ctx.out());
    }

    let Some((spec, consumed)) = registry.resolve(tokens) else {
        tracing::debug!(tokens = ?tokens, "unrecognized command");
        writeln!(ctx.out(), "error: unrecognized command: {first}")?;
        ctx.confuse();
        return Ok(());
    };

    let args = &tokens[consumed..];
    if !spec.arity().accepts(args.len()) {
        tracing::debug!(command = %spec.name(), given = args.len(), "arity mismatch");
        return writeln!(ctx.out(), "{}", spec.usage());
    }

    tracing::debug!(command = %spec.name(), args = ?args, "invoking");
    match spec.invoke(ctx, args) {
        Ok(()) => Ok(()),
        Err(CommandError::Usage) => writeln!(ctx.out(), "{}", spec.usage()),
        Err(CommandError::Failed(err)) => {
            tracing::warn!(command = %spec.name(), error = %format!("{err:#}"), "command failed");
            let out = ctx.out();
            writeln!(out, "error: {err}")?;
            for cause in err.chain().skip(1) {
                writeln!(out, "caused by: {cause}")?;
            }
            Ok(())
        }
        Err(CommandError::Io(err)) => {
            tracing::warn!(command = %spec.name(), error = %err, "command output failed");
            writeln!(ctx.out(), "error: {err}")
        }
    }
}

fn shell_escape(ctx: &mut Context<'_>, argv: &[String]) -> io::Result<()> {
    if argv.is_empty() {
        return writeln!(ctx.out(), "usage: {}command [args...]", external::SHELL_ESCAPE);
    }
    match external::run_captured(argv) {
        Ok(captured) => ctx.out().write_all(&captured),
        Err(err) => {
            tracing::warn!(argv = ?argv, error = %format!("{err:#}"), "shell escape failed");
            writeln!(ctx.out(), "error: {err:#}")
        }
    }
}
