//! Flag-style options, interleaved anywhere among a statement's positional tokens.

use crate::command::CommandError;
use crate::registry::Registry;
use crate::state::Context;
use std::io;

/// Leading character of an option token.
pub const FLAG_MARKER: char = '-';

/// Ends option scanning; everything after it is positional.
pub const OPTIONS_TERMINATOR: &str = "--";

/// Runs the option handlers found in `tokens` and returns the positional tokens.
///
/// Returns `Ok(None)` when resolution stopped on an unknown option, a missing
/// option argument, or a failing option handler. The session is then marked
/// confused and the statement must not be dispatched.
pub fn resolve_options(
    registry: &Registry,
    ctx: &mut Context<'_>,
    tokens: &[String],
) -> io::Result<Option<Vec<String>>> {
    let mut positional = Vec::with_capacity(tokens.len());
    let mut iter = tokens.iter();

    while let Some(token) = iter.next() {
        if token == OPTIONS_TERMINATOR {
            positional.extend(iter.by_ref().cloned());
            break;
        }
        let Some(name) = token.strip_prefix(FLAG_MARKER) else {
            positional.push(token.clone());
            continue;
        };

        let Some(option) = registry.option(name) else {
            tracing::debug!(option = %token, "unrecognized option");
            writeln!(ctx.out(), "error: unrecognized option: {token}")?;
            ctx.confuse();
            return Ok(None);
        };

        let arg = if option.is_taking_arg() {
            match iter.next() {
                Some(arg) => Some(arg.as_str()),
                None => {
                    writeln!(ctx.out(), "error: option {token} requires an argument")?;
                    ctx.confuse();
                    return Ok(None);
                }
            }
        } else {
            None
        };

        tracing::debug!(option = %option.name(), ?arg, "option");
        if let Err(err) = option.invoke(ctx, arg) {
            let cause = match err {
                CommandError::Usage if !option.args_help().is_empty() => {
                    format!("usage: {token} {}", option.args_help())
                }
                other => format!("{other:#}"),
            };
            tracing::warn!(option = %token, %cause, "option handler failed");
            writeln!(ctx.out(), "error setting option {token}: {cause}")?;
            ctx.confuse();
            return Ok(None);
        }
    }

    Ok(Some(positional))
}
