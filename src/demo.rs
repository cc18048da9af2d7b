//! Commands and options registered by the `cmdshell` binary.

use anyhow::Context as _;
use cmdshell::format;
use cmdshell::{CommandError, CommandSpec, OptionSpec, Registry, RegistryError};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

/// Settings changed by `-verbose` and `-name`.
#[derive(Debug, Default)]
pub struct DemoState {
    pub verbose: bool,
    pub name: Option<String>,
}

pub fn registry() -> Result<Registry, RegistryError> {
    registry_with(Rc::new(RefCell::new(DemoState::default())))
}

pub fn registry_with(state: Rc<RefCell<DemoState>>) -> Result<Registry, RegistryError> {
    let (verbose, name, status) = (state.clone(), state.clone(), state);

    Registry::builder()
        .command(
            CommandSpec::new("echo", |ctx, args| Ok(ctx.print(&args.variadic().join(" "))?))
                .args("[args...]")
                .comment("print arguments")
                .variadic(0, 0),
        )
        .command(
            CommandSpec::new("quote", |ctx, args| {
                for value in format::quote_all(args.variadic()) {
                    ctx.print(&value)?;
                }
                Ok(())
            })
            .args("[args...]")
            .comment("show arguments quoted")
            .variadic(0, 0),
        )
        .command(
            CommandSpec::new("pwd", |ctx, _| {
                let dir = env::current_dir().context("cannot read current directory")?;
                Ok(ctx.report(None, &dir.to_string_lossy())?)
            })
            .comment("print working directory"),
        )
        .command(
            CommandSpec::new("cd", |_, args| {
                let target = PathBuf::from(args.arg(0));
                let canonical = fs::canonicalize(&target)
                    .with_context(|| format!("cannot resolve {}", target.display()))?;
                env::set_current_dir(&canonical)
                    .with_context(|| format!("cannot change to {}", canonical.display()))?;
                tracing::debug!(dir = %canonical.display(), "changed directory");
                Ok(())
            })
            .args("<dir>")
            .comment("change working directory")
            .fixed(1),
        )
        .command(
            CommandSpec::new("env", |ctx, args| {
                let vars: BTreeMap<String, String> = env::vars_os()
                    .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
                    .collect();
                let wanted = args.variadic();
                let rows: Vec<Vec<&str>> = vars
                    .iter()
                    .filter(|(k, _)| wanted.is_empty() || wanted.iter().any(|w| w == *k))
                    .map(|(k, v)| vec![k.as_str(), v.as_str()])
                    .collect();
                Ok(ctx.report_table(&["name", "value"], &rows)?)
            })
            .args("[name...]")
            .comment("show environment")
            .variadic(0, 0),
        )
        .command(
            CommandSpec::new("get status", move |ctx, args| {
                let state = status.borrow();
                let when = args.variadic().first().map_or("now", String::as_str);
                ctx.report(Some("when:    "), when)?;
                ctx.report(Some("verbose: "), if state.verbose { "on" } else { "off" })?;
                ctx.report(Some("name:    "), &format::quote(state.name.as_deref().unwrap_or("")))?;
                Ok(())
            })
            .args("[when]")
            .comment("show settings")
            .variadic(0, 1),
        )
        .option(
            OptionSpec::new("verbose", move |_, _| {
                verbose.borrow_mut().verbose = true;
                Ok(())
            })
            .comment("chatty output"),
        )
        .option(
            OptionSpec::new("name", move |_, arg| {
                let arg = arg.ok_or(CommandError::Usage)?;
                if arg.is_empty() {
                    return Err(CommandError::failed("name must not be empty"));
                }
                name.borrow_mut().name = Some(arg.to_string());
                Ok(())
            })
            .args("<name>")
            .comment("set name"),
        )
        .build()
}
