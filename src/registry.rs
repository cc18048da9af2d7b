//! The command and option tables a session dispatches against.
//!
//! Both tables are built once, through [`RegistryBuilder`], and never change
//! afterwards. Commands and options live in separate namespaces.

use crate::command::{CommandSpec, OptionSpec, lookup_key};
use std::collections::BTreeMap;
use std::io::{self, Write};
use thiserror::Error;

/// Problems detected while building a [`Registry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command name is empty")]
    EmptyCommandName,
    #[error("option name is empty")]
    EmptyOptionName,
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),
    #[error("duplicate option: -{0}")]
    DuplicateOption(String),
}

/// Immutable set of commands and options.
#[derive(Debug)]
pub struct Registry {
    commands: BTreeMap<Vec<String>, CommandSpec>,
    options: BTreeMap<String, OptionSpec>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Command whose full name equals `words`, ignoring case.
    pub fn command<S: AsRef<str>>(&self, words: &[S]) -> Option<&CommandSpec> {
        self.commands.get(lookup_key(words).as_slice())
    }

    /// Option named `name` (without the leading `-`), ignoring case.
    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.get(&name.to_lowercase())
    }

    /// Longest-prefix match of `tokens` against the command names.
    ///
    /// Tries the first `n` tokens for `n` from `tokens.len()` down to 1 and
    /// returns the first command found together with `n`, so the longest
    /// registered name wins.
    pub fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Option<(&CommandSpec, usize)> {
        (1..=tokens.len())
            .rev()
            .find_map(|n| self.command(&tokens[..n]).map(|spec| (spec, n)))
    }

    /// Commands in alphabetical order of their names.
    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    /// Options in alphabetical order of their names.
    pub fn options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.values()
    }

    /// Writes the `help` listing: commands on the left, options on the right.
    pub fn write_help(&self, out: &mut dyn Write) -> io::Result<()> {
        let commands: Vec<[String; 3]> = self
            .commands()
            .map(|c| {
                [
                    c.name().to_string(),
                    c.args_help().to_string(),
                    c.comment_text().to_string(),
                ]
            })
            .collect();
        let options: Vec<[String; 3]> = self
            .options()
            .map(|o| {
                [
                    format!("-{}", o.name()),
                    o.args_help().to_string(),
                    o.comment_text().to_string(),
                ]
            })
            .collect();

        let mut widths = [0usize; 6];
        for row in &commands {
            for (i, text) in row.iter().enumerate() {
                widths[i] = widths[i].max(text.chars().count());
            }
        }
        for row in &options {
            for (i, text) in row.iter().enumerate() {
                widths[3 + i] = widths[3 + i].max(text.chars().count());
            }
        }

        // One blank between a column and the next non-empty one to its right.
        let mut right_of = false;
        for w in widths.iter_mut().rev() {
            if *w > 0 {
                if right_of {
                    *w += 1;
                }
                right_of = true;
            }
        }

        let command_width = widths[0] + widths[1] + widths[2];
        if options.is_empty() {
            writeln!(out, "Commands")?;
        } else {
            writeln!(out, "{:<command_width$}Options", "Commands")?;
        }
        writeln!(out, "{}", "-".repeat(widths.iter().sum()))?;

        let blank: [String; 3] = Default::default();
        for i in 0..commands.len().max(options.len()) {
            let left = commands.get(i).unwrap_or(&blank);
            let right = options.get(i).unwrap_or(&blank);
            let line: String = left
                .iter()
                .chain(right.iter())
                .zip(widths)
                .filter(|(_, w)| *w > 0)
                .map(|(text, w)| format!("{text:<w$}"))
                .collect();
            writeln!(out, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// Collects command and option declarations, then checks them into a [`Registry`].
///
/// `exit` and `quit` are added by [`build`](Self::build) unless a command with
/// that name was registered explicitly.
#[derive(Default)]
pub struct RegistryBuilder {
    commands: Vec<CommandSpec>,
    options: Vec<OptionSpec>,
}

impl RegistryBuilder {
    pub fn command(mut self, spec: CommandSpec) -> Self {
        self.commands.push(spec);
        self
    }

    pub fn option(mut self, spec: OptionSpec) -> Self {
        self.options.push(spec);
        self
    }

    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut commands = BTreeMap::new();
        for spec in self.commands {
            let key = spec.name().key();
            if key.is_empty() {
                return Err(RegistryError::EmptyCommandName);
            }
            if commands.contains_key(&key) {
                return Err(RegistryError::DuplicateCommand(spec.name().to_string()));
            }
            commands.insert(key, spec);
        }
        for spec in exit_commands() {
            commands.entry(spec.name().key()).or_insert(spec);
        }

        let mut options = BTreeMap::new();
        for spec in self.options {
            let key = spec.name().to_lowercase();
            if key.is_empty() {
                return Err(RegistryError::EmptyOptionName);
            }
            if options.contains_key(&key) {
                return Err(RegistryError::DuplicateOption(spec.name().to_string()));
            }
            options.insert(key, spec);
        }

        Ok(Registry { commands, options })
    }
}

impl std::fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("commands", &self.commands.len())
            .field("options", &self.options.len())
            .finish()
    }
}

/// The always-available terminators. They accept and ignore any arguments.
fn exit_commands() -> [CommandSpec; 2] {
    ["exit", "quit"].map(|name| {
        CommandSpec::new(name, |ctx, _| {
            ctx.exit();
            Ok(())
        })
        .comment("exit")
        .variadic(0, 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> CommandSpec {
        CommandSpec::new(name, |_, _| Ok(()))
    }

    fn help_text(registry: &Registry) -> String {
        let mut out = Vec::new();
        registry.write_help(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn longest_registered_prefix_wins() {
        let registry = Registry::builder()
            .command(noop("get"))
            .command(noop("get status"))
            .build()
            .unwrap();

        let (spec, n) = registry.resolve(&["get", "status", "now"]).unwrap();
        assert_eq!(spec.name().to_string(), "get status");
        assert_eq!(n, 2);

        let (spec, n) = registry.resolve(&["get", "config"]).unwrap();
        assert_eq!(spec.name().to_string(), "get");
        assert_eq!(n, 1);
    }

    #[test]
    fn prefix_words_alone_do_not_match() {
        let registry = Registry::builder().command(noop("get status")).build().unwrap();
        assert!(registry.resolve(&["get"]).is_none());
        assert!(registry.resolve(&["status", "get"]).is_none());
        assert!(registry.resolve::<&str>(&[]).is_none());
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = Registry::builder()
            .command(noop("Get Status"))
            .option(OptionSpec::new("Verbose", |_, _| Ok(())))
            .build()
            .unwrap();
        assert!(registry.command(&["GET", "status"]).is_some());
        assert!(registry.option("VERBOSE").is_some());
        assert!(registry.option("verbos").is_none());
    }

    #[test]
    fn exit_and_quit_are_always_present() {
        let registry = Registry::builder().build().unwrap();
        assert!(registry.command(&["exit"]).is_some());
        assert!(registry.command(&["QUIT"]).is_some());
    }

    #[test]
    fn explicit_exit_replaces_builtin() {
        let registry = Registry::builder()
            .command(noop("exit").comment("leave politely"))
            .build()
            .unwrap();
        let exit = registry.command(&["exit"]).unwrap();
        assert_eq!(exit.comment_text(), "leave politely");
    }

    #[test]
    fn duplicates_are_rejected() {
        let err = Registry::builder()
            .command(noop("get status"))
            .command(noop("GET  STATUS"))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateCommand("GET STATUS".into()));

        let err = Registry::builder()
            .option(OptionSpec::new("v", |_, _| Ok(())))
            .option(OptionSpec::new("-V", |_, _| Ok(())))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateOption("V".into()));
    }

    #[test]
    fn empty_names_are_rejected() {
        let err = Registry::builder().command(noop("  ")).build().unwrap_err();
        assert_eq!(err, RegistryError::EmptyCommandName);
        let err = Registry::builder()
            .option(OptionSpec::new("-", |_, _| Ok(())))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::EmptyOptionName);
    }

    #[test]
    fn help_lists_commands_and_options_side_by_side() {
        let registry = Registry::builder()
            .command(noop("get status").args("[when]").comment("show status"))
            .option(OptionSpec::new("name", |_, _| Ok(())).args("name").comment("set name"))
            .option(OptionSpec::new("verbose", |_, _| Ok(())).comment("chatty"))
            .build()
            .unwrap();

        // widths: 10+1, 6+1, 11+1 | 8+1, 4+1, 8
        let expected = "\
Commands                      Options
----------------------------------------------------
exit              exit        -name    name set name
get status [when] show status -verbose      chatty
quit              exit
";
        assert_eq!(help_text(&registry), expected);
    }

    #[test]
    fn help_without_options_has_no_option_header() {
        let registry = Registry::builder().build().unwrap();
        assert_eq!(help_text(&registry), "Commands\n---------\nexit exit\nquit exit\n");
    }
}
