//! Declarations of commands and options, and the contract their handlers follow.
//!
//! The shell never inspects what a handler does. It only needs the declaration:
//! a (possibly multi-word) name, how many positional arguments are accepted, and
//! the one-line help strings shown by `help`.

use crate::state::Context;
use std::fmt;
use thiserror::Error;

/// Failure raised by a command or option handler.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The arguments were not acceptable; the shell prints the usage line.
    #[error("invalid usage")]
    Usage,
    /// Any other failure; reported together with its cause chain.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
    /// Writing to the session output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// Convenience constructor for a plain failure message.
    pub fn failed(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self::Failed(anyhow::Error::msg(message))
    }
}

/// Result type returned by handlers.
pub type HandlerResult = Result<(), CommandError>;

/// Handler capability of a command: fixed parameters and variadic group are in [`CallArgs`].
pub type CommandHandler = Box<dyn Fn(&mut Context<'_>, &CallArgs<'_>) -> HandlerResult>;

/// Handler capability of an option: receives its argument when it takes one.
pub type OptionHandler = Box<dyn Fn(&mut Context<'_>, Option<&str>) -> HandlerResult>;

/// The arguments bound for one command invocation.
#[derive(Debug, Clone, Copy)]
pub struct CallArgs<'a> {
    fixed: &'a [String],
    variadic: &'a [String],
}

impl<'a> CallArgs<'a> {
    /// Binds `args` positionally: the first `fixed` tokens, then the rest as the variadic group.
    pub(crate) fn bind(args: &'a [String], fixed: usize) -> Self {
        let (fixed, variadic) = args.split_at(fixed.min(args.len()));
        Self { fixed, variadic }
    }

    /// Fixed parameter `index`.
    ///
    /// # Panics
    ///
    /// If `index` is not below the command's declared fixed arity. The shell
    /// checks arity before calling the handler, so a handler may index freely
    /// within its own declaration.
    pub fn arg(&self, index: usize) -> &'a str {
        &self.fixed[index]
    }

    pub fn fixed(&self) -> &'a [String] {
        self.fixed
    }

    /// The trailing variable-length group (empty when the command has none).
    pub fn variadic(&self) -> &'a [String] {
        self.variadic
    }
}

/// Bounds on a command's trailing variable-length argument group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variadic {
    pub min: usize,
    /// Upper bound; `0` means unbounded.
    pub max: usize,
}

/// How many positional arguments a command accepts after its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Arity {
    pub fixed: usize,
    pub variadic: Option<Variadic>,
}

impl Arity {
    /// Whether `count` arguments (the tokens left after the name) satisfy this arity.
    pub fn accepts(&self, count: usize) -> bool {
        match self.variadic {
            None => count == self.fixed,
            Some(Variadic { min, max }) => {
                count >= self.fixed + min && (max == 0 || count <= self.fixed + max)
            }
        }
    }
}

/// A command name: one or more words, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandName {
    words: Vec<String>,
}

impl CommandName {
    /// Splits `name` on whitespace, so `"get status"` is a two-word name.
    pub fn parse(name: &str) -> Self {
        Self {
            words: name.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Lookup key: the words lowercased.
    pub fn key(&self) -> Vec<String> {
        lookup_key(&self.words)
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.words.join(" "))
    }
}

/// Case-folds a prefix of tokens into a registry key.
pub(crate) fn lookup_key<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    words.iter().map(|w| w.as_ref().to_lowercase()).collect()
}

/// Declaration of one command.
///
/// ```
/// use cmdshell::CommandSpec;
/// let spec = CommandSpec::new("get status", |ctx, args| {
///     ctx.report(Some("status: "), args.variadic().first().map_or("now", String::as_str))?;
///     Ok(())
/// })
/// .args("[when]")
/// .comment("show the status")
/// .variadic(0, 1);
/// assert_eq!(spec.usage(), "usage: get status [when]");
/// ```
pub struct CommandSpec {
    name: CommandName,
    args_help: String,
    comment: String,
    arity: Arity,
    handler: CommandHandler,
}

impl CommandSpec {
    /// A command taking no arguments until [`fixed`](Self::fixed) or
    /// [`variadic`](Self::variadic) say otherwise.
    pub fn new<F>(name: &str, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>, &CallArgs<'_>) -> HandlerResult + 'static,
    {
        Self {
            name: CommandName::parse(name),
            args_help: String::new(),
            comment: String::new(),
            arity: Arity::default(),
            handler: Box::new(handler),
        }
    }

    /// Free-text usage string, e.g. `"<user> [group...]"`.
    pub fn args(mut self, args_help: impl Into<String>) -> Self {
        self.args_help = args_help.into();
        self
    }

    /// One-line help text.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Number of required positional parameters before the variadic group.
    pub fn fixed(mut self, count: usize) -> Self {
        self.arity.fixed = count;
        self
    }

    /// Adds a trailing variadic group of `min..=max` arguments (`max == 0` is unbounded).
    pub fn variadic(mut self, min: usize, max: usize) -> Self {
        self.arity.variadic = Some(Variadic { min, max });
        self
    }

    pub fn name(&self) -> &CommandName {
        &self.name
    }

    pub fn args_help(&self) -> &str {
        &self.args_help
    }

    pub fn comment_text(&self) -> &str {
        &self.comment
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// The usage line printed on arity violations and usage faults.
    pub fn usage(&self) -> String {
        format!("usage: {} {}", self.name, self.args_help)
            .trim_end()
            .to_string()
    }

    pub(crate) fn invoke(&self, ctx: &mut Context<'_>, args: &[String]) -> HandlerResult {
        (self.handler)(ctx, &CallArgs::bind(args, self.arity.fixed))
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("args_help", &self.args_help)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Declaration of one flag-style option, written `-name` on the command line.
pub struct OptionSpec {
    name: String,
    args_help: String,
    comment: String,
    takes_arg: bool,
    handler: OptionHandler,
}

impl OptionSpec {
    /// An option without an argument. A leading `-` in `name` is ignored.
    pub fn new<F>(name: &str, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>, Option<&str>) -> HandlerResult + 'static,
    {
        Self {
            name: name.trim_start_matches('-').to_string(),
            args_help: String::new(),
            comment: String::new(),
            takes_arg: false,
            handler: Box::new(handler),
        }
    }

    /// Declares the option's argument; a non-empty help string means it takes one.
    pub fn args(mut self, args_help: impl Into<String>) -> Self {
        self.args_help = args_help.into();
        self.takes_arg = !self.args_help.is_empty();
        self
    }

    pub fn takes_arg(mut self, takes_arg: bool) -> Self {
        self.takes_arg = takes_arg;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args_help(&self) -> &str {
        &self.args_help
    }

    pub fn comment_text(&self) -> &str {
        &self.comment
    }

    pub fn is_taking_arg(&self) -> bool {
        self.takes_arg
    }

    pub(crate) fn invoke(&self, ctx: &mut Context<'_>, arg: Option<&str>) -> HandlerResult {
        (self.handler)(ctx, arg)
    }
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("name", &self.name)
            .field("takes_arg", &self.takes_arg)
            .finish_non_exhaustive()
    }
}
