use crate::config::ShellConfig;
use crate::dispatch;
use crate::io_adapters::{self, LineSource};
use crate::lexer;
use crate::options;
use crate::parser::{self, STATEMENT_SEPARATOR, Statement};
use crate::registry::Registry;
use crate::state::{Context, SessionState};
use anyhow::Result;
use std::io::{self, Write};

/// Drives one shell session: an optional batch pass over pre-split arguments,
/// then a read-execute loop over a [`LineSource`].
///
/// Output of commands, reports, and error messages all go to a single writer
/// (standard output unless replaced with [`Interpreter::with_output`]).
///
/// Example
/// ```
/// use cmdshell::{CommandSpec, Interpreter, Registry, ShellConfig};
/// use cmdshell::io_adapters::MemWriter;
///
/// let registry = Registry::builder()
///     .command(CommandSpec::new("hello", |ctx, _| Ok(ctx.print("hi")?)))
///     .build()
///     .unwrap();
/// let out = MemWriter::new();
/// let mut sh = Interpreter::new(registry, ShellConfig::default()).with_output(out.clone());
/// sh.execute_line("hello ; hello").unwrap();
/// assert_eq!(out.contents(), "hi\nhi\n");
/// ```
pub struct Interpreter {
    registry: Registry,
    config: ShellConfig,
    state: SessionState,
    out: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(registry: Registry, config: ShellConfig) -> Self {
        Self {
            registry,
            config,
            state: SessionState::default(),
            out: Box::new(io::stdout()),
        }
    }

    /// Replaces the session's output stream.
    pub fn with_output(mut self, out: impl Write + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Runs `args` as a batch, then enters the interactive loop unless the batch
    /// was a one-shot invocation.
    pub fn run<S: AsRef<str>>(&mut self, args: &[S], source: &mut dyn LineSource) -> Result<()> {
        if self.run_args(args)? {
            self.repl(source)?;
        }
        Ok(())
    }

    /// Executes an already split argument vector.
    ///
    /// Returns whether the interactive loop should follow: it should when no
    /// statement ran a command, or when the last argument is the statement
    /// separator. It never should once a command asked to exit.
    pub fn run_args<S: AsRef<str>>(&mut self, args: &[S]) -> Result<bool> {
        if args.is_empty() {
            return Ok(true);
        }
        tracing::debug!(args = args.len(), "batch pass");

        self.state.confused = false;
        let mut commanded = false;
        for statement in parser::split_statements(args.iter().map(|a| a.as_ref().to_string())) {
            commanded |= self.execute_statement(&statement, true)?;
        }
        self.finish_line()?;

        let trailing_separator = args.last().is_some_and(|a| a.as_ref() == STATEMENT_SEPARATOR);
        Ok(!self.state.done && (!commanded || trailing_separator))
    }

    /// The interactive loop: banner, then logical lines until a command asks to
    /// exit or the input ends, then the farewell.
    ///
    /// A failing line source ends the session like end of input, after one
    /// error message.
    pub fn repl(&mut self, source: &mut dyn LineSource) -> Result<()> {
        if let Some(banner) = &self.config.banner {
            writeln!(self.out, "{banner}")?;
        }

        while !self.state.done {
            self.out.flush()?;
            let line = match io_adapters::read_logical_line(
                source,
                &self.config.prompt,
                &self.config.continuation_prompt,
            ) {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(error = %format!("{err:#}"), "line source failed");
                    writeln!(self.out, "error: {err:#}")?;
                    break;
                }
            };

            if io_adapters::is_comment(&line) {
                continue;
            }
            self.execute_line(&line)?;
        }

        if let Some(farewell) = &self.config.farewell {
            writeln!(self.out, "{farewell}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Lexes `line` and runs every statement in it.
    ///
    /// A statement with an unknown option or command does not stop the ones
    /// after it. If any of them went wrong the help hint is printed once.
    pub fn execute_line(&mut self, line: &str) -> Result<()> {
        self.state.confused = false;
        let tokens = lexer::split_into_tokens(line);
        for statement in parser::split_statements(tokens) {
            self.execute_statement(&statement, false)?;
        }
        self.finish_line()?;
        Ok(())
    }

    /// Returns whether a command was dispatched.
    ///
    /// In batch mode a statement made of options only is not dispatched.
    fn execute_statement(&mut self, statement: &Statement, batch: bool) -> io::Result<bool> {
        tracing::debug!(tokens = ?statement, "statement");
        let mut ctx = Context::new(self.out.as_mut(), &mut self.state);

        if dispatch::takes_raw_arguments(&self.config.help_keyword, statement) {
            dispatch::dispatch(&self.registry, &self.config.help_keyword, &mut ctx, statement)?;
            return Ok(true);
        }

        let Some(positional) = options::resolve_options(&self.registry, &mut ctx, statement)? else {
            return Ok(false);
        };
        if batch && positional.is_empty() {
            return Ok(false);
        }

        dispatch::dispatch(&self.registry, &self.config.help_keyword, &mut ctx, &positional)?;
        Ok(true)
    }

    fn finish_line(&mut self) -> io::Result<()> {
        if self.state.confused {
            writeln!(self.out, "{}", self.config.help_hint())?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandSpec, OptionSpec};
    use crate::io_adapters::{MemWriter, ReaderSource};
    use std::cell::Cell;
    use std::io::Cursor;
    use std::rc::Rc;

    struct Fixture {
        sh: Interpreter,
        out: MemWriter,
        runs: Rc<Cell<usize>>,
    }

    fn fixture() -> Fixture {
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let registry = Registry::builder()
            .command(
                CommandSpec::new("echo", |ctx, args| Ok(ctx.print(&args.variadic().join(" "))?))
                    .variadic(0, 0),
            )
            .command(CommandSpec::new("tick", move |_, _| {
                counter.set(counter.get() + 1);
                Ok(())
            }))
            .option(OptionSpec::new("verbose", |_, _| Ok(())))
            .build()
            .unwrap();
        let out = MemWriter::new();
        let config = ShellConfig::default().with_banner(Some("hello".into()));
        let sh = Interpreter::new(registry, config).with_output(out.clone());
        Fixture { sh, out, runs }
    }

    fn script(text: &str) -> ReaderSource<Cursor<Vec<u8>>> {
        ReaderSource::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn statements_run_in_order() {
        let mut f = fixture();
        f.sh.execute_line("echo a ; echo 'b c' ; echo").unwrap();
        assert_eq!(f.out.contents(), "a\nb c\n\n");
    }

    #[test]
    fn confused_line_prints_hint_once_and_keeps_going() {
        let mut f = fixture();
        f.sh.execute_line("nope ; -bad ; tick").unwrap();
        assert_eq!(
            f.out.contents(),
            "error: unrecognized command: nope\n\
             error: unrecognized option: -bad\n\
             type \"help\" for help\n"
        );
        assert_eq!(f.runs.get(), 1);
        assert!(f.sh.state().confused);

        f.sh.execute_line("tick").unwrap();
        assert!(!f.sh.state().confused);
    }

    #[test]
    fn repl_skips_comments_and_joins_continuations() {
        let mut f = fixture();
        let mut src = script("# comment\n   # indented\necho one \\\ntwo\n");
        f.sh.repl(&mut src).unwrap();
        assert_eq!(f.out.contents(), "hello\none two\nGoodbye\n");
    }

    #[test]
    fn repl_stops_after_exit_line() {
        let mut f = fixture();
        let mut src = script("tick ; exit ; tick\ntick\n");
        f.sh.repl(&mut src).unwrap();
        assert_eq!(f.runs.get(), 2);
        assert!(f.sh.state().done);
        assert_eq!(f.out.contents(), "hello\nGoodbye\n");
    }

    #[test]
    fn batch_with_command_is_one_shot() {
        let mut f = fixture();
        assert!(!f.sh.run_args(&["tick", ";", "tick"]).unwrap());
        assert_eq!(f.runs.get(), 2);
    }

    #[test]
    fn batch_with_trailing_separator_continues() {
        let mut f = fixture();
        assert!(f.sh.run_args(&["tick", ";"]).unwrap());
        assert_eq!(f.runs.get(), 1);
    }

    #[test]
    fn batch_of_options_only_continues_silently() {
        let mut f = fixture();
        assert!(f.sh.run_args(&["-verbose"]).unwrap());
        assert!(f.out.contents().is_empty());
        assert!(f.sh.run_args::<&str>(&[]).unwrap());
    }

    #[test]
    fn batch_arguments_are_not_relexed() {
        let mut f = fixture();
        f.sh.run_args(&["echo", "a b", "'c'"]).unwrap();
        assert_eq!(f.out.contents(), "a b 'c'\n");
    }

    #[test]
    fn batch_errors_print_hint() {
        let mut f = fixture();
        assert!(!f.sh.run_args(&["bogus"]).unwrap());
        assert_eq!(
            f.out.contents(),
            "error: unrecognized command: bogus\ntype \"help\" for help\n"
        );
    }

    #[test]
    fn batch_exit_skips_loop() {
        let mut f = fixture();
        let mut src = script("tick\n");
        f.sh.run(&["exit", ";"], &mut src).unwrap();
        assert_eq!(f.runs.get(), 0);
        assert!(f.out.contents().is_empty());
    }

    #[test]
    fn run_enters_loop_without_arguments() {
        let mut f = fixture();
        let mut src = script("tick\n");
        f.sh.run::<&str>(&[], &mut src).unwrap();
        assert_eq!(f.runs.get(), 1);
        assert_eq!(f.out.contents(), "hello\nGoodbye\n");
    }

    struct Failing;

    impl LineSource for Failing {
        fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
            anyhow::bail!("terminal went away")
        }
    }

    #[test]
    fn failing_source_ends_session() {
        let mut f = fixture();
        f.sh.repl(&mut Failing).unwrap();
        assert_eq!(f.out.contents(), "hello\nerror: terminal went away\nGoodbye\n");
    }
}
