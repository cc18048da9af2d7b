mod demo;

use anyhow::Result;
use argh::FromArgs;
use cmdshell::{EditorSource, Interpreter, ReaderSource, ShellConfig, logging};
use std::io::{self, IsTerminal};

#[derive(FromArgs)]
/// Interactive command shell. Arguments are run as commands first; the shell
/// stays open when there are none or when the last one is `;`.
struct Cli {
    #[argh(option)]
    /// log filter, e.g. `debug` or `cmdshell=trace` (overrides RUST_LOG)
    log_level: Option<String>,

    #[argh(option)]
    /// prompt shown before each line
    prompt: Option<String>,

    #[argh(switch, short = 'q')]
    /// do not print the banner and farewell
    quiet: bool,

    #[argh(positional, greedy)]
    /// commands to run; put `--` first if they start with an option
    args: Vec<String>,
}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();
    logging::init(cli.log_level.as_deref())?;

    let mut config = ShellConfig::default();
    if let Some(prompt) = cli.prompt {
        config = config.with_prompt(prompt);
    }
    if cli.quiet {
        config = config.quiet();
    }
    let history = config.history;

    let mut sh = Interpreter::new(demo::registry()?, config);
    if io::stdin().is_terminal() {
        sh.run(&cli.args, &mut EditorSource::new(history)?)
    } else {
        sh.run(&cli.args, &mut ReaderSource::new(io::stdin().lock()))
    }
}
