//! An embeddable interactive command shell.
//!
//! The embedding application describes its commands and options with
//! [`CommandSpec`] and [`OptionSpec`], collects them in a [`Registry`], and hands
//! the registry to an [`Interpreter`]. The interpreter then reads lines from a
//! [`LineSource`], splits them into `;`-separated statements, runs the `-option`
//! handlers found in each statement, and dispatches the rest to the command with
//! the longest matching multi-word name.
//!
//! The stages are usable on their own: [`lexer`] turns a line into tokens,
//! [`parser`] groups tokens into statements, [`options`] and [`dispatch`] resolve
//! a statement, and [`format`] renders reports and quotes values.

pub mod command;
pub mod config;
pub mod dispatch;
pub mod external;
pub mod format;
pub mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod logging;
pub mod options;
pub mod parser;
pub mod registry;
pub mod state;

pub use command::{CallArgs, CommandError, CommandSpec, HandlerResult, OptionSpec};
pub use config::ShellConfig;
pub use interpreter::Interpreter;
pub use io_adapters::{EditorSource, LineSource, ReaderSource};
pub use registry::{Registry, RegistryBuilder, RegistryError};
pub use state::{Context, SessionState};
