use crate::format;
use std::io::{self, Write};

/// Mutable dispatch state owned by one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Set by exit-style commands; the session terminates after the current line.
    pub done: bool,
    /// Set by resolution errors; reset at the start of every logical line.
    pub confused: bool,
}

/// What a handler gets to work with: the session output and the session flags.
pub struct Context<'a> {
    out: &'a mut dyn Write,
    state: &'a mut SessionState,
}

impl<'a> Context<'a> {
    pub fn new(out: &'a mut dyn Write, state: &'a mut SessionState) -> Self {
        Self { out, state }
    }

    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// Asks the session to terminate once the current line has been executed.
    pub fn exit(&mut self) {
        self.state.done = true;
    }

    pub fn is_done(&self) -> bool {
        self.state.done
    }

    pub(crate) fn confuse(&mut self) {
        self.state.confused = true;
    }

    pub fn is_confused(&self) -> bool {
        self.state.confused
    }

    /// Writes `line` followed by a newline, without indentation.
    pub fn print(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")
    }

    /// See [`format::report`].
    pub fn report(&mut self, label: Option<&str>, text: &str) -> io::Result<()> {
        format::report(&mut *self.out, label, text)
    }

    /// See [`format::report_list`].
    pub fn report_list<S: AsRef<str>>(&mut self, label: Option<&str>, items: &[S]) -> io::Result<()> {
        format::report_list(&mut *self.out, label, items)
    }

    /// See [`format::report_table`].
    pub fn report_table<H, C>(&mut self, columns: &[H], rows: &[Vec<C>]) -> io::Result<()>
    where
        H: AsRef<str>,
        C: AsRef<str>,
    {
        format::report_table(&mut *self.out, columns, rows)
    }
}
