use anyhow::{Context, Result};
use regex::Regex;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::cell::RefCell;
use std::io::{BufRead, Result as IoResult, Write};
use std::rc::Rc;
use std::sync::LazyLock;

/// Optional leading whitespace, then `#`.
static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#").expect("comment pattern"));

/// Marks a physical line that continues on the next one.
pub const CONTINUATION_MARKER: char = '\\';

/// Something that produces physical input lines.
///
/// Interactive and scripted sessions differ only in which source is wired in.
pub trait LineSource {
    /// Reads one line without its terminator, or `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal input through `rustyline`, with in-memory history.
pub struct EditorSource {
    editor: DefaultEditor,
    history: bool,
}

impl EditorSource {
    pub fn new(history: bool) -> Result<Self> {
        let editor = DefaultEditor::new().context("cannot set up line editor")?;
        Ok(Self { editor, history })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if self.history && !line.trim().is_empty() {
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        tracing::warn!("failed to add history entry: {e}");
                    }
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Interrupted) => {
                tracing::debug!("interrupted");
                Ok(None)
            }
            Err(err) => Err(err).context("cannot read input line"),
        }
    }
}

/// Lines from any buffered reader (a pipe, a file, an in-memory script).
/// Prompts are not shown.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("cannot read input line")?;
        if read == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// Whether `line` ends in a continuation marker that is not itself escaped.
pub fn ends_with_continuation(line: &str) -> bool {
    let trailing = line
        .chars()
        .rev()
        .take_while(|c| *c == CONTINUATION_MARKER)
        .count();
    trailing % 2 == 1
}

/// Whether a logical line is a comment and should be skipped.
pub fn is_comment(line: &str) -> bool {
    COMMENT.is_match(line)
}

/// Reads physical lines until one does not end in a continuation marker.
///
/// Each marker is removed and the pieces are concatenated. Returns `None` when
/// the input ends before any line was read; input ending in the middle of a
/// continuation yields what was collected.
pub fn read_logical_line(
    source: &mut dyn LineSource,
    prompt: &str,
    continuation_prompt: &str,
) -> Result<Option<String>> {
    let mut logical: Option<String> = None;
    let mut prompt = prompt;

    while let Some(line) = source.read_line(prompt)? {
        let buffer = logical.get_or_insert_with(String::new);
        if ends_with_continuation(&line) {
            buffer.push_str(&line[..line.len() - CONTINUATION_MARKER.len_utf8()]);
            prompt = continuation_prompt;
        } else {
            buffer.push_str(&line);
            break;
        }
    }

    Ok(logical)
}

/// Memory-backed writer, for capturing a session's output.
///
/// Cloning shares the buffer, so one clone can be handed to the session while
/// another reads what was written.
#[derive(Clone, Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.borrow()).into_owned()
    }

    /// Returns and clears everything written so far.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.buf.borrow_mut());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
