//! Lexical analysis of one logical input line into plain string tokens.
//!
//! Rules, in short:
//! - unquoted whitespace separates tokens, runs of it collapse;
//! - `\` escapes the next character (`\n` is a newline, `\xHH` a code point);
//! - `"..."` copies literally except for `\` escapes;
//! - `'...'` copies everything literally, backslashes included.
//!
//! Unterminated quotes and escapes are not errors: whatever was collected for the
//! last token is still emitted.

/// Where an escape sequence hands control back once it is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    Word,
    DoubleQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Start,
    ReadingWord,
    ReadingSingleQuote,
    ReadingDoubleQuote,
    Escape(Resume),
    Hex { resume: Resume, value: u32, digits: u8 },
}

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
    state: LexingState,
    buffer: String,
}

impl LexingFSM {
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            state: LexingState::Start,
            buffer: String::new(),
        }
    }

    /// Consumes the whole line and returns the tokens in order.
    fn make_tokens(&mut self) -> Vec<String> {
        let mut out = Vec::new();

        while let Some(ch) = self.read_char() {
            self.step(ch, &mut out);
        }

        // A pending `\xH` still produces its code point.
        if let LexingState::Hex { value, digits, .. } = self.state {
            if digits > 0 {
                self.push_code_point(value);
            }
        }
        if self.state != LexingState::Start {
            out.push(std::mem::take(&mut self.buffer));
        }

        out
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn step(&mut self, ch: char, out: &mut Vec<String>) {
        match self.state {
            LexingState::Start => self.handle_start(ch),
            LexingState::ReadingWord => self.handle_word(ch, out),
            LexingState::ReadingSingleQuote => self.handle_single_quote(ch),
            LexingState::ReadingDoubleQuote => self.handle_double_quote(ch),
            LexingState::Escape(resume) => self.handle_escape(ch, resume),
            LexingState::Hex {
                resume,
                value,
                digits,
            } => self.handle_hex(ch, resume, value, digits, out),
        }
    }

    fn handle_start(&mut self, ch: char) {
        match ch {
            c if c.is_whitespace() => {}
            '\\' => self.state = LexingState::Escape(Resume::Word),
            '"' => self.state = LexingState::ReadingDoubleQuote,
            '\'' => self.state = LexingState::ReadingSingleQuote,
            c => {
                self.buffer.push(c);
                self.state = LexingState::ReadingWord;
            }
        }
    }

    fn handle_word(&mut self, ch: char, out: &mut Vec<String>) {
        match ch {
            c if c.is_whitespace() => {
                out.push(std::mem::take(&mut self.buffer));
                self.state = LexingState::Start;
            }
            '\\' => self.state = LexingState::Escape(Resume::Word),
            '"' => self.state = LexingState::ReadingDoubleQuote,
            '\'' => self.state = LexingState::ReadingSingleQuote,
            c => self.buffer.push(c),
        }
    }

    fn handle_single_quote(&mut self, ch: char) {
        match ch {
            '\'' => self.state = LexingState::ReadingWord,
            c => self.buffer.push(c),
        }
    }

    fn handle_double_quote(&mut self, ch: char) {
        match ch {
            '"' => self.state = LexingState::ReadingWord,
            '\\' => self.state = LexingState::Escape(Resume::DoubleQuote),
            c => self.buffer.push(c),
        }
    }

    fn handle_escape(&mut self, ch: char, resume: Resume) {
        match ch {
            'x' | 'X' => {
                self.state = LexingState::Hex {
                    resume,
                    value: 0,
                    digits: 0,
                };
                return;
            }
            'n' | 'N' => self.buffer.push('\n'),
            c => self.buffer.push(c),
        }
        self.resume(resume);
    }

    fn handle_hex(
        &mut self,
        ch: char,
        resume: Resume,
        value: u32,
        digits: u8,
        out: &mut Vec<String>,
    ) {
        match ch.to_digit(16) {
            Some(d) => {
                let value = value * 16 + d;
                if digits + 1 == 2 {
                    self.push_code_point(value);
                    self.resume(resume);
                } else {
                    self.state = LexingState::Hex {
                        resume,
                        value,
                        digits: digits + 1,
                    };
                }
            }
            None => {
                // The escape ends here; `ch` belongs to whatever comes next.
                self.push_code_point(value);
                self.resume(resume);
                self.step(ch, out);
            }
        }
    }

    fn resume(&mut self, resume: Resume) {
        self.state = match resume {
            Resume::Word => LexingState::ReadingWord,
            Resume::DoubleQuote => LexingState::ReadingDoubleQuote,
        };
    }

    fn push_code_point(&mut self, value: u32) {
        // At most two hex digits, so always a valid scalar value.
        if let Some(c) = char::from_u32(value) {
            self.buffer.push(c);
        }
    }
}

/// Splits one logical line into tokens.
///
/// The whole line is consumed eagerly; the returned vector can be iterated as
/// many times as needed.
///
/// ```
/// use cmdshell::lexer::split_into_tokens;
/// assert_eq!(split_into_tokens(r#"say "hello world" it\'s"#), ["say", "hello world", "it's"]);
/// ```
pub fn split_into_tokens(line: &str) -> Vec<String> {
    let mut lexer = LexingFSM::new(line);
    let tokens = lexer.make_tokens();
    tracing::trace!(line, tokens = ?tokens, "lexed");
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(s: &str) -> Vec<String> {
        split_into_tokens(s)
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(lex("  get \t status   now "), ["get", "status", "now"]);
        assert!(lex("   ").is_empty());
        assert!(lex("").is_empty());
    }

    #[test]
    fn double_quotes_group_words() {
        assert_eq!(lex(r#"-name "John Q" -verbose"#), ["-name", "John Q", "-verbose"]);
    }

    #[test]
    fn quotes_join_with_adjacent_text() {
        assert_eq!(lex(r#"a"b c"d'e f'g"#), ["ab cde fg"]);
    }

    #[test]
    fn single_quotes_keep_backslashes() {
        assert_eq!(lex(r"'a\nb\\c'"), [r"a\nb\\c"]);
    }

    #[test]
    fn empty_quotes_make_empty_token() {
        assert_eq!(lex("x '' \"\" y"), ["x", "", "", "y"]);
    }

    #[test]
    fn bare_escapes() {
        assert_eq!(lex(r"a\ b"), ["a b"]);
        assert_eq!(lex(r"line\none"), ["line\none"]);
        assert_eq!(lex(r"line\Nnn"), ["line\nnn"]);
        assert_eq!(lex(r"\;"), [";"]);
        assert_eq!(lex(r"\'"), ["'"]);
    }

    #[test]
    fn escapes_inside_double_quotes() {
        assert_eq!(lex(r#""say \"hi\" \\ \n""#), ["say \"hi\" \\ \n"]);
        assert_eq!(lex(r#""\x41 b""#), ["A b"]);
    }

    #[test]
    fn hex_escape_takes_at_most_two_digits() {
        assert_eq!(lex(r"\x41"), ["A"]);
        assert_eq!(lex(r"\x414"), ["A4"]);
        assert_eq!(lex(r"\X7e"), ["~"]);
        assert_eq!(lex(r"\xe9t\xE9"), ["\u{e9}t\u{e9}"]);
    }

    #[test]
    fn short_hex_escape_ends_at_non_digit() {
        assert_eq!(lex(r"\x9g"), ["\tg"]);
        assert_eq!(lex(r"\x9 next"), ["\t", "next"]);
        assert_eq!(lex(r"\xz"), ["\u{0}z"]);
    }

    #[test]
    fn unterminated_constructs_still_emit_token() {
        assert_eq!(lex(r#"say "open quote"#), ["say", "open quote"]);
        assert_eq!(lex("say 'open"), ["say", "open"]);
        assert_eq!(lex(r"trailing\"), ["trailing"]);
        assert_eq!(lex(r"\x4"), ["\u{4}"]);
        assert_eq!(lex("'"), [""]);
    }

    #[test]
    fn separators_are_ordinary_tokens() {
        assert_eq!(lex("a b ; c;"), ["a", "b", ";", "c;"]);
    }
}
