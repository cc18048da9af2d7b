//! Rendering of command results: labelled values, lists, aligned tables, and a
//! shell-safe quoting function for showing values back to the user.
//!
//! Every report line is indented by four spaces so results stand apart from
//! prompts and diagnostics.

use regex::Regex;
use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::LazyLock;

const INDENT: &str = "    ";

/// A table cell counts as numeric when it is blank or made of digits.
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[0-9]*$").expect("numeric cell pattern"));

/// Splits on newlines, dropping trailing empty lines; an empty string is one empty line.
fn split_lines(s: &str) -> Vec<&str> {
    if s.is_empty() {
        return vec![""];
    }
    let mut lines: Vec<&str> = s.split('\n').collect();
    while lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

fn cell<C: AsRef<str>>(row: &[C], c: usize) -> &str {
    row.get(c).map_or("", AsRef::as_ref)
}

fn width(s: &str) -> usize {
    s.chars().count()
}

/// Writes `text`, prefixing the first line with `label` and the following ones
/// with blanks of the same width.
pub fn report(out: &mut dyn Write, label: Option<&str>, text: &str) -> io::Result<()> {
    let prefix = format!("{INDENT}{}", label.unwrap_or(""));
    let pad = " ".repeat(width(&prefix));
    for (i, line) in split_lines(text).into_iter().enumerate() {
        let lead = if i == 0 { &prefix } else { &pad };
        writeln!(out, "{lead}{line}")?;
    }
    Ok(())
}

/// Writes `items` one per line.
///
/// With a label the list is bracketed: `label: [first`, `,second`, ... `,last]`.
/// Without one the items are written bare.
pub fn report_list<S: AsRef<str>>(
    out: &mut dyn Write,
    label: Option<&str>,
    items: &[S],
) -> io::Result<()> {
    if items.is_empty() {
        return report(out, label, "[]");
    }

    let mut prefix = format!("{INDENT}{}", label.unwrap_or(""));
    let pad = " ".repeat(width(&prefix));
    let mut mark = '[';

    for (i, item) in items.iter().enumerate() {
        let mut item = item.as_ref().to_string();
        if label.is_some() && i == items.len() - 1 {
            item.push(']');
        }
        for line in split_lines(&item) {
            if label.is_some() {
                writeln!(out, "{prefix}{mark}{line}")?;
            } else {
                writeln!(out, "{prefix}{line}")?;
            }
            mark = ' ';
            prefix.clone_from(&pad);
        }
        mark = ',';
    }
    Ok(())
}

/// Writes an aligned table with a dashed rule under the header.
///
/// Numeric columns are right-aligned, the others left-aligned; a left-aligned
/// last column is not padded. A cell containing newlines spreads its row over
/// several lines, with blanks in the other columns.
pub fn report_table<H, C>(out: &mut dyn Write, columns: &[H], rows: &[Vec<C>]) -> io::Result<()>
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    let mut widths: Vec<usize> = columns.iter().map(|h| width(h.as_ref())).collect();
    let mut numeric = vec![true; columns.len()];
    let mut depths = vec![1usize; rows.len()];

    for (c, (w, digits)) in widths.iter_mut().zip(numeric.iter_mut()).enumerate() {
        for (r, row) in rows.iter().enumerate() {
            let value = cell(row, c);
            let lines = split_lines(value);
            depths[r] = depths[r].max(lines.len());
            for line in lines {
                *w = (*w).max(width(line));
            }
            if !NUMERIC.is_match(value) {
                *digits = false;
            }
        }
    }

    let last = columns.len().saturating_sub(1);
    let render = |cells: &[&str]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(c, text)| {
                let w = widths[c];
                if numeric[c] {
                    format!("{text:>w$}")
                } else if c == last {
                    text.to_string()
                } else {
                    format!("{text:<w$}")
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    };

    let header: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
    report(out, None, &render(&header))?;
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join(" ");
    report(out, None, &rule)?;

    for (r, row) in rows.iter().enumerate() {
        let mut lines = vec![vec![""; columns.len()]; depths[r]];
        for c in 0..columns.len() {
            for (d, part) in split_lines(cell(row, c)).into_iter().enumerate() {
                lines[d][c] = part;
            }
        }
        for line in &lines {
            report(out, None, &render(line))?;
        }
    }
    Ok(())
}

fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

/// Quotes `s` so that lexing the result yields `s` again.
///
/// - empty: `''`
/// - printable ASCII without blanks, quotes or backslashes: unchanged
/// - printable ASCII without single quotes: wrapped in single quotes
/// - anything else: backslash escapes (`\n`, `\\`, `\"`, `\xHH`, `\x{HEX}`),
///   wrapped in double quotes when it contains a space
///
/// ```
/// use cmdshell::format::quote;
/// assert_eq!(quote(""), "''");
/// assert_eq!(quote("abc"), "abc");
/// assert_eq!(quote("a b"), "'a b'");
/// assert_eq!(quote("it's"), r"it\'s");
/// ```
pub fn quote(s: &str) -> Cow<'_, str> {
    if s.is_empty() {
        return Cow::Borrowed("''");
    }
    if s.chars()
        .all(|c| is_printable_ascii(c) && !matches!(c, ' ' | '\'' | '"' | '\\'))
    {
        return Cow::Borrowed(s);
    }
    if s.chars().all(|c| is_printable_ascii(c) && c != '\'') {
        return Cow::Owned(format!("'{s}'"));
    }

    let spaced = s.contains(' ');
    let mut quoted = String::with_capacity(s.len() + 2);
    if spaced {
        quoted.push('"');
    }
    for c in s.chars() {
        let cp = u32::from(c);
        match c {
            '\n' => quoted.push_str("\\n"),
            _ if cp <= 0x1f || (0x7f..=0xff).contains(&cp) => {
                quoted.push_str(&format!("\\x{cp:02x}"));
            }
            _ if cp >= 0x100 => quoted.push_str(&format!("\\x{{{cp:x}}}")),
            '\\' | '"' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\'' if !spaced => quoted.push_str("\\'"),
            _ => quoted.push(c),
        }
    }
    if spaced {
        quoted.push('"');
    }
    Cow::Owned(quoted)
}

/// [`quote`] applied to every item.
pub fn quote_all<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| quote(s.as_ref()).into_owned()).collect()
}
