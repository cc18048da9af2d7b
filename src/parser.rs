//! Cutting a token sequence into independent statements.

/// Literal token that separates statements on one line.
pub const STATEMENT_SEPARATOR: &str = ";";

/// One `;`-delimited group of tokens. Never empty.
pub type Statement = Vec<String>;

/// Splits `tokens` on every token that is exactly [`STATEMENT_SEPARATOR`].
///
/// The separators themselves are dropped, and so are the empty groups that
/// consecutive or trailing separators would otherwise produce.
///
/// ```
/// use cmdshell::parser::split_statements;
/// let tokens = ["a", "b", ";", "c", ";"].map(String::from);
/// assert_eq!(split_statements(tokens), vec![vec!["a", "b"], vec!["c"]]);
/// ```
pub fn split_statements<I>(tokens: I) -> Vec<Statement>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut statements = Vec::new();
    let mut current = Vec::new();

    for token in tokens {
        let token = token.into();
        if token == STATEMENT_SEPARATOR {
            if !current.is_empty() {
                statements.push(std::mem::take(&mut current));
            }
        } else {
            current.push(token);
        }
    }
    if !current.is_empty() {
        statements.push(current);
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(tokens: &[&str]) -> Vec<Statement> {
        split_statements(tokens.iter().copied())
    }

    #[test]
    fn splits_on_separator() {
        assert_eq!(split(&["a", "b", ";", "c"]), vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn trailing_and_repeated_separators_are_dropped() {
        assert_eq!(split(&["a", ";"]), vec![vec!["a"]]);
        assert_eq!(split(&[";", ";", "a", ";", ";", "b", ";"]), vec![vec!["a"], vec!["b"]]);
        assert!(split(&[";"]).is_empty());
    }

    #[test]
    fn empty_input_has_no_statements() {
        assert!(split(&[]).is_empty());
    }

    #[test]
    fn only_exact_separator_splits() {
        assert_eq!(split(&["a;", "b", ";;"]), vec![vec!["a;", "b", ";;"]]);
    }

    #[test]
    fn empty_tokens_are_kept() {
        assert_eq!(split(&["", ";", "x", ""]), vec![vec![""], vec!["x", ""]]);
    }
}
