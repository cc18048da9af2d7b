//! Property tests for the lexer and the display-quoting function.

use cmdshell::format::quote;
use cmdshell::lexer::split_into_tokens;
use cmdshell::parser::split_statements;
use proptest::prelude::*;

/// Printable ASCII, newlines and high Latin-1 characters.
fn value() -> impl Strategy<Value = String> {
    r"[ -~\n\x{80}-\x{ff}]{0,24}"
}

proptest! {
    #[test]
    fn quoted_value_lexes_back_to_itself(s in value()) {
        let quoted = quote(&s);
        prop_assert_eq!(split_into_tokens(&quoted), vec![s.clone()], "quoted as {}", quoted);
    }

    #[test]
    fn quoted_values_stay_separate(a in value(), b in value()) {
        let line = format!("{} {}", quote(&a), quote(&b));
        prop_assert_eq!(split_into_tokens(&line), vec![a, b]);
    }

    #[test]
    fn lexing_never_panics(line in any::<String>()) {
        let _ = split_into_tokens(&line);
    }

    #[test]
    fn statements_never_contain_separators_or_empty_groups(
        tokens in prop::collection::vec(prop_oneof![Just(";".to_string()), "[a-c]{1,2}"], 0..16)
    ) {
        let statements = split_statements(tokens.clone());
        for statement in &statements {
            prop_assert!(!statement.is_empty());
            prop_assert!(statement.iter().all(|t| t != ";"));
        }
        let words: Vec<String> = tokens.into_iter().filter(|t| t != ";").collect();
        prop_assert_eq!(statements.concat(), words);
    }
}
