use tracing::{error, info};

use crate::types::Token;

/// Tokens appended without a preceding space.
pub const PUNCTUATION: [&str; 4] = ["!", "?", ".", ","];

/// Join tokens into one string.
///
/// Punctuation marks in [`PUNCTUATION`] attach to the previous text; every
/// other token is preceded by a single space. The fold starts from an empty
/// string, so the result begins with a space whenever the first token is a
/// word.
///
/// An empty token list is logged and yields `""`.
pub fn assemble(tokens: &[Token]) -> String {
    if tokens.is_empty() {
        error!("transcript is empty or invalid");
        return String::new();
    }

    let text = tokens
        .iter()
        .map(|t| t.speech.as_str())
        .fold(String::new(), |mut acc, word| {
            if !PUNCTUATION.contains(&word) {
                acc.push(' ');
            }
            acc.push_str(word);
            acc
        });

    info!(text = %text, "extracted text");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<Token> {
        words.iter().map(|w| Token::new(*w)).collect()
    }

    #[test]
    fn test_assemble_hello_world() {
        assert_eq!(assemble(&tokens(&["Hello", "world", "!"])), " Hello world!");
    }

    #[test]
    fn test_assemble_empty() {
        assert_eq!(assemble(&[]), "");
    }

    #[test]
    fn test_assemble_all_punctuation_marks() {
        let out = assemble(&tokens(&["a", ",", "b", ".", "c", "?", "d", "!"]));
        assert_eq!(out, " a, b. c? d!");
    }

    #[test]
    fn test_assemble_leading_punctuation_has_no_space() {
        assert_eq!(assemble(&tokens(&[".", "next"])), ". next");
    }

    #[test]
    fn test_assemble_other_symbols_are_words() {
        let out = assemble(&tokens(&["say", "\"", "hi", "\"", "...", ";", ":"]));
        assert_eq!(out, " say \" hi \" ... ; :");
    }

    #[test]
    fn test_assemble_multi_char_punctuation_is_a_word() {
        assert_eq!(assemble(&tokens(&["wait", "?!"])), " wait ?!");
    }

    #[test]
    fn test_assemble_consecutive_punctuation() {
        assert_eq!(assemble(&tokens(&["what", "?", "!", "."])), " what?!.");
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let input = tokens(&["one", "two", ",", "three", "."]);
        assert_eq!(assemble(&input), assemble(&input.clone()));
    }

    #[test]
    fn test_assemble_spacing_rule_per_token() {
        let words = ["Then", ",", "he", "left", ".", "Why", "?"];
        let out = assemble(&tokens(&words));

        // Rebuild by checking each token's prefix in order.
        let mut rest = out.as_str();
        for w in words {
            if PUNCTUATION.contains(&w) {
                rest = rest.strip_prefix(w).unwrap();
            } else {
                rest = rest.strip_prefix(' ').unwrap().strip_prefix(w).unwrap();
            }
        }
        assert!(rest.is_empty());
    }

    #[test]
    fn test_assemble_ignores_timestamps() {
        let mut a = Token::new("word");
        a.start = 1.0;
        a.end = 2.0;
        assert_eq!(assemble(&[a]), " word");
    }
}
