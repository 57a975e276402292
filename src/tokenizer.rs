//! Splitting of raw input lines on single-character delimiters.
//!
//! There is no quoting: a delimiter always splits, wherever it appears.
//! Empty fields produced by adjacent delimiters, or by a delimiter at the start
//! of the text, are kept. A delimiter at the very end does not open a new
//! field, and empty text produces no fields.

use std::ops::Deref;

/// Separates the arguments of one command.
pub const ARG_DELIMITER: char = ' ';
/// Separates the two stages of a pipeline.
pub const PIPE_DELIMITER: char = '|';
/// Separates a command from its output file.
pub const REDIRECT_DELIMITER: char = '>';

/// Ordered fields produced by [`split`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<String>);

impl Fields {
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Fields {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl IntoIterator for Fields {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Split `text` on every occurrence of `delimiter`.
///
/// ```
/// use myshell::tokenizer::split;
/// assert_eq!(&*split("a  b", ' '), ["a", "", "b"]);
/// assert_eq!(&*split("ls |", '|'), ["ls "]);
/// assert!(split("", ' ').is_empty());
/// ```
pub fn split(text: &str, delimiter: char) -> Fields {
    let mut fields: Vec<String> = text.split(delimiter).map(str::to_owned).collect();
    if fields.last().is_some_and(String::is_empty) {
        fields.pop();
    }
    Fields(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_repeated_delimiter_keeps_empty_field() {
        assert_eq!(&*split("a  b", ' '), ["a", "", "b"]);
    }

    #[test]
    fn test_leading_delimiter_opens_empty_field() {
        assert_eq!(&*split(" wc -l", ' '), ["", "wc", "-l"]);
        assert_eq!(&*split("|b", '|'), ["", "b"]);
    }

    #[test]
    fn test_trailing_delimiter_is_dropped_once() {
        assert_eq!(&*split("echo hi ", ' '), ["echo", "hi"]);
        assert_eq!(&*split("a||", '|'), ["a", ""]);
    }

    #[test]
    fn test_empty_and_blank_text() {
        assert!(split("", ' ').is_empty());
        assert_eq!(&*split(" ", ' '), [""]);
        assert_eq!(&*split("   ", ' '), ["", "", ""]);
    }

    #[test]
    fn test_no_delimiter_is_single_field() {
        assert_eq!(&*split("ls -la", '|'), ["ls -la"]);
    }

    #[test]
    fn test_no_whitespace_trimming() {
        assert_eq!(&*split("echo hi > out.txt", '>'), ["echo hi ", " out.txt"]);
    }

    proptest! {
        #[test]
        fn split_never_loses_text(text in "[a-c |]{0,24}") {
            let fields = split(&text, '|');
            let mut joined = fields.join("|");
            if text.ends_with('|') {
                joined.push('|');
            }
            prop_assert_eq!(joined, text);
        }

        #[test]
        fn split_fields_never_contain_delimiter(text in "[a-c >]{0,24}") {
            prop_assert!(split(&text, '>').iter().all(|f| !f.contains('>')));
        }
    }
}
