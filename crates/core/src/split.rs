//! Splits a section body into blank-line-delimited blocks.

use regex::Regex;
use std::sync::LazyLock;

/// Two or more consecutive line breaks (LF or CRLF) separate blocks.
static BLOCK_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\r?\n){2,}").unwrap());

/// A maximal run of text between blank-line boundaries.
///
/// Always trimmed and never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBlock<'a> {
    text: &'a str,
}

impl<'a> ContentBlock<'a> {
    /// The trimmed block text.
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Trimmed, non-empty lines of this block in order.
    pub fn lines(&self) -> impl Iterator<Item = &'a str> + Clone {
        self.text.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Lazily split `content` into blocks.
///
/// The returned iterator is `Clone`, so a caller can restart it from a copy.
/// Empty or whitespace-only content yields no blocks.
pub fn split_blocks(content: &str) -> Blocks<'_> {
    Blocks {
        remaining: Some(content),
    }
}

/// Iterator over the blocks of a section body. See [`split_blocks`].
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    remaining: Option<&'a str>,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = ContentBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(rest) = self.remaining {
            let (chunk, next) = match BLOCK_BREAK_REGEX.find(rest) {
                Some(m) => (&rest[..m.start()], Some(&rest[m.end()..])),
                None => (rest, None),
            };
            self.remaining = next;

            let text = chunk.trim();
            if !text.is_empty() {
                return Some(ContentBlock { text });
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn block_texts(content: &str) -> Vec<&str> {
        split_blocks(content).map(|b| b.as_str()).collect()
    }

    #[test]
    fn test_split_on_blank_lines() {
        assert_eq!(
            block_texts("# Intro\n\nHello world"),
            vec!["# Intro", "Hello world"]
        );
    }

    #[test]
    fn test_single_newline_does_not_split() {
        assert_eq!(block_texts("- a\n- b\n- c"), vec!["- a\n- b\n- c"]);
    }

    #[test]
    fn test_long_break_runs_and_trimming() {
        assert_eq!(
            block_texts("\n\n  first  \n\n\n\n\tsecond\n\n"),
            vec!["first", "second"]
        );
    }

    #[test]
    fn test_crlf_breaks() {
        assert_eq!(block_texts("one\r\n\r\ntwo\r\nthree"), vec!["one", "two\r\nthree"]);
    }

    #[test]
    fn test_whitespace_only_line_is_not_a_break() {
        // Only consecutive newline characters split; the spaces keep the block whole.
        assert_eq!(block_texts("a\n  \nb"), vec!["a\n  \nb"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(block_texts("").is_empty());
        assert!(block_texts("   \n\n \t \n\n").is_empty());
    }

    #[test]
    fn test_iterator_is_restartable() {
        let blocks = split_blocks("a\n\nb\n\nc");
        let first: Vec<_> = blocks.clone().collect();
        let second: Vec<_> = blocks.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_block_lines_are_trimmed_and_non_empty() {
        let block = split_blocks("  - a  \n  \n\t- b\r\n").next().unwrap();
        assert_eq!(block.lines().collect::<Vec<_>>(), vec!["- a", "- b"]);
    }

    proptest! {
        #[test]
        fn prop_split_rejoin_is_idempotent(content in "[a-c #\\-\t\r\n]{0,64}") {
            let blocks = block_texts(&content);
            let rejoined = blocks.join("\n\n");
            prop_assert_eq!(block_texts(&rejoined), blocks);
        }

        #[test]
        fn prop_blocks_are_trimmed_and_non_empty(content in "[a-c \t\r\n]{0,64}") {
            for block in split_blocks(&content) {
                prop_assert!(!block.as_str().is_empty());
                prop_assert_eq!(block.as_str(), block.as_str().trim());
            }
        }
    }
}
