//! Line classification: heading, bullet, or plain text.

use regex::Regex;
use std::sync::LazyLock;

/// One to six `#` followed by whitespace. A run of seven or more is plain text.
static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());

/// A heading marker at the start of a title, for stripping.
static HEADING_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+").unwrap());

/// Unordered list marker: `-`, `*` or `•` followed by whitespace.
static UNORDERED_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*•]\s+").unwrap());

/// Ordered list marker: ASCII digits, then `.` or `)`, then whitespace.
static ORDERED_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9]+[.)]\s+").unwrap());

/// Deepest heading level a line can carry.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// A single line tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifiedLine<'a> {
    /// `# text` through `###### text`.
    Heading {
        /// Number of leading `#`, within `1..=6`.
        level: u8,
        /// Text after the marker, trimmed.
        text: &'a str,
    },
    /// A list item; `text` has the marker stripped.
    Bullet {
        /// Item text without its marker.
        text: &'a str,
    },
    /// Anything else, unchanged.
    PlainText(&'a str),
}

impl<'a> ClassifiedLine<'a> {
    /// Whether this line is a list item.
    pub fn is_bullet(&self) -> bool {
        matches!(self, ClassifiedLine::Bullet { .. })
    }

    /// Whether this line is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, ClassifiedLine::Heading { .. })
    }
}

/// Classify a trimmed line. Total: every line maps to exactly one kind.
pub fn classify_line(line: &str) -> ClassifiedLine<'_> {
    if let Some(caps) = HEADING_REGEX.captures(line) {
        let level = caps.get(1).map_or(1, |m| m.as_str().len());
        let text = caps.get(2).map_or("", |m| m.as_str()).trim();
        return ClassifiedLine::Heading {
            level: clamp_heading_level(level),
            text,
        };
    }

    if is_bullet(line) {
        return ClassifiedLine::Bullet {
            text: strip_bullet_marker(line),
        };
    }

    ClassifiedLine::PlainText(line)
}

/// Whether a line starts with an unordered or ordered list marker.
pub fn is_bullet(line: &str) -> bool {
    UNORDERED_MARKER_REGEX.is_match(line) || ORDERED_MARKER_REGEX.is_match(line)
}

/// Remove a leading list marker.
///
/// The unordered marker is removed first, then an ordered one, so
/// `- 1. item` becomes `item`.
pub fn strip_bullet_marker(line: &str) -> &str {
    let line = strip_prefix_match(&UNORDERED_MARKER_REGEX, line);
    strip_prefix_match(&ORDERED_MARKER_REGEX, line)
}

/// Remove one leading `#`..`######` marker and trim, for slide titles.
///
/// The marker must be at the very start; a title with leading spaces keeps it.
pub fn strip_heading_marker(title: &str) -> &str {
    strip_prefix_match(&HEADING_MARKER_REGEX, title).trim()
}

fn strip_prefix_match<'a>(regex: &Regex, line: &'a str) -> &'a str {
    match regex.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

fn clamp_heading_level(level: usize) -> u8 {
    level.clamp(1, MAX_HEADING_LEVEL as usize) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_heading_levels() {
        assert_eq!(
            classify_line("# Intro"),
            ClassifiedLine::Heading { level: 1, text: "Intro" }
        );
        assert_eq!(
            classify_line("###   Deep dive  "),
            ClassifiedLine::Heading { level: 3, text: "Deep dive" }
        );
        assert_eq!(
            classify_line("######\tSix"),
            ClassifiedLine::Heading { level: 6, text: "Six" }
        );
    }

    #[test]
    fn test_seven_hashes_is_plain_text() {
        assert_eq!(
            classify_line("####### Too deep"),
            ClassifiedLine::PlainText("####### Too deep")
        );
    }

    #[test]
    fn test_hash_without_space_is_plain_text() {
        assert_eq!(classify_line("#hashtag"), ClassifiedLine::PlainText("#hashtag"));
        assert_eq!(classify_line("#"), ClassifiedLine::PlainText("#"));
    }

    #[test]
    fn test_unordered_bullets() {
        assert_eq!(classify_line("- a"), ClassifiedLine::Bullet { text: "a" });
        assert_eq!(classify_line("* b"), ClassifiedLine::Bullet { text: "b" });
        assert_eq!(classify_line("•  c"), ClassifiedLine::Bullet { text: "c" });
    }

    #[test]
    fn test_ordered_bullets() {
        assert_eq!(classify_line("1. first"), ClassifiedLine::Bullet { text: "first" });
        assert_eq!(classify_line("12) twelfth"), ClassifiedLine::Bullet { text: "twelfth" });
    }

    #[test]
    fn test_marker_needs_whitespace() {
        assert_eq!(classify_line("-a"), ClassifiedLine::PlainText("-a"));
        assert_eq!(classify_line("3.14 is pi"), ClassifiedLine::PlainText("3.14 is pi"));
        assert_eq!(classify_line("**bold**"), ClassifiedLine::PlainText("**bold**"));
    }

    #[test]
    fn test_non_ascii_digits_are_not_ordered_markers() {
        assert_eq!(classify_line("١. item"), ClassifiedLine::PlainText("١. item"));
    }

    #[test]
    fn test_strip_both_markers() {
        assert_eq!(strip_bullet_marker("- 1. item"), "item");
        assert_eq!(strip_bullet_marker("1. - item"), "- item");
        assert_eq!(strip_bullet_marker("plain"), "plain");
    }

    #[test]
    fn test_strip_heading_marker() {
        assert_eq!(strip_heading_marker("## Overview"), "Overview");
        assert_eq!(strip_heading_marker("Overview "), "Overview");
        assert_eq!(strip_heading_marker(" # Overview"), "# Overview");
        assert_eq!(strip_heading_marker("####### Overview"), "####### Overview");
    }

    proptest! {
        #[test]
        fn prop_heading_level_matches_hash_count(
            hashes in 1usize..=6,
            gap in "[ \t]{1,3}",
            text in "[A-Za-z0-9][A-Za-z0-9 ]{0,20}[A-Za-z0-9]",
        ) {
            let line = format!("{}{}{}", "#".repeat(hashes), gap, text);
            prop_assert_eq!(
                classify_line(&line),
                ClassifiedLine::Heading { level: hashes as u8, text: text.as_str() }
            );
        }

        #[test]
        fn prop_long_hash_runs_are_plain(hashes in 7usize..12, text in "[a-z]{1,10}") {
            let line = format!("{} {}", "#".repeat(hashes), text);
            prop_assert!(matches!(classify_line(&line), ClassifiedLine::PlainText(_)));
        }
    }
}
