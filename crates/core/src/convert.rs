//! Turns one block into content nodes.
//!
//! A block is classified once into an optional leading heading and a body.
//! The body is a bullet list only when every remaining line is a list item;
//! a block that mixes prose and items is kept as plain lines rather than
//! guessing where the list starts.

use crate::classify::{classify_line, ClassifiedLine};
use crate::split::ContentBlock;
use crate::tree::{ContentNode, HeadingLevel};

/// A block split into its leading heading and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedBlock<'a> {
    /// Heading from the first line, if it was one: (level, text).
    pub heading: Option<(u8, &'a str)>,

    /// The remaining lines.
    pub body: BlockBody<'a>,
}

/// Body of a classified block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockBody<'a> {
    /// Every line is a list item; markers are stripped.
    Bullets(Vec<&'a str>),
    /// Lines kept verbatim. May be empty if the block was only a heading.
    Lines(Vec<&'a str>),
}

/// Classify a block's lines.
pub fn classify_block<'a>(block: &ContentBlock<'a>) -> ClassifiedBlock<'a> {
    let lines: Vec<&'a str> = block.lines().collect();
    classify_lines(&lines)
}

/// Classify a sequence of trimmed, non-empty lines as a block.
pub fn classify_lines<'a>(lines: &[&'a str]) -> ClassifiedBlock<'a> {
    let (heading, rest) = match lines.split_first() {
        Some((first, rest)) => match classify_line(*first) {
            ClassifiedLine::Heading { level, text } => (Some((level, text)), rest),
            _ => (None, lines),
        },
        None => (None, lines),
    };

    let items: Option<Vec<&'a str>> = rest
        .iter()
        .map(|line| match classify_line(*line) {
            ClassifiedLine::Bullet { text } => Some(text),
            _ => None,
        })
        .collect();

    let body = match items {
        Some(items) if !items.is_empty() => BlockBody::Bullets(items),
        _ => BlockBody::Lines(rest.to_vec()),
    };

    ClassifiedBlock { heading, body }
}

/// Convert a block into content nodes in source order.
pub fn convert_block(block: &ContentBlock<'_>) -> Vec<ContentNode> {
    let classified = classify_block(block);
    let mut nodes = Vec::new();

    if let Some((level, text)) = classified.heading {
        nodes.push(ContentNode::heading(HeadingLevel::from_depth(level), text));
    }

    match classified.body {
        BlockBody::Bullets(items) => nodes.extend(items.into_iter().map(ContentNode::bullet)),
        BlockBody::Lines(lines) => nodes.extend(lines.into_iter().map(ContentNode::paragraph)),
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::split_blocks;
    use proptest::prelude::*;

    fn convert_all(content: &str) -> Vec<ContentNode> {
        split_blocks(content)
            .flat_map(|block| convert_block(&block))
            .collect()
    }

    #[test]
    fn test_heading_then_paragraph() {
        assert_eq!(
            convert_all("# Intro\n\nHello world"),
            vec![
                ContentNode::heading(HeadingLevel::H1, "Intro"),
                ContentNode::paragraph("Hello world"),
            ]
        );
    }

    #[test]
    fn test_bullet_list() {
        assert_eq!(
            convert_all("- a\n- b\n- c"),
            vec![
                ContentNode::bullet("a"),
                ContentNode::bullet("b"),
                ContentNode::bullet("c"),
            ]
        );
    }

    #[test]
    fn test_heading_with_ordered_list() {
        assert_eq!(
            convert_all("## Steps\n1. mix\n2) bake"),
            vec![
                ContentNode::heading(HeadingLevel::H2, "Steps"),
                ContentNode::bullet("mix"),
                ContentNode::bullet("bake"),
            ]
        );
    }

    #[test]
    fn test_mixed_block_falls_back_to_paragraphs() {
        assert_eq!(
            convert_all("Shopping:\n- eggs\n- milk"),
            vec![
                ContentNode::paragraph("Shopping:"),
                ContentNode::paragraph("- eggs"),
                ContentNode::paragraph("- milk"),
            ]
        );
    }

    #[test]
    fn test_heading_only_in_first_line() {
        assert_eq!(
            convert_all("Text\n# Not a heading here"),
            vec![
                ContentNode::paragraph("Text"),
                ContentNode::paragraph("# Not a heading here"),
            ]
        );
    }

    #[test]
    fn test_heading_only_block() {
        assert_eq!(
            convert_all("### Alone"),
            vec![ContentNode::heading(HeadingLevel::H3, "Alone")]
        );
    }

    #[test]
    fn test_indented_lines_are_trimmed() {
        assert_eq!(
            convert_all("   - a\n\t* b"),
            vec![ContentNode::bullet("a"), ContentNode::bullet("b")]
        );
    }

    #[test]
    fn test_classify_lines_body() {
        let block = classify_lines(&["# H", "- x", "plain"]);
        assert_eq!(block.heading, Some((1, "H")));
        assert_eq!(block.body, BlockBody::Lines(vec!["- x", "plain"]));

        let block = classify_lines(&[]);
        assert_eq!(block.heading, None);
        assert_eq!(block.body, BlockBody::Lines(vec![]));
    }

    proptest! {
        #[test]
        fn prop_all_bullet_block_yields_one_item_per_line(
            items in prop::collection::vec("[a-z][a-z ]{0,8}[a-z]", 1..8),
            ordered in any::<bool>(),
        ) {
            let content: Vec<String> = items
                .iter()
                .enumerate()
                .map(|(i, t)| if ordered { format!("{}. {}", i + 1, t) } else { format!("- {}", t) })
                .collect();
            let nodes = convert_all(&content.join("\n"));

            let expected: Vec<ContentNode> = items.iter().map(ContentNode::bullet).collect();
            prop_assert_eq!(nodes, expected);
        }

        #[test]
        fn prop_mixed_block_is_all_paragraphs(
            items in prop::collection::vec("[a-z]{1,8}", 1..6),
            prose in "[A-Z][a-z]{1,8}",
        ) {
            let mut lines: Vec<String> = items.iter().map(|t| format!("* {}", t)).collect();
            lines.push(prose);
            let nodes = convert_all(&lines.join("\n"));

            let expected: Vec<ContentNode> = lines.iter().map(ContentNode::paragraph).collect();
            prop_assert_eq!(nodes, expected);
        }
    }
}
