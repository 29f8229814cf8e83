//! Structure recovery for plain-text novels.
//!
//! Recovery runs in two passes over the materialized lines:
//!
//! 1. [`extract`] scans the head of the file for title, author and synopsis
//!    and reports which line indices it consumed.
//! 2. [`assemble`] walks the remaining lines, classifying each one against
//!    its neighbours with [`classify`], and builds the volume/chapter tree.
//!
//! [`parse_book`] composes the two.

mod assemble;
mod classify;
mod config;
mod metadata;
pub mod patterns;

pub use assemble::{assemble, normalize_line};
pub use classify::{LineKind, classify, classify_all, is_heading, is_isolated};
pub use config::StructureConfig;
pub use metadata::{ExtractedMetadata, extract, first_heading};

use tracing::info;

use crate::model::Book;

/// Recover a [`Book`] from decoded text.
///
/// `source_name` (usually the file stem) becomes the title when none can be
/// recovered from the text.
pub fn parse_book(text: &str, source_name: &str, config: &StructureConfig) -> Book {
    let lines = patterns::split_lines(text);
    let meta = extract(&lines, config);

    let body: Vec<&str> = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !meta.consumed.contains(i))
        .map(|(_, line)| *line)
        .collect();

    let title = meta
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(source_name);
    let book = assemble(&body, title, config)
        .with_author(meta.author)
        .with_intro(meta.intro);

    info!(
        title = %book.title,
        volumes = book.volumes.len(),
        chapters = book.chapter_count(),
        "recovered book structure"
    );
    book
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SpineEntry;
    use proptest::prelude::*;

    #[test]
    fn test_consumed_lines_never_reach_body() {
        let text = "凡人修仙\n忘语\n\n开篇第一句。\n";
        let book = parse_book(text, "fallback", &StructureConfig::default());
        assert_eq!(book.title, "凡人修仙");
        assert_eq!(book.author.as_deref(), Some("忘语"));
        // The third free line is a candidate too but was not chosen.
        assert_eq!(book.root_chapters[0].lines, ["开篇第一句。"]);
    }

    #[test]
    fn test_title_falls_back_to_source_name() {
        let text = "www.example.com 下载\n\n第一章 开始\n内容\n";
        let book = parse_book(text, "my-novel", &StructureConfig::default());
        assert_eq!(book.title, "my-novel");
        assert_eq!(book.author, None);
        // Unclaimed boilerplate stays in the body.
        assert_eq!(book.root_chapters[0].title, "正文");
    }

    fn line_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("第一卷 起始".to_string()),
            Just("第二章 继续".to_string()),
            Just("楔子".to_string()),
            Just("他笑了。".to_string()),
            "[\\p{Han}]{1,12}",
        ]
    }

    proptest! {
        #[test]
        fn prop_spine_matches_tree(lines in prop::collection::vec(line_strategy(), 0..40)) {
            let text = lines.join("\n");
            let book = parse_book(&text, "fallback", &StructureConfig::default());

            prop_assert!(!book.title.is_empty());

            // Every chapter appears exactly once, in tree order, after its volume.
            let mut seen_chapters = 0;
            let mut last_volume: Option<usize> = None;
            let mut seen_volumes = 0;
            for entry in &book.spine {
                match *entry {
                    SpineEntry::Volume { index } => {
                        prop_assert_eq!(index, seen_volumes);
                        seen_volumes += 1;
                        last_volume = Some(index);
                    }
                    SpineEntry::Chapter { at } => {
                        prop_assert!(book.chapter(at).is_some());
                        if let Some(v) = at.volume {
                            prop_assert_eq!(Some(v), last_volume);
                        }
                        seen_chapters += 1;
                    }
                }
            }
            prop_assert_eq!(seen_volumes, book.volumes.len());
            prop_assert_eq!(seen_chapters, book.chapter_count());
        }

        #[test]
        fn prop_plain_prose_collapses_to_one_chapter(
            lines in prop::collection::vec("[a-s]{1,20}", 1..30)
        ) {
            let text = lines.join("\n");
            let book = parse_book(&text, "fallback", &StructureConfig::default());
            let body: Vec<String> = book.sections().flat_map(|s| s.lines().to_vec()).collect();
            let consumed = lines.len() - body.len();
            prop_assert!(book.volumes.is_empty());
            prop_assert!(book.root_chapters.len() <= 1);
            prop_assert!(consumed <= 2);
            prop_assert_eq!(&body[..], &lines[consumed..]);
        }
    }
}
