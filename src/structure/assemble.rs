//! Assembly of body lines into the volume/chapter tree.

use tracing::debug;

use super::classify::{LineKind, classify_all};
use super::config::StructureConfig;
use crate::model::{Book, ChapterRef};

/// Normalize a content line: trim it and drop ideographic spaces.
pub fn normalize_line(line: &str) -> String {
    line.trim().replace('\u{3000}', "")
}

/// Build a [`Book`] from the body lines left after metadata extraction.
///
/// Leading blank lines are skipped. Every heading opens a new section in
/// document order; content goes to the open chapter, else to the open
/// volume's overflow, else to a synthesized root chapter.
pub fn assemble<S: AsRef<str>>(lines: &[S], title: &str, config: &StructureConfig) -> Book {
    let start = lines
        .iter()
        .position(|l| !l.as_ref().trim().is_empty())
        .unwrap_or(lines.len());
    let lines = &lines[start..];

    let mut book = Book::new(title);
    let mut current_volume: Option<usize> = None;
    let mut current_chapter: Option<ChapterRef> = None;

    let kinds = classify_all(lines, config);

    for (line, kind) in lines.iter().zip(kinds) {
        let line = line.as_ref();

        match kind {
            LineKind::Volume => {
                current_chapter = None;
                current_volume = Some(book.push_volume(line.trim()));
            }
            LineKind::Chapter => {
                current_chapter = Some(book.push_chapter(line.trim(), current_volume));
            }
            LineKind::Content => {
                let content = normalize_line(line);
                if content.is_empty() {
                    continue;
                }
                let at = match (current_chapter, current_volume) {
                    (Some(at), _) => at,
                    (None, Some(v)) => {
                        book.volumes[v].lines.push(content);
                        continue;
                    }
                    (None, None) => {
                        let at = fallback_chapter(&mut book, config);
                        current_chapter = Some(at);
                        at
                    }
                };
                if let Some(chapter) = book.chapter_mut(at) {
                    chapter.lines.push(content);
                }
            }
        }
    }

    debug!(
        volumes = book.volumes.len(),
        chapters = book.chapter_count(),
        "assembled book structure"
    );
    book
}

/// The root chapter that receives content seen outside any section.
fn fallback_chapter(book: &mut Book, config: &StructureConfig) -> ChapterRef {
    match book.root_chapters.len() {
        0 => book.push_chapter(config.default_chapter_title.as_str(), None),
        n => ChapterRef {
            volume: None,
            index: n - 1,
        },
    }
}
