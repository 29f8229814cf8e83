use super::book::{Book, SpineEntry};

/// A table of contents entry (hierarchical)
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TocEntry {
    pub title: String,
    pub href: String,
    pub children: Vec<TocEntry>,
    /// Play order for NCX navPoints, assigned depth-first
    pub play_order: Option<usize>,
}

impl TocEntry {
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            children: Vec::new(),
            play_order: None,
        }
    }
}

/// Build the navigation tree from the book's spine.
///
/// Volumes become top-level entries holding their chapters; root chapters
/// sit at the top level beside them. Hrefs are the annotated file names, so
/// this should run after the exporter has numbered the sections.
pub fn build_toc(book: &Book) -> Vec<TocEntry> {
    let mut entries: Vec<TocEntry> = Vec::new();
    // Position in `entries` of the last volume and its index in the book.
    let mut open_volume: Option<(usize, usize)> = None;

    for entry in &book.spine {
        let Some(section) = book.section(*entry) else {
            continue;
        };
        let item = TocEntry::new(section.title(), section.file_name());

        match *entry {
            SpineEntry::Volume { index } => {
                entries.push(item);
                open_volume = Some((entries.len() - 1, index));
            }
            SpineEntry::Chapter { at } => match (at.volume, open_volume) {
                (Some(owner), Some((pos, index))) if owner == index => {
                    entries[pos].children.push(item);
                }
                _ => entries.push(item),
            },
        }
    }

    let mut play_order = 1;
    assign_play_order(&mut entries, &mut play_order);
    entries
}

fn assign_play_order(entries: &mut [TocEntry], play_order: &mut usize) {
    for entry in entries {
        entry.play_order = Some(*play_order);
        *play_order += 1;
        assign_play_order(&mut entry.children, play_order);
    }
}
