//! Heading classification for single lines.
//!
//! A line is judged together with its immediate neighbours: real headings
//! are short, punctuation-free and usually set apart by blank lines, while
//! narrative that merely starts with "第三章" is not.

use tracing::debug;

use super::config::StructureConfig;
use super::patterns::{
    CHAPTER_LATIN_RE, CHAPTER_NUMBERED_RE, VOLUME_NUMBERED_RE, VOLUME_PREFIX_RE,
};

/// What a line opens, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Content,
    Chapter,
    Volume,
}

impl LineKind {
    pub fn is_heading(self) -> bool {
        self != LineKind::Content
    }
}

/// Classify `line` given the lines directly before and after it.
///
/// Pure function of its arguments: the same line with the same neighbours
/// always gets the same answer.
pub fn classify(
    line: &str,
    prev: Option<&str>,
    next: Option<&str>,
    config: &StructureConfig,
) -> LineKind {
    let s = line.trim();
    if s.is_empty() {
        return LineKind::Content;
    }

    let candidate = if VOLUME_NUMBERED_RE.is_match(s) || VOLUME_PREFIX_RE.is_match(s) {
        LineKind::Volume
    } else if CHAPTER_NUMBERED_RE.is_match(s)
        || CHAPTER_LATIN_RE.is_match(s)
        || config.is_special_heading(s)
    {
        LineKind::Chapter
    } else {
        return LineKind::Content;
    };

    if is_plausible_heading(s, prev, next, config) {
        candidate
    } else {
        debug!(line = s, kind = ?candidate, "rejected heading candidate inside prose");
        LineKind::Content
    }
}

/// Whether `line` has a heading candidate's look given its neighbours.
pub fn is_heading(
    line: &str,
    prev: Option<&str>,
    next: Option<&str>,
    config: &StructureConfig,
) -> bool {
    classify(line, prev, next, config).is_heading()
}

/// A line bordered by a blank line or the document edge on either side.
pub fn is_isolated(prev: Option<&str>, next: Option<&str>) -> bool {
    let blank = |l: Option<&str>| l.is_none_or(|l| l.trim().is_empty());
    blank(prev) || blank(next)
}

/// Isolated lines are always plausible. Otherwise sentence punctuation,
/// excessive length or a comma list mark the line as prose.
fn is_plausible_heading(
    s: &str,
    prev: Option<&str>,
    next: Option<&str>,
    config: &StructureConfig,
) -> bool {
    if is_isolated(prev, next) {
        return true;
    }
    if s.ends_with(['。', '！', '？']) {
        return false;
    }
    if s.chars().count() > config.heading_max_len {
        return false;
    }
    let commas = s.chars().filter(|c| matches!(c, '，' | ',')).count();
    commas <= config.heading_max_commas
}

/// Classify every line of `lines` against its neighbours.
pub fn classify_all<S: AsRef<str>>(lines: &[S], config: &StructureConfig) -> Vec<LineKind> {
    (0..lines.len())
        .map(|i| {
            let (prev, next) = neighbours(lines, i);
            classify(lines[i].as_ref(), prev, next, config)
        })
        .collect()
}

/// The lines before and after index `i`, if any.
pub(crate) fn neighbours<S: AsRef<str>>(lines: &[S], i: usize) -> (Option<&str>, Option<&str>) {
    let prev = i.checked_sub(1).map(|p| lines[p].as_ref());
    let next = lines.get(i + 1).map(|n| n.as_ref());
    (prev, next)
}
