//! Cached regex patterns for structure recovery.
//!
//! Uses LazyLock to compile patterns once on first use. The patterns run on
//! lines that have already been trimmed.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Arabic (half- and full-width) and CJK numerals as used in headings.
const NUMERAL: &str = "[0-9０-９一二三四五六七八九十百千万两零〇]+";

/// Inline spacing. `\s` is ASCII-only here, so the Unicode spaces that show
/// up in web text are listed explicitly.
const SPACE: &str = "[\\s\u{a0}\u{1680}\u{2000}-\u{200a}\u{202f}\u{205f}\u{3000}]*";

/// Matches a line terminator: CRLF, a lone CR or LF, or one of the
/// Unicode line and paragraph separators.
pub static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("\r\n|[\n\r\x0b\x0c\x1c\x1d\x1e\u{85}\u{2028}\u{2029}]").unwrap()
});

/// Split `text` into lines on every terminator [`LINE_BREAK_RE`] knows.
///
/// A trailing terminator does not produce a final empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = LINE_BREAK_RE.split(text).collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

// === Heading patterns ===

/// Matches 第N卷 / 第N部 volume headings
pub static VOLUME_NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^第{SPACE}{NUMERAL}{SPACE}[卷部]")).unwrap()
});

/// Matches 卷N volume headings
pub static VOLUME_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^卷{SPACE}{NUMERAL}")).unwrap());

/// Matches 第N章 / 第N节 / 第N回 chapter headings
pub static CHAPTER_NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^第{SPACE}{NUMERAL}{SPACE}[章节回]")).unwrap()
});

/// Matches "Chapter N" in any letter case
pub static CHAPTER_LATIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^chapter\s+[0-9]+").unwrap());

// === Metadata patterns ===

fn labels() -> String {
    format!("书{SPACE}名|作{SPACE}者|内容简介|简介|内容介绍|文案")
}

/// Matches `label: value` lines; group 1 is the label, group 2 the value
pub static LABEL_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^({}){SPACE}[:：]{SPACE}(.*)$", labels())).unwrap()
});

/// Matches a label on its own line
pub static BARE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^({})$", labels())).unwrap()
});

/// Matches a line that is only 《Title》
pub static BOOK_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("^《(.+)》$").unwrap());

/// Metadata field named by a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Title,
    Author,
    Intro,
}

impl Label {
    /// Classify the label text captured by [`LABEL_VALUE_RE`] or [`BARE_LABEL_RE`].
    pub fn from_capture(label: &str) -> Self {
        let compact: String = label.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.as_str() {
            "书名" => Label::Title,
            "作者" => Label::Author,
            _ => Label::Intro,
        }
    }
}
