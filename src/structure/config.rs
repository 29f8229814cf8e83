//! Tuning data for structure recovery.

/// Heuristic thresholds and word lists used by the classifier and the
/// metadata extractor.
///
/// The regex grammar for numbered headings is fixed (see
/// [`patterns`](super::patterns)); everything here is locale tuning that
/// can be overridden without touching code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct StructureConfig {
    /// Longest line (in characters) still accepted as a heading when it is
    /// not isolated by blank lines.
    pub heading_max_len: usize,
    /// Most commas a non-isolated heading may contain.
    pub heading_max_commas: usize,
    /// How many leading free-text lines may become title/author candidates.
    pub candidate_window: usize,
    /// Unnumbered keywords that open a chapter (prologue, afterword, ...).
    pub special_headings: Vec<String>,
    /// Substrings marking uploader boilerplate; such lines never become
    /// title/author candidates.
    pub skip_markers: Vec<String>,
    /// Title of the chapter synthesized for content before any heading.
    pub default_chapter_title: String,
}

const SPECIAL_HEADINGS: &[&str] = &[
    "序章",
    "序",
    "楔子",
    "引子",
    "前言",
    "前序",
    "后记",
    "后序",
    "尾声",
    "结语",
    "终章",
    "终卷",
    "终篇",
    "番外",
    "番外篇",
    "作者的话",
    "完结感言",
];

const SKIP_MARKERS: &[&str] = &[
    "http", "www", "QQ群", "群", "公众号", "微信", "下载", "txt", "整理", "校对", "打包", "本书",
    "电子书",
];

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            heading_max_len: 40,
            heading_max_commas: 1,
            candidate_window: 6,
            special_headings: SPECIAL_HEADINGS.iter().map(|s| s.to_string()).collect(),
            skip_markers: SKIP_MARKERS.iter().map(|s| s.to_string()).collect(),
            default_chapter_title: "正文".to_string(),
        }
    }
}

impl StructureConfig {
    /// Parse a JSON override. Missing fields keep their defaults.
    #[cfg(feature = "cli")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Whether `line` (already trimmed) is one of the special heading keywords,
    /// alone or followed by a space or colon.
    pub fn is_special_heading(&self, line: &str) -> bool {
        self.special_headings.iter().any(|kw| match line.strip_prefix(kw.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with([' ', '：', ':']),
            None => false,
        })
    }

    /// Whether `line` carries uploader/scanner boilerplate.
    pub fn is_boilerplate(&self, line: &str) -> bool {
        self.skip_markers.iter().any(|m| line.contains(m.as_str()))
    }
}
