//! Title, author and synopsis recovery from the lines before the first heading.

use std::collections::BTreeSet;

use tracing::debug;

use super::classify::{is_heading, neighbours};
use super::config::StructureConfig;
use super::patterns::{BARE_LABEL_RE, BOOK_TITLE_RE, LABEL_VALUE_RE, Label};

/// Metadata recovered from the head of a text file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub intro: Option<String>,
    /// Indices of lines claimed as metadata; they never reach the body.
    pub consumed: BTreeSet<usize>,
}

/// Scanner state between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    /// A bare label (or a label with an empty value) waits for a `：value` line.
    Pending(Label),
    /// Collecting synopsis lines until the next blank line. A label still
    /// waiting for its value resumes once the synopsis ends.
    Intro { pending: Option<Label> },
}

impl ScanState {
    fn pending(self) -> Option<Label> {
        match self {
            ScanState::Scanning => None,
            ScanState::Pending(label) => Some(label),
            ScanState::Intro { pending } => pending,
        }
    }

    fn enter_intro(self) -> Self {
        ScanState::Intro {
            pending: self.pending(),
        }
    }
}

#[derive(Default)]
struct Extraction {
    title: Option<String>,
    author: Option<String>,
    intro_lines: Vec<String>,
    consumed: BTreeSet<usize>,
    candidates: Vec<(usize, String)>,
    free_lines_seen: usize,
}

impl Extraction {
    fn set(&mut self, label: Label, value: &str) {
        match label {
            Label::Title => self.title = Some(value.to_string()),
            Label::Author => self.author = Some(value.to_string()),
            Label::Intro => self.intro_lines.push(value.to_string()),
        }
    }
}

/// Index of the first line accepted as a heading.
pub fn first_heading<S: AsRef<str>>(lines: &[S], config: &StructureConfig) -> Option<usize> {
    (0..lines.len()).find(|&i| {
        let (prev, next) = neighbours(lines, i);
        is_heading(lines[i].as_ref(), prev, next, config)
    })
}

/// Recover title, author and synopsis from the lines before the first heading.
pub fn extract<S: AsRef<str>>(lines: &[S], config: &StructureConfig) -> ExtractedMetadata {
    let limit = first_heading(lines, config).unwrap_or(lines.len());
    let mut ex = Extraction::default();
    let mut state = ScanState::Scanning;

    for (i, raw) in lines[..limit].iter().enumerate() {
        let s = raw.as_ref().trim();
        if s.is_empty() {
            if let ScanState::Intro { pending } = state
                && !ex.intro_lines.is_empty()
            {
                state = pending.map_or(ScanState::Scanning, ScanState::Pending);
            }
            continue;
        }

        if let ScanState::Intro { .. } = state {
            let (prev, next) = neighbours(lines, i);
            if is_heading(raw.as_ref(), prev, next, config) {
                break;
            }
            ex.intro_lines.push(s.to_string());
            ex.consumed.insert(i);
            continue;
        }

        if let Some(caps) = LABEL_VALUE_RE.captures(s) {
            let label = Label::from_capture(&caps[1]);
            let value = caps[2].trim();
            ex.consumed.insert(i);
            state = match label {
                Label::Intro => {
                    if !value.is_empty() {
                        ex.set(label, value);
                    }
                    state.enter_intro()
                }
                _ if value.is_empty() => ScanState::Pending(label),
                _ => {
                    ex.set(label, value);
                    state
                }
            };
            continue;
        }

        if let Some(caps) = BARE_LABEL_RE.captures(s) {
            let label = Label::from_capture(&caps[1]);
            ex.consumed.insert(i);
            state = match label {
                Label::Intro => state.enter_intro(),
                _ => ScanState::Pending(label),
            };
            continue;
        }

        if let ScanState::Pending(label) = state
            && let Some(rest) = s.strip_prefix(['：', ':'])
        {
            let value = rest.trim();
            ex.consumed.insert(i);
            if !value.is_empty() {
                ex.set(label, value);
            }
            state = ScanState::Scanning;
            continue;
        }

        if ex.title.is_none()
            && let Some(caps) = BOOK_TITLE_RE.captures(s)
        {
            ex.title = Some(caps[1].trim().to_string());
            ex.consumed.insert(i);
            continue;
        }

        ex.free_lines_seen += 1;
        if ex.free_lines_seen <= config.candidate_window && !config.is_boilerplate(s) {
            ex.candidates.push((i, s.to_string()));
        }
    }

    choose_candidates(&mut ex);

    let intro = if ex.intro_lines.is_empty() {
        None
    } else {
        Some(ex.intro_lines.join("\n").trim().to_string())
    };

    debug!(
        title = ?ex.title,
        author = ?ex.author,
        intro_lines = ex.intro_lines.len(),
        consumed = ex.consumed.len(),
        "extracted metadata"
    );

    ExtractedMetadata {
        title: ex.title,
        author: ex.author,
        intro,
        consumed: ex.consumed,
    }
}

/// Fill a missing title from the first free-text candidate and a missing
/// author from the second.
fn choose_candidates(ex: &mut Extraction) {
    if ex.title.is_none()
        && let Some((idx, value)) = ex.candidates.first()
    {
        ex.title = Some(value.clone());
        ex.consumed.insert(*idx);
    }

    if ex.author.is_none()
        && let Some((idx, value)) = ex.candidates.get(1)
        && ex.title.as_deref() != Some(value.as_str())
    {
        ex.author = Some(value.clone());
        ex.consumed.insert(*idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> ExtractedMetadata {
        let lines: Vec<&str> = text.lines().collect();
        extract(&lines, &StructureConfig::default())
    }

    #[test]
    fn test_labelled_fields_and_intro() {
        let meta = run("书名：示例书\n作者：张三\n\n内容简介：\n这是简介第一行。\n这是简介第二行。\n\n第一章 开始\n正文");
        assert_eq!(meta.title.as_deref(), Some("示例书"));
        assert_eq!(meta.author.as_deref(), Some("张三"));
        assert_eq!(meta.intro.as_deref(), Some("这是简介第一行。\n这是简介第二行。"));
        assert_eq!(meta.consumed, BTreeSet::from([0, 1, 3, 4, 5]));
    }

    #[test]
    fn test_inline_intro_value_seeds_synopsis() {
        let meta = run("简介：少年出山。\n一路向北。\n\n第一章");
        assert_eq!(meta.intro.as_deref(), Some("少年出山。\n一路向北。"));
    }

    #[test]
    fn test_pending_label_takes_colon_line() {
        let meta = run("书名\n：远行\n作 者\n: 李四\n\n第一章");
        assert_eq!(meta.title.as_deref(), Some("远行"));
        assert_eq!(meta.author.as_deref(), Some("李四"));
        assert_eq!(meta.consumed, BTreeSet::from([0, 1, 2, 3]));
    }

    #[test]
    fn test_pending_label_survives_synopsis() {
        let meta = run("作者\n简介\n少年出山。\n\n：王五\n\n第一章");
        assert_eq!(meta.author.as_deref(), Some("王五"));
        assert_eq!(meta.intro.as_deref(), Some("少年出山。"));
        assert_eq!(meta.consumed, BTreeSet::from([0, 1, 2, 4]));
    }

    #[test]
    fn test_empty_label_value_waits_for_next_line() {
        let meta = run("作者：\n：王五\n\n第一章");
        assert_eq!(meta.author.as_deref(), Some("王五"));
    }

    #[test]
    fn test_spaced_author_label() {
        let meta = run("作  者：赵六\n\n第一章");
        assert_eq!(meta.author.as_deref(), Some("赵六"));
        assert_eq!(meta.intro, None);
    }

    #[test]
    fn test_book_title_brackets() {
        let meta = run("《长夜》\n\n第一章");
        assert_eq!(meta.title.as_deref(), Some("长夜"));
        assert!(meta.consumed.contains(&0));
    }

    #[test]
    fn test_candidates_fill_title_and_author() {
        let meta = run("长夜将至\n孙七\n\n第一章");
        assert_eq!(meta.title.as_deref(), Some("长夜将至"));
        assert_eq!(meta.author.as_deref(), Some("孙七"));
        assert_eq!(meta.consumed, BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_boilerplate_never_becomes_candidate() {
        let meta = run("本书由某论坛整理\nwww.example.com\n长夜将至\n\n第一章");
        assert_eq!(meta.title.as_deref(), Some("长夜将至"));
        assert_eq!(meta.author, None);
        assert_eq!(meta.consumed, BTreeSet::from([2]));
    }

    #[test]
    fn test_duplicate_candidate_not_author() {
        let meta = run("长夜\n长夜\n\n第一章");
        assert_eq!(meta.title.as_deref(), Some("长夜"));
        assert_eq!(meta.author, None);
    }

    #[test]
    fn test_candidate_window_limits_scan() {
        let meta = run("一\n二\n三\n四\n五\n六\n七\n八");
        assert_eq!(meta.title.as_deref(), Some("一"));
        assert_eq!(meta.author.as_deref(), Some("二"));
    }

    #[test]
    fn test_scan_stops_at_first_heading() {
        let meta = run("第一章 开始\n书名：迟到的标题");
        assert_eq!(meta.title, None);
        assert!(meta.consumed.is_empty());
    }

    #[test]
    fn test_first_heading_index() {
        let lines = ["书名：示例", "", "第一章 开始", "内容"];
        assert_eq!(first_heading(&lines, &StructureConfig::default()), Some(2));
        let prose = ["一行", "两行"];
        assert_eq!(first_heading(&prose, &StructureConfig::default()), None);
    }
}
