//! Structure recovery tests against typical web-novel layouts.
//!
//! These tests drive the public API end to end: decoded text in, recovered
//! [`Book`] out.

use txtepub::{Book, SpineEntry, StructureConfig, parse_book};

fn parse(text: &str) -> Book {
    parse_book(text, "fallback", &StructureConfig::default())
}

fn spine_titles(book: &Book) -> Vec<String> {
    book.sections().map(|s| s.title().to_string()).collect()
}

// ============================================================================
// Metadata
// ============================================================================

#[test]
fn test_metadata_and_two_chapters() {
    let text = "\
书名：示例书
作者：张三

内容简介：
这是简介第一行。
这是简介第二行。

第一章 开始
第一行内容
第二行内容

第二章 继续
第三行内容
";
    let book = parse(text);

    assert_eq!(book.title, "示例书");
    assert_eq!(book.author.as_deref(), Some("张三"));
    assert_eq!(book.intro.as_deref(), Some("这是简介第一行。\n这是简介第二行。"));
    assert!(book.volumes.is_empty());
    assert_eq!(book.root_chapters.len(), 2);
    assert_eq!(book.root_chapters[0].title, "第一章 开始");
    assert_eq!(book.root_chapters[0].lines, ["第一行内容", "第二行内容"]);
    assert_eq!(book.root_chapters[1].lines, ["第三行内容"]);
}

#[test]
fn test_bracketed_title_and_bare_labels() {
    let text = "\
《斗破苍穹》
作者
：天蚕土豆

简介
三十年河东，三十年河西。

第一章 陨落的天才
内容
";
    let book = parse(text);

    assert_eq!(book.title, "斗破苍穹");
    assert_eq!(book.author.as_deref(), Some("天蚕土豆"));
    assert_eq!(book.intro.as_deref(), Some("三十年河东，三十年河西。"));
    assert_eq!(spine_titles(&book), ["第一章 陨落的天才"]);
}

#[test]
fn test_spaced_label_is_recognized() {
    let book = parse("书 名：示例书\n作  者：张三\n\n第一章 开始\n内容\n");
    assert_eq!(book.title, "示例书");
    assert_eq!(book.author.as_deref(), Some("张三"));
    assert_eq!(book.intro, None);
}

#[test]
fn test_free_lines_become_title_and_author() {
    let book = parse("全职高手\n蝴蝶蓝\n\n第一章 被驱逐的高手\n内容\n");
    assert_eq!(book.title, "全职高手");
    assert_eq!(book.author.as_deref(), Some("蝴蝶蓝"));
    assert_eq!(book.root_chapters[0].lines, ["内容"]);
}

#[test]
fn test_boilerplate_is_not_a_title() {
    let book = parse("本书由某某网整理\n\n第一章 开始\n内容\n");
    assert_eq!(book.title, "fallback");
    assert_eq!(book.author, None);
    // Unclaimed lines before the first heading go to a synthesized chapter.
    assert_eq!(spine_titles(&book), ["正文", "第一章 开始"]);
}

// ============================================================================
// Headings
// ============================================================================

#[test]
fn test_volume_with_nested_chapters() {
    let text = "\
第一卷 起始

第一章 章一
内容一

第二章 章二
内容二
";
    let book = parse(text);

    assert_eq!(book.volumes.len(), 1);
    assert_eq!(book.volumes[0].title, "第一卷 起始");
    assert_eq!(book.volumes[0].chapters.len(), 2);
    assert_eq!(book.volumes[0].chapters[1].title, "第二章 章二");
    assert!(book.root_chapters.is_empty());
    assert_eq!(
        book.spine,
        [
            SpineEntry::Volume { index: 0 },
            SpineEntry::Chapter {
                at: txtepub::ChapterRef {
                    volume: Some(0),
                    index: 0
                }
            },
            SpineEntry::Chapter {
                at: txtepub::ChapterRef {
                    volume: Some(0),
                    index: 1
                }
            },
        ]
    );
}

#[test]
fn test_inline_numbered_sentence_stays_content() {
    let text = "\
第一章 开始
第一行内容
第三章 表格司机叫熊威，山东济南人，十三年驾龄，唐洼子路线不慎驾车冲入水库，车上25人。
第二行内容
";
    let book = parse(text);

    assert_eq!(book.root_chapters.len(), 1);
    let lines = &book.root_chapters[0].lines;
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("第三章 表格司机叫熊威"));
}

#[test]
fn test_special_headings_and_latin_chapters() {
    let text = "\
楔子
很久以前。

Chapter 1
内容

后记：写在最后
谢谢。
";
    let book = parse(text);
    assert_eq!(spine_titles(&book), ["楔子", "Chapter 1", "后记：写在最后"]);
}

#[test]
fn test_mixed_root_and_volume_chapters() {
    let text = "\
序章 开端
序文

卷一 风起

第一章 初见
内容

终章
结束
";
    let book = parse(text);

    assert_eq!(book.root_chapters.len(), 1);
    assert_eq!(book.root_chapters[0].title, "序章 开端");
    assert_eq!(book.volumes[0].title, "卷一 风起");
    // A chapter after a volume belongs to it, even an unnumbered one.
    let nested: Vec<_> = book.volumes[0].chapters.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(nested, ["第一章 初见", "终章"]);
}

#[test]
fn test_full_width_digits_and_indentation() {
    let text = "第１章 开始\n\u{3000}\u{3000}他推开门。\n";
    let book = parse(text);
    assert_eq!(book.root_chapters[0].title, "第１章 开始");
    assert_eq!(book.root_chapters[0].lines, ["他推开门。"]);
}

// ============================================================================
// Degenerate input
// ============================================================================

#[test]
fn test_no_metadata_no_headings() {
    let text = "\n他走了很久。\n\n终于到了。\n天黑了。\n";
    let book = parse(text);

    assert_eq!(book.root_chapters.len(), 1);
    assert_eq!(book.root_chapters[0].title, "正文");
    // The first free lines are taken as title and author candidates.
    assert_eq!(book.title, "他走了很久。");
    assert_eq!(book.author.as_deref(), Some("终于到了。"));
    assert_eq!(book.root_chapters[0].lines, ["天黑了。"]);
}

#[test]
fn test_carriage_return_line_endings() {
    let book = parse("第一章 开始\r第一行内容\r\r第二章 继续\r第三行内容\r");
    assert_eq!(spine_titles(&book), ["第一章 开始", "第二章 继续"]);
    assert_eq!(book.root_chapters[0].lines, ["第一行内容"]);
    assert_eq!(book.root_chapters[1].lines, ["第三行内容"]);
}

#[test]
fn test_nbsp_spaced_label() {
    let book = parse("作\u{a0}者：张三\n书名：示例书\n\n第一章 开始\n内容\n");
    assert_eq!(book.title, "示例书");
    assert_eq!(book.author.as_deref(), Some("张三"));
}

#[test]
fn test_empty_text() {
    let book = parse("");
    assert_eq!(book.title, "fallback");
    assert!(book.spine.is_empty());
    assert_eq!(book.to_string(), "");
}

#[test]
fn test_display_renders_skeleton() {
    let book = parse("第一卷 起始\n\n第一章 开始\n内容\n");
    assert_eq!(book.to_string(), "第一卷 起始\n第一章 开始\n内容\n");
}

#[test]
fn test_custom_config() {
    let config = StructureConfig {
        special_headings: vec!["引言".to_string()],
        default_chapter_title: "Body".to_string(),
        ..Default::default()
    };
    let book = parse_book("引言\n开头。\n", "fallback", &config);
    assert_eq!(spine_titles(&book), ["引言"]);

    // Title comes from the label, so the free line stays in the body.
    let book = parse_book("书名：甲\n\n开头。\n\n引言\n内容\n", "fallback", &config);
    assert_eq!(spine_titles(&book), ["Body", "引言"]);
    assert_eq!(book.root_chapters[0].lines, ["开头。"]);
}

#[cfg(feature = "cli")]
#[test]
fn test_config_from_json_overrides_fields() {
    let config = StructureConfig::from_json(r#"{"heading_max_len": 10}"#).unwrap();
    assert_eq!(config.heading_max_len, 10);
    assert_eq!(config.default_chapter_title, "正文");

    assert!(StructureConfig::from_json("{not json").is_err());
}
