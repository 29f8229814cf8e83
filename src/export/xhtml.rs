//! XHTML synthesis for sections, front matter and navigation.

use std::fmt::Write;

use quick_xml::escape::escape;

use crate::model::{FrontMatter, TocEntry};

/// Stylesheet shared by every generated document.
pub const STYLESHEET: &str = "\
p { text-indent: 2em; margin: 0 0 0.8em; }
h1 { text-align: center; font-size: 1.6em; margin: 2em 0 1em; }
h2 { font-weight: bold; font-size: 1.2em; margin: 1.5em 0 1em; }
.front-matter p.author { text-align: center; text-indent: 0; margin: 0 0 1.5em; }
.front-matter p.intro-label { text-indent: 0; font-weight: bold; margin: 1.2em 0 0.6em; }
";

fn document_head(doc: &mut String, lang: &str, title: &str, stylesheet_href: &str, extra_ns: &str) {
    doc.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE html>\n");
    writeln!(
        doc,
        "<html xmlns=\"http://www.w3.org/1999/xhtml\"{extra_ns} xml:lang=\"{}\" lang=\"{}\">",
        escape(lang),
        escape(lang)
    )
    .unwrap();
    doc.push_str("  <head>\n    <meta charset=\"utf-8\" />\n");
    writeln!(doc, "    <title>{}</title>", escape(title)).unwrap();
    writeln!(
        doc,
        "    <link rel=\"stylesheet\" type=\"text/css\" href=\"{}\" />",
        escape(stylesheet_href)
    )
    .unwrap();
    doc.push_str("  </head>\n");
}

/// Render a chapter or volume: an `<h2>` title and one paragraph per line.
pub fn render_section(title: &str, lines: &[String], lang: &str) -> String {
    let mut doc = String::new();
    document_head(&mut doc, lang, title, "../style.css", "");
    doc.push_str("  <body>\n");
    writeln!(doc, "    <h2>{}</h2>", escape(title)).unwrap();
    for line in lines.iter().filter(|l| !l.is_empty()) {
        writeln!(doc, "    <p>{}</p>", escape(line.as_str())).unwrap();
    }
    doc.push_str("  </body>\n</html>\n");
    doc
}

/// Render the front matter: title, author line and synopsis.
pub fn render_front_matter(front: &FrontMatter, lang: &str) -> String {
    let mut doc = String::new();
    document_head(&mut doc, lang, &front.title, "../style.css", "");
    doc.push_str("  <body class=\"front-matter\">\n");
    writeln!(doc, "    <h1>{}</h1>", escape(front.title.as_str())).unwrap();
    if let Some(ref author) = front.author {
        writeln!(doc, "    <p class=\"author\">作者：{}</p>", escape(author.as_str())).unwrap();
    }
    if let Some(ref intro) = front.intro {
        doc.push_str("    <p class=\"intro-label\">简介</p>\n");
        for line in intro.lines().map(str::trim).filter(|l| !l.is_empty()) {
            writeln!(doc, "    <p>{}</p>", escape(line)).unwrap();
        }
    }
    doc.push_str("  </body>\n</html>\n");
    doc
}

/// Render the EPUB 3 navigation document.
///
/// `first_href` is the landmark target for the start of the body.
pub fn render_nav(toc: &[TocEntry], first_href: Option<&str>, lang: &str) -> String {
    let mut doc = String::new();
    document_head(
        &mut doc,
        lang,
        "目录",
        "style.css",
        " xmlns:epub=\"http://www.idpf.org/2007/ops\"",
    );
    doc.push_str("  <body>\n    <nav epub:type=\"toc\" id=\"toc\">\n      <h1>目录</h1>\n");
    write_nav_list(&mut doc, toc, 3);
    doc.push_str("    </nav>\n");

    if let Some(href) = first_href {
        doc.push_str("    <nav epub:type=\"landmarks\" hidden=\"hidden\">\n");
        doc.push_str("      <h2>Landmarks</h2>\n      <ol>\n");
        writeln!(
            doc,
            "        <li><a epub:type=\"bodymatter\" href=\"{}\">正文</a></li>",
            escape(href)
        )
        .unwrap();
        doc.push_str("      </ol>\n    </nav>\n");
    }

    doc.push_str("  </body>\n</html>\n");
    doc
}

/// Recursively write nested `<ol>` lists.
fn write_nav_list(doc: &mut String, entries: &[TocEntry], indent: usize) {
    let pad = "  ".repeat(indent);
    if entries.is_empty() {
        // An empty <ol> is invalid in the nav document.
        writeln!(doc, "{pad}<ol><li><span>目录</span></li></ol>").unwrap();
        return;
    }
    writeln!(doc, "{pad}<ol>").unwrap();
    for entry in entries {
        write!(
            doc,
            "{pad}  <li><a href=\"{}\">{}</a>",
            escape(entry.href.as_str()),
            escape(entry.title.as_str())
        )
        .unwrap();
        if entry.children.is_empty() {
            doc.push_str("</li>\n");
        } else {
            doc.push('\n');
            write_nav_list(doc, &entry.children, indent + 2);
            writeln!(doc, "{pad}  </li>").unwrap();
        }
    }
    writeln!(doc, "{pad}</ol>").unwrap();
}
