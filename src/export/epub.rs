//! EPUB exporter.
//!
//! Packages a recovered [`Book`] as an EPUB 3 file, with a toc.ncx for
//! readers that only understand EPUB 2.

use std::fmt::Write as _;
use std::io::{self, Seek, Write};
use std::path::Path;

use quick_xml::escape::escape;
use tracing::{debug, info};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::model::{Book, TocEntry, build_toc};
use crate::util::stable_uuid;

use super::Exporter;
use super::xhtml::{STYLESHEET, render_front_matter, render_nav, render_section};

/// Configuration for EPUB export.
#[derive(Debug, Clone)]
pub struct EpubConfig {
    /// `dc:language` and `xml:lang` of every document.
    pub language: String,
    /// Package identifier. Derived from the book's text when unset.
    pub identifier: Option<String>,
    /// `dcterms:modified` value. Uses the current UTC time when unset.
    pub modified: Option<String>,
    /// Compression level for deflate (0-9, default 6).
    pub compression_level: Option<u32>,
}

impl Default for EpubConfig {
    fn default() -> Self {
        Self {
            language: "zh-CN".to_string(),
            identifier: None,
            modified: None,
            compression_level: None,
        }
    }
}

/// EPUB format exporter.
///
/// # Example
///
/// ```no_run
/// use std::fs::File;
/// use txtepub::export::{EpubExporter, Exporter};
/// use txtepub::{StructureConfig, parse_book};
///
/// let mut book = parse_book("第一章 开始\n内容\n", "book", &StructureConfig::default());
/// let mut file = File::create("book.epub")?;
/// EpubExporter::new().export(&mut book, &mut file)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EpubExporter {
    config: EpubConfig,
}

impl EpubExporter {
    /// Create a new exporter with default configuration.
    pub fn new() -> Self {
        Self {
            config: EpubConfig::default(),
        }
    }

    /// Configure the exporter with custom settings.
    pub fn with_config(mut self, config: EpubConfig) -> Self {
        self.config = config;
        self
    }
}

impl Default for EpubExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for EpubExporter {
    fn export<W: Write + Seek>(&self, book: &mut Book, writer: &mut W) -> io::Result<()> {
        let lang = self.config.language.as_str();
        let identifier = self
            .config
            .identifier
            .clone()
            .unwrap_or_else(|| derive_identifier(book));
        let modified = self
            .config
            .modified
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());

        // Number the sections in reading order, front matter first.
        let mut front = book.front_matter();
        let mut sequence = 0;
        let mut next_name = || {
            sequence += 1;
            (
                format!("text/section_{sequence:04}.xhtml"),
                format!("section_{sequence:04}"),
            )
        };
        if let Some(ref mut front) = front {
            (front.file_name, front.item_id) = next_name();
        }
        for entry in book.spine.clone() {
            let (file_name, item_id) = next_name();
            book.annotate(entry, file_name, item_id);
        }

        let mut sections: Vec<ManifestItem> = Vec::new();
        if let Some(ref front) = front {
            sections.push(ManifestItem::new(&front.item_id, &front.file_name));
        }
        sections.extend(
            book.sections()
                .map(|s| ManifestItem::new(s.item_id(), s.file_name())),
        );

        let toc = build_toc(book);
        let first_href = sections.first().map(|s| s.href.as_str());

        let mut zip = ZipWriter::new(writer);

        let compression_level = self.config.compression_level.unwrap_or(6);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level as i64));

        // 1. Write mimetype (must be first, uncompressed)
        zip.start_file("mimetype", stored).map_err(io_error)?;
        zip.write_all(b"application/epub+zip")?;

        // 2. Write container.xml
        zip.start_file("META-INF/container.xml", deflated)
            .map_err(io_error)?;
        zip.write_all(CONTAINER_XML)?;

        // 3. Write content.opf
        let opf = generate_opf(book, &identifier, &modified, lang, &sections);
        zip.start_file("OEBPS/content.opf", deflated)
            .map_err(io_error)?;
        zip.write_all(opf.as_bytes())?;

        // 4. Write nav.xhtml
        zip.start_file("OEBPS/nav.xhtml", deflated)
            .map_err(io_error)?;
        zip.write_all(render_nav(&toc, first_href, lang).as_bytes())?;

        // 5. Write stylesheet
        zip.start_file("OEBPS/style.css", deflated)
            .map_err(io_error)?;
        zip.write_all(STYLESHEET.as_bytes())?;

        // 6. Write toc.ncx
        let ncx = generate_ncx(&book.title, &identifier, &toc);
        zip.start_file("OEBPS/toc.ncx", deflated)
            .map_err(io_error)?;
        zip.write_all(ncx.as_bytes())?;

        // 7. Write sections
        if let Some(ref front) = front {
            write_section(&mut zip, &front.file_name, &render_front_matter(front, lang), deflated)?;
        }
        for section in book.sections() {
            let doc = render_section(section.title(), section.lines(), lang);
            write_section(&mut zip, section.file_name(), &doc, deflated)?;
        }

        zip.finish().map_err(io_error)?;

        info!(
            sections = sections.len(),
            identifier = %identifier,
            "wrote EPUB package"
        );
        Ok(())
    }
}

/// Write a [`Book`] to an EPUB file on disk with default settings.
pub fn write_epub<P: AsRef<Path>>(book: &mut Book, path: P) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    EpubExporter::new().export(book, &mut file)
}

fn write_section<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    file_name: &str,
    doc: &str,
    options: SimpleFileOptions,
) -> io::Result<()> {
    debug!(file_name, "writing section");
    zip.start_file(format!("OEBPS/{file_name}"), options)
        .map_err(io_error)?;
    zip.write_all(doc.as_bytes())
}

/// Convert zip error to io error.
fn io_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> io::Error {
    io::Error::other(e)
}

/// Identifier derived from the book's metadata and text.
fn derive_identifier(book: &Book) -> String {
    let mut parts: Vec<&str> = vec![
        book.title.as_str(),
        book.author.as_deref().unwrap_or(""),
        book.intro.as_deref().unwrap_or(""),
    ];
    for section in book.sections() {
        parts.push(section.title());
        parts.extend(section.lines().iter().map(String::as_str));
    }
    stable_uuid(parts)
}

/// Container.xml template.
const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

struct ManifestItem {
    id: String,
    href: String,
}

impl ManifestItem {
    fn new(id: &str, href: &str) -> Self {
        Self {
            id: id.to_string(),
            href: href.to_string(),
        }
    }
}

/// Generate content.opf. The spine lists only the sections; nav.xhtml is
/// in the manifest but not in the reading order.
fn generate_opf(
    book: &Book,
    identifier: &str,
    modified: &str,
    lang: &str,
    sections: &[ManifestItem],
) -> String {
    let mut opf = String::new();

    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
"#,
    );

    writeln!(
        opf,
        "    <dc:identifier id=\"BookId\">{}</dc:identifier>",
        escape(identifier)
    )
    .unwrap();
    writeln!(opf, "    <dc:title>{}</dc:title>", escape(book.title.as_str())).unwrap();
    writeln!(opf, "    <dc:language>{}</dc:language>", escape(lang)).unwrap();
    if let Some(ref author) = book.author {
        writeln!(opf, "    <dc:creator>{}</dc:creator>", escape(author.as_str())).unwrap();
    }
    if let Some(ref intro) = book.intro {
        writeln!(
            opf,
            "    <dc:description>{}</dc:description>",
            escape(intro.as_str())
        )
        .unwrap();
    }
    writeln!(
        opf,
        "    <meta property=\"dcterms:modified\">{}</meta>",
        escape(modified)
    )
    .unwrap();
    opf.push_str("  </metadata>\n");

    // Manifest
    opf.push_str("  <manifest>\n");
    opf.push_str(
        "    <item id=\"nav\" href=\"nav.xhtml\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>\n",
    );
    opf.push_str("    <item id=\"css\" href=\"style.css\" media-type=\"text/css\"/>\n");
    opf.push_str(
        "    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n",
    );
    for item in sections {
        writeln!(
            opf,
            "    <item id=\"{}\" href=\"{}\" media-type=\"application/xhtml+xml\"/>",
            escape(item.id.as_str()),
            escape(item.href.as_str())
        )
        .unwrap();
    }
    opf.push_str("  </manifest>\n");

    // Spine
    opf.push_str("  <spine toc=\"ncx\">\n");
    for item in sections {
        writeln!(opf, "    <itemref idref=\"{}\"/>", escape(item.id.as_str())).unwrap();
    }
    opf.push_str("  </spine>\n");

    opf.push_str("</package>\n");
    opf
}

/// Generate toc.ncx from TOC entries.
fn generate_ncx(title: &str, identifier: &str, toc: &[TocEntry]) -> String {
    let depth = if toc.iter().any(|e| !e.children.is_empty()) {
        2
    } else {
        1
    };

    let mut ncx = String::new();
    ncx.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
"#,
    );
    writeln!(ncx, "    <meta name=\"dtb:uid\" content=\"{}\"/>", escape(identifier)).unwrap();
    writeln!(ncx, "    <meta name=\"dtb:depth\" content=\"{depth}\"/>").unwrap();
    ncx.push_str(
        r#"    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
"#,
    );
    writeln!(ncx, "  <docTitle><text>{}</text></docTitle>", escape(title)).unwrap();
    ncx.push_str("  <navMap>\n");
    write_nav_points(&mut ncx, toc, 2);
    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}

/// Recursively write navPoint elements.
fn write_nav_points(ncx: &mut String, entries: &[TocEntry], indent: usize) {
    let indent_str = "  ".repeat(indent);

    for entry in entries {
        let order = entry.play_order.unwrap_or_default();
        writeln!(
            ncx,
            "{indent_str}<navPoint id=\"navPoint-{order}\" playOrder=\"{order}\">"
        )
        .unwrap();
        writeln!(
            ncx,
            "{indent_str}  <navLabel><text>{}</text></navLabel>",
            escape(entry.title.as_str())
        )
        .unwrap();
        writeln!(
            ncx,
            "{indent_str}  <content src=\"{}\"/>",
            escape(entry.href.as_str())
        )
        .unwrap();

        if !entry.children.is_empty() {
            write_nav_points(ncx, &entry.children, indent + 1);
        }

        writeln!(ncx, "{indent_str}</navPoint>").unwrap();
    }
}
