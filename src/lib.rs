//! # txtepub
//!
//! Recovers the structure of plain-text Chinese web novels and packages
//! them as EPUB 3.
//!
//! ## Features
//!
//! - Decode UTF-8, UTF-16 and GBK/GB18030 text without failing
//! - Recover title, author and synopsis from the head of the file
//! - Detect volumes and chapters with context-aware heuristics
//! - Write an EPUB 3 package with nested navigation and an NCX fallback
//!
//! ## Quick Start
//!
//! ```no_run
//! use txtepub::{StructureConfig, convert_file};
//!
//! let output = convert_file("novel.txt", None, &StructureConfig::default()).unwrap();
//! println!("EPUB saved to: {}", output.display());
//! ```
//!
//! ## Working with Books
//!
//! [`parse_book`] turns decoded text into a [`Book`]: a list of volumes and
//! root chapters plus a spine holding the reading order.
//!
//! ```
//! use txtepub::{StructureConfig, parse_book};
//!
//! let text = "书名：示例书\n作者：张三\n\n第一卷 起始\n\n第一章 章一\n内容\n";
//! let book = parse_book(text, "fallback", &StructureConfig::default());
//!
//! assert_eq!(book.title, "示例书");
//! assert_eq!(book.author.as_deref(), Some("张三"));
//! assert_eq!(book.volumes[0].chapters[0].title, "第一章 章一");
//! ```

pub mod error;
pub mod export;
pub mod model;
pub mod structure;
pub mod util;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

pub use error::{Error, Result};
pub use export::{EpubConfig, EpubExporter, Exporter, write_epub};
pub use model::{Book, Chapter, ChapterRef, Section, SpineEntry, TocEntry, Volume};
pub use structure::{StructureConfig, parse_book};
pub use util::decode_text;

/// Read a text file and recover its structure.
///
/// The file stem is used as the title when the text does not name one.
pub fn read_book<P: AsRef<Path>>(path: P, config: &StructureConfig) -> Result<Book> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    let decoded = decode_text(&bytes);
    if decoded.lossy {
        warn!(path = %path.display(), "input decoded with replacement characters");
    }
    info!(path = %path.display(), encoding = decoded.encoding, "read input");

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parse_book(&decoded.text, &stem, config))
}

/// Convert a text file to EPUB.
///
/// When `output` is `None` the EPUB is written next to the input with an
/// `.epub` extension. Returns the path written.
pub fn convert_file<P: AsRef<Path>>(
    input: P,
    output: Option<&Path>,
    config: &StructureConfig,
) -> Result<PathBuf> {
    let input = input.as_ref();
    let mut book = read_book(input, config)?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("epub"),
    };
    write_epub(&mut book, &output)?;
    info!(path = %output.display(), "EPUB saved");
    Ok(output)
}
