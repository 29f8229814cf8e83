//! Export module for writing recovered books.
//!
//! Provides the `Exporter` trait and the EPUB implementation.
//!
//! # Architecture
//!
//! The `Exporter` trait uses a builder pattern:
//! - `new()` creates an exporter with default configuration
//! - `with_config()` allows customization
//! - `export()` writes to any `Write + Seek` destination
//!
//! Exporting takes the book mutably: the exporter assigns each spine entry
//! its generated file name and manifest id before writing.

use std::io::{self, Seek, Write};

use crate::model::Book;

mod epub;
mod xhtml;

pub use epub::{EpubConfig, EpubExporter, write_epub};
pub use xhtml::{STYLESHEET, render_front_matter, render_nav, render_section};

/// Trait for exporting books to specific formats.
///
/// Exporters use a builder pattern where configuration is held in the struct,
/// and the `export` method writes to any `Write + Seek` destination.
pub trait Exporter {
    /// Export the book to the provided writer.
    ///
    /// The writer can be:
    /// - `std::fs::File` for disk output
    /// - `std::io::Cursor<Vec<u8>>` for seekable in-memory output
    /// - Any other type implementing `Write + Seek`
    fn export<W: Write + Seek>(&self, book: &mut Book, writer: &mut W) -> io::Result<()>;
}
