//! Structure model for books recovered from plain text.
//!
//! This module contains:
//! - The [`Book`] with its volumes, root chapters and spine
//! - [`Volume`] and [`Chapter`] sections
//! - The synthetic [`FrontMatter`] built at export time
//! - [`TocEntry`], the navigation tree derived from the spine

mod book;
mod toc;

pub use book::{Book, Chapter, ChapterRef, FrontMatter, Section, SpineEntry, Volume};
pub use toc::{TocEntry, build_toc};
