use std::fmt;

/// A book recovered from plain text.
///
/// Chapters live either inside a [`Volume`] or in `root_chapters`, never both.
/// The `spine` records the reading order as indices into those collections,
/// so a volume always precedes its own chapters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Book {
    pub title: String,
    #[cfg_attr(feature = "cli", serde(skip_serializing_if = "Option::is_none"))]
    pub author: Option<String>,
    #[cfg_attr(feature = "cli", serde(skip_serializing_if = "Option::is_none"))]
    pub intro: Option<String>,
    pub volumes: Vec<Volume>,
    pub root_chapters: Vec<Chapter>,
    pub spine: Vec<SpineEntry>,
}

/// A top-level grouping of chapters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Volume {
    pub title: String,
    /// Content found under the volume heading before its first chapter.
    #[cfg_attr(feature = "cli", serde(skip_serializing_if = "Vec::is_empty"))]
    pub lines: Vec<String>,
    pub chapters: Vec<Chapter>,
    #[cfg_attr(feature = "cli", serde(skip))]
    pub file_name: String,
    #[cfg_attr(feature = "cli", serde(skip))]
    pub item_id: String,
}

/// The smallest structural unit; holds normalized content lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Chapter {
    pub title: String,
    pub lines: Vec<String>,
    /// Index of the owning volume in [`Book::volumes`].
    #[cfg_attr(feature = "cli", serde(skip))]
    pub volume: Option<usize>,
    #[cfg_attr(feature = "cli", serde(skip))]
    pub file_name: String,
    #[cfg_attr(feature = "cli", serde(skip))]
    pub item_id: String,
}

/// Synthetic leading section carrying the recovered metadata.
///
/// Never stored in the [`Book`]; built on demand by [`Book::front_matter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub author: Option<String>,
    pub intro: Option<String>,
    pub file_name: String,
    pub item_id: String,
}

/// Locates a chapter inside a [`Book`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct ChapterRef {
    pub volume: Option<usize>,
    pub index: usize,
}

/// An entry in the reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(tag = "type", rename_all = "snake_case"))]
pub enum SpineEntry {
    Volume { index: usize },
    Chapter { at: ChapterRef },
}

/// A spine entry resolved to the section it points at.
#[derive(Debug, Clone, Copy)]
pub enum Section<'a> {
    Volume(&'a Volume),
    Chapter(&'a Chapter),
}

impl<'a> Section<'a> {
    pub fn title(&self) -> &'a str {
        match *self {
            Section::Volume(v) => &v.title,
            Section::Chapter(c) => &c.title,
        }
    }

    pub fn lines(&self) -> &'a [String] {
        match *self {
            Section::Volume(v) => &v.lines,
            Section::Chapter(c) => &c.lines,
        }
    }

    pub fn file_name(&self) -> &'a str {
        match *self {
            Section::Volume(v) => &v.file_name,
            Section::Chapter(c) => &c.file_name,
        }
    }

    pub fn item_id(&self) -> &'a str {
        match *self {
            Section::Volume(v) => &v.item_id,
            Section::Chapter(c) => &c.item_id,
        }
    }
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn with_intro(mut self, intro: Option<String>) -> Self {
        self.intro = intro;
        self
    }

    /// Open a new volume and append it to the spine.
    pub fn push_volume(&mut self, title: impl Into<String>) -> usize {
        let index = self.volumes.len();
        self.volumes.push(Volume {
            title: title.into(),
            ..Default::default()
        });
        self.spine.push(SpineEntry::Volume { index });
        index
    }

    /// Open a new chapter under `volume` (or at the root) and append it to the spine.
    ///
    /// # Panics
    ///
    /// Panics if `volume` is not a valid index into [`Book::volumes`].
    pub fn push_chapter(&mut self, title: impl Into<String>, volume: Option<usize>) -> ChapterRef {
        let chapter = Chapter {
            title: title.into(),
            volume,
            ..Default::default()
        };
        let siblings = match volume {
            Some(v) => &mut self.volumes[v].chapters,
            None => &mut self.root_chapters,
        };
        let at = ChapterRef {
            volume,
            index: siblings.len(),
        };
        siblings.push(chapter);
        self.spine.push(SpineEntry::Chapter { at });
        at
    }

    pub fn chapter(&self, at: ChapterRef) -> Option<&Chapter> {
        match at.volume {
            Some(v) => self.volumes.get(v)?.chapters.get(at.index),
            None => self.root_chapters.get(at.index),
        }
    }

    pub fn chapter_mut(&mut self, at: ChapterRef) -> Option<&mut Chapter> {
        match at.volume {
            Some(v) => self.volumes.get_mut(v)?.chapters.get_mut(at.index),
            None => self.root_chapters.get_mut(at.index),
        }
    }

    /// Resolve a spine entry to its section.
    pub fn section(&self, entry: SpineEntry) -> Option<Section<'_>> {
        match entry {
            SpineEntry::Volume { index } => self.volumes.get(index).map(Section::Volume),
            SpineEntry::Chapter { at } => self.chapter(at).map(Section::Chapter),
        }
    }

    /// Iterate over all sections in reading order.
    pub fn sections(&self) -> impl Iterator<Item = Section<'_>> + '_ {
        self.spine.iter().filter_map(|entry| self.section(*entry))
    }

    /// Assign the generated file name and manifest id of a spine entry.
    pub fn annotate(&mut self, entry: SpineEntry, file_name: String, item_id: String) {
        match entry {
            SpineEntry::Volume { index } => {
                if let Some(volume) = self.volumes.get_mut(index) {
                    volume.file_name = file_name;
                    volume.item_id = item_id;
                }
            }
            SpineEntry::Chapter { at } => {
                if let Some(chapter) = self.chapter_mut(at) {
                    chapter.file_name = file_name;
                    chapter.item_id = item_id;
                }
            }
        }
    }

    /// Total number of chapters, nested or not.
    pub fn chapter_count(&self) -> usize {
        self.root_chapters.len() + self.volumes.iter().map(|v| v.chapters.len()).sum::<usize>()
    }

    /// Build the front matter section if any metadata is present.
    pub fn front_matter(&self) -> Option<FrontMatter> {
        if self.title.is_empty() && self.author.is_none() && self.intro.is_none() {
            return None;
        }
        Some(FrontMatter {
            title: self.title.clone(),
            author: self.author.clone(),
            intro: self.intro.clone(),
            file_name: String::new(),
            item_id: String::new(),
        })
    }
}

impl fmt::Display for Book {
    /// Renders the body skeleton: section titles followed by their lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in self.sections() {
            writeln!(f, "{}", section.title())?;
            for line in section.lines() {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}
