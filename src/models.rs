//! Domain models shared across the parsing, presentation, and persistence
//! layers. The structured song types are pure data holders produced by the
//! parser; the record types mirror rows in the SQLite store. Keeping the
//! commentary here means later refactors can reconstruct the assumptions even
//! if other context is lost.

use std::fmt;

use thiserror::Error;

/// A single on-screen unit of lyric text. Base slides come out of the parser
/// with two lines each (one blank-line-separated paragraph); re-chunking
/// produces slides of other line counts for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// The lyric lines, already whitespace-trimmed by the parser.
    pub lines: Vec<String>,
}

impl Slide {
    /// Build a slide from anything line-like. Mostly a convenience for tests
    /// and for the sentinel below.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// The sentinel blank slide shown before the first and after the last
    /// lyric of a song, so the projector starts and ends on an empty frame.
    pub fn blank() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }
}

/// A named section of a song ("Verse 1", "Chorus", ...) holding its base
/// slides in lyric order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Section title; doubles as the lookup key inside [`PartMap`].
    pub title: String,
    /// Base slides as parsed, normally two lines each.
    pub slides: Vec<Slide>,
}

/// Insertion-ordered mapping from part title to [`Part`].
///
/// The song text format keys parts by their free-form title, so this behaves
/// like a dictionary: inserting a title that already exists replaces the
/// earlier part in place (last wins), and a lookup miss yields `None` rather
/// than an error. Insertion order is preserved so a song can be re-serialized
/// in the order its parts were written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartMap {
    parts: Vec<Part>,
}

impl PartMap {
    /// Insert a part, replacing any earlier part with the same title.
    pub fn insert(&mut self, part: Part) {
        if let Some(existing) = self.parts.iter_mut().find(|p| p.title == part.title) {
            *existing = part;
        } else {
            self.parts.push(part);
        }
    }

    /// Look up a part by title. Missing titles are an expected condition
    /// (arrangements may reference parts that were never written) and yield
    /// `None`.
    pub fn get(&self, title: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.title == title)
    }

    /// Iterate parts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// A fully parsed song: structured parts plus the performance order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    /// Title displayed in lists and on the live screen.
    pub title: String,
    /// Optional author/composer credit carried from the library record.
    pub author: Option<String>,
    /// Parts keyed by title, in the order they appear in the song text.
    pub content: PartMap,
    /// Performance order of part titles. Repeats are allowed (a chorus is
    /// typically sung more than once) and order is independent of the order
    /// parts were written in.
    pub arrangement: Vec<String>,
    /// Hierarchical folder path the song lives under in the library.
    pub path: Vec<String>,
}

impl Song {
    /// Arrangement entries that do not resolve to a part, deduplicated in
    /// first-appearance order. Presentation tolerates these (they render as
    /// empty parts), but surfacing them lets the operator fix typos before a
    /// service.
    pub fn unresolved_titles(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = Vec::new();
        for title in &self.arrangement {
            if self.content.get(title).is_none() && !missing.contains(&title.as_str()) {
                missing.push(title);
            }
        }
        missing
    }
}

/// How many lyric lines each presentation slide should carry. Only these
/// three granularities have defined re-chunking behavior; anything else is
/// rejected at the configuration boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideSize {
    /// One line per slide (karaoke-style).
    Single,
    /// Two lines per slide; base slides pass through untouched.
    Double,
    /// Four lines per slide (full stanza on screen).
    Quad,
}

impl Default for SlideSize {
    fn default() -> Self {
        SlideSize::Double
    }
}

impl SlideSize {
    /// The line count this size asks the re-chunker for.
    pub fn lines(self) -> usize {
        match self {
            SlideSize::Single => 1,
            SlideSize::Double => 2,
            SlideSize::Quad => 4,
        }
    }

    /// Parse a configured line count, rejecting unsupported values so a typo
    /// in the config file cannot silently blank every slide.
    pub fn from_lines(lines: usize) -> Result<Self, SlideSizeError> {
        match lines {
            1 => Ok(SlideSize::Single),
            2 => Ok(SlideSize::Double),
            4 => Ok(SlideSize::Quad),
            other => Err(SlideSizeError(other)),
        }
    }
}

impl fmt::Display for SlideSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lines", self.lines())
    }
}

/// Raised when a configured slide size is outside the supported set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported slide size {0}; expected 1, 2, or 4")]
pub struct SlideSizeError(pub usize);

/// In-memory representation of a library row. The struct mirrors the `songs`
/// table plus the normalized search key computed when the row is loaded.
#[derive(Debug, Clone)]
pub struct SongRecord {
    /// Primary key from the SQLite store. Kept around even when the UI only
    /// needs display information because edit/delete flows bubble the id back
    /// to the persistence layer.
    pub id: i64,
    /// Unique song title as stored in the library.
    pub name: String,
    /// Author/composer credit; empty when unknown.
    pub author: String,
    /// `/`-joined folder path within the library.
    pub path: String,
    /// The raw delimited song body, exactly as the parser consumes it.
    pub full_text: String,
    /// Diacritic-stripped lowercase key over title and body, computed once at
    /// load time and matched by substring during search.
    pub search_key: String,
}

impl SongRecord {
    /// Compose a `Title - Author` string that gracefully omits the hyphen if
    /// the author is blank. List views and the live header rely on this
    /// ready-to-use formatting.
    pub fn display_title(&self) -> String {
        if self.author.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.name, self.author)
        }
    }
}

/// One entry of the ordered service list, joining the position row to the
/// song it references.
#[derive(Debug, Clone)]
pub struct ServiceItem {
    /// Primary key of the `service_items` row.
    pub id: i64,
    /// Sort key within the service; unique per entry, gaps allowed.
    pub position: i64,
    /// The referenced library song, hydrated by the fetch join.
    pub song: SongRecord,
}
