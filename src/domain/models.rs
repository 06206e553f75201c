use serde::{Deserialize, Serialize};
use std::fmt;

/// Glyph shown next to a command in the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Text,
    Heading1,
    Heading2,
    Heading3,
    BulletList,
    NumberedList,
    Quote,
    Code,
    Divider,
    Image,
    Upload,
    Link,
}

impl Icon {
    #[must_use]
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Text => "¶",
            Icon::Heading1 => "H1",
            Icon::Heading2 => "H2",
            Icon::Heading3 => "H3",
            Icon::BulletList => "•",
            Icon::NumberedList => "1.",
            Icon::Quote => "❝",
            Icon::Code => "</>",
            Icon::Divider => "—",
            Icon::Image => "▣",
            Icon::Upload => "⇪",
            Icon::Link => "⛓",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandItem {
    pub title: String,
    pub description: String,
    pub search_terms: Vec<String>,
    pub icon: Icon,
}

impl CommandItem {
    pub fn new(title: &str, description: &str, search_terms: &[&str], icon: Icon) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            search_terms: search_terms.iter().map(|t| (*t).to_string()).collect(),
            icon,
        }
    }
}

/// A (row, column) location in the document. Columns count chars, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.col + 1)
    }
}

/// Half-open span `[from, to)` of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub from: Position,
    pub to: Position,
}

impl Range {
    #[must_use]
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageAttrs {
    pub src: String,
    pub alt: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Images,
}

impl FileKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Images => "images",
        }
    }
}

/// A local file waiting for the save step to persist it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFile {
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub blob: String,
    pub filename: String,
    /// Base64 of the file bytes.
    pub content: String,
}

/// State shared by everything editing one document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentContext {
    files: Vec<PendingFile>,
}

impl DocumentContext {
    pub fn append_file(&mut self, file: PendingFile) {
        self.files.push(file);
    }

    #[must_use]
    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }
}
