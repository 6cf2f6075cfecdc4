//! Content block types for structured document reconstruction
//!
//! A [`Block`] is the unit of processing for both engines: an ordered item
//! extracted from a source document by an upstream reader, carrying its
//! textual payload plus the optional signals (style hint, heading level
//! candidate, open attributes) the engines work from.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open mapping of auxiliary named fields attached to a block.
///
/// Producers write fields such as `image_path`; the caption engine writes
/// `image_caption`, `table_footnote` and friends. Fields not understood by
/// this crate are carried through untouched.
pub type Attributes = serde_json::Map<String, Value>;

/// The kind of content a block holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Regular paragraph text (default)
    #[default]
    Text,
    /// Picture/image
    Image,
    /// Table
    Table,
    /// Formula/equation
    Equation,
    /// Anything else; passes through both engines untouched
    Other,
}

impl BlockKind {
    /// Whether this kind can acquire a caption and/or footnote.
    #[inline]
    #[must_use]
    pub fn is_anchor(self) -> bool {
        matches!(self, Self::Image | Self::Table | Self::Equation)
    }
}

impl std::fmt::Display for BlockKind {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Table => "table",
            Self::Equation => "equation",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for BlockKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "paragraph" => Ok(Self::Text),
            "image" | "picture" => Ok(Self::Image),
            "table" => Ok(Self::Table),
            "equation" | "formula" => Ok(Self::Equation),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown block kind: '{s}'")),
        }
    }
}

/// One content block of an extracted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// What the block contains.
    #[serde(default)]
    pub kind: BlockKind,
    /// Textual payload; empty means no text.
    #[serde(default)]
    pub content: String,
    /// Dense zero-based index within the document, reassigned by each
    /// engine on output.
    #[serde(default)]
    pub position: usize,
    /// Identifier grouping blocks of the same source document.
    #[serde(default)]
    pub document_id: String,
    /// Name of the visual style applied in the source document, if any.
    /// `None` is a normal value, never an error.
    #[serde(default)]
    pub style_hint: Option<String>,
    /// Heading depth: `None`/`Some(0)` = body text, `Some(1)` = candidate
    /// heading, `> 1` = finalized by an upstream stage.
    #[serde(default)]
    pub heading_level: Option<u32>,
    /// Open auxiliary fields (e.g. `image_path`, `image_caption`).
    #[serde(default)]
    pub attributes: Attributes,
}

impl Block {
    /// Creates a block of the given kind with the given content.
    #[must_use]
    pub fn new(kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            position: 0,
            document_id: String::new(),
            style_hint: None,
            heading_level: None,
            attributes: Attributes::new(),
        }
    }

    /// Creates a text block.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(BlockKind::Text, content)
    }

    /// Creates an image block with an `image_path` attribute.
    #[must_use]
    pub fn image(path: impl Into<String>) -> Self {
        Self::new(BlockKind::Image, "").with_attribute("image_path", path.into())
    }

    /// Creates a table block from its textual rendering.
    #[must_use]
    pub fn table(content: impl Into<String>) -> Self {
        Self::new(BlockKind::Table, content)
    }

    /// Creates an equation block from its textual rendering.
    #[must_use]
    pub fn equation(content: impl Into<String>) -> Self {
        Self::new(BlockKind::Equation, content)
    }

    /// Sets the position within the document.
    #[must_use]
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Sets the source document identifier.
    #[must_use]
    pub fn with_document_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = document_id.into();
        self
    }

    /// Sets the style hint.
    #[must_use]
    pub fn with_style_hint(mut self, hint: impl Into<String>) -> Self {
        self.style_hint = Some(hint.into());
        self
    }

    /// Sets the heading level.
    #[must_use]
    pub fn with_heading_level(mut self, level: u32) -> Self {
        self.heading_level = Some(level);
        self
    }

    /// Adds an auxiliary attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns an attribute as a string slice, if present and a string.
    #[must_use]
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}
