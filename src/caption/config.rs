//! Per-type pattern tables for caption and footnote detection.
//!
//! These tables are data, not behavior: callers can replace any of them to
//! extend keyword or pattern sets for new locales without touching the
//! engine logic. The defaults cover Chinese and English labels.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::block::BlockKind;
use crate::error::{Result, StructureError};

const IMAGE_NUMBERING: &[&str] = &[
    r"图\s*\d+[\.\-\d]*",
    r"Figure\s*\d+[\.\-\d]*",
    r"Fig\.\s*\d+[\.\-\d]*",
];
const IMAGE_CONTENT_KEYWORDS: &[&str] = &["图", "figure", "fig"];
const IMAGE_STYLE_EXCLUDE: &[&str] = &["表", "table", "tab", "公式", "equation", "eq"];
const IMAGE_STYLE_KEYWORDS: &[&str] = &[
    "图",
    "figure",
    "caption",
    "图题",
    "图标题",
    "figure caption",
    "题注",
];

const TABLE_NUMBERING: &[&str] = &[
    r"表\s*\d+[\.\-\d]*",
    r"Table\s*\d+[\.\-\d]*",
    r"Tab\.\s*\d+[\.\-\d]*",
];
const TABLE_CONTENT_KEYWORDS: &[&str] = &["表", "table", "tab"];
const TABLE_STYLE_EXCLUDE: &[&str] = &["图", "figure", "fig", "公式", "equation", "eq"];
const TABLE_STYLE_KEYWORDS: &[&str] = &[
    "表",
    "table",
    "caption",
    "表题",
    "表标题",
    "table caption",
    "题注",
];

const EQUATION_NUMBERING: &[&str] = &[
    r"公式\s*\d+[\.\-\d]*",
    r"Equation\s*\d+[\.\-\d]*",
    r"Eq\.\s*\d+[\.\-\d]*",
];
const EQUATION_CONTENT_KEYWORDS: &[&str] = &["公式", "equation", "eq"];
const EQUATION_STYLE_EXCLUDE: &[&str] = &["表", "table", "tab", "图", "figure", "fig"];
const EQUATION_STYLE_KEYWORDS: &[&str] = &[
    "公式",
    "equation",
    "caption",
    "公式题",
    "equation caption",
    "题注",
];

const FOOTNOTE_PREFIXES: &[&str] = &[r"注\s*[：:]\s*", r"Note\s*[：:]\s*", r"说明\s*[：:]\s*"];
const FOOTNOTE_MARKERS: &[&str] = &[
    r"[*★☆※]",
    r"[①②③④⑤⑥⑦⑧⑨⑩]",
    r"\[\d+\]",
    r"\(\d+\)",
];
const FOOTNOTE_STYLE_KEYWORDS: &[&str] = &["footnote", "脚注", "尾注", "note", "说明"];

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| StructureError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns.iter().map(|p| compile(p)).collect()
}

fn owned(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|k| (*k).to_string()).collect()
}

/// Detection table for one anchor kind (image, table or equation).
#[derive(Debug, Clone)]
pub struct TypeConfig {
    /// Patterns recognizing an explicit label plus number for the kind
    /// (e.g. "Figure 3", "表 2.1"). Compiled case-insensitive; matched
    /// anywhere in the candidate content, since numbering may follow
    /// descriptive text.
    pub numbering: Vec<Regex>,
    /// Lowercase keywords naming the kind; a caption candidate starting
    /// with one scores higher in competing-candidate resolution.
    pub content_keywords: Vec<String>,
    /// Lowercase keywords naming *other* kinds; a style hint containing one
    /// vetoes the candidate outright.
    pub style_exclude: Vec<String>,
    /// Lowercase keywords identifying a caption of this kind via the style
    /// hint.
    pub style_keywords: Vec<String>,
}

impl TypeConfig {
    /// Builds a table from caller-supplied pattern strings and keywords.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidPattern`] if any numbering pattern
    /// fails to compile.
    pub fn new(
        numbering: &[&str],
        content_keywords: &[&str],
        style_exclude: &[&str],
        style_keywords: &[&str],
    ) -> Result<Self> {
        Ok(Self {
            numbering: compile_all(numbering)?,
            content_keywords: owned(content_keywords),
            style_exclude: owned(style_exclude),
            style_keywords: owned(style_keywords),
        })
    }
}

/// Detection table for footnote candidates, shared across anchor kinds.
#[derive(Debug, Clone)]
pub struct FootnoteConfig {
    /// Note-prefix patterns ("Note:", "注:"), matched anywhere in the text.
    pub prefixes: Vec<Regex>,
    /// Footnote marker patterns (asterisk-class symbols, circled digits,
    /// bracketed or parenthesized digits), matched anywhere in the text.
    pub markers: Vec<Regex>,
    /// Lowercase style-hint keywords identifying a footnote.
    pub style_keywords: Vec<String>,
}

impl FootnoteConfig {
    /// Builds a footnote table from caller-supplied patterns and keywords.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidPattern`] if any pattern fails to
    /// compile.
    pub fn new(prefixes: &[&str], markers: &[&str], style_keywords: &[&str]) -> Result<Self> {
        Ok(Self {
            prefixes: compile_all(prefixes)?,
            markers: compile_all(markers)?,
            style_keywords: owned(style_keywords),
        })
    }
}

impl Default for FootnoteConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.footnote.clone()
    }
}

/// Complete pattern-table set for the caption/footnote engine.
#[derive(Debug, Clone)]
pub struct CaptionConfig {
    /// Table for image anchors.
    pub image: TypeConfig,
    /// Table for table anchors; also the fallback for unknown anchor kinds.
    pub table: TypeConfig,
    /// Table for equation anchors.
    pub equation: TypeConfig,
    /// Footnote detection table.
    pub footnote: FootnoteConfig,
}

impl CaptionConfig {
    /// Returns the table for the given anchor kind.
    ///
    /// Kinds without a dedicated table resolve to the table configuration.
    #[must_use]
    pub fn for_kind(&self, kind: BlockKind) -> &TypeConfig {
        match kind {
            BlockKind::Image => &self.image,
            BlockKind::Equation => &self.equation,
            _ => &self.table,
        }
    }
}

// Regex clones share the compiled program, so handing out clones of the
// lazily built defaults is cheap.
static DEFAULT_CONFIG: Lazy<CaptionConfig> = Lazy::new(|| CaptionConfig {
    image: TypeConfig::new(
        IMAGE_NUMBERING,
        IMAGE_CONTENT_KEYWORDS,
        IMAGE_STYLE_EXCLUDE,
        IMAGE_STYLE_KEYWORDS,
    )
    .expect("built-in image caption patterns are valid"),
    table: TypeConfig::new(
        TABLE_NUMBERING,
        TABLE_CONTENT_KEYWORDS,
        TABLE_STYLE_EXCLUDE,
        TABLE_STYLE_KEYWORDS,
    )
    .expect("built-in table caption patterns are valid"),
    equation: TypeConfig::new(
        EQUATION_NUMBERING,
        EQUATION_CONTENT_KEYWORDS,
        EQUATION_STYLE_EXCLUDE,
        EQUATION_STYLE_KEYWORDS,
    )
    .expect("built-in equation caption patterns are valid"),
    footnote: FootnoteConfig::new(FOOTNOTE_PREFIXES, FOOTNOTE_MARKERS, FOOTNOTE_STYLE_KEYWORDS)
        .expect("built-in footnote patterns are valid"),
});

impl Default for CaptionConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}
