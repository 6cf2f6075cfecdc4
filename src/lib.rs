// src/lib.rs
//! # Document Structure Reconstruction
//!
//! Rebuilds document structure from an ordered sequence of content blocks
//! produced by an upstream extraction stage: attaches captions and
//! footnotes to the figure/table/equation block they describe, and infers
//! heading hierarchy levels for text blocks a layout pass marked only as
//! "possibly a heading" — from text content, adjacent-block context and an
//! optional style hint, with no layout geometry.
//!
//! Two independent engines, each a pure function from a block sequence to
//! a new block sequence. A caller may run either, both, or neither, in
//! either order.
//!
//! ## Quick Start
//!
//! ```rust
//! use doc_structure::{Block, CaptionFootnoteEngine, LayoutLevelEngine};
//!
//! let blocks = vec![
//!     Block::text("1.2 Benchmark setup").with_heading_level(1).with_position(0),
//!     Block::text("Figure 1. Throughput by batch size").with_position(1),
//!     Block::image("fig1.png").with_position(2),
//! ];
//!
//! let blocks = LayoutLevelEngine::new().classify(blocks);
//! let blocks = CaptionFootnoteEngine::new().merge(blocks);
//!
//! assert_eq!(blocks.len(), 2);
//! assert_eq!(blocks[0].heading_level, Some(2));
//! assert_eq!(blocks[1].content, "![Figure 1. Throughput by batch size](fig1.png)");
//! ```
//!
//! ## Extending the pattern tables
//!
//! The per-type keyword and pattern tables are data, not logic: replace
//! them to support new locales without touching the engines.
//!
//! ```rust
//! use doc_structure::{CaptionConfig, CaptionFootnoteEngine, TypeConfig};
//!
//! let mut config = CaptionConfig::default();
//! config.image = TypeConfig::new(
//!     &[r"Abbildung\s*\d+", r"Abb\.\s*\d+"],
//!     &["abbildung", "abb"],
//!     &["tabelle", "tab"],
//!     &["abbildung", "caption"],
//! )?;
//! let engine = CaptionFootnoteEngine::new().with_config(config);
//! # Ok::<(), doc_structure::StructureError>(())
//! ```

pub mod block;
pub mod caption;
pub mod error;
pub mod layout;

pub use block::{Attributes, Block, BlockKind};
pub use caption::{CaptionConfig, CaptionFootnoteEngine, FootnoteConfig, TypeConfig};
pub use error::{Result, StructureError};
pub use layout::{LayoutLevelEngine, LayoutPatterns, LevelPattern, LevelRule};
