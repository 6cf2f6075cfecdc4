//! Heading-level inference for layout-flagged text blocks.
//!
//! Groups blocks by source document, orders each group by original
//! position, suppresses false-positive heading candidates (timestamps,
//! table-of-contents lines) and computes a heading depth for true
//! candidates via the pattern cascade in [`patterns`]. Never creates or
//! destroys blocks; only `heading_level` is mutated and positions are
//! reassigned densely over the concatenated output.

pub mod patterns;

use log::{debug, trace};

use crate::block::{Block, BlockKind};
pub use patterns::{LayoutPatterns, LevelPattern, LevelRule};

/// Infers heading levels from text content and adjacent-block context.
///
/// # Example
///
/// ```rust
/// use doc_structure::{Block, LayoutLevelEngine};
///
/// let blocks = vec![
///     Block::text("1.2 Scope").with_heading_level(1),
/// ];
/// let classified = LayoutLevelEngine::new().classify(blocks);
/// assert_eq!(classified[0].heading_level, Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutLevelEngine {
    patterns: LayoutPatterns,
}

impl LayoutLevelEngine {
    /// Creates an engine with the default pattern tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pattern tables.
    #[must_use]
    pub fn with_patterns(mut self, patterns: LayoutPatterns) -> Self {
        self.patterns = patterns;
        self
    }

    /// Returns the active pattern tables.
    #[must_use]
    pub fn patterns(&self) -> &LayoutPatterns {
        &self.patterns
    }

    /// Classifies heading levels across one or more documents.
    ///
    /// Blocks are partitioned by `document_id` (stable sort by identifier,
    /// then original position), each partition is processed independently,
    /// and the concatenated result gets dense positions preserving each
    /// partition's relative arrangement.
    #[must_use]
    pub fn classify(&self, mut blocks: Vec<Block>) -> Vec<Block> {
        blocks.sort_by(|a, b| {
            a.document_id
                .cmp(&b.document_id)
                .then(a.position.cmp(&b.position))
        });

        let mut start = 0;
        while start < blocks.len() {
            let mut end = start + 1;
            while end < blocks.len() && blocks[end].document_id == blocks[start].document_id {
                end += 1;
            }
            self.classify_partition(&mut blocks[start..end]);
            start = end;
        }

        for (index, block) in blocks.iter_mut().enumerate() {
            block.position = index;
        }
        blocks
    }

    /// One document's blocks, in position order.
    fn classify_partition(&self, blocks: &mut [Block]) {
        for block in blocks {
            self.classify_block(block);
        }
    }

    fn classify_block(&self, block: &mut Block) {
        // Finalized by an upstream authority; not even suppression applies.
        if block.heading_level.unwrap_or(0) > 1 {
            return;
        }

        let content = block.content.trim();
        if self.patterns.is_timestamp(content) || self.patterns.is_toc_line(content) {
            debug!("suppressing heading candidate at position {}", block.position);
            block.heading_level = Some(0);
            return;
        }

        if block.heading_level == Some(1) && block.kind == BlockKind::Text {
            let level = self.patterns.level_for(content);
            trace!("position {} computed level {level}", block.position);
            if level > 0 {
                block.heading_level = Some(level);
            }
        }
    }
}
