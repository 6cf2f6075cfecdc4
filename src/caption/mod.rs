//! Caption and footnote attachment for anchor blocks.
//!
//! Scans an ordered block sequence, finds at most one caption and at most
//! one footnote per image/table/equation anchor among adjacent text blocks,
//! and merges each group into a single output block. Runs in two passes:
//! a planning pass that records claims over an immutable snapshot, then a
//! side-effect-free merge pass that rebuilds the sequence.

pub mod config;

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use log::debug;
use regex::Regex;
use serde_json::Value;

use crate::block::{Block, BlockKind};
pub use config::{CaptionConfig, FootnoteConfig, TypeConfig};

/// Which of two competing caption candidates an anchor should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Predecessor,
    Successor,
}

/// Caption/footnote indices chosen for one anchor during planning.
#[derive(Debug, Clone, Copy)]
struct MergePlan {
    caption: Option<usize>,
    footnote: Option<usize>,
}

/// Emulates an anchored match: the pattern must match starting at offset 0.
fn matches_at_start(re: &Regex, text: &str) -> bool {
    re.find(text).is_some_and(|m| m.start() == 0)
}

/// Merges caption and footnote text blocks into the anchor they describe.
///
/// # Example
///
/// ```rust
/// use doc_structure::{Block, CaptionFootnoteEngine};
///
/// let blocks = vec![
///     Block::text("Figure 1. A cat").with_position(0),
///     Block::image("a.png").with_position(1),
/// ];
/// let merged = CaptionFootnoteEngine::new().merge(blocks);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].content, "![Figure 1. A cat](a.png)");
/// ```
#[derive(Debug, Clone)]
pub struct CaptionFootnoteEngine {
    config: CaptionConfig,
    save_image: bool,
}

impl Default for CaptionFootnoteEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptionFootnoteEngine {
    /// Creates an engine with the default pattern tables and image
    /// references enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: CaptionConfig::default(),
            save_image: true,
        }
    }

    /// Replaces the pattern tables.
    #[must_use]
    pub fn with_config(mut self, config: CaptionConfig) -> Self {
        self.config = config;
        self
    }

    /// Controls whether image merges emit an embeddable image reference
    /// (`![caption](path)`) or plain caption text.
    ///
    /// Default: true.
    #[must_use]
    pub fn save_image(mut self, save: bool) -> Self {
        self.save_image = save;
        self
    }

    /// Returns the active pattern tables.
    #[must_use]
    pub fn config(&self) -> &CaptionConfig {
        &self.config
    }

    /// Attaches captions and footnotes to their anchors and returns the
    /// rebuilt sequence with dense positions.
    ///
    /// Consumed caption/footnote blocks are removed from the output; every
    /// other block passes through with only its position reassigned.
    #[must_use]
    pub fn merge(&self, blocks: Vec<Block>) -> Vec<Block> {
        if blocks.is_empty() {
            return blocks;
        }

        let (plans, claimed) = self.plan(&blocks);

        let mut out = Vec::with_capacity(blocks.len());
        for (i, block) in blocks.iter().enumerate() {
            if claimed.contains(&i) {
                continue;
            }
            let mut emitted = match plans.get(&i) {
                Some(plan) => self.merge_one(
                    block,
                    plan.caption.map(|c| &blocks[c]),
                    plan.footnote.map(|f| &blocks[f]),
                ),
                None => block.clone(),
            };
            emitted.position = out.len();
            out.push(emitted);
        }
        out
    }

    /// Planning pass: walks anchors in increasing index order and records
    /// irrevocable claims over caption/footnote candidates.
    fn plan(&self, blocks: &[Block]) -> (HashMap<usize, MergePlan>, HashSet<usize>) {
        let mut plans = HashMap::new();
        let mut claimed: HashSet<usize> = HashSet::new();

        for (i, block) in blocks.iter().enumerate() {
            if !block.kind.is_anchor() {
                continue;
            }

            let predecessor = i
                .checked_sub(1)
                .filter(|p| !claimed.contains(p) && self.is_caption(&blocks[*p], block.kind));
            let successor = (i + 1 < blocks.len())
                .then_some(i + 1)
                .filter(|n| !claimed.contains(n) && self.is_caption(&blocks[*n], block.kind));

            let caption = match (predecessor, successor) {
                (Some(p), Some(n)) => {
                    match self.pick_caption(&blocks[p], &blocks[n], block.kind) {
                        Side::Predecessor => Some(p),
                        Side::Successor => Some(n),
                    }
                }
                (Some(p), None) => Some(p),
                (None, Some(n)) => Some(n),
                (None, None) => None,
            };

            // First unclaimed slot after the anchor and any caption that
            // lies after the anchor.
            let search = match caption {
                Some(c) if c > i => c + 1,
                _ => i + 1,
            };
            let footnote = (search < blocks.len())
                .then_some(search)
                .filter(|f| !claimed.contains(f) && self.is_footnote(&blocks[*f]));

            if caption.is_some() || footnote.is_some() {
                debug!(
                    "anchor {} ({}) claims caption={caption:?} footnote={footnote:?}",
                    i, block.kind
                );
                plans.insert(i, MergePlan { caption, footnote });
                claimed.extend(caption);
                claimed.extend(footnote);
            }
        }

        (plans, claimed)
    }

    /// Whether `candidate` is a caption for an anchor of `target` kind.
    ///
    /// The style hint is the higher-priority signal: an exclude keyword for
    /// `target` vetoes the candidate, a style keyword accepts it. With no
    /// usable hint the numbering patterns decide, matched anywhere in the
    /// content.
    fn is_caption(&self, candidate: &Block, target: BlockKind) -> bool {
        if candidate.kind != BlockKind::Text {
            return false;
        }
        let content = candidate.content.trim();
        if content.is_empty() {
            return false;
        }
        let table = self.config.for_kind(target);
        if let Some(hint) = candidate.style_hint.as_deref() {
            let hint = hint.to_lowercase();
            if table.style_exclude.iter().any(|k| hint.contains(k.as_str())) {
                return false;
            }
            if table.style_keywords.iter().any(|k| hint.contains(k.as_str())) {
                return true;
            }
        }
        table.numbering.iter().any(|re| re.is_match(content))
    }

    /// Whether `candidate` is a footnote: style-keyword hit, note prefix, or
    /// footnote marker anywhere in the text.
    fn is_footnote(&self, candidate: &Block) -> bool {
        if candidate.kind != BlockKind::Text {
            return false;
        }
        let content = candidate.content.trim();
        if content.is_empty() {
            return false;
        }
        let table = &self.config.footnote;
        if let Some(hint) = candidate.style_hint.as_deref() {
            let hint = hint.to_lowercase();
            if table.style_keywords.iter().any(|k| hint.contains(k.as_str())) {
                return true;
            }
        }
        table.prefixes.iter().any(|re| re.is_match(content))
            || table.markers.iter().any(|re| re.is_match(content))
    }

    /// Scores one caption candidate: +2 for starting with a content keyword
    /// of the anchor's kind, +3 for a numbering pattern anchored at the
    /// start of the content.
    fn caption_score(&self, candidate: &Block, target: BlockKind) -> u32 {
        let content = candidate.content.trim();
        let table = self.config.for_kind(target);
        let mut score = 0;
        let lowered = content.to_lowercase();
        if table
            .content_keywords
            .iter()
            .any(|k| lowered.starts_with(k.as_str()))
        {
            score += 2;
        }
        if table.numbering.iter().any(|re| matches_at_start(re, content)) {
            score += 3;
        }
        score
    }

    /// Resolves two competing caption candidates. Ties go to the
    /// predecessor; this is the single tie-break rule.
    fn pick_caption(&self, predecessor: &Block, successor: &Block, target: BlockKind) -> Side {
        let p = self.caption_score(predecessor, target);
        let n = self.caption_score(successor, target);
        match n.cmp(&p) {
            Ordering::Greater => Side::Successor,
            Ordering::Less | Ordering::Equal => Side::Predecessor,
        }
    }

    /// Synthesizes the merged block for one planned anchor.
    fn merge_one(
        &self,
        anchor: &Block,
        caption: Option<&Block>,
        footnote: Option<&Block>,
    ) -> Block {
        let caption_text = caption.map(|b| b.content.trim().to_string());
        let footnote_text = footnote.map(|b| b.content.trim().to_string());

        let mut merged = anchor.clone();

        if let Some(text) = &caption_text {
            merged
                .attributes
                .insert(caption_attribute(anchor.kind).to_string(), Value::from(text.as_str()));
        }
        if let Some(text) = &footnote_text {
            merged
                .attributes
                .insert("footnote".to_string(), Value::from(text.as_str()));
            merged
                .attributes
                .insert(footnote_attribute(anchor.kind).to_string(), Value::from(text.as_str()));
        }

        let mut parts: Vec<String> = Vec::new();
        if anchor.kind == BlockKind::Image {
            if self.save_image {
                let path = merged.attribute_str("image_path").unwrap_or("").to_string();
                let description = caption_text.as_deref().unwrap_or("");
                parts.push(format!("![{description}]({path})"));
            } else if let Some(text) = &caption_text {
                parts.push(text.clone());
            }
        } else {
            if let Some(text) = &caption_text {
                parts.push(text.clone());
            }
            if !anchor.content.is_empty() {
                parts.push(anchor.content.clone());
            }
        }
        if let Some(text) = footnote_text {
            parts.push(text);
        }
        merged.content = parts.join("\n");
        merged
    }
}

fn caption_attribute(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Image => "image_caption",
        BlockKind::Equation => "equation_caption",
        _ => "table_caption",
    }
}

fn footnote_attribute(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Image => "image_footnote",
        BlockKind::Equation => "equation_footnote",
        _ => "table_footnote",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CaptionFootnoteEngine {
        CaptionFootnoteEngine::new()
    }

    #[test]
    fn test_empty_input() {
        assert!(engine().merge(Vec::new()).is_empty());
    }

    #[test]
    fn test_is_caption_by_content() {
        let e = engine();
        assert!(e.is_caption(&Block::text("Figure 1. A cat"), BlockKind::Image));
        assert!(e.is_caption(&Block::text("表 2.1 结果"), BlockKind::Table));
        // Numbering may follow descriptive text
        assert!(e.is_caption(&Block::text("岩石耐磨指数表 表11.2-3"), BlockKind::Table));
        assert!(!e.is_caption(&Block::text("plain paragraph"), BlockKind::Image));
        assert!(!e.is_caption(&Block::text(""), BlockKind::Image));
        assert!(!e.is_caption(&Block::table("Figure 1"), BlockKind::Image));
    }

    #[test]
    fn test_style_hint_outranks_content() {
        let e = engine();
        // Styled as a table caption: never an image caption, even with
        // figure numbering in the content.
        let styled = Block::text("Figure 1 overview").with_style_hint("Table Caption");
        assert!(!e.is_caption(&styled, BlockKind::Image));
        assert!(e.is_caption(&styled, BlockKind::Table));
        // Style keyword accepts without any numbering in the content.
        let hinted = Block::text("overview of results").with_style_hint("图题");
        assert!(e.is_caption(&hinted, BlockKind::Image));
    }

    #[test]
    fn test_malformed_hint_falls_back_to_content() {
        let e = engine();
        let odd_hint = Block::text("Figure 2 setup").with_style_hint("\u{fffd}\u{0}");
        assert!(e.is_caption(&odd_hint, BlockKind::Image));
    }

    #[test]
    fn test_is_footnote() {
        let e = engine();
        assert!(e.is_footnote(&Block::text("注：数据来源于年度报告")));
        assert!(e.is_footnote(&Block::text("Note: preliminary data")));
        assert!(e.is_footnote(&Block::text("* excludes weekends")));
        assert!(e.is_footnote(&Block::text("①样本量较小")));
        assert!(e.is_footnote(&Block::text("see [3] for details")));
        assert!(e.is_footnote(&Block::text("anything").with_style_hint("Footnote Text")));
        assert!(!e.is_footnote(&Block::text("ordinary body text")));
        assert!(!e.is_footnote(&Block::table("* not text kind")));
    }

    #[test]
    fn test_competing_candidates_prefer_higher_score() {
        let e = engine();
        let blocks = vec![
            Block::text("as shown in Figure 2 earlier"),
            Block::image("a.png"),
            Block::text("Figure 3. Current setup"),
        ];
        let merged = e.merge(blocks);
        // The successor starts with a keyword and anchored numbering; it
        // outscores the mid-sentence reference before the anchor.
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].attribute_str("image_caption"), Some("Figure 3. Current setup"));
        assert_eq!(merged[0].content, "as shown in Figure 2 earlier");
    }

    #[test]
    fn test_tie_goes_to_predecessor() {
        let e = engine();
        let blocks = vec![
            Block::text("Figure 1. Before"),
            Block::image("a.png"),
            Block::text("Figure 2. After"),
        ];
        let merged = e.merge(blocks);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].attribute_str("image_caption"), Some("Figure 1. Before"));
        assert_eq!(merged[1].content, "Figure 2. After");
    }

    #[test]
    fn test_footnote_search_after_trailing_caption() {
        let e = engine();
        let blocks = vec![
            Block::table("| a | b |"),
            Block::text("Table 1. Results"),
            Block::text("注：初步数据"),
        ];
        let merged = e.merge(blocks);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].attribute_str("table_caption"), Some("Table 1. Results"));
        assert_eq!(merged[0].attribute_str("footnote"), Some("注：初步数据"));
        assert_eq!(merged[0].attribute_str("table_footnote"), Some("注：初步数据"));
        assert_eq!(merged[0].content, "Table 1. Results\n| a | b |\n注：初步数据");
    }

    #[test]
    fn test_footnote_search_after_anchor_when_caption_precedes() {
        let e = engine();
        let blocks = vec![
            Block::text("Table 2. Breakdown"),
            Block::table("| x | y |"),
            Block::text("* rounded to two digits"),
        ];
        let merged = e.merge(blocks);
        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged[0].content,
            "Table 2. Breakdown\n| x | y |\n* rounded to two digits"
        );
    }

    #[test]
    fn test_claim_exclusivity_between_anchors() {
        let e = engine();
        // The middle text is adjacent to both anchors; only the first may
        // claim it.
        let blocks = vec![
            Block::image("a.png"),
            Block::text("Figure 1. Shared neighbor"),
            Block::image("b.png"),
        ];
        let merged = e.merge(blocks);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].attribute_str("image_caption"), Some("Figure 1. Shared neighbor"));
        assert!(merged[1].attribute_str("image_caption").is_none());
        assert_eq!(merged[1].content, "");
    }

    #[test]
    fn test_anchor_without_candidates_passes_through() {
        let e = engine();
        let blocks = vec![
            Block::text("intro").with_position(0),
            Block::equation("E = mc^2").with_position(1),
            Block::text("outro").with_position(2),
        ];
        let merged = e.merge(blocks);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1].content, "E = mc^2");
        assert!(merged[1].attributes.is_empty());
        let positions: Vec<usize> = merged.iter().map(|b| b.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_save_image_disabled_emits_plain_caption() {
        let e = engine().save_image(false);
        let blocks = vec![
            Block::text("Figure 4. Pipeline"),
            Block::image("pipe.png"),
        ];
        let merged = e.merge(blocks);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].content, "Figure 4. Pipeline");
        assert_eq!(merged[0].attribute_str("image_caption"), Some("Figure 4. Pipeline"));
    }

    #[test]
    fn test_image_without_caption_keeps_empty_description() {
        let e = engine();
        let blocks = vec![
            Block::image("lone.png"),
            Block::text("Note: scanned at 300dpi"),
        ];
        let merged = e.merge(blocks);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].content, "![](lone.png)\nNote: scanned at 300dpi");
        assert!(merged[0].attribute_str("image_caption").is_none());
        assert_eq!(merged[0].attribute_str("image_footnote"), Some("Note: scanned at 300dpi"));
    }

    #[test]
    fn test_positions_reassigned_densely() {
        let e = engine();
        let blocks = vec![
            Block::text("body one").with_position(0),
            Block::text("Table 5 totals").with_position(1),
            Block::table("| t |").with_position(2),
            Block::text("body two").with_position(3),
            Block::text("body three").with_position(4),
        ];
        let merged = e.merge(blocks);
        assert_eq!(merged.len(), 4);
        let positions: Vec<usize> = merged.iter().map(|b| b.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_other_blocks_are_opaque_passengers() {
        let e = engine();
        let blocks = vec![
            Block::new(BlockKind::Other, "::bookmark::"),
            Block::image("a.png"),
            Block::text("Figure 1. After the passenger"),
        ];
        let merged = e.merge(blocks);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].content, "::bookmark::");
        assert_eq!(merged[1].attribute_str("image_caption"), Some("Figure 1. After the passenger"));
    }
}
