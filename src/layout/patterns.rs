//! Pattern tables for heading-level inference and suppression.
//!
//! The heading cascade is an ordered list of (pattern, resolver) pairs
//! evaluated short-circuit, deepest decimal numbering first, then the
//! letter-plus-number family, then native ordinal section markers. Adding a
//! locale's markers is a data change, not a logic change.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, StructureError};

const DOT: &str = r"[\.．]";
const CN_NUM: &str = "[一二三四五六七八九十百千万零壹贰叁肆伍陆柒捌玖拾佰仟]";
const AR_NUM: &str = "[0-9０-９]";
// A heading label must be followed by end of line or a character that is
// neither a digit nor a closing bracket, so "1.2" running into a citation
// or list continuation ("1.23", "1.2)") does not match.
const INVALID_FOLLOW: &str = r"[^\d\)）\]】\}]";

fn label_tail() -> String {
    format!(r"(?:\s*{INVALID_FOLLOW}.*)?$")
}

/// How a matched heading pattern resolves to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRule {
    /// The pattern maps to a fixed depth.
    Fixed(u32),
    /// The depth is the count of non-empty dot-separated segments of the
    /// label captured in group 1 (e.g. "A.1.2" has three).
    LabelSegments,
}

/// One entry of the heading cascade.
#[derive(Debug, Clone)]
pub struct LevelPattern {
    /// Anchored pattern applied to the trimmed first line of the content.
    pub pattern: Regex,
    /// Resolver producing the level on a match.
    pub rule: LevelRule,
}

impl LevelPattern {
    /// Builds a cascade entry from a caller-supplied pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidPattern`] if the pattern fails to
    /// compile.
    pub fn new(pattern: &str, rule: LevelRule) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| StructureError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern, rule })
    }
}

fn decimal_patterns(max_depth: u32) -> Vec<LevelPattern> {
    let tail = label_tail();
    // Deepest first so "1.1.1" is tried before "1.1" before "1".
    (1..=max_depth)
        .rev()
        .map(|depth| {
            let pattern = if depth == 1 {
                // "1." with a mandatory dot; a bare "1 " is not numbering.
                format!(r"^\s*{AR_NUM}{{1,2}}{DOT}\s?{tail}")
            } else {
                let groups = depth - 1;
                format!(r"^\s*{AR_NUM}{{1,2}}(?:{DOT}\s*{AR_NUM}{{1,3}}){{{groups}}}\s?{tail}")
            };
            LevelPattern {
                pattern: Regex::new(&pattern).expect("built-in decimal heading pattern is valid"),
                rule: LevelRule::Fixed(depth),
            }
        })
        .collect()
}

fn letter_number_pattern() -> LevelPattern {
    let tail = label_tail();
    let pattern = format!(r"^\s*({0}{DOT}{AR_NUM}+(?:{DOT}{AR_NUM}+)*)\s?{tail}", "[a-zA-Z]");
    LevelPattern {
        pattern: Regex::new(&pattern).expect("built-in letter heading pattern is valid"),
        rule: LevelRule::LabelSegments,
    }
}

fn ordinal_patterns() -> Vec<LevelPattern> {
    let tail = label_tail();
    [("[篇卷章]", 1), ("[节]", 2), ("[条]", 3)]
        .into_iter()
        .map(|(marker, level)| {
            let pattern = format!(r"^\s*第\s*{CN_NUM}+\s*{marker}{tail}");
            LevelPattern {
                pattern: Regex::new(&pattern).expect("built-in ordinal heading pattern is valid"),
                rule: LevelRule::Fixed(level),
            }
        })
        .collect()
}

fn timestamp_patterns() -> Vec<Regex> {
    // Native-numeral date components, including full-width digit forms.
    let cn_year = "[零○0０〇ＯΟ一二三四五六七八九十]";
    let cn_md = "[一二三四五六七八九十]";
    [
        // Up to ~100 chars of lead-in, then the date on the final line.
        format!(r"^.{{0,100}}?\s*\n\s*\d{{4}}年\d{{1,2}}月\d{{1,2}}日\s*\n?$"),
        format!(r"^\s*\d{{4}}年\d{{1,2}}月\d{{1,2}}日\s*$"),
        format!(r"^.{{0,100}}?\s*\n\s*{cn_year}{{4}}年{cn_md}{{1,2}}月{cn_md}{{1,3}}日\s*\n?$"),
        format!(r"^\s*{cn_year}{{4}}年{cn_md}{{1,2}}月{cn_md}{{1,3}}日\s*$"),
        format!(r"^\s*\d{{4}}[.．-]\d{{1,2}}[.．-]\d{{1,2}}\s*$"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("built-in timestamp pattern is valid"))
    .collect()
}

fn toc_patterns() -> Vec<Regex> {
    [
        // Leadered index line: content, dotted run, page number.
        r"^.*[\.．·]\s*\d+\s*$".to_string(),
        // Numeral / roman-numeral / appendix / native-numeral start with a
        // bare trailing number: "1 总则 1", "I 共性部分 1", "附录A 记录表 41".
        format!(r"^\s*(?:{AR_NUM}|[IVX]+|附录|{CN_NUM}).*?\s+\d+\s*$"),
        // Quoted/bracket-titled reference with a trailing number.
        r"^\s*《.*?》.*?\s+\d+\s*$".to_string(),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("built-in table-of-contents pattern is valid"))
    .collect()
}

/// Complete pattern-table set for the layout level engine.
#[derive(Debug, Clone)]
pub struct LayoutPatterns {
    /// Heading cascade, evaluated in order with short-circuit on first match.
    pub heading: Vec<LevelPattern>,
    /// Timestamp suppression patterns, anchored over the trimmed content.
    pub timestamps: Vec<Regex>,
    /// Table-of-contents suppression patterns, anchored over the trimmed
    /// content.
    pub toc: Vec<Regex>,
}

// Regex clones share the compiled program, so handing out clones of the
// lazily built defaults is cheap.
static DEFAULT_PATTERNS: Lazy<LayoutPatterns> = Lazy::new(|| {
    let mut heading = decimal_patterns(4);
    heading.push(letter_number_pattern());
    heading.extend(ordinal_patterns());
    LayoutPatterns {
        heading,
        timestamps: timestamp_patterns(),
        toc: toc_patterns(),
    }
});

impl Default for LayoutPatterns {
    fn default() -> Self {
        DEFAULT_PATTERNS.clone()
    }
}

impl LayoutPatterns {
    /// Whether the trimmed content is a timestamp line (optionally preceded
    /// by lead-in text, date on the final line).
    #[must_use]
    pub fn is_timestamp(&self, content: &str) -> bool {
        self.timestamps.iter().any(|re| re.is_match(content))
    }

    /// Whether the trimmed content resembles a table-of-contents entry.
    #[must_use]
    pub fn is_toc_line(&self, content: &str) -> bool {
        self.toc.iter().any(|re| re.is_match(content))
    }

    /// Computes the heading level implied by the content, or 0 if no family
    /// of the cascade matches. Operates on the trimmed first line only.
    #[must_use]
    pub fn level_for(&self, content: &str) -> u32 {
        let first_line = match content.trim().lines().next() {
            Some(line) => line.trim(),
            None => return 0,
        };
        if first_line.is_empty() {
            return 0;
        }
        for entry in &self.heading {
            if let Some(captures) = entry.pattern.captures(first_line) {
                return match entry.rule {
                    LevelRule::Fixed(level) => level,
                    LevelRule::LabelSegments => captures
                        .get(1)
                        .map(|label| count_label_segments(label.as_str()))
                        .unwrap_or(0),
                };
            }
        }
        0
    }
}

/// Counts the non-empty dot-separated segments of a heading label, ignoring
/// a trailing dot ("A.1.2" has three, "A.1." has two).
fn count_label_segments(label: &str) -> u32 {
    label
        .trim()
        .trim_end_matches(['.', '．'])
        .split(['.', '．'])
        .filter(|segment| !segment.trim().is_empty())
        .count() as u32
}
