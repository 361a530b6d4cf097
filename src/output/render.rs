//! Turns parsed sections into format-neutral display blocks
//!
//! Formatting rules applied to every non-empty section, in display order:
//! dash-bullet lines become list items (consecutive items share one list),
//! remaining lines become paragraphs, and a fixed set of evaluative words is
//! emphasized. The match-score section is shown verbatim with a color tier.

use crate::analysis::sections::{ParsedSections, SectionLabel};
use crate::error::{Result, ResumeAnalyzerError};
use regex::Regex;
use serde::Serialize;

/// Evaluative words highlighted wherever they appear as whole words
pub const EMPHASIS_KEYWORDS: [&str; 7] =
    ["missing", "weak", "strong", "excellent", "poor", "good", "improve"];

/// Presentation tier of the match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn from_score(score: i64) -> Self {
        if score >= 80 {
            ScoreTier::High
        } else if score >= 60 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTier::High => "high",
            ScoreTier::Medium => "medium",
            ScoreTier::Low => "low",
        }
    }
}

/// Integer value of a score like `82%`; `None` if it isn't one
pub fn score_value(text: &str) -> Option<i64> {
    text.trim().trim_matches('%').trim().parse().ok()
}

/// Tier for a score like `82%`; `None` means display it unstyled
pub fn parse_score(text: &str) -> Option<ScoreTier> {
    score_value(text).map(ScoreTier::from_score)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Span {
    Plain(String),
    Emphasis(String),
}

impl Span {
    pub fn text(&self) -> &str {
        match self {
            Span::Plain(text) | Span::Emphasis(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// One or more consecutive text lines, joined with `\n`
    Paragraph { spans: Vec<Span> },
    List { items: Vec<Vec<Span>> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SectionBody {
    Score { text: String, tier: Option<ScoreTier> },
    Blocks { blocks: Vec<Block> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    pub label: SectionLabel,
    pub title: String,
    pub body: SectionBody,
}

pub struct SectionRenderer {
    keywords: Regex,
}

impl SectionRenderer {
    pub fn new() -> Result<Self> {
        let pattern = format!(r"(?i)\b(?:{})\b", EMPHASIS_KEYWORDS.join("|"));
        let keywords = Regex::new(&pattern)
            .map_err(|e| ResumeAnalyzerError::Processing(format!("keyword pattern: {}", e)))?;
        Ok(Self { keywords })
    }

    /// Render every section with content, in display order
    pub fn render(&self, sections: &ParsedSections) -> Vec<RenderedSection> {
        SectionLabel::ALL
            .into_iter()
            .filter_map(|label| {
                sections
                    .get(label)
                    .and_then(|content| self.render_section(label, content))
            })
            .collect()
    }

    /// `None` when the content is blank
    pub fn render_section(&self, label: SectionLabel, content: &str) -> Option<RenderedSection> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let body = match label {
            SectionLabel::PercentageMatch => SectionBody::Score {
                text: content.to_string(),
                tier: parse_score(content),
            },
            _ => SectionBody::Blocks {
                blocks: self.format_blocks(content),
            },
        };

        Some(RenderedSection {
            label,
            title: label.title().to_string(),
            body,
        })
    }

    /// Group lines into paragraphs and lists.
    ///
    /// Blank lines end a paragraph but not a list; a list ends at the next
    /// non-bullet text line.
    pub fn format_blocks(&self, content: &str) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut paragraph: Vec<&str> = Vec::new();
        let mut items: Vec<&str> = Vec::new();

        for line in content.lines() {
            if let Some(item) = bullet_item(line) {
                self.flush_paragraph(&mut paragraph, &mut blocks);
                items.push(item);
            } else if line.trim().is_empty() {
                self.flush_paragraph(&mut paragraph, &mut blocks);
            } else {
                self.flush_list(&mut items, &mut blocks);
                paragraph.push(line.trim());
            }
        }
        self.flush_paragraph(&mut paragraph, &mut blocks);
        self.flush_list(&mut items, &mut blocks);

        blocks
    }

    /// Split text into plain and emphasized spans
    pub fn emphasize(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut last = 0;

        for m in self.keywords.find_iter(text) {
            if m.start() > last {
                spans.push(Span::Plain(text[last..m.start()].to_string()));
            }
            spans.push(Span::Emphasis(m.as_str().to_string()));
            last = m.end();
        }
        if last < text.len() {
            spans.push(Span::Plain(text[last..].to_string()));
        }

        spans
    }

    fn flush_paragraph(&self, lines: &mut Vec<&str>, blocks: &mut Vec<Block>) {
        if !lines.is_empty() {
            blocks.push(Block::Paragraph {
                spans: self.emphasize(&lines.join("\n")),
            });
            lines.clear();
        }
    }

    fn flush_list(&self, items: &mut Vec<&str>, blocks: &mut Vec<Block>) {
        if !items.is_empty() {
            blocks.push(Block::List {
                items: items.iter().map(|item| self.emphasize(item)).collect(),
            });
            items.clear();
        }
    }
}

/// Text of a `- item` line, if the line is one
fn bullet_item(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('-')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let item = rest.trim();
    (!item.is_empty()).then_some(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sections::SectionParser;

    fn renderer() -> SectionRenderer {
        SectionRenderer::new().unwrap()
    }

    fn plain(text: &str) -> Span {
        Span::Plain(text.to_string())
    }

    fn emph(text: &str) -> Span {
        Span::Emphasis(text.to_string())
    }

    #[test]
    fn test_score_tiers() {
        assert_eq!(parse_score("95%"), Some(ScoreTier::High));
        assert_eq!(parse_score("80%"), Some(ScoreTier::High));
        assert_eq!(parse_score("79%"), Some(ScoreTier::Medium));
        assert_eq!(parse_score("70%"), Some(ScoreTier::Medium));
        assert_eq!(parse_score("60%"), Some(ScoreTier::Medium));
        assert_eq!(parse_score("42%"), Some(ScoreTier::Low));
        assert_eq!(parse_score(" 88 % "), Some(ScoreTier::High));
        assert_eq!(parse_score("n/a"), None);
        assert_eq!(parse_score("82.5%"), None);
        assert_eq!(parse_score("About 75%"), None);
    }

    #[test]
    fn test_unparseable_score_renders_unstyled() {
        let section = renderer()
            .render_section(SectionLabel::PercentageMatch, "n/a")
            .unwrap();
        assert_eq!(
            section.body,
            SectionBody::Score { text: "n/a".to_string(), tier: None }
        );
    }

    #[test]
    fn test_keywords_are_emphasized_case_insensitively() {
        let spans = renderer().emphasize("Strong Rust, weak SQL; goodness aside, IMPROVE docs");
        assert_eq!(
            spans,
            vec![
                emph("Strong"),
                plain(" Rust, "),
                emph("weak"),
                plain(" SQL; goodness aside, "),
                emph("IMPROVE"),
                plain(" docs"),
            ]
        );
    }

    #[test]
    fn test_bullets_become_one_list() {
        let blocks = renderer().format_blocks("Technical skills:\n- Rust\n  - Go\n\n- Python\nOverall a good fit");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph { spans: vec![plain("Technical skills:")] },
                Block::List {
                    items: vec![vec![plain("Rust")], vec![plain("Go")], vec![plain("Python")]]
                },
                Block::Paragraph { spans: vec![plain("Overall a "), emph("good"), plain(" fit")] },
            ]
        );
    }

    #[test]
    fn test_dash_without_space_is_not_a_bullet() {
        let blocks = renderer().format_blocks("-5% churn\n--verbose");
        assert_eq!(
            blocks,
            vec![Block::Paragraph { spans: vec![plain("-5% churn\n--verbose")] }]
        );
    }

    #[test]
    fn test_blank_lines_split_paragraphs() {
        let blocks = renderer().format_blocks("first\nstill first\n\nsecond");
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_absent_and_blank_sections_are_skipped() {
        let parser = SectionParser::canonical().unwrap();
        let parsed = parser.parse_reply("PERCENTAGE MATCH:   \nCAREER INSIGHTS: \n\nRESUME SUMMARY: - Led a team");

        let rendered = renderer().render(&parsed);
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].label, SectionLabel::ResumeSummary);
        assert_eq!(rendered[0].title, "Resume Summary");
    }

    #[test]
    fn test_three_section_reply_renders_three_blocks() {
        let parser = SectionParser::canonical().unwrap();
        let parsed = parser.parse_reply(
            "PERCENTAGE MATCH: 82%\nMISSING & WEAK KEYWORDS: Python, SQL\nSKILLS ALIGNMENT: strong technical fit",
        );

        let rendered = renderer().render(&parsed);
        let labels: Vec<_> = rendered.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec![
                SectionLabel::PercentageMatch,
                SectionLabel::MissingKeywords,
                SectionLabel::SkillsAlignment
            ]
        );

        assert_eq!(
            rendered[0].body,
            SectionBody::Score { text: "82%".to_string(), tier: Some(ScoreTier::High) }
        );
        assert_eq!(
            rendered[2].body,
            SectionBody::Blocks {
                blocks: vec![Block::Paragraph {
                    spans: vec![emph("strong"), plain(" technical fit")]
                }]
            }
        );
    }

    #[test]
    fn test_sections_render_in_display_order() {
        let parser = SectionParser::canonical().unwrap();
        let parsed = parser.parse_reply("RESUME SUMMARY: a\nPERCENTAGE MATCH: 50%\nCAREER INSIGHTS: b");

        let labels: Vec<_> = renderer().render(&parsed).iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec![
                SectionLabel::PercentageMatch,
                SectionLabel::CareerInsights,
                SectionLabel::ResumeSummary
            ]
        );
    }
}
