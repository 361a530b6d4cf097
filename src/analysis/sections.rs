//! Splitting a free-text model reply into labeled sections

use crate::error::{Result, ResumeAnalyzerError};
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The nine section markers the model is asked to produce.
///
/// Declaration order is the display order of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionLabel {
    #[serde(rename = "PERCENTAGE MATCH:")]
    PercentageMatch,
    #[serde(rename = "MISSING & WEAK KEYWORDS:")]
    MissingKeywords,
    #[serde(rename = "SKILLS ALIGNMENT:")]
    SkillsAlignment,
    #[serde(rename = "EXPERIENCE & ROLE SUITABILITY:")]
    ExperienceSuitability,
    #[serde(rename = "ATS-FRIENDLY FORMATTING:")]
    AtsFormatting,
    #[serde(rename = "EDUCATION & CERTIFICATIONS:")]
    Education,
    #[serde(rename = "ACTION WORDS & STRENGTH:")]
    ActionWords,
    #[serde(rename = "CAREER INSIGHTS:")]
    CareerInsights,
    #[serde(rename = "RESUME SUMMARY:")]
    ResumeSummary,
}

impl SectionLabel {
    pub const ALL: [SectionLabel; 9] = [
        SectionLabel::PercentageMatch,
        SectionLabel::MissingKeywords,
        SectionLabel::SkillsAlignment,
        SectionLabel::ExperienceSuitability,
        SectionLabel::AtsFormatting,
        SectionLabel::Education,
        SectionLabel::ActionWords,
        SectionLabel::CareerInsights,
        SectionLabel::ResumeSummary,
    ];

    /// Exact marker text expected in the reply, colon included
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionLabel::PercentageMatch => "PERCENTAGE MATCH:",
            SectionLabel::MissingKeywords => "MISSING & WEAK KEYWORDS:",
            SectionLabel::SkillsAlignment => "SKILLS ALIGNMENT:",
            SectionLabel::ExperienceSuitability => "EXPERIENCE & ROLE SUITABILITY:",
            SectionLabel::AtsFormatting => "ATS-FRIENDLY FORMATTING:",
            SectionLabel::Education => "EDUCATION & CERTIFICATIONS:",
            SectionLabel::ActionWords => "ACTION WORDS & STRENGTH:",
            SectionLabel::CareerInsights => "CAREER INSIGHTS:",
            SectionLabel::ResumeSummary => "RESUME SUMMARY:",
        }
    }

    /// Human-readable heading used by the report formatters
    pub fn title(&self) -> &'static str {
        match self {
            SectionLabel::PercentageMatch => "ATS Score",
            SectionLabel::MissingKeywords => "Missing & Weak Keywords",
            SectionLabel::SkillsAlignment => "Skills Alignment",
            SectionLabel::ExperienceSuitability => "Experience & Role Suitability",
            SectionLabel::AtsFormatting => "ATS-Friendly Formatting",
            SectionLabel::Education => "Education & Certifications",
            SectionLabel::ActionWords => "Action Words & Resume Strength",
            SectionLabel::CareerInsights => "Career Insights",
            SectionLabel::ResumeSummary => "Resume Summary",
        }
    }

    /// One-sentence instruction given to the model for this section
    pub fn description(&self) -> &'static str {
        match self {
            SectionLabel::PercentageMatch => "Provide a single percentage score (e.g., 75%) representing how well the resume matches the job description.",
            SectionLabel::MissingKeywords => "List specific industry keywords that are missing or underrepresented in the resume.",
            SectionLabel::SkillsAlignment => "Categorize and analyze alignment of Technical Skills, Soft Skills, and Tools & Technologies.",
            SectionLabel::ExperienceSuitability => "Evaluate job title relevance, experience level match, and impact metrics.",
            SectionLabel::AtsFormatting => "Assess structure, bullet points, readability, and formatting issues.",
            SectionLabel::Education => "Analyze qualification match and identify any certification gaps.",
            SectionLabel::ActionWords => "Identify weak phrases, passive voice, and suggest stronger alternatives.",
            SectionLabel::CareerInsights => "Suggest alternative job roles, salary benchmarks, and growth opportunities.",
            SectionLabel::ResumeSummary => "Provide 5-7 bullet points summarizing the key elements of the RESUME ONLY.",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == text)
    }
}

impl AsRef<str> for SectionLabel {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Markdown emphasis characters that may hug a label (`**LABEL:**`)
const EMPHASIS_MARKERS: &[char] = &['*', '_'];

/// Drop the `**` that closes a bold label. A marker run glued to a word
/// (`_internal_`) is content and stays.
fn strip_closing_marker(content: &str) -> &str {
    let rest = content.trim_start_matches(EMPHASIS_MARKERS);
    if rest.len() < content.len() && rest.chars().next().map_or(true, char::is_whitespace) {
        rest
    } else {
        content
    }
}

/// Drop the `**` that opens the next bold label, under the same rule
fn strip_opening_marker(content: &str) -> &str {
    let rest = content.trim_end_matches(EMPHASIS_MARKERS);
    if rest.len() < content.len() && rest.chars().next_back().map_or(true, char::is_whitespace) {
        rest
    } else {
        content
    }
}

/// Splits text into sections keyed by a fixed set of labels.
///
/// All label occurrences are located in one left-to-right, non-overlapping
/// scan. Each section's content runs from the end of its label to the start
/// of the next label occurrence (or the end of the text). Text before the
/// first label is ignored. When a label occurs more than once only its first
/// occurrence is kept. If two labels match at the same offset the longer one
/// wins, so the order labels are supplied in never affects the result.
#[derive(Debug, Clone)]
pub struct SectionParser<L> {
    labels: Vec<L>,
    matcher: AhoCorasick,
}

impl<L> SectionParser<L>
where
    L: AsRef<str> + Clone + Ord,
{
    pub fn new<I>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
    {
        let labels: Vec<L> = labels.into_iter().collect();

        if labels.is_empty() {
            return Err(ResumeAnalyzerError::InvalidInput(
                "section parser needs at least one label".to_string(),
            ));
        }

        for (i, label) in labels.iter().enumerate() {
            let text = label.as_ref();
            if text.is_empty() {
                return Err(ResumeAnalyzerError::InvalidInput(
                    "section labels must not be empty".to_string(),
                ));
            }
            if labels[..i].iter().any(|other| other.as_ref() == text) {
                return Err(ResumeAnalyzerError::InvalidInput(format!(
                    "duplicate section label: {:?}",
                    text
                )));
            }
        }

        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(labels.iter().map(|label| label.as_ref()))
            .map_err(|e| ResumeAnalyzerError::Processing(format!("label matcher: {}", e)))?;

        Ok(Self { labels, matcher })
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Map every label found in `raw` to its trimmed content
    pub fn parse(&self, raw: &str) -> BTreeMap<L, String> {
        let hits: Vec<_> = self.matcher.find_iter(raw).collect();
        let mut sections = BTreeMap::new();

        for (i, hit) in hits.iter().enumerate() {
            let label = &self.labels[hit.pattern().as_usize()];
            if sections.contains_key(label) {
                continue;
            }

            let next = hits.get(i + 1);
            let end = next.map_or(raw.len(), |m| m.start());

            let mut content = strip_closing_marker(&raw[hit.end()..end]);
            if next.is_some() {
                content = strip_opening_marker(content);
            }

            sections.insert(label.clone(), content.trim().to_string());
        }

        sections
    }
}

impl SectionParser<SectionLabel> {
    /// Parser over the nine canonical labels
    pub fn canonical() -> Result<Self> {
        Self::new(SectionLabel::ALL)
    }

    pub fn parse_reply(&self, raw: &str) -> ParsedSections {
        ParsedSections(self.parse(raw))
    }
}

/// Sections recovered from one reply, iterated in display order.
///
/// A label missing from the reply is absent here; a label followed by
/// nothing is present with empty content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedSections(BTreeMap<SectionLabel, String>);

impl ParsedSections {
    pub fn get(&self, label: SectionLabel) -> Option<&str> {
        self.0.get(&label).map(String::as_str)
    }

    pub fn contains(&self, label: SectionLabel) -> bool {
        self.0.contains_key(&label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionLabel, &str)> {
        self.0.iter().map(|(label, content)| (*label, content.as_str()))
    }
}

impl From<BTreeMap<SectionLabel, String>> for ParsedSections {
    fn from(map: BTreeMap<SectionLabel, String>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parser() -> SectionParser<SectionLabel> {
        SectionParser::canonical().unwrap()
    }

    #[test]
    fn test_reply_without_labels_is_empty() {
        let parsed = parser().parse_reply("The resume looks fine overall. Score: 80%");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_empty_reply_is_empty() {
        assert!(parser().parse_reply("").is_empty());
    }

    #[test]
    fn test_three_section_reply() {
        let raw = "PERCENTAGE MATCH: 82%\nMISSING & WEAK KEYWORDS: Python, SQL\nSKILLS ALIGNMENT: strong technical fit";
        let parsed = parser().parse_reply(raw);

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.get(SectionLabel::PercentageMatch), Some("82%"));
        assert_eq!(parsed.get(SectionLabel::MissingKeywords), Some("Python, SQL"));
        assert_eq!(parsed.get(SectionLabel::SkillsAlignment), Some("strong technical fit"));
        assert!(!parsed.contains(SectionLabel::CareerInsights));
    }

    #[test]
    fn test_out_of_order_sections() {
        let raw = "RESUME SUMMARY: - builds APIs\nPERCENTAGE MATCH: 64%\nCAREER INSIGHTS: platform roles";
        let parsed = parser().parse_reply(raw);

        assert_eq!(parsed.get(SectionLabel::ResumeSummary), Some("- builds APIs"));
        assert_eq!(parsed.get(SectionLabel::PercentageMatch), Some("64%"));
        assert_eq!(parsed.get(SectionLabel::CareerInsights), Some("platform roles"));
    }

    #[test]
    fn test_preamble_is_ignored_and_trailing_text_kept() {
        let raw = "Sure! Here is the analysis.\n\nCAREER INSIGHTS: Consider SRE roles.\n\nGood luck with your search!\n";
        let parsed = parser().parse_reply(raw);

        assert_eq!(parsed.len(), 1);
        assert_eq!(
            parsed.get(SectionLabel::CareerInsights),
            Some("Consider SRE roles.\n\nGood luck with your search!")
        );
    }

    #[test]
    fn test_repeated_label_keeps_first_occurrence() {
        let raw = "SKILLS ALIGNMENT: first take\nSKILLS ALIGNMENT: second take\nCAREER INSIGHTS: x";
        let parsed = parser().parse_reply(raw);

        // The first block stops at the repeat; the repeat itself is dropped.
        assert_eq!(parsed.get(SectionLabel::SkillsAlignment), Some("first take"));
        assert_eq!(parsed.get(SectionLabel::CareerInsights), Some("x"));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_label_with_no_content_is_present_but_empty() {
        let raw = "PERCENTAGE MATCH:\nMISSING & WEAK KEYWORDS: Kafka\nRESUME SUMMARY:";
        let parsed = parser().parse_reply(raw);

        assert_eq!(parsed.get(SectionLabel::PercentageMatch), Some(""));
        assert_eq!(parsed.get(SectionLabel::MissingKeywords), Some("Kafka"));
        assert_eq!(parsed.get(SectionLabel::ResumeSummary), Some(""));
    }

    #[test]
    fn test_matching_is_case_sensitive_and_needs_colon() {
        let raw = "percentage match: 90%\nSKILLS ALIGNMENT good\nCAREER INSIGHTS: ok";
        let parsed = parser().parse_reply(raw);

        assert_eq!(parsed.len(), 1);
        assert_eq!(
            parsed.get(SectionLabel::CareerInsights),
            Some("ok")
        );
    }

    #[test]
    fn test_bold_labels_are_unwrapped() {
        let raw = "**PERCENTAGE MATCH:** 78%\n\n**SKILLS ALIGNMENT:**\n- Rust: strong\n";
        let parsed = parser().parse_reply(raw);

        assert_eq!(parsed.get(SectionLabel::PercentageMatch), Some("78%"));
        assert_eq!(parsed.get(SectionLabel::SkillsAlignment), Some("- Rust: strong"));
    }

    #[test]
    fn test_emphasis_inside_content_is_kept() {
        let raw = "SKILLS ALIGNMENT: uses **Rust** daily\nCAREER INSIGHTS: *maybe* SRE";
        let parsed = parser().parse_reply(raw);

        assert_eq!(parsed.get(SectionLabel::SkillsAlignment), Some("uses **Rust** daily"));
        assert_eq!(parsed.get(SectionLabel::CareerInsights), Some("*maybe* SRE"));
    }

    #[test]
    fn test_markers_glued_to_content_are_kept() {
        let raw = "CAREER INSIGHTS:_internal_ tooling\nRESUME SUMMARY: see *notes*";
        let parsed = parser().parse_reply(raw);

        assert_eq!(parsed.get(SectionLabel::CareerInsights), Some("_internal_ tooling"));
        assert_eq!(parsed.get(SectionLabel::ResumeSummary), Some("see *notes*"));
    }

    #[test]
    fn test_bold_label_with_nothing_between() {
        let raw = "**EDUCATION & CERTIFICATIONS:****CAREER INSIGHTS:** none";
        let parsed = parser().parse_reply(raw);

        assert_eq!(parsed.get(SectionLabel::Education), Some(""));
        assert_eq!(parsed.get(SectionLabel::CareerInsights), Some("none"));
    }

    #[test]
    fn test_longest_label_wins_at_same_offset() {
        let raw = "SKILLS ALIGNMENT: good";
        let forward = SectionParser::new(["SKILLS", "SKILLS ALIGNMENT:"]).unwrap();
        let backward = SectionParser::new(["SKILLS ALIGNMENT:", "SKILLS"]).unwrap();

        let expected: BTreeMap<&str, String> =
            [("SKILLS ALIGNMENT:", "good".to_string())].into_iter().collect();
        assert_eq!(forward.parse(raw), expected);
        assert_eq!(backward.parse(raw), expected);
    }

    #[test]
    fn test_invalid_label_sets_are_rejected() {
        assert!(SectionParser::<&str>::new([]).is_err());
        assert!(SectionParser::new(["A:", ""]).is_err());
        assert!(SectionParser::new(["A:", "B:", "A:"]).is_err());
    }

    #[test]
    fn test_label_table_roundtrip() {
        for label in SectionLabel::ALL {
            assert_eq!(SectionLabel::from_label(label.as_str()), Some(label));
            assert!(label.as_str().ends_with(':'));
            assert!(!label.description().is_empty());
        }
        assert_eq!(SectionLabel::from_label("SUMMARY:"), None);
    }

    #[test]
    fn test_parsed_sections_serialize_by_label_text() {
        let parsed = parser().parse_reply("CAREER INSIGHTS: SRE\nPERCENTAGE MATCH: 70%");
        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(json, r#"{"PERCENTAGE MATCH:":"70%","CAREER INSIGHTS:":"SRE"}"#);
    }

    fn content() -> impl Strategy<Value = String> {
        "[a-z0-9 ,.%\n-]{0,40}"
    }

    fn reply() -> impl Strategy<Value = String> {
        prop::collection::vec((prop::option::of(0..SectionLabel::ALL.len()), content()), 0..12)
            .prop_map(|pieces| {
                pieces
                    .into_iter()
                    .map(|(label, text)| match label {
                        Some(i) => format!("{}{}", SectionLabel::ALL[i].as_str(), text),
                        None => text,
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn prop_text_without_labels_parses_to_nothing(raw in content()) {
            prop_assert!(parser().parse_reply(&raw).is_empty());
        }

        #[test]
        fn prop_two_sections_split_cleanly(
            a in 0..SectionLabel::ALL.len(),
            b in 0..SectionLabel::ALL.len(),
            c1 in content(),
            c2 in content(),
        ) {
            prop_assume!(a != b);
            let (l1, l2) = (SectionLabel::ALL[a], SectionLabel::ALL[b]);
            let raw = format!("{}  {}{}{}", l1.as_str(), c1, l2.as_str(), c2);

            let parsed = parser().parse_reply(&raw);
            prop_assert_eq!(parsed.len(), 2);
            prop_assert_eq!(parsed.get(l1), Some(c1.trim()));
            prop_assert_eq!(parsed.get(l2), Some(c2.trim()));
        }

        #[test]
        fn prop_parsing_is_idempotent(raw in reply()) {
            let parser = parser();
            prop_assert_eq!(parser.parse_reply(&raw), parser.parse_reply(&raw));
        }

        #[test]
        fn prop_label_order_does_not_matter(
            raw in reply(),
            shuffled in Just(SectionLabel::ALL.to_vec()).prop_shuffle(),
        ) {
            let canonical = parser().parse(&raw);
            let permuted = SectionParser::new(shuffled).unwrap().parse(&raw);
            prop_assert_eq!(canonical, permuted);
        }

        #[test]
        fn prop_every_key_is_a_known_label(raw in reply()) {
            for (label, _) in parser().parse_reply(&raw).iter() {
                prop_assert!(SectionLabel::ALL.contains(&label));
            }
        }
    }
}
