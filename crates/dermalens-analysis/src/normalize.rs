//! Reply normalization.
//!
//! The upstream model is asked for a structured JSON reply but does not
//! contractually produce one. Normalization is therefore a chain of
//! strategies, tried in order, each returning `Option`:
//!
//! 1. [`parse_embedded_json`] - a JSON object embedded anywhere in the text
//! 2. [`scan_labeled_lines`] - "Severity:" / "Assessment:" style labels
//! 3. a total fallback wrapping the raw text
//!
//! The chain never fails: `normalize` always returns at least one report
//! with all four fields populated.

use serde::Deserialize;

use crate::report::{AnalysisReport, Severity};

/// Condition label used when an embedded JSON reply omits it.
const JSON_DEFAULT_CONDITION: &str = "Skin condition identified";

/// Condition label for replies that never name one.
const PROSE_CONDITION: &str = "Dermatological Assessment";

/// Normalizes a raw model reply into structured reports.
///
/// Deterministic and total; the output is always non-empty.
#[must_use]
pub fn normalize(raw: &str) -> Vec<AnalysisReport> {
    parse_embedded_json(raw)
        .or_else(|| scan_labeled_lines(raw))
        .unwrap_or_else(|| vec![prose_fallback(raw)])
}

/// Reply fields as the model was asked to produce them. All optional:
/// missing keys are filled from defaults.
#[derive(Deserialize)]
struct ReplyFields {
    condition: Option<String>,
    severity: Option<String>,
    description: Option<String>,
    recommendations: Option<Vec<String>>,
}

/// Strategy 1: locate a JSON object inside the reply and parse it.
///
/// The candidate substring runs from the first `{` to the last `}`, which
/// tolerates prose or markdown fences around the object. Severity arrives
/// as free text and is mapped onto the enum; a missing key defaults to
/// `Moderate` per the requested reply shape.
fn parse_embedded_json(raw: &str) -> Option<Vec<AnalysisReport>> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }

    let fields: ReplyFields = serde_json::from_str(&raw[start..=end]).ok()?;

    Some(vec![AnalysisReport {
        condition: fields
            .condition
            .unwrap_or_else(|| JSON_DEFAULT_CONDITION.to_string()),
        severity: fields
            .severity
            .as_deref()
            .map_or(Severity::Moderate, Severity::from_text),
        description: fields.description.unwrap_or_else(|| raw.to_string()),
        recommendations: fields
            .recommendations
            .unwrap_or_else(default_recommendations),
    }])
}

/// A partially-accumulated report during the line scan.
#[derive(Default)]
struct Candidate {
    description: Option<String>,
    severity: Option<String>,
    recommendations: Vec<String>,
    touched: bool,
}

impl Candidate {
    fn into_report(self) -> AnalysisReport {
        AnalysisReport {
            condition: PROSE_CONDITION.to_string(),
            severity: self
                .severity
                .as_deref()
                .map_or(Severity::Unknown, Severity::from_text),
            description: self.description.unwrap_or_default(),
            recommendations: self.recommendations,
        }
    }
}

/// Strategy 2: scan for labeled lines.
///
/// Case-insensitive markers: a line starting with "assessment" or
/// "analysis" is a section header that flushes the accumulated report and
/// starts a new one (its after-colon text seeds the description). Other
/// lines containing "severity", "description"/"assessment", or
/// "recommendation"/"treatment" set the corresponding field, taking the
/// text after the first colon or the whole line when there is none.
/// Marker lines seen before any header accumulate into an implicit report.
fn scan_labeled_lines(raw: &str) -> Option<Vec<AnalysisReport>> {
    let mut reports = Vec::new();
    let mut current = Candidate::default();

    for line in raw.lines() {
        let line = line.trim();
        let lower = line.to_lowercase();

        if lower.starts_with("assessment") || lower.starts_with("analysis") {
            if current.touched {
                reports.push(current.into_report());
            }
            current = Candidate {
                touched: true,
                ..Candidate::default()
            };
            if let Some(seed) = after_colon(line).filter(|s| !s.is_empty()) {
                current.description = Some(seed.to_string());
            }
        } else if lower.contains("severity") {
            current.severity = Some(label_value(line).to_string());
            current.touched = true;
        } else if lower.contains("description") || lower.contains("assessment") {
            current.description = Some(label_value(line).to_string());
            current.touched = true;
        } else if lower.contains("recommendation") || lower.contains("treatment") {
            current.recommendations.push(label_value(line).to_string());
            current.touched = true;
        }
    }

    if current.touched {
        reports.push(current.into_report());
    }

    if reports.is_empty() {
        None
    } else {
        Some(reports)
    }
}

/// Strategy 3: wrap the entire reply as one report.
fn prose_fallback(raw: &str) -> AnalysisReport {
    AnalysisReport {
        condition: PROSE_CONDITION.to_string(),
        severity: Severity::Unknown,
        description: raw.trim().to_string(),
        recommendations: Vec::new(),
    }
}

/// Text after the first colon, trimmed.
fn after_colon(line: &str) -> Option<&str> {
    line.split_once(':').map(|(_, rest)| rest.trim())
}

/// The value carried by a labeled line: after-colon text, or the whole
/// line when there is no colon.
fn label_value(line: &str) -> &str {
    after_colon(line).unwrap_or(line.trim())
}

/// Generic recommendations used when an embedded JSON reply omits them.
fn default_recommendations() -> Vec<String> {
    vec![
        "Consult with a dermatologist for proper diagnosis".to_string(),
        "Keep the affected area clean and dry".to_string(),
        "Avoid irritating products".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_json_reproduced_exactly() {
        let raw = r#"{"condition":"Eczema","severity":"Mild","description":"Dry patches","recommendations":["Use moisturizer"]}"#;

        let reports = normalize(raw);
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.condition, "Eczema");
        assert_eq!(report.severity, Severity::Mild);
        assert_eq!(report.description, "Dry patches");
        assert_eq!(report.recommendations, vec!["Use moisturizer"]);
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let raw = "Here is my assessment:\n```json\n{\"condition\": \"Acne\", \"severity\": \"Severe\", \"description\": \"Inflamed pustules\", \"recommendations\": [\"See a doctor\"]}\n```\nHope this helps.";

        let reports = normalize(raw);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].condition, "Acne");
        assert_eq!(reports[0].severity, Severity::Severe);
    }

    #[test]
    fn test_json_missing_keys_filled_from_defaults() {
        let raw = r#"{"description": "Some redness"}"#;

        let report = &normalize(raw)[0];
        assert_eq!(report.condition, JSON_DEFAULT_CONDITION);
        assert_eq!(report.severity, Severity::Moderate);
        assert_eq!(report.description, "Some redness");
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn test_empty_json_object_gets_full_raw_as_description() {
        let raw = "prefix {} suffix";

        let report = &normalize(raw)[0];
        assert_eq!(report.description, raw);
        assert_eq!(report.severity, Severity::Moderate);
    }

    #[test]
    fn test_labeled_lines_scanned_when_json_malformed() {
        let raw = "Assessment: redness visible\nSeverity: Moderate\nRecommendation: apply cream";

        let reports = normalize(raw);
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert!(report.description.contains("redness visible"));
        assert_eq!(report.severity, Severity::Moderate);
        assert!(report.recommendations.contains(&"apply cream".to_string()));
    }

    #[test]
    fn test_multiple_assessment_sections_yield_multiple_reports() {
        let raw = "Assessment: dry patches on forearm\nSeverity: mild\nTreatment: moisturize twice daily\nAnalysis: darker spots near elbow\nSeverity: moderate\nRecommendation: sunscreen";

        let reports = normalize(raw);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].severity, Severity::Mild);
        assert!(reports[0].description.contains("dry patches"));
        assert_eq!(reports[1].severity, Severity::Moderate);
        assert!(
            reports[1]
                .recommendations
                .contains(&"sunscreen".to_string())
        );
    }

    #[test]
    fn test_labels_before_any_header_accumulate() {
        let raw = "Severity: severe\nRecommendation: seek urgent care";

        let reports = normalize(raw);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::Severe);
        assert_eq!(reports[0].recommendations, vec!["seek urgent care"]);
    }

    #[test]
    fn test_label_without_colon_takes_whole_line() {
        let raw = "the severity appears moderate overall";

        let reports = normalize(raw);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::Moderate);
    }

    #[test]
    fn test_unrelated_prose_falls_through_to_total_fallback() {
        let raw = "just some unrelated prose";

        let reports = normalize(raw);
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.severity, Severity::Unknown);
        assert_eq!(report.description, raw);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_fallback_trims_surrounding_whitespace() {
        let reports = normalize("  \n whatever the model said \n ");
        assert_eq!(reports[0].description, "whatever the model said");
    }

    #[test]
    fn test_empty_input_still_yields_populated_report() {
        let reports = normalize("");
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.condition, PROSE_CONDITION);
        assert_eq!(report.severity, Severity::Unknown);
        assert_eq!(report.description, "");
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_malformed_json_with_labels_prefers_labels() {
        let raw = "{ not valid json\nSeverity: mild";

        let reports = normalize(raw);
        assert_eq!(reports[0].severity, Severity::Mild);
    }

    #[test]
    fn test_malformed_json_without_labels_uses_fallback() {
        let raw = "{ definitely not json at all";

        let reports = normalize(raw);
        assert_eq!(reports[0].severity, Severity::Unknown);
        assert_eq!(reports[0].description, raw.trim());
    }

    #[test]
    fn test_normalize_is_total_over_arbitrary_inputs() {
        let inputs = [
            "",
            "   ",
            "{}",
            "}{",
            "{\"severity\": 42}",
            "null",
            "ASSESSMENT",
            "\u{1F52C} emoji reply",
        ];

        for input in inputs {
            let reports = normalize(input);
            assert!(!reports.is_empty(), "input {input:?} produced no reports");
            for report in &reports {
                assert!(!report.condition.is_empty());
            }
        }
    }
}
