//! Structured analysis result types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of an identified skin condition.
///
/// `Unknown` is the parse fallback: the upstream model writes severity as
/// free text, and anything that doesn't mention one of the three levels
/// lands here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Mild condition.
    Mild,
    /// Moderate condition.
    Moderate,
    /// Severe condition.
    Severe,
    /// Severity could not be determined from the reply.
    Unknown,
}

impl Severity {
    /// Parses severity from free text, case-insensitively.
    ///
    /// Matches on substring so phrases like "mild to moderate acne" or a
    /// whole unlabeled line still resolve. First level mentioned wins.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("mild") {
            Self::Mild
        } else if lower.contains("moderate") {
            Self::Moderate
        } else if lower.contains("severe") {
            Self::Severe
        } else {
            Self::Unknown
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The normalized four-field output of reply parsing.
///
/// Every report has all four fields populated, even when the upstream
/// reply was unparseable prose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    /// Main condition identified.
    pub condition: String,

    /// Severity of the condition.
    pub severity: Severity,

    /// Free-text description of the condition.
    pub description: String,

    /// Ordered treatment recommendations.
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_text_levels() {
        assert_eq!(Severity::from_text("Mild"), Severity::Mild);
        assert_eq!(Severity::from_text("moderate"), Severity::Moderate);
        assert_eq!(Severity::from_text("SEVERE"), Severity::Severe);
    }

    #[test]
    fn test_severity_from_phrases() {
        assert_eq!(Severity::from_text("mild to moderate acne"), Severity::Mild);
        assert_eq!(
            Severity::from_text("Severity: appears moderate"),
            Severity::Moderate
        );
        assert_eq!(Severity::from_text("very severe flare"), Severity::Severe);
    }

    #[test]
    fn test_severity_unrecognized_is_unknown() {
        assert_eq!(Severity::from_text("6/10"), Severity::Unknown);
        assert_eq!(Severity::from_text(""), Severity::Unknown);
    }

    #[test]
    fn test_severity_serializes_as_display_name() {
        assert_eq!(serde_json::to_string(&Severity::Mild).unwrap(), "\"Mild\"");
        assert_eq!(
            serde_json::to_string(&Severity::Unknown).unwrap(),
            "\"Unknown\""
        );
    }

    #[test]
    fn test_report_serialization_shape() {
        let report = AnalysisReport {
            condition: "Eczema".to_string(),
            severity: Severity::Mild,
            description: "Dry patches".to_string(),
            recommendations: vec!["Use moisturizer".to_string()],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["condition"], "Eczema");
        assert_eq!(json["severity"], "Mild");
        assert_eq!(json["description"], "Dry patches");
        assert_eq!(json["recommendations"][0], "Use moisturizer");
    }
}
