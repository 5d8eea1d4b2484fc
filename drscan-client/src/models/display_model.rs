//! Display model derived from a classification response
//!
//! Built fresh for each successful analysis and never mutated afterwards.
//! Probabilities keep their full precision; rounding happens only in
//! [`DisplayEntry::percent_label`] and the report renderer.

use serde::Serialize;

use super::classification::ClassificationResponse;
use super::severity::{self, SeverityGrade, SeverityInfo, NEUTRAL_COLOR};

/// Shown with every result
pub const DISCLAIMER: &str = "This is an AI-assisted analysis and should not replace professional medical advice. \
Please consult with a healthcare professional for proper diagnosis.";

/// One bar of the probability chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayEntry {
    pub label: String,
    /// Unrounded probability (0-100)
    pub probability: f64,
    pub is_highest: bool,
    pub color: &'static str,
}

impl DisplayEntry {
    /// Probability rounded to the nearest integer percent, e.g. "80%"
    pub fn percent_label(&self) -> String {
        format!("{}%", self.probability.round() as i64)
    }
}

/// Display-ready analysis result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    /// Entries in server order
    pub entries: Vec<DisplayEntry>,
    /// Label reported by the server as most probable
    pub highest_label: String,
    /// Badge color for `highest_label`
    pub highest_color: &'static str,
    /// Badge foreground color
    pub badge_text_color: &'static str,
    pub assessment: SeverityInfo,
    pub disclaimer: &'static str,
}

impl DisplayModel {
    /// Derive the display model from a response
    ///
    /// The server's `highest_probability_class` is trusted as-is. When it does
    /// not name any entry, no entry is marked highest.
    pub fn derive(response: &ClassificationResponse) -> Self {
        let highest = response.highest_probability_class.as_str();

        let entries: Vec<DisplayEntry> = response
            .detailed_classification
            .iter()
            .map(|grade| DisplayEntry {
                label: grade.label.clone(),
                probability: grade.probability,
                is_highest: grade.label == highest,
                color: severity::color_for_label(&grade.label),
            })
            .collect();

        if !entries.iter().any(|e| e.is_highest) {
            tracing::warn!(
                highest_label = %highest,
                "Highest probability class not present in detailed classification"
            );
        }

        let grade = SeverityGrade::from_label(highest);

        Self {
            entries,
            highest_label: highest.to_string(),
            highest_color: grade.map(|g| g.color()).unwrap_or(NEUTRAL_COLOR),
            badge_text_color: grade.map(|g| g.badge_text_color()).unwrap_or("#fff"),
            assessment: severity::info_for_label(highest),
            disclaimer: DISCLAIMER,
        }
    }

    /// Entry marked highest, if any
    pub fn highest_entry(&self) -> Option<&DisplayEntry> {
        self.entries.iter().find(|e| e.is_highest)
    }

    /// Known grade for the highest label
    pub fn highest_grade(&self) -> Option<SeverityGrade> {
        SeverityGrade::from_label(&self.highest_label)
    }
}
