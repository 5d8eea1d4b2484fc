//! Severity grades and their display tables
//!
//! Closed label set, in increasing clinical severity:
//! "No DR" → "Mild" → "Moderate" → "Severe" → "Proliferative DR"

use serde::Serialize;

/// Color for labels outside the closed set
pub const NEUTRAL_COLOR: &str = "#6b7280";

/// Assessment and recommended action for a grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityInfo {
    pub description: &'static str,
    pub action: &'static str,
}

/// Used when the highest label is not a known grade
pub const UNKNOWN_SEVERITY_INFO: SeverityInfo = SeverityInfo {
    description: "Classification information not available.",
    action: "Please consult with a healthcare professional.",
};

/// Diabetic retinopathy severity grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SeverityGrade {
    #[serde(rename = "No DR")]
    NoDr,
    Mild,
    Moderate,
    Severe,
    #[serde(rename = "Proliferative DR")]
    ProliferativeDr,
}

impl SeverityGrade {
    /// All grades in increasing severity order
    pub const ALL: [SeverityGrade; 5] = [
        SeverityGrade::NoDr,
        SeverityGrade::Mild,
        SeverityGrade::Moderate,
        SeverityGrade::Severe,
        SeverityGrade::ProliferativeDr,
    ];

    /// Parse a wire label; exact match only
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.label() == label)
    }

    /// Label as sent by the inference service
    pub fn label(&self) -> &'static str {
        match self {
            SeverityGrade::NoDr => "No DR",
            SeverityGrade::Mild => "Mild",
            SeverityGrade::Moderate => "Moderate",
            SeverityGrade::Severe => "Severe",
            SeverityGrade::ProliferativeDr => "Proliferative DR",
        }
    }

    /// Chart/badge color (green → dark red)
    pub fn color(&self) -> &'static str {
        match self {
            SeverityGrade::NoDr => "#22c55e",
            SeverityGrade::Mild => "#eab308",
            SeverityGrade::Moderate => "#f97316",
            SeverityGrade::Severe => "#ef4444",
            SeverityGrade::ProliferativeDr => "#7f1d1d",
        }
    }

    /// Foreground color readable on top of [`Self::color`]
    pub fn badge_text_color(&self) -> &'static str {
        match self {
            SeverityGrade::NoDr | SeverityGrade::Mild => "#000",
            _ => "#fff",
        }
    }

    pub fn info(&self) -> SeverityInfo {
        match self {
            SeverityGrade::NoDr => SeverityInfo {
                description: "No signs of diabetic retinopathy detected.",
                action: "Continue with regular eye exams as recommended by your doctor.",
            },
            SeverityGrade::Mild => SeverityInfo {
                description: "Early stage diabetic retinopathy with small changes in the retina.",
                action: "Follow up with your eye doctor within 6-12 months.",
            },
            SeverityGrade::Moderate => SeverityInfo {
                description: "More significant changes in the retina that may affect vision.",
                action: "Consult with your eye doctor within 3-6 months.",
            },
            SeverityGrade::Severe => SeverityInfo {
                description: "Substantial changes in the retina with risk of vision loss.",
                action: "Seek medical attention within 1 month.",
            },
            SeverityGrade::ProliferativeDr => SeverityInfo {
                description: "Advanced stage with abnormal blood vessel growth. High risk of vision loss.",
                action: "Seek immediate medical attention.",
            },
        }
    }
}

impl std::fmt::Display for SeverityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Color for any label, neutral for unknown ones
pub fn color_for_label(label: &str) -> &'static str {
    SeverityGrade::from_label(label)
        .map(|g| g.color())
        .unwrap_or(NEUTRAL_COLOR)
}

/// Severity info for any label, generic advice for unknown ones
pub fn info_for_label(label: &str) -> SeverityInfo {
    SeverityGrade::from_label(label)
        .map(|g| g.info())
        .unwrap_or(UNKNOWN_SEVERITY_INFO)
}
