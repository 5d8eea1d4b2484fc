//! Report generation and formatting
//!
//! CLI output and JSON export for analysis results. Probabilities are
//! rounded to whole percents here and nowhere else.

use crate::models::DisplayModel;
use crate::services::HealthStatus;

/// Width of a 100% bar in characters
const BAR_WIDTH: usize = 40;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

/// CLI formatter for analysis results
pub struct CliFormatter;

impl CliFormatter {
    /// Format the full report
    pub fn format_report(model: &DisplayModel) -> String {
        let mut output = String::new();
        output.push_str(&Self::format_result_header(model));
        output.push_str(&Self::format_assessment(model));
        output.push_str(&Self::format_distribution(model));
        output
    }

    /// Format the result badge
    ///
    /// Example: `Analysis Result: [No DR]`
    pub fn format_result_header(model: &DisplayModel) -> String {
        let mut output = String::new();

        output.push_str(&format!("Analysis Result: [{}]\n", model.highest_label));
        output.push_str("Diabetic Retinopathy Classification\n");
        output.push_str(RULE);

        output
    }

    /// Format assessment, recommended action and disclaimer
    pub fn format_assessment(model: &DisplayModel) -> String {
        let mut output = String::new();

        output.push_str("Assessment:\n");
        output.push_str(&format!("  {}\n", model.assessment.description));
        output.push_str("Recommended Action:\n");
        output.push_str(&format!("  {}\n\n", model.assessment.action));
        output.push_str(&format!("Important Note: {}\n", model.disclaimer));
        output.push_str(RULE);

        output
    }

    /// Format the per-grade probability bars in server order
    ///
    /// Example: `  No DR   ################################   80%  <- highest`
    pub fn format_distribution(model: &DisplayModel) -> String {
        let mut output = String::new();

        output.push_str("Detailed Classification (probability %):\n");

        let label_width = model
            .entries
            .iter()
            .map(|e| e.label.chars().count())
            .max()
            .unwrap_or(0);

        for entry in &model.entries {
            let marker = if entry.is_highest { "  <- highest" } else { "" };
            output.push_str(&format!(
                "  {:<label_width$}  {:<bar_width$}  {:>4}{}\n",
                entry.label,
                bar(entry.probability),
                entry.percent_label(),
                marker,
                label_width = label_width,
                bar_width = BAR_WIDTH,
            ));
        }

        output
    }

    /// Format a health check result
    pub fn format_health(health: &HealthStatus) -> String {
        match health.message_text() {
            Some(message) => format!("status: {}\nmessage: {}\n", health.status, message),
            None => format!("status: {}\n", health.status),
        }
    }
}

/// Pretty JSON export of the display model
pub fn to_json(model: &DisplayModel) -> serde_json::Result<String> {
    serde_json::to_string_pretty(model)
}

fn bar(probability: f64) -> String {
    let fraction = (probability / 100.0).clamp(0.0, 1.0);
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}
