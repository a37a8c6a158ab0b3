//! Conversion report types

use super::options::TabPolicy;
use serde::{Deserialize, Serialize};

/// Type of warning during conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Tab characters found in leading whitespace
    TabIndentation,
    /// Indentation deeper than the six heading levels Markdown allows
    HeadingClamped,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::TabIndentation => write!(f, "tab_indentation"),
            WarningKind::HeadingClamped => write!(f, "heading_clamped"),
        }
    }
}

/// A warning generated during conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertWarning {
    /// Line number (1-indexed)
    pub line: usize,
    /// Type of warning
    pub kind: WarningKind,
    /// Human-readable message
    pub message: String,
}

impl std::fmt::Display for ConvertWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// Statistics about the conversion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStatistics {
    /// Total lines in input
    pub total_lines: usize,
    /// Lines emitted as Markdown headings
    pub heading_lines: usize,
    /// Blocks elided because of a `collapsed:: true` property
    pub collapsed_blocks: usize,
    /// Non-block lines passed through left-trimmed
    pub passthrough_lines: usize,
    /// Blank input lines
    pub blank_lines: usize,
    /// Property annotations removed from block content
    pub properties_stripped: usize,
}

/// Complete conversion report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Input file path (or "stdin")
    pub input_file: String,
    /// Output file path (or "stdout")
    pub output_file: String,
    /// Tab handling policy used
    pub tab_policy: TabPolicy,
    /// Timestamp of conversion
    pub timestamp: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Conversion statistics
    pub statistics: ConversionStatistics,
    /// All warnings generated
    pub warnings: Vec<ConvertWarning>,
}

impl ConversionReport {
    /// Create a new empty report
    pub fn new(input: &str, output: &str, tab_policy: TabPolicy) -> Self {
        Self {
            input_file: input.to_string(),
            output_file: output.to_string(),
            tab_policy,
            timestamp: chrono::Utc::now().to_rfc3339(),
            duration_ms: 0,
            statistics: ConversionStatistics::default(),
            warnings: Vec::new(),
        }
    }

    /// Add a warning to the report
    pub fn add_warning(&mut self, warning: ConvertWarning) {
        self.warnings.push(warning);
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to human-readable text format
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("Logseq Conversion Report\n");
        output.push_str("========================\n");
        output.push_str(&format!("Input:      {}\n", self.input_file));
        output.push_str(&format!("Output:     {}\n", self.output_file));
        output.push_str(&format!("Tab policy: {}\n", self.tab_policy));
        output.push_str(&format!("Date:       {}\n", self.timestamp));
        output.push_str(&format!("Time:       {}ms\n\n", self.duration_ms));

        output.push_str("Statistics\n");
        output.push_str("----------\n");
        output.push_str(&format!("Total lines:       {}\n", self.statistics.total_lines));
        output.push_str(&format!("Headings:          {}\n", self.statistics.heading_lines));
        output.push_str(&format!(
            "Collapsed blocks:  {}\n",
            self.statistics.collapsed_blocks
        ));
        output.push_str(&format!(
            "Passthrough lines: {}\n",
            self.statistics.passthrough_lines
        ));
        output.push_str(&format!("Blank lines:       {}\n", self.statistics.blank_lines));
        output.push_str(&format!(
            "Properties removed: {}\n\n",
            self.statistics.properties_stripped
        ));

        if !self.warnings.is_empty() {
            output.push_str("Warnings\n");
            output.push_str("--------\n");
            for warning in &self.warnings {
                output.push_str(&format!("⚠ {}\n", warning));
            }
            output.push('\n');
        }

        output.push_str("Result\n");
        output.push_str("------\n");
        if self.warnings.is_empty() {
            output.push_str("✓ Conversion completed successfully\n");
        } else {
            output.push_str("✓ Conversion completed with warnings\n");
            output.push_str("ℹ Review warnings and manually edit if needed\n");
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = ConvertWarning {
            line: 10,
            kind: WarningKind::TabIndentation,
            message: "tab character in leading whitespace".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "Line 10: tab character in leading whitespace"
        );
    }

    #[test]
    fn test_report_to_json() {
        let report = ConversionReport::new("input.md", "output.md", TabPolicy::IndentUnit);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"input_file\": \"input.md\""));
        assert!(json.contains("\"tab_policy\": \"IndentUnit\""));
    }

    #[test]
    fn test_report_to_text() {
        let mut report = ConversionReport::new("input.md", "output.md", TabPolicy::IndentUnit);
        report.statistics.total_lines = 12;
        report.statistics.heading_lines = 4;

        let text = report.to_text();
        assert!(text.contains("Logseq Conversion Report"));
        assert!(text.contains("Input:      input.md"));
        assert!(text.contains("Total lines:       12"));
        assert!(text.contains("✓ Conversion completed successfully"));
    }

    #[test]
    fn test_report_to_text_with_warnings() {
        let mut report = ConversionReport::new("input.md", "output.md", TabPolicy::IndentUnit);
        report.add_warning(ConvertWarning {
            line: 3,
            kind: WarningKind::HeadingClamped,
            message: "indentation depth 7 clamped to heading level 6".to_string(),
        });

        let text = report.to_text();
        assert!(text.contains("⚠ Line 3: indentation depth 7 clamped to heading level 6"));
        assert!(text.contains("✓ Conversion completed with warnings"));
    }
}
