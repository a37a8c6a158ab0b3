//! Logseq outline to standard Markdown transformation.
//!
//! A single pass over the input lines. Each line is classified as blank, an
//! outline block, or plain text. Blocks become ATX headings whose level is
//! derived from indentation depth; blocks carrying `collapsed:: true` are
//! elided entirely; everything else passes through left-trimmed.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use thiserror::Error;

use super::options::{ConvertOptions, TabPolicy};
use super::patterns;
use super::report::{ConversionReport, ConvertWarning, WarningKind};

/// Deepest heading level Markdown supports.
const MAX_HEADING_LEVEL: usize = 6;

/// Error type for file-level conversion operations
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to create directory {path}: {source}")]
    CreateDir { path: String, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
}

/// Result of a report-carrying conversion
#[derive(Debug)]
pub struct ConvertResult {
    /// Converted standard Markdown
    pub markdown: String,
    /// Conversion report
    pub report: ConversionReport,
}

/// Logseq to standard Markdown converter
pub struct LogseqConverter {
    options: ConvertOptions,
}

impl Default for LogseqConverter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

impl LogseqConverter {
    /// Create a new converter with the given options
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Convert Logseq content to standard Markdown.
    ///
    /// Pure text-in, text-out surface. Use [`LogseqConverter::convert`] when
    /// the caller wants statistics and warnings as well.
    pub fn convert_content(&self, content: &str) -> String {
        let mut report = ConversionReport::new("", "", self.options.tab_policy);
        self.convert_lines(content, &mut report)
    }

    /// Convert Logseq content and produce a report alongside the Markdown.
    pub fn convert(&self, content: &str, input_name: &str, output_name: &str) -> ConvertResult {
        let start_time = Instant::now();
        let mut report = ConversionReport::new(input_name, output_name, self.options.tab_policy);
        let markdown = self.convert_lines(content, &mut report);
        report.duration_ms = start_time.elapsed().as_millis() as u64;
        ConvertResult { markdown, report }
    }

    fn convert_lines(&self, content: &str, report: &mut ConversionReport) -> String {
        let mut result: Vec<String> = Vec::new();
        // Index into `result` of the heading emitted for the previous input
        // line, while the current line can still be its property
        // continuation.
        let mut open_heading: Option<usize> = None;

        for (idx, line) in content.split('\n').enumerate() {
            let lineno = idx + 1;
            report.statistics.total_lines += 1;

            if line.trim().is_empty() {
                result.push(String::new());
                report.statistics.blank_lines += 1;
                open_heading = None;
                continue;
            }

            if let Some(caps) = patterns::BLOCK.captures(line) {
                let leading = caps.get(1).map_or("", |m| m.as_str());
                let block_content = caps.get(2).map_or("", |m| m.as_str()).trim();

                // Elision decision reads the raw content, before stripping.
                if is_collapsed(block_content) {
                    report.statistics.collapsed_blocks += 1;
                    open_heading = None;
                    continue;
                }

                report.statistics.properties_stripped += count_properties(block_content);
                let clean = strip_properties(block_content);
                if clean.is_empty() {
                    result.push(String::new());
                    open_heading = None;
                    continue;
                }

                let depth = self.indent_depth(leading, lineno, report);
                let level = (depth + 1).min(MAX_HEADING_LEVEL);
                if depth + 1 > MAX_HEADING_LEVEL {
                    report.add_warning(ConvertWarning {
                        line: lineno,
                        kind: WarningKind::HeadingClamped,
                        message: format!(
                            "indentation depth {} clamped to heading level {}",
                            depth, MAX_HEADING_LEVEL
                        ),
                    });
                }

                result.push(format!("{} {}", "#".repeat(level), clean));
                open_heading = Some(result.len() - 1);
                result.push(String::new());
                report.statistics.heading_lines += 1;
            } else {
                let trimmed = line.trim_start();

                // A collapse property on its own continuation line folds the
                // block introduced directly above: retract its heading so the
                // whole block contributes zero output lines.
                if is_collapsed(trimmed) {
                    if let Some(at) = open_heading.take() {
                        result.truncate(at);
                        report.statistics.heading_lines -= 1;
                    }
                    report.statistics.collapsed_blocks += 1;
                    continue;
                }

                result.push(trimmed.to_string());
                report.statistics.passthrough_lines += 1;
                open_heading = None;
            }
        }

        result.join("\n")
    }

    /// Indentation depth of a line's leading whitespace.
    ///
    /// Logseq nests with two-space units. Tabs count according to the
    /// configured [`TabPolicy`]; either way their presence is flagged in the
    /// report since the source tool never writes them itself.
    fn indent_depth(&self, leading: &str, lineno: usize, report: &mut ConversionReport) -> usize {
        if leading.contains('\t') {
            report.add_warning(ConvertWarning {
                line: lineno,
                kind: WarningKind::TabIndentation,
                message: "tab character in leading whitespace".to_string(),
            });
        }
        match self.options.tab_policy {
            TabPolicy::IndentUnit => {
                let tabs = leading.chars().filter(|c| *c == '\t').count();
                let spaces = leading.chars().filter(|c| *c == ' ').count();
                tabs + spaces / 2
            }
            TabPolicy::Width(width) => {
                let expanded: usize = leading
                    .chars()
                    .map(|c| if c == '\t' { width } else { 1 })
                    .sum();
                expanded / 2
            }
        }
    }

    /// Extract the contiguous region of content starting at the first
    /// occurrence of `#<tag>`.
    ///
    /// From the matching line onward every line is emitted: block lines lose
    /// their bullet prefix but keep their original spacing, other lines are
    /// emitted verbatim. No heading conversion and no property stripping
    /// happen here. Returns an empty string when the tag never occurs.
    pub fn extract_by_tag(&self, content: &str, tag: &str) -> String {
        let marker = format!("#{}", tag);
        let mut result: Vec<&str> = Vec::new();
        let mut found = false;

        for line in content.lines() {
            if !found && line.contains(&marker) {
                found = true;
            }
            if found {
                match patterns::BLOCK.captures(line) {
                    Some(caps) => result.push(caps.get(2).map_or("", |m| m.as_str())),
                    None => result.push(line),
                }
            }
        }

        result.join("\n")
    }

    /// Convert the file at `input_path`, optionally writing the result to
    /// `output_path` (creating missing parent directories). Returns the
    /// converted Markdown either way.
    pub fn convert_file(
        &self,
        input_path: &Path,
        output_path: Option<&Path>,
    ) -> Result<String, ConvertError> {
        let content = fs::read_to_string(input_path).map_err(|e| ConvertError::Read {
            path: input_path.display().to_string(),
            source: e,
        })?;

        let converted = self.convert_content(&content);

        if let Some(path) = output_path {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent).map_err(|e| ConvertError::CreateDir {
                        path: parent.display().to_string(),
                        source: e,
                    })?;
                }
            }
            fs::write(path, &converted).map_err(|e| ConvertError::Write {
                path: path.display().to_string(),
                source: e,
            })?;
        }

        Ok(converted)
    }
}

/// Remove outline property annotations from block content.
///
/// Strips `collapsed:: <word>` and `id:: <uuid>` substrings, collapses
/// whitespace runs to single spaces and trims. Idempotent: running it on
/// already-clean text is a no-op.
pub fn strip_properties(content: &str) -> String {
    let stripped = patterns::COLLAPSED_PROPERTY.replace_all(content, "");
    let stripped = patterns::ID_PROPERTY.replace_all(&stripped, "");
    let collapsed = patterns::WHITESPACE_RUN.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

fn is_collapsed(content: &str) -> bool {
    patterns::COLLAPSED
        .captures(content)
        .is_some_and(|caps| &caps[1] == "true")
}

fn count_properties(content: &str) -> usize {
    patterns::COLLAPSED_PROPERTY.find_iter(content).count()
        + patterns::ID_PROPERTY.find_iter(content).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(content: &str) -> String {
        LogseqConverter::default().convert_content(content)
    }

    #[test]
    fn test_top_level_block_becomes_h1() {
        assert_eq!(convert("- Title\n"), "# Title\n\n");
    }

    #[test]
    fn test_two_space_nesting() {
        assert_eq!(convert("- A\n  - B\n"), "# A\n\n## B\n\n");
    }

    #[test]
    fn test_heading_level_clamped_at_six() {
        let input = "- a\n  - b\n    - c\n      - d\n        - e\n          - f\n            - g\n";
        let output = convert(input);
        assert!(output.contains("###### f"));
        assert!(output.contains("###### g"));
        assert!(!output.contains("####### g"));
    }

    #[test]
    fn test_blank_line_preserved_in_position() {
        assert_eq!(convert("- A\n   \n- B\n"), "# A\n\n\n# B\n\n");
    }

    #[test]
    fn test_collapsed_block_line_elided() {
        assert_eq!(convert("- collapsed:: true\n"), "");
    }

    #[test]
    fn test_collapsed_false_is_stripped_not_elided() {
        assert_eq!(convert("- Open collapsed:: false\n"), "# Open\n\n");
    }

    #[test]
    fn test_collapsed_continuation_retracts_heading() {
        // Property continuation folds the block introduced above it.
        assert_eq!(convert("\t- Sub\n\t  collapsed:: true\n"), "");
    }

    #[test]
    fn test_property_only_block_emits_blank() {
        assert_eq!(convert("- id:: 64f0a2d1-aaaa-bbbb-cccc-0123456789ab\n"), "\n");
    }

    #[test]
    fn test_passthrough_left_trimmed() {
        assert_eq!(convert("   some plain text"), "some plain text");
    }

    #[test]
    fn test_deterministic() {
        let input = "- A\n  - B collapsed:: false\nplain\n";
        assert_eq!(convert(input), convert(input));
    }

    #[test]
    fn test_tab_counts_as_one_level() {
        assert_eq!(convert("\t- Sub\n"), "## Sub\n\n");
    }

    #[test]
    fn test_tab_width_policy() {
        let converter = LogseqConverter::new(
            ConvertOptions::new().with_tab_policy(TabPolicy::Width(4)),
        );
        // One tab expands to four spaces, i.e. depth 2.
        assert_eq!(converter.convert_content("\t- Sub\n"), "### Sub\n\n");
    }

    #[test]
    fn test_strip_properties_idempotent() {
        let dirty = "Task collapsed:: true id:: 0a1b2c3d-1111-2222-3333-444455556666";
        let once = strip_properties(dirty);
        assert_eq!(once, "Task");
        assert_eq!(strip_properties(&once), once);
    }

    #[test]
    fn test_strip_properties_collapses_whitespace() {
        assert_eq!(strip_properties("a \t  b"), "a b");
    }

    #[test]
    fn test_extract_by_tag_strips_prefixes() {
        let converter = LogseqConverter::default();
        let output = converter.extract_by_tag("- no\n- has #work tag\n- after\n", "work");
        assert_eq!(output, "has #work tag\nafter");
    }

    #[test]
    fn test_extract_by_tag_missing_tag() {
        let converter = LogseqConverter::default();
        assert_eq!(converter.extract_by_tag("- nothing here\n", "work"), "");
    }

    #[test]
    fn test_extract_by_tag_keeps_non_block_lines_verbatim() {
        let converter = LogseqConverter::default();
        let output = converter.extract_by_tag("- start #log\n  plain  spaced\n", "log");
        assert_eq!(output, "start #log\n  plain  spaced");
    }

    #[test]
    fn test_convert_report_statistics() {
        let converter = LogseqConverter::default();
        let result = converter.convert("- A\n- collapsed:: true\nplain\n\n", "in.md", "out.md");
        assert_eq!(result.report.statistics.total_lines, 5);
        assert_eq!(result.report.statistics.heading_lines, 1);
        assert_eq!(result.report.statistics.collapsed_blocks, 1);
        assert_eq!(result.report.statistics.passthrough_lines, 1);
        assert_eq!(result.report.statistics.blank_lines, 2);
    }

    #[test]
    fn test_convert_report_tab_warning() {
        let converter = LogseqConverter::default();
        let result = converter.convert("\t- Sub\n", "in.md", "out.md");
        assert!(result
            .report
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::TabIndentation));
    }
}
