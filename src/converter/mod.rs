//! Logseq to standard Markdown converter module
//!
//! Logseq stores pages as block outlines: every node is a `- ` bullet and
//! nesting is expressed with indentation. This module flattens that outline
//! into plain Markdown, turning block depth into heading level, dropping
//! `key:: value` block properties, and eliding collapsed blocks. A second
//! entry point extracts the region of a page starting at a given `#tag`.

mod options;
pub mod patterns;
mod report;
mod transform;

pub use options::{ConvertOptions, TabPolicy};
pub use report::{ConversionReport, ConversionStatistics, ConvertWarning, WarningKind};
pub use transform::{strip_properties, ConvertError, ConvertResult, LogseqConverter};
