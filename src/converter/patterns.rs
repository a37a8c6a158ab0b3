//! Precompiled pattern definitions.
//!
//! Compiled once on first use and shared read-only by every conversion call,
//! so concurrent conversions never recompile or synchronize beyond the lazy
//! initialization itself.

use once_cell::sync::Lazy;
use regex::Regex;

/// Outline bullet line: optional leading whitespace, a `-` marker, one or
/// more spaces, then the block content.
pub static BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)-\s+(.*)$").unwrap());

/// Collapse-state property with its boolean value captured. Used for the
/// elision decision, which runs on raw content before any stripping.
pub static COLLAPSED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"collapsed::\s*(true|false)").unwrap());

/// `collapsed:: <word>` property substring, removed from block content.
pub static COLLAPSED_PROPERTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"collapsed::\s*\w+").unwrap());

/// `id:: <uuid>` property substring, removed from block content.
pub static ID_PROPERTY: Lazy<Regex> = Lazy::new(|| Regex::new(r"id::\s*[a-f0-9-]+").unwrap());

/// Run of whitespace, collapsed to a single space after property removal.
pub static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Inline image, e.g. `![alt](assets/shot.png)`. Recognized but not
/// rewritten by the conversion pipeline; inline content passes through.
pub static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// Inline link, e.g. `[text](https://example.com)`. Same status as [`IMAGE`].
pub static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Tag token, e.g. `#work` or `#area/project`.
pub static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+(?:/\w+)*)").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_captures() {
        let caps = BLOCK.captures("  - some content").unwrap();
        assert_eq!(&caps[1], "  ");
        assert_eq!(&caps[2], "some content");
    }

    #[test]
    fn test_block_requires_space_after_marker() {
        assert!(BLOCK.captures("-nope").is_none());
        assert!(BLOCK.captures("no bullet here").is_none());
    }

    #[test]
    fn test_collapsed_captures_value() {
        let caps = COLLAPSED.captures("title collapsed:: true").unwrap();
        assert_eq!(&caps[1], "true");
        let caps = COLLAPSED.captures("collapsed::false").unwrap();
        assert_eq!(&caps[1], "false");
    }

    #[test]
    fn test_tag_with_hierarchy() {
        let caps = TAG.captures("tracking #area/project here").unwrap();
        assert_eq!(&caps[1], "area/project");
    }
}
