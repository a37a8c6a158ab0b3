//! Conversion options

use serde::{Deserialize, Serialize};

/// How leading tab characters count toward indentation depth.
///
/// Logseq itself writes two-space indents, but exported graphs and hand
/// edited pages mix tabs in, so the converter needs a defined depth for
/// those lines too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TabPolicy {
    /// Each leading tab counts as one full indentation level.
    #[default]
    IndentUnit,
    /// Expand each leading tab to this many spaces before measuring.
    Width(usize),
}

impl std::fmt::Display for TabPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabPolicy::IndentUnit => write!(f, "indent-unit"),
            TabPolicy::Width(n) => write!(f, "width({})", n),
        }
    }
}

/// Options for a conversion run
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Tab handling policy for indentation measurement
    pub tab_policy: TabPolicy,
}

impl ConvertOptions {
    /// Create options with the default tab policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tab handling policy
    pub fn with_tab_policy(mut self, policy: TabPolicy) -> Self {
        self.tab_policy = policy;
        self
    }
}
