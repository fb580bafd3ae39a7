//! Bounded conversation window with referential query resolution.

use std::collections::VecDeque;

use tracing::debug;

use graft_core::ContextConfig;

/// Retains a bounded window of prior resolved queries for one session and
/// expands referential follow-ups ("and what about ...") into
/// self-contained queries.
///
/// Owned exclusively by its session: one writer, no cross-session
/// sharing. The window is emptied only on explicit session end.
#[derive(Debug, Clone)]
pub struct ContextTracker {
    /// Most recent resolved queries, oldest first.
    window: VecDeque<String>,

    /// Maximum retained queries.
    window_size: usize,

    /// Lead words/phrases marking a query as referential, normalized and
    /// ordered longest first so phrase matches win over their prefixes.
    lead_words: Vec<String>,
}

impl ContextTracker {
    /// Create a tracker from the context configuration.
    pub fn new(config: &ContextConfig) -> Self {
        let mut lead_words: Vec<String> = config
            .referential_lead_words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        lead_words.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

        Self {
            window: VecDeque::with_capacity(config.window_size),
            window_size: config.window_size.max(1),
            lead_words,
        }
    }

    /// Expand a referential query against the most recent prior turn.
    ///
    /// A query is referential when it begins with a configured lead
    /// word/phrase ending at a word boundary. The prior resolved query is
    /// prepended so the expanded text stands on its own; non-referential
    /// queries pass through unchanged, as does any query on the first
    /// turn.
    pub fn resolve(&self, raw_text: &str) -> String {
        let trimmed = raw_text.trim();
        let previous = match self.window.back() {
            Some(prev) => prev,
            None => return trimmed.to_string(),
        };

        if self.is_referential(trimmed) {
            let resolved = format!("{} {}", previous, trimmed);
            debug!(raw = trimmed, resolved = %resolved, "expanded referential query");
            resolved
        } else {
            trimmed.to_string()
        }
    }

    /// Append a resolved query, evicting the oldest entry past the bound.
    pub fn record(&mut self, resolved_text: &str) {
        if self.window.len() >= self.window_size {
            self.window.pop_front();
        }
        self.window.push_back(resolved_text.to_string());
    }

    /// The most recent resolved query.
    pub fn last(&self) -> Option<&str> {
        self.window.back().map(String::as_str)
    }

    /// Queries currently retained, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.window.iter().map(String::as_str)
    }

    /// Number of retained queries.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// True when no turns have been recorded.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Empty the window (explicit session end).
    pub fn clear(&mut self) {
        self.window.clear();
    }

    fn is_referential(&self, trimmed: &str) -> bool {
        let lowered = trimmed.to_lowercase();
        self.lead_words.iter().any(|lead| {
            lowered.strip_prefix(lead.as_str()).is_some_and(|rest| {
                rest.starts_with(|c: char| !c.is_alphanumeric()) || rest.is_empty()
            })
        })
    }
}
