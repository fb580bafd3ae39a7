//! Per-session handle owning the conversation window.

use std::sync::Arc;

use graft_core::{EmbeddingProvider, Result, RetrievalOutcome, SearchIndex};

use crate::context::ContextTracker;
use crate::engine::RetrievalEngine;

/// One conversation with the retrieval engine.
///
/// Each session owns its [`ContextTracker`] outright, so conversational
/// state is mutated by exactly one writer; concurrent sessions only share
/// the engine (and through it the embedding cache), which holds no
/// session-specific data.
pub struct Session<S, P> {
    engine: Arc<RetrievalEngine<S, P>>,
    tracker: ContextTracker,
}

impl<S, P> Session<S, P>
where
    S: SearchIndex,
    P: EmbeddingProvider,
{
    /// Start a session against a shared engine.
    pub fn new(engine: Arc<RetrievalEngine<S, P>>) -> Self {
        let tracker = ContextTracker::new(&engine.config().context);
        Self { engine, tracker }
    }

    /// Retrieve context for the next turn of this conversation.
    pub async fn ask(&mut self, query: &str) -> Result<RetrievalOutcome> {
        self.engine.retrieve(query, &mut self.tracker, None).await
    }

    /// Retrieve with an explicit result count.
    pub async fn ask_for(&mut self, query: &str, count: usize) -> Result<RetrievalOutcome> {
        self.engine
            .retrieve(query, &mut self.tracker, Some(count))
            .await
    }

    /// Resolved queries retained in this session's window, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.tracker.history().map(String::from).collect()
    }

    /// End the conversation: empty the window. The session can be reused
    /// as a fresh conversation afterwards.
    pub fn reset(&mut self) {
        self.tracker.clear();
    }
}
