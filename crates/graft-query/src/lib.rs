//! graft-query - Hybrid retrieval and ranking engine
//!
//! This crate fuses lexical and vector search candidates into one
//! relevance-ordered result set using Reciprocal Rank Fusion (RRF), with
//! query-adaptive weights, score curation, and conversational reference
//! resolution.
//!
//! # Features
//!
//! - Query classification with adaptive fusion weights
//! - Reciprocal Rank Fusion over two ranked candidate lists
//! - Threshold filtering, exact-match and term-overlap boosts
//! - Clamped confidence estimation with generation tiers
//! - Bounded per-session conversation window with reference resolution
//!
//! # Example
//!
//! ```rust,ignore
//! use graft_query::{RetrievalEngine, Session};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(RetrievalEngine::new(index, cache, config));
//! let mut session = Session::new(engine);
//! let outcome = session.ask("how does rank fusion work?").await?;
//! ```

mod analyzer;
mod context;
mod curator;
mod engine;
mod fusion;
mod session;
mod text;

pub use analyzer::QueryAnalyzer;
pub use context::ContextTracker;
pub use curator::ResultCurator;
pub use engine::RetrievalEngine;
pub use fusion::fuse;
pub use session::Session;

// Re-export for convenience
pub use graft_core::{CuratedSet, FusedResult, QueryProfile, RetrievalOutcome};
