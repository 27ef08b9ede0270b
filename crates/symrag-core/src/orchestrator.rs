//! Turns one query into per-keyword engine invocations and aggregates the
//! parsed batches into a single ordered hit list.

use crate::engine::EngineBridge;
use crate::models::Hit;
use crate::protocol;
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::debug;

/// Seam for the reasoning service's keyword extraction. Implementations must
/// recover from remote failure internally (falling back to the raw query
/// tokens) rather than surfacing it as an error here.
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    async fn extract_search_terms(&self, query: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Hits in keyword order, each keyword's batch in engine output order.
    pub hits: Vec<Hit>,
    /// The keywords actually searched, so callers can report them.
    pub keywords: Vec<String>,
}

pub struct Orchestrator {
    bridge: EngineBridge,
    max_parallel: usize,
}

impl Orchestrator {
    pub fn new(bridge: EngineBridge, max_parallel: usize) -> Self {
        Self {
            bridge,
            max_parallel: max_parallel.max(1),
        }
    }

    pub fn bridge(&self) -> &EngineBridge {
        &self.bridge
    }

    /// Runs the full retrieval pass for `query`.
    ///
    /// Keywords come from `extractor` when one is supplied, otherwise from
    /// whitespace-splitting the lowercased query. Engine invocations fan out
    /// with bounded concurrency, but batches are reassembled in keyword order
    /// so the merged sequence does not depend on completion order.
    pub async fn search(
        &self,
        query: &str,
        extractor: Option<&dyn KeywordExtractor>,
    ) -> Result<SearchOutcome> {
        let keywords = match extractor {
            Some(extractor) => extractor.extract_search_terms(query).await?,
            None => query.to_lowercase().split_whitespace().map(str::to_string).collect(),
        };
        debug!(?keywords, "searching engine per keyword");

        if keywords.is_empty() {
            return Ok(SearchOutcome::default());
        }

        let limit = self.max_parallel.min(keywords.len());
        let batches: Vec<Vec<Hit>> = stream::iter(keywords.iter().map(|keyword| async move {
            let raw = self.bridge.run_single_search(keyword).await;
            protocol::parse(&raw)
        }))
        .buffered(limit)
        .collect()
        .await;

        let hits = batches.into_iter().flatten().collect();
        Ok(SearchOutcome { hits, keywords })
    }
}
