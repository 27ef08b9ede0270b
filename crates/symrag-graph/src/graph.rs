//! Directed query→document graph folded from aggregated hits.
//!
//! One edge per (query, document) pair: rediscovery of a document by another
//! keyword merges into the existing edge, unioning the keyword label and
//! keeping the maximum score as the weight.

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use symrag_core::Hit;
use thiserror::Error;

const QUERY_LABEL_MAX: usize = 20;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    /// An engine-reported score was not numeric. Unlike every failure below
    /// this layer, this one is fatal to the build for the query: a
    /// non-numeric score cannot take part in the max-weight merge, and the
    /// caller must be able to tell "bad data" from "no matches".
    #[error("non-numeric score {score:?} for document {file:?}")]
    ScoreFormat { file: String, score: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NodeKind {
    Query,
    Document,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeData {
    /// Maximum score across all hits merged into this edge.
    pub weight: f64,
    /// Contributing keywords in first-seen order, no duplicates.
    pub keywords: Vec<String>,
}

impl EdgeData {
    /// Comma-joined keyword label as shown on the rendered edge.
    pub fn label(&self) -> String {
        self.keywords.join(", ")
    }
}

#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    graph: StableGraph<GraphNode, EdgeData>,
    node_indices: HashMap<String, NodeIndex>,
    query_node: Option<NodeIndex>,
}

impl KnowledgeGraph {
    /// A graph with no nodes at all, the state before any search has run.
    /// Rendering it yields the "not enough data" sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a fresh graph from one query's aggregated hits. No state is
    /// carried across builds.
    ///
    /// The query node's id is the query truncated to 20 characters with a
    /// trailing `...` when longer. A document whose path happens to equal
    /// that truncated id collapses onto the query node; known edge case,
    /// left uncorrected.
    pub fn build(query: &str, hits: &[Hit]) -> Result<Self> {
        let mut kg = Self::empty();

        let query_id = display_query(query);
        let query_node = kg.graph.add_node(GraphNode {
            id: query_id.clone(),
            kind: NodeKind::Query,
        });
        kg.node_indices.insert(query_id, query_node);
        kg.query_node = Some(query_node);

        for hit in hits {
            let score: f64 = hit.score.parse().map_err(|_| GraphError::ScoreFormat {
                file: hit.file.clone(),
                score: hit.score.clone(),
            })?;
            kg.fold_hit(query_node, hit, score);
        }
        Ok(kg)
    }

    fn fold_hit(&mut self, query_node: NodeIndex, hit: &Hit, score: f64) {
        let doc_node = match self.node_indices.get(&hit.file) {
            Some(idx) => *idx,
            None => {
                let idx = self.graph.add_node(GraphNode {
                    id: hit.file.clone(),
                    kind: NodeKind::Document,
                });
                self.node_indices.insert(hit.file.clone(), idx);
                idx
            }
        };

        match self.graph.find_edge(query_node, doc_node) {
            Some(edge) => {
                let data = &mut self.graph[edge];
                if !data.keywords.contains(&hit.keyword) {
                    data.keywords.push(hit.keyword.clone());
                }
                if score > data.weight {
                    data.weight = score;
                }
            }
            None => {
                self.graph.add_edge(
                    query_node,
                    doc_node,
                    EdgeData {
                        weight: score,
                        keywords: vec![hit.keyword.clone()],
                    },
                );
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn query_id(&self) -> Option<&str> {
        self.query_node.map(|idx| self.graph[idx].id.as_str())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Edges as (source id, target id, data), in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &EdgeData)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].id.as_str(),
                self.graph[edge.target()].id.as_str(),
                edge.weight(),
            )
        })
    }

    /// Edge data for a document node, when one exists.
    pub fn edge_to(&self, file: &str) -> Option<&EdgeData> {
        let doc = *self.node_indices.get(file)?;
        let edge = self.graph.find_edge(self.query_node?, doc)?;
        Some(&self.graph[edge])
    }
}

fn display_query(query: &str) -> String {
    let chars: Vec<char> = query.chars().collect();
    if chars.len() > QUERY_LABEL_MAX {
        let truncated: String = chars[..QUERY_LABEL_MAX].iter().collect();
        format!("{truncated}...")
    } else {
        query.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_queries_are_truncated_with_ellipsis() {
        let g = KnowledgeGraph::build("how does the linux kernel handle memory", &[]).unwrap();
        assert_eq!(g.query_id(), Some("how does the linux k..."));
    }

    #[test]
    fn short_queries_are_left_alone() {
        let g = KnowledgeGraph::build("paging", &[]).unwrap();
        assert_eq!(g.query_id(), Some("paging"));
    }
}
