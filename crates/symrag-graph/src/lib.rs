pub mod graph;
pub mod layout;

pub use graph::{GraphError, KnowledgeGraph, NodeKind};
pub use layout::{render, Scene};
