use serde::{Deserialize, Serialize};

/// One match of one keyword against one document, as reported by the engine.
///
/// `score` is kept as the raw engine-supplied text; it is parsed to a number
/// only where a numeric comparison is actually needed (graph construction),
/// so the wire parser never has a reason to fail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hit {
    pub file: String,
    pub score: String,
    pub snippet: String,
    /// Search term that produced this hit; `"unknown"` for legacy engine
    /// output that predates the keyword column.
    pub keyword: String,
}
