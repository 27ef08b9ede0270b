pub mod context;
pub mod engine;
pub mod models;
pub mod orchestrator;
pub mod protocol;

pub use engine::EngineBridge;
pub use models::Hit;
pub use orchestrator::{KeywordExtractor, Orchestrator, SearchOutcome};
