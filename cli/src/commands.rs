use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use symrag_config::Config;
use symrag_core::context::format_context;
use symrag_core::{EngineBridge, KeywordExtractor, Orchestrator};
use symrag_graph::layout::DEFAULT_SEED;
use symrag_graph::{render, KnowledgeGraph};
use symrag_llm::ChatClient;

#[derive(Parser)]
#[command(name = "symrag")]
#[command(about = "Keyword-fanout retrieval over an external search engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a query through keyword extraction, the engine, and the LLM
    Search {
        /// The query string
        query: String,

        /// Skip the reasoning service; split the query into keywords locally
        #[arg(long)]
        no_llm: bool,

        /// Write the rendered graph scene as JSON to this path
        #[arg(long, value_name = "FILE")]
        graph_out: Option<PathBuf>,
    },
    /// Report engine and credential status
    Status,
}

pub async fn handle_search(
    config_path: Option<&Path>,
    query: String,
    no_llm: bool,
    graph_out: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load_from(config_path)?;
    let bridge = EngineBridge::new(&config.backend);
    let orchestrator = Orchestrator::new(bridge, config.backend.max_parallel);
    let client = ChatClient::new(&config.llm)?;

    let extractor: Option<&dyn KeywordExtractor> = if no_llm { None } else { Some(&client) };
    let outcome = orchestrator.search(&query, extractor).await?;

    println!("Keywords searched: {}", outcome.keywords.join(", "));
    if outcome.hits.is_empty() {
        println!("No matches found in the docs.");
    } else {
        println!();
        for hit in &outcome.hits {
            println!(
                "  '{}' found in '{}' (score {})",
                hit.keyword, hit.file, hit.score
            );
            for segment in hit.snippet.split("...").map(str::trim).filter(|s| !s.is_empty()) {
                println!("    > {segment}...");
            }
        }
    }

    // A bad score is a build failure, reported distinctly from zero matches.
    let graph = KnowledgeGraph::build(&query, &outcome.hits)?;
    match render(&graph, DEFAULT_SEED) {
        Some(scene) => {
            if let Some(path) = graph_out {
                std::fs::write(&path, serde_json::to_string_pretty(&scene)?)?;
                println!("\nGraph scene written to {}", path.display());
            } else {
                println!(
                    "\nKnowledge graph: {} nodes, {} edges (use --graph-out to export)",
                    scene.nodes.len(),
                    scene.edges.len()
                );
            }
        }
        None => println!("\nNot enough data to map graph."),
    }

    let context = format_context(&outcome.hits);
    let answer = client.answer(&query, &context).await;
    println!("\n{answer}");

    Ok(())
}

pub fn handle_status(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_from(config_path)?;
    let bridge = EngineBridge::new(&config.backend);

    if bridge.is_online() {
        println!("Engine: Online ({})", bridge.engine_path().display());
    } else {
        println!("Engine: Offline (binary not found at {})", bridge.engine_path().display());
    }

    if config.llm.api_key.is_some() {
        println!("Reasoning service: credential configured ({})", config.llm.model);
    } else {
        println!("Reasoning service: unauthenticated (fallback keyword split)");
    }

    Ok(())
}
