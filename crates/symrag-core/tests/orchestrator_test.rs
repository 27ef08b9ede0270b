#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use symrag_config::BackendConfig;
use symrag_core::{EngineBridge, Orchestrator};

/// Drops a shell script named `engine` into `dir` so the bridge can spawn it
/// like the real binary.
fn install_fake_engine(dir: &Path, script_body: &str) {
    let path = dir.join("engine");
    std::fs::write(&path, format!("#!/bin/sh\n{script_body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
}

fn orchestrator_for(dir: &Path) -> Orchestrator {
    let config = BackendConfig {
        dir: dir.to_path_buf(),
        timeout_secs: 10,
        max_parallel: 4,
    };
    Orchestrator::new(EngineBridge::new(&config), config.max_parallel)
}

#[tokio::test]
async fn single_keyword_query_yields_parsed_hits() {
    let dir = tempfile::tempdir().unwrap();
    install_fake_engine(
        dir.path(),
        r#"echo "kernel.md|0.92|...manages pages...|memory""#,
    );

    let outcome = orchestrator_for(dir.path()).search("memory", None).await.unwrap();

    assert_eq!(outcome.keywords, vec!["memory".to_string()]);
    assert_eq!(outcome.hits.len(), 1);
    let hit = &outcome.hits[0];
    assert_eq!(hit.file, "kernel.md");
    assert_eq!(hit.score, "0.92");
    assert_eq!(hit.snippet, "...manages pages...");
    assert_eq!(hit.keyword, "memory");
}

#[tokio::test]
async fn nonzero_exit_degrades_to_zero_hits() {
    let dir = tempfile::tempdir().unwrap();
    install_fake_engine(dir.path(), "echo 'index corrupted' >&2\nexit 3");

    let outcome = orchestrator_for(dir.path()).search("x", None).await.unwrap();

    assert_eq!(outcome.keywords, vec!["x".to_string()]);
    assert!(outcome.hits.is_empty());
}

#[tokio::test]
async fn missing_engine_binary_degrades_to_zero_hits() {
    let dir = tempfile::tempdir().unwrap();
    // no engine installed at all

    let orchestrator = orchestrator_for(dir.path());
    assert!(!orchestrator.bridge().is_online());

    let outcome = orchestrator.search("anything", None).await.unwrap();
    assert!(outcome.hits.is_empty());
}

#[tokio::test]
async fn fallback_split_lowercases_and_preserves_keyword_order() {
    let dir = tempfile::tempdir().unwrap();
    // Echo the keyword back so each batch is attributable to its keyword.
    install_fake_engine(dir.path(), r#"echo "doc.md|1.0|snippet|$2""#);

    let outcome = orchestrator_for(dir.path())
        .search("How Does Paging Work", None)
        .await
        .unwrap();

    assert_eq!(outcome.keywords, vec!["how", "does", "paging", "work"]);
    let batch_keywords: Vec<&str> = outcome.hits.iter().map(|h| h.keyword.as_str()).collect();
    assert_eq!(batch_keywords, vec!["how", "does", "paging", "work"]);
}

#[tokio::test]
async fn empty_query_skips_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    // If this ran, it would produce a hit; an empty query must not invoke it.
    install_fake_engine(dir.path(), r#"echo "doc.md|1.0|snippet|$2""#);

    let outcome = orchestrator_for(dir.path()).search("   ", None).await.unwrap();
    assert!(outcome.keywords.is_empty());
    assert!(outcome.hits.is_empty());
}

#[tokio::test]
async fn engine_timeout_degrades_to_zero_hits() {
    let dir = tempfile::tempdir().unwrap();
    install_fake_engine(dir.path(), "sleep 5\necho \"doc.md|1.0|late|$2\"");

    let config = BackendConfig {
        dir: dir.path().to_path_buf(),
        timeout_secs: 1,
        max_parallel: 1,
    };
    let orchestrator = Orchestrator::new(EngineBridge::new(&config), config.max_parallel);

    let outcome = orchestrator.search("slow", None).await.unwrap();
    assert!(outcome.hits.is_empty());
}
