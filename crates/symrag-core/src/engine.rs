//! Bridge to the out-of-process search engine.
//!
//! The engine is an opaque executable that takes `--query <keyword>` and
//! prints ranked matches on stdout in the line protocol of [`crate::protocol`].
//! Every failure mode on this boundary degrades to an empty result for the
//! affected keyword; a bad invocation never fails the surrounding search.

use std::path::{Path, PathBuf};
use std::time::Duration;
use symrag_config::BackendConfig;
use tokio::process::Command;
use tracing::{error, warn};

#[cfg(windows)]
const ENGINE_BINARY: &str = "engine.exe";
#[cfg(not(windows))]
const ENGINE_BINARY: &str = "engine";

pub struct EngineBridge {
    backend_dir: PathBuf,
    engine_path: PathBuf,
    timeout: Duration,
}

impl EngineBridge {
    /// Resolves the engine path under the configured backend directory.
    /// A missing binary is reported but not fatal here; later invocations
    /// will each degrade to empty results.
    pub fn new(config: &BackendConfig) -> Self {
        let backend_dir = config.dir.clone();
        let engine_path = backend_dir.join(ENGINE_BINARY);
        if !engine_path.exists() {
            error!(path = %engine_path.display(), "search engine binary not found");
        }
        Self {
            backend_dir,
            engine_path,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Whether the engine binary is present on disk. Presentation-layer
    /// status indicator; not consulted on the invocation path.
    pub fn is_online(&self) -> bool {
        self.engine_path.exists()
    }

    pub fn engine_path(&self) -> &Path {
        &self.engine_path
    }

    /// Runs one engine invocation for `keyword` and returns raw stdout.
    /// Non-zero exit, spawn failure, and timeout all yield an empty string
    /// with a logged diagnostic.
    pub async fn run_single_search(&self, keyword: &str) -> String {
        let invocation = Command::new(&self.engine_path)
            .arg("--query")
            .arg(keyword)
            // cwd pinned so the engine resolves its data files relatively
            .current_dir(&self.backend_dir)
            // a timed-out or cancelled invocation must not leave the engine running
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, invocation).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(keyword, error = %e, "failed to spawn search engine");
                return String::new();
            }
            Err(_) => {
                warn!(keyword, timeout_secs = self.timeout.as_secs(), "search engine timed out");
                return String::new();
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(keyword, status = ?output.status.code(), %stderr, "search engine exited with failure");
            return String::new();
        }

        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}
