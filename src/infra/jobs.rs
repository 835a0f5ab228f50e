// src/infra/jobs.rs — Periodic background jobs (session sweep, markup cleanup)
//
// The loop bodies are plain functions so tests can invoke them directly
// instead of waiting on a timer.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::core::session::SessionStore;
use crate::infra::config::JobsConfig;

/// Delete the given files, collecting failures instead of raising them.
///
/// Already-missing files count as success; cleanup must be idempotent.
pub fn cleanup_files(paths: &[PathBuf]) -> Vec<(PathBuf, std::io::Error)> {
    let mut failures = Vec::new();
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => failures.push((path.clone(), e)),
        }
    }
    failures
}

/// Drop every session unconditionally and best-effort delete the markup
/// files they recorded. Returns the number of sessions swept.
pub fn sweep_sessions(store: &dyn SessionStore) -> usize {
    let (count, artifacts) = store.sweep_all();
    if count > 0 {
        tracing::info!("swept {count} orphaned session(s)");
    }
    for (path, e) in cleanup_files(&artifacts) {
        tracing::warn!("failed to delete {}: {e}", path.display());
    }
    count
}

/// Delete every stale markup file under the output directory.
pub fn sweep_markup(dir: &Path) -> usize {
    let pattern = dir.join("*.html");
    let Ok(entries) = glob::glob(&pattern.to_string_lossy()) else {
        return 0;
    };
    let paths: Vec<PathBuf> = entries.flatten().collect();
    let total = paths.len();
    let failures = cleanup_files(&paths);
    for (path, e) in &failures {
        tracing::warn!("failed to delete {}: {e}", path.display());
    }
    total - failures.len()
}

/// Run both periodic jobs until the process exits.
pub async fn run_background_jobs(
    store: Arc<dyn SessionStore>,
    output_dir: PathBuf,
    config: JobsConfig,
) {
    let mut sweep = tokio::time::interval(Duration::from_secs(config.sweep_interval_secs.max(1)));
    let mut cleanup =
        tokio::time::interval(Duration::from_secs(config.cleanup_interval_secs.max(1)));
    // Both intervals fire immediately on the first tick; consume those so
    // startup does not wipe sessions created moments earlier.
    sweep.tick().await;
    cleanup.tick().await;

    loop {
        tokio::select! {
            _ = sweep.tick() => {
                sweep_sessions(store.as_ref());
            }
            _ = cleanup.tick() => {
                let removed = sweep_markup(&output_dir);
                if removed > 0 {
                    tracing::info!("removed {removed} stale markup file(s)");
                }
            }
        }
    }
}
