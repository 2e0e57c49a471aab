//! Shared environment configuration for the driver binary.
//!
//! Reads `SAFARI_THREADS` (fallback `RAYON_NUM_THREADS`), `SAFARI_TRACE_FILE`
//! and `RUST_LOG`.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. Filter from `RUST_LOG`, default `info`.
/// Logs go to stderr so stdout stays clean for `--json`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Thread count from `SAFARI_THREADS` or `RAYON_NUM_THREADS`, default: all cores.
pub fn thread_count() -> usize {
    std::env::var("SAFARI_THREADS")
        .or_else(|_| std::env::var("RAYON_NUM_THREADS"))
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&n: &usize| n > 0)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
}

/// Build the rayon global pool. Tolerates an already-initialized pool.
/// Returns thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = thread_count();
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        tracing::warn!(error = %e, "rayon pool already initialized");
    }
    tracing::info!(threads = num_threads, "rayon threads");
    num_threads
}

/// Default trace file from `SAFARI_TRACE_FILE`, if set and non-empty.
pub fn trace_file() -> Option<PathBuf> {
    std::env::var_os("SAFARI_TRACE_FILE")
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}
