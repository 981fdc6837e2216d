use std::path::PathBuf;

/// Failure kinds the harvester distinguishes. Download, resize and JSON
/// persistence failures are recovered where they happen; navigation timeouts
/// escalate to the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("page not ready after {timeout_secs}s: {url}: {reason}")]
    NavigationTimeout {
        url: String,
        timeout_secs: u64,
        reason: String,
    },

    #[error("download image {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("resize image {}: {reason}", path.display())]
    Resize { path: PathBuf, reason: String },

    #[error("persist {}: {reason}", path.display())]
    Persistence { path: PathBuf, reason: String },
}
