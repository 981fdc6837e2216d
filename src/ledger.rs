use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;

/// Append-only log of links that were already harvested, one URL per line.
#[derive(Debug)]
pub struct LinkLedger {
    path: PathBuf,
    seen: HashSet<String>,
}

impl LinkLedger {
    /// Reads the whole ledger. A missing file is an empty ledger.
    pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let seen = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("read link ledger: {}", path.display()))?;
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect()
        } else {
            HashSet::new()
        };

        tracing::debug!(path = %path.display(), links = seen.len(), "loaded link ledger");
        Ok(Self { path, seen })
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Appends `url` to the file and marks it seen for the rest of the run.
    pub fn record(&mut self, url: &str) -> anyhow::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open link ledger: {}", self.path.display()))?;
        writeln!(file, "{url}")
            .with_context(|| format!("append link ledger: {}", self.path.display()))?;
        self.seen.insert(url.to_owned());
        Ok(())
    }
}
