use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};
use tracing::debug;

const CACHE_SUBDIR: &str = "responses";

/// On-disk cache of report bodies keyed by request URL, for repeated runs
/// during development. All failures degrade to a cache miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// Cache under the platform user cache directory
    /// (e.g. `~/.cache/uptake-guard/responses` on Linux).
    #[must_use]
    pub fn in_user_cache_dir(ttl: Duration) -> Option<Self> {
        directories::ProjectDirs::from("", "", "uptake-guard")
            .map(|dirs| Self::new(dirs.cache_dir().join(CACHE_SUBDIR), ttl))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cached body for `url`, if present and younger than the TTL.
    #[must_use]
    pub fn read(&self, url: &str) -> Option<String> {
        let path = self.file_path(url);
        if !self.is_fresh(&path) {
            return None;
        }
        let body = fs::read_to_string(&path).ok()?;
        debug!(path = %path.display(), "using cached response");
        Some(body)
    }

    /// Store `body` for `url`. Returns `None` if the write failed.
    pub fn write(&self, url: &str, body: &str) -> Option<()> {
        fs::create_dir_all(&self.dir).ok()?;
        let path = self.file_path(url);
        let mut file = fs::File::create(&path).ok()?;
        file.write_all(body.as_bytes()).ok()?;
        debug!(path = %path.display(), "cached response");
        Some(())
    }

    fn file_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hash_url(url)))
    }

    fn is_fresh(&self, path: &Path) -> bool {
        let Ok(metadata) = fs::metadata(path) else {
            return false;
        };
        let Ok(modified) = metadata.modified() else {
            return false;
        };
        let Ok(elapsed) = SystemTime::now().duration_since(modified) else {
            return false;
        };
        elapsed < self.ttl
    }
}

/// SHA-256 of the URL, hex encoded. Keeps API keys out of file names.
fn hash_url(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
