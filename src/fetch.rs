//! Sources for dropped images.
//!
//! Local paths are read directly. Remote URLs go through a [`Fetcher`]
//! supplied by the host; the board ships no network client of its own.

use crate::error::{BoardError, BoardResult};
use std::fs;
use std::path::{Path, PathBuf};

/// One dropped reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropSource {
    Path(PathBuf),
    Url(String),
}

impl DropSource {
    /// Classify a dropped string. `file://` URLs become paths.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(path) = raw.strip_prefix("file://") {
            return DropSource::Path(PathBuf::from(path));
        }
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DropSource::Url(raw.to_string())
        } else {
            DropSource::Path(PathBuf::from(raw))
        }
    }

    /// Display label used in reports and as the item path.
    pub fn label(&self) -> String {
        match self {
            DropSource::Path(path) => path.display().to_string(),
            DropSource::Url(url) => url.clone(),
        }
    }

    /// Extension-like hint for the decoder, if the source names one.
    pub fn format_hint(&self) -> Option<String> {
        let name = match self {
            DropSource::Path(path) => path.to_string_lossy().into_owned(),
            DropSource::Url(url) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
        };
        Path::new(&name)
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
    }
}

/// Bytes fetched from a remote source.
#[derive(Debug, Clone)]
pub struct FetchedBytes {
    pub bytes: Vec<u8>,
    /// Local file the collaborator spooled the bytes to, if any
    pub temp_path: Option<PathBuf>,
}

/// Remote byte source implemented by the host.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> anyhow::Result<FetchedBytes>;
}

/// Fetcher for hosts without network access. Every URL fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineFetcher;

impl Fetcher for OfflineFetcher {
    fn fetch(&self, url: &str) -> anyhow::Result<FetchedBytes> {
        anyhow::bail!("network access is not available for {url}")
    }
}

/// Read the bytes behind `source`.
pub fn read_source(source: &DropSource, fetcher: &dyn Fetcher) -> BoardResult<Vec<u8>> {
    match source {
        DropSource::Path(path) => Ok(fs::read(path)?),
        DropSource::Url(url) => fetcher
            .fetch(url)
            .map(|fetched| fetched.bytes)
            .map_err(|error| BoardError::Fetch {
                source_name: url.clone(),
                error,
            }),
    }
}
