//! Content sink: deterministic URL-to-path mapping and file persistence
//!
//! Every successfully fetched in-domain URL produces exactly one file in the
//! flat data directory. Writes overwrite; nothing is versioned or appended.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use url::Url;

/// The kind of document being persisted, which selects the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Extracted plain text from an HTML page
    Text,

    /// Raw bytes of a PDF document
    Pdf,
}

impl DocumentKind {
    /// File extension for this kind of document
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Pdf => "pdf",
        }
    }
}

/// Persists extracted content and the external-link log
///
/// Filenames derive deterministically from the URL's host and path; two
/// distinct URLs whose host and path collapse to the same sanitized name
/// overwrite each other.
pub struct ContentSink {
    data_dir: PathBuf,
    external_links_path: PathBuf,
    // Serializes appends from concurrent crawl tasks
    external_log: Mutex<()>,
}

impl ContentSink {
    /// Creates a sink rooted at `data_dir`, creating the directory if absent
    pub fn new(data_dir: &Path, external_links_path: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        if let Some(parent) = external_links_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            external_links_path: external_links_path.to_path_buf(),
            external_log: Mutex::new(()),
        })
    }

    /// Derives the filesystem path for a URL's stored document
    ///
    /// The base name is `<host>_<sanitized-path>`, where the path has its
    /// leading and trailing slashes trimmed and interior slashes replaced
    /// with underscores; an empty path becomes the sentinel `index`.
    pub fn derive_path(&self, url: &Url, kind: DocumentKind) -> PathBuf {
        let host = url.host_str().unwrap_or("unknown-host");
        let sanitized = sanitize_url_path(url.path());
        self.data_dir
            .join(format!("{}_{}.{}", host, sanitized, kind.extension()))
    }

    /// Persists extracted page text, overwriting any existing file
    pub fn write_text(&self, url: &Url, text: &str) -> std::io::Result<PathBuf> {
        let path = self.derive_path(url, DocumentKind::Text);
        std::fs::write(&path, text)?;
        Ok(path)
    }

    /// Persists raw PDF bytes, overwriting any existing file
    pub fn write_pdf(&self, url: &Url, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.derive_path(url, DocumentKind::Pdf);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Appends one out-of-domain URL to the external-link log
    ///
    /// The log is append-only and not deduplicated; a URL referenced from
    /// many pages appears once per reference.
    pub fn log_external(&self, url: &Url) -> std::io::Result<()> {
        let _guard = self.external_log.lock().unwrap();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.external_links_path)?;
        writeln!(file, "{}", url)?;
        Ok(())
    }
}

/// Sanitizes a URL path into a single filename segment
fn sanitize_url_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return "index".to_string();
    }
    trimmed.replace('/', "_")
}
