//! Page sources.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SourceError;

/// Somewhere the storefront page HTML can be read from.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Read the current page HTML.
    async fn fetch(&self) -> Result<String, SourceError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Reads the page from a local file on every pass.
#[derive(Debug, Clone)]
pub struct FilePageSource {
    path: PathBuf,
}

impl FilePageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PageSource for FilePageSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches the page over HTTP(S) on every pass.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
    url: String,
}

impl HttpPageSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("seur-shipping/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Holds the page in memory; the host replaces it as the page changes.
#[derive(Debug, Default)]
pub struct MemoryPageSource {
    html: Mutex<String>,
}

impl MemoryPageSource {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: Mutex::new(html.into()),
        }
    }

    /// Replace the page contents.
    pub fn set(&self, html: impl Into<String>) {
        let mut guard = self.html.lock().unwrap_or_else(|e| e.into_inner());
        *guard = html.into();
    }
}

#[async_trait]
impl PageSource for MemoryPageSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        let guard = self.html.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[async_trait]
impl<S: PageSource + ?Sized> PageSource for std::sync::Arc<S> {
    async fn fetch(&self) -> Result<String, SourceError> {
        (**self).fetch().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Whether `location` names an HTTP(S) URL rather than a file path.
pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Pick a source for `location`: URLs are fetched, anything else is a file.
pub fn page_source(location: &str, timeout: Duration) -> Result<Box<dyn PageSource>, SourceError> {
    if is_url(location) {
        Ok(Box::new(HttpPageSource::new(location, timeout)?))
    } else {
        Ok(Box::new(FilePageSource::new(location)))
    }
}
