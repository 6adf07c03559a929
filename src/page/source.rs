use crate::error::PageError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Where the widget reads the current document from.
///
/// Sources are re-read on every load so edits to the underlying page show up
/// in the next context snapshot.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Raw HTML of the current document.
    async fn load(&self) -> Result<String, PageError>;

    /// Address reported as the current page, when there is one.
    fn location(&self) -> Option<String> {
        None
    }
}

/// In-memory HTML, mostly for tests and embedding.
pub struct StaticPage {
    html: String,
    location: Option<String>,
}

impl StaticPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

#[async_trait]
impl PageSource for StaticPage {
    async fn load(&self) -> Result<String, PageError> {
        Ok(self.html.clone())
    }

    fn location(&self) -> Option<String> {
        self.location.clone()
    }
}

/// HTML file on disk.
pub struct FilePage {
    path: PathBuf,
}

impl FilePage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PageSource for FilePage {
    async fn load(&self) -> Result<String, PageError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| PageError::Read {
                path: self.path.display().to_string(),
                source,
            })
    }

    fn location(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }
}

/// Page served over HTTP(S).
pub struct RemotePage {
    url: Url,
    client: reqwest::Client,
}

impl RemotePage {
    pub fn new(url: Url) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("Hannah/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { url, client }
    }
}

#[async_trait]
impl PageSource for RemotePage {
    async fn load(&self) -> Result<String, PageError> {
        let fetch_err = |e: reqwest::Error| PageError::Fetch {
            url: self.url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(self.url.as_str())
            .send()
            .await
            .map_err(fetch_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageError::Fetch {
                url: self.url.to_string(),
                message: format!("HTTP {status}"),
            });
        }

        response.text().await.map_err(fetch_err)
    }

    fn location(&self) -> Option<String> {
        Some(self.url.to_string())
    }
}

/// Pick a source for a CLI-style location: `http(s)://` URLs are fetched,
/// anything else is treated as a file path.
pub fn page_source_for(location: &str) -> Result<Box<dyn PageSource>, PageError> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err(PageError::Location("empty page location".into()));
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        let url = Url::parse(trimmed).map_err(|e| PageError::Location(format!("{trimmed}: {e}")))?;
        return Ok(Box::new(RemotePage::new(url)));
    }

    Ok(Box::new(FilePage::new(trimmed)))
}
