//! Party Parrot catalog client
//!
//! The catalog is a set of static files: one YAML list per category plus
//! the GIFs the lists point at.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::errors::FetchError;
use crate::domain::entities::{CatalogEntry, Category};
use crate::domain::traits::Catalog;
use crate::infrastructure::config::DEFAULT_CATALOG_URL;

/// One element of a category list document
#[derive(Debug, Deserialize)]
struct ListItem {
    #[serde(default)]
    gif: Option<String>,
    #[serde(default)]
    hd: Option<String>,
}

impl ListItem {
    /// `gif` wins over `hd`; empty strings count as missing
    fn source_path(self) -> Option<String> {
        self.gif
            .filter(|p| !p.is_empty())
            .or_else(|| self.hd.filter(|p| !p.is_empty()))
    }
}

/// Parse a list document into catalog entries
pub fn parse_list(document: &str) -> Result<Vec<CatalogEntry>, FetchError> {
    let items: Vec<ListItem> = serde_yaml::from_str(document)
        .map_err(|e| FetchError::Parse(e.to_string()))?;

    Ok(items
        .into_iter()
        .filter_map(|item| match item.source_path() {
            Some(path) => Some(CatalogEntry::from_source_path(path)),
            None => {
                tracing::debug!("Skipping catalog item without gif or hd path");
                None
            }
        })
        .collect())
}

/// HTTP catalog rooted at a base URL
pub struct GitHubCatalog {
    client: Client,
    base_url: String,
}

impl GitHubCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

impl Default for GitHubCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_URL)
    }
}

#[async_trait]
impl Catalog for GitHubCatalog {
    async fn fetch_list(&self, category: Category) -> Result<Vec<CatalogEntry>, FetchError> {
        let url = self.url(&category.list_path());
        tracing::debug!("GET {}", url);

        let body = self.get(&url)
            .await?
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        parse_list(&body)
    }

    async fn fetch_asset(&self, entry: &CatalogEntry, category: Category) -> Result<Vec<u8>, FetchError> {
        let url = self.url(&category.asset_path(&entry.source_path));
        tracing::debug!("GET {}", url);

        let bytes = self.get(&url)
            .await?
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
