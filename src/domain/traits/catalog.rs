use async_trait::async_trait;

use crate::application::errors::FetchError;
use crate::domain::entities::{CatalogEntry, Category};

/// Catalog trait - source of emoji metadata and GIF payloads
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch and parse the list document of a category
    async fn fetch_list(&self, category: Category) -> Result<Vec<CatalogEntry>, FetchError>;

    /// Fetch the raw GIF bytes of an entry
    async fn fetch_asset(&self, entry: &CatalogEntry, category: Category) -> Result<Vec<u8>, FetchError>;
}
