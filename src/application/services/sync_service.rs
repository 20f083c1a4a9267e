//! Catalog to platform emoji sync

use crate::application::errors::CreateError;
use crate::application::services::session::Session;
use crate::domain::entities::{CatalogEntry, Category, EmojiAsset};
use crate::domain::traits::{Catalog, Progress};

pub const START_MESSAGE: &str = "Starting Party Parrots sync...";
pub const DONE_MESSAGE: &str = "Party Parrots sync done! Enjoy :partyparrot:";

/// Appended once to a name that clashes with a system emoji
const FALLBACK_SUFFIX: char = '2';

/// What happened to a single catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    Created,
    Skipped,
    Failed,
    /// Creation was refused because the session's credentials are no longer valid
    Unauthorized,
}

/// Counters for one sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
    pub categories_failed: usize,
    /// Set when the platform rejected our credentials during the run
    pub unauthorized: bool,
}

impl SyncSummary {
    fn record(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Created => self.created += 1,
            EntryOutcome::Skipped => self.skipped += 1,
            EntryOutcome::Failed => self.failed += 1,
            EntryOutcome::Unauthorized => {
                self.failed += 1;
                self.unauthorized = true;
            }
        }
    }
}

/// Drives one sync: every category, every entry, in catalog order
pub struct SyncService<C: Catalog> {
    catalog: C,
}

impl<C: Catalog> SyncService<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Run a full sync. Failures are logged and skipped, never returned.
    pub async fn run(&self, session: &Session, progress: &dyn Progress) -> SyncSummary {
        let mut summary = SyncSummary::default();
        progress.update(START_MESSAGE).await;

        for category in Category::ALL {
            tracing::info!("Fetching gif list for {}.", category);
            let entries = match self.catalog.fetch_list(category).await {
                Ok(entries) => entries,
                Err(e) => {
                    // Try the next category
                    tracing::error!(error = %e, "Could not fetch gif list for type {}", category);
                    summary.categories_failed += 1;
                    continue;
                }
            };

            let total = entries.len();
            for (i, entry) in entries.iter().enumerate() {
                let outcome = self.sync_entry(session, entry, category).await;
                summary.record(outcome);
                progress
                    .update(&format!("Processing emoji {} of {} from type {}", i + 1, total, category))
                    .await;
            }
        }

        progress.update(DONE_MESSAGE).await;
        tracing::info!(
            created = summary.created,
            skipped = summary.skipped,
            failed = summary.failed,
            categories_failed = summary.categories_failed,
            "Party Parrots sync finished"
        );
        summary
    }

    async fn sync_entry(&self, session: &Session, entry: &CatalogEntry, category: Category) -> EntryOutcome {
        if self.emoji_exists(session, &entry.name).await {
            tracing::info!("Emoji :{}: already exists. Skipping.", entry.name);
            return EntryOutcome::Skipped;
        }

        tracing::info!("Fetching gif for {}.", entry.name);
        let image = match self.catalog.fetch_asset(entry, category).await {
            Ok(image) => image,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch {}", entry.name);
                return EntryOutcome::Failed;
            }
        };
        let asset = EmojiAsset::new(entry.clone(), image);

        match self.create(session, &asset).await {
            Ok(()) => EntryOutcome::Created,
            Err(CreateError::SystemNameConflict(_)) => self.create_fallback(session, asset).await,
            Err(e) => Self::creation_failed(asset.name(), e),
        }
    }

    /// Single retry under `<name>2`; no further variants are tried
    async fn create_fallback(&self, session: &Session, asset: EmojiAsset) -> EntryOutcome {
        let name = format!("{}{}", asset.name(), FALLBACK_SUFFIX);
        tracing::info!("Name {} is taken by a system emoji, trying {}.", asset.name(), name);
        let asset = EmojiAsset::new(asset.entry.renamed(name), asset.image);

        if self.emoji_exists(session, asset.name()).await {
            tracing::info!("Emoji :{}: already exists. Skipping.", asset.name());
            return EntryOutcome::Skipped;
        }

        match self.create(session, &asset).await {
            Ok(()) => EntryOutcome::Created,
            Err(e) => Self::creation_failed(asset.name(), e),
        }
    }

    fn creation_failed(name: &str, error: CreateError) -> EntryOutcome {
        tracing::error!("Could not create emoji {}: {}", name, error);
        match error {
            CreateError::Rejected { status: 401, .. } => EntryOutcome::Unauthorized,
            _ => EntryOutcome::Failed,
        }
    }

    async fn create(&self, session: &Session, asset: &EmojiAsset) -> Result<(), CreateError> {
        session
            .platform
            .create_emoji(&asset.image, asset.name(), &session.user_id)
            .await?;
        tracing::info!("Created emoji :{}:", asset.name());
        Ok(())
    }

    /// Lookup failures count as "absent" so creation still gets a chance
    async fn emoji_exists(&self, session: &Session, name: &str) -> bool {
        match session.platform.emoji_exists(name).await {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!(error = %e, "Emoji lookup for {} failed", name);
                false
            }
        }
    }
}
