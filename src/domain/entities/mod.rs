//! Domain entities - Core objects with no external dependencies

pub mod category;
pub mod emoji;
pub mod command;

pub use category::Category;
pub use emoji::{CatalogEntry, EmojiAsset};
pub use command::{Invocation, SlashCommand, SYNC_TRIGGER};
