//! Domain layer - Core types with no external dependencies
//!
//! This layer contains:
//! - Entities: Catalog categories, entries, emoji assets, slash commands
//! - Traits: Abstractions for infrastructure (Catalog, Platform, Progress)

pub mod entities;
pub mod traits;
