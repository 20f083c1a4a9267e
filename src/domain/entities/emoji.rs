/// A record parsed from a catalog list document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Emoji name, derived from the file name
    pub name: String,
    /// Path of the GIF, relative to the category directory
    pub source_path: String,
}

impl CatalogEntry {
    /// Build an entry whose name is the last path segment without its `.gif` suffix
    pub fn from_source_path(source_path: impl Into<String>) -> Self {
        let source_path = source_path.into();
        let file = source_path.rsplit('/').next().unwrap_or_default();
        let name = file.strip_suffix(".gif").unwrap_or(file).to_string();
        Self { name, source_path }
    }

    /// Same entry under another name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_path: self.source_path.clone(),
        }
    }
}

/// A catalog entry with its GIF payload resolved
#[derive(Debug, Clone)]
pub struct EmojiAsset {
    pub entry: CatalogEntry,
    pub image: Vec<u8>,
}

impl EmojiAsset {
    pub fn new(entry: CatalogEntry, image: Vec<u8>) -> Self {
        Self { entry, image }
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_nested_path() {
        let entry = CatalogEntry::from_source_path("hd/parrot.gif");
        assert_eq!(entry.name, "parrot");
        assert_eq!(entry.source_path, "hd/parrot.gif");
    }

    #[test]
    fn test_name_from_flat_path() {
        assert_eq!(CatalogEntry::from_source_path("fastparrot.gif").name, "fastparrot");
    }

    #[test]
    fn test_only_one_suffix_stripped() {
        assert_eq!(CatalogEntry::from_source_path("a/b/odd.gif.gif").name, "odd.gif");
    }

    #[test]
    fn test_non_gif_keeps_extension() {
        assert_eq!(CatalogEntry::from_source_path("hd/parrot.png").name, "parrot.png");
    }

    #[test]
    fn test_renamed_keeps_source() {
        let entry = CatalogEntry::from_source_path("hd/parrot.gif").renamed("parrot2");
        assert_eq!(entry.name, "parrot2");
        assert_eq!(entry.source_path, "hd/parrot.gif");
    }
}
