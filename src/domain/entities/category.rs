use std::fmt;

/// A partition of the Party Parrot catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Parrots,
    Flags,
    Guests,
}

impl Category {
    /// Every category, in sync order
    pub const ALL: [Category; 3] = [Category::Parrots, Category::Flags, Category::Guests];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Parrots => "parrots",
            Category::Flags => "flags",
            Category::Guests => "guests",
        }
    }

    /// Path of the list document, relative to the catalog root
    pub fn list_path(&self) -> String {
        format!("{}.yaml", self.as_str())
    }

    /// Path of an asset, relative to the catalog root
    pub fn asset_path(&self, source_path: &str) -> String {
        format!("{}/{}", self.as_str(), source_path)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_order() {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["parrots", "flags", "guests"]);
    }

    #[test]
    fn test_paths() {
        assert_eq!(Category::Flags.list_path(), "flags.yaml");
        assert_eq!(Category::Parrots.asset_path("hd/parrot.gif"), "parrots/hd/parrot.gif");
    }
}
