use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const UNKNOWN_TITLE: &str = "Unknown";

#[derive(Debug, Default, Deserialize)]
struct CategoriesFile {
    #[serde(default)]
    title: HashMap<String, String>,
}

/// Category or subcategory id -> display title. Read-only once loaded.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CategoryTitles {
    titles: HashMap<String, String>,
}

impl CategoryTitles {
    pub fn new(titles: HashMap<String, String>) -> Self {
        Self { titles }
    }

    /// Loads the `[title]` table of a TOML file. A missing file yields an
    /// empty mapping; an unreadable or malformed one is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Categories file not found, every feed will be titled \"{}\"",
                UNKNOWN_TITLE
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read categories file {}", path.display()))?;
        let titles = Self::parse(&content)
            .with_context(|| format!("Failed to parse categories file {}", path.display()))?;

        tracing::info!(path = %path.display(), count = titles.len(), "Category titles loaded");
        Ok(titles)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: CategoriesFile = toml::from_str(content)?;
        Ok(Self::new(file.title))
    }

    pub fn title_for(&self, id: Option<&str>) -> &str {
        id.and_then(|id| self.titles.get(id))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_TITLE)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
