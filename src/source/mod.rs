//! Item sources.
//!
//! A source supplies the full, ordered item list once per run. Item order is
//! preserved because it defines rotation order within each category.

mod file;
mod notion;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::config::{SourceConfig, SourceKind};
use crate::domain::Item;
use crate::error::Result;

pub use file::FileItemSource;
pub use notion::NotionItemSource;

/// Supplies menu items for one run.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Item>>;

    /// Short description for log and terminal output.
    fn describe(&self) -> String;
}

/// Fixed item list, for tests and callers that already hold the items.
#[derive(Debug, Clone, Default)]
pub struct StaticItemSource {
    items: Vec<Item>,
}

impl StaticItemSource {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl ItemSource for StaticItemSource {
    async fn fetch(&self) -> Result<Vec<Item>> {
        Ok(self.items.clone())
    }

    fn describe(&self) -> String {
        format!("{} static items", self.items.len())
    }
}

/// Build the configured source. `items_override` forces a file source.
pub fn from_config(
    config: &SourceConfig,
    items_override: Option<&PathBuf>,
) -> Result<Box<dyn ItemSource>> {
    if let Some(path) = items_override {
        return Ok(Box::new(FileItemSource::new(path)));
    }
    match config.kind {
        SourceKind::File => Ok(Box::new(FileItemSource::new(&config.path))),
        SourceKind::Notion => Ok(Box::new(NotionItemSource::new(config.notion.clone())?)),
    }
}
