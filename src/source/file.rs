//! Local item file source (YAML or JSON).

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::ItemSource;
use crate::domain::Item;
use crate::error::{KondateError, Result};

/// Reads a list of items from a file.
///
/// ```yaml
/// - name: grilled mackerel
///   categories: [fish]
///   メモ: salt only
/// ```
#[derive(Debug, Clone)]
pub struct FileItemSource {
    path: PathBuf,
}

impl FileItemSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn is_json(&self) -> bool {
        self.path.extension().is_some_and(|ext| ext == "json")
    }

    fn parse(&self, content: &str) -> Result<Vec<Item>> {
        let items: Vec<Item> = if self.is_json() {
            serde_json::from_str(content)?
        } else {
            serde_yaml::from_str(content)?
        };
        Ok(items)
    }
}

#[async_trait]
impl ItemSource for FileItemSource {
    async fn fetch(&self) -> Result<Vec<Item>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| {
                KondateError::Source(format!("failed to read {}: {}", self.path.display(), e))
            })?;
        let items = self.parse(&content)?;
        log::info!("Loaded {} items from {}", items.len(), self.path.display());
        Ok(items)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
