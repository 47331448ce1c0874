//! Item source settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Local YAML or JSON item list
    #[default]
    File,
    /// Notion database
    Notion,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,

    /// Item file for the `file` source.
    pub path: PathBuf,

    pub notion: NotionConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::File,
            path: PathBuf::from("menu.yml"),
            notion: NotionConfig::default(),
        }
    }
}

/// Notion database source settings.
///
/// Credentials are read from the named environment variables when the
/// source is constructed, never stored in the file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NotionConfig {
    pub base_url: String,
    pub api_version: String,

    /// Environment variable holding the integration token.
    pub token_env: String,

    /// Database id; falls back to `database-id-env` when unset.
    pub database_id: Option<String>,
    pub database_id_env: String,

    /// Title property holding the item name.
    pub title_property: String,

    /// Select or multi-select property holding the categories.
    pub category_property: String,

    /// Checkbox property; only checked rows are fetched.
    pub enabled_property: Option<String>,

    /// Text properties copied into the item payload.
    pub payload_properties: Vec<String>,

    pub timeout_ms: u64,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.notion.com/v1".to_string(),
            api_version: "2022-06-28".to_string(),
            token_env: "NOTION_TOKEN".to_string(),
            database_id: None,
            database_id_env: "NOTION_DATABASE_ID".to_string(),
            title_property: "献立名".to_string(),
            category_property: "カテゴリ".to_string(),
            enabled_property: Some("有効".to_string()),
            payload_properties: vec!["メモ".to_string()],
            timeout_ms: 30_000,
        }
    }
}
