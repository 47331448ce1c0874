//! Notion database item source.
//!
//! Queries a database page by page and maps each row to an `Item`:
//! title property → name, select/multi-select property → categories,
//! configured text properties → payload.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;

use super::ItemSource;
use crate::config::NotionConfig;
use crate::domain::Item;
use crate::error::{KondateError, Result};

/// Rows requested per query (Notion's maximum)
const PAGE_SIZE: u32 = 100;

/// Item source backed by a Notion database.
pub struct NotionItemSource {
    client: Client,
    token: String,
    database_id: String,
    config: NotionConfig,
}

impl NotionItemSource {
    /// Create a source, reading the token and database id from the environment.
    pub fn new(config: NotionConfig) -> Result<Self> {
        let token = std::env::var(&config.token_env)
            .map_err(|_| KondateError::Source(format!("{} not set", config.token_env)))?;
        let database_id = match &config.database_id {
            Some(id) => id.clone(),
            None => std::env::var(&config.database_id_env)
                .map_err(|_| KondateError::Source(format!("{} not set", config.database_id_env)))?,
        };
        Self::with_credentials(token, database_id, config)
    }

    /// Create a source with explicit credentials.
    pub fn with_credentials(
        token: String,
        database_id: String,
        config: NotionConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| KondateError::Source(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token,
            database_id,
            config,
        })
    }

    fn query_url(&self) -> String {
        format!(
            "{}/databases/{}/query",
            self.config.base_url.trim_end_matches('/'),
            self.database_id
        )
    }

    /// Build the query body for one page of results.
    fn build_query(&self, cursor: Option<&str>) -> Value {
        let mut body = json!({ "page_size": PAGE_SIZE });

        if let Some(property) = &self.config.enabled_property {
            body["filter"] = json!({
                "property": property,
                "checkbox": { "equals": true }
            });
        }

        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }

        body
    }

    async fn send_query(&self, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(self.query_url())
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.config.api_version)
            .json(body)
            .send()
            .await
            .map_err(|e| KondateError::Source(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(KondateError::Source(format!(
                "Notion API error {}: {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| KondateError::Source(format!("Failed to parse response: {}", e)))
    }

    /// Map one result row to an item. Rows without a title are skipped.
    fn parse_page(&self, page: &Value) -> Option<Item> {
        let properties = page.get("properties")?;

        let name = plain_text(properties.get(&self.config.title_property)?.get("title")?);
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let categories = category_names(properties.get(&self.config.category_property));
        let mut item = Item::new(name, categories);
        for key in &self.config.payload_properties {
            if let Some(text) = properties.get(key).and_then(property_text)
                && !text.is_empty()
            {
                item = item.with_field(key.clone(), text);
            }
        }
        Some(item)
    }

    fn parse_results(&self, body: &Value, items: &mut Vec<Item>) {
        for page in body["results"].as_array().into_iter().flatten() {
            match self.parse_page(page) {
                Some(item) => items.push(item),
                None => {
                    let page_id = page["id"].as_str().unwrap_or("?");
                    tracing::warn!(page_id, "Skipping row without a title");
                }
            }
        }
    }
}

#[async_trait]
impl ItemSource for NotionItemSource {
    async fn fetch(&self) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0;

        loop {
            let body = self.send_query(&self.build_query(cursor.as_deref())).await?;
            pages += 1;
            self.parse_results(&body, &mut items);

            let has_more = body["has_more"].as_bool().unwrap_or(false);
            tracing::debug!(pages, items = items.len(), has_more, "Fetched Notion page");

            cursor = next_cursor(&body, cursor.as_deref());
            if cursor.is_none() {
                break;
            }
        }

        log::info!("Fetched {} items from Notion database {}", items.len(), self.database_id);
        Ok(items)
    }

    fn describe(&self) -> String {
        format!("notion database {}", self.database_id)
    }
}

impl std::fmt::Debug for NotionItemSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionItemSource")
            .field("database_id", &self.database_id)
            .field("api_version", &self.config.api_version)
            .finish()
    }
}

/// Cursor for the following page; `None` once pagination is done.
///
/// A server that hands back the cursor it was just sent would loop forever.
fn next_cursor(body: &Value, sent: Option<&str>) -> Option<String> {
    if !body["has_more"].as_bool().unwrap_or(false) {
        return None;
    }
    let next = body["next_cursor"].as_str()?;
    if sent == Some(next) {
        tracing::warn!(cursor = next, "Notion repeated the previous cursor; stopping");
        return None;
    }
    Some(next.to_string())
}

/// Concatenate the `plain_text` of a rich-text array.
fn plain_text(value: &Value) -> String {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|part| {
            part["plain_text"]
                .as_str()
                .or_else(|| part["text"]["content"].as_str())
        })
        .collect()
}

fn category_names(property: Option<&Value>) -> Vec<String> {
    let Some(property) = property else {
        return Vec::new();
    };
    if let Some(options) = property["multi_select"].as_array() {
        return options
            .iter()
            .filter_map(|o| o["name"].as_str().map(str::to_string))
            .collect();
    }
    property["select"]["name"]
        .as_str()
        .map(|name| vec![name.to_string()])
        .unwrap_or_default()
}

fn property_text(property: &Value) -> Option<String> {
    match property["type"].as_str()? {
        "rich_text" => Some(plain_text(&property["rich_text"])),
        "title" => Some(plain_text(&property["title"])),
        "url" => property["url"].as_str().map(str::to_string),
        "select" => property["select"]["name"].as_str().map(str::to_string),
        _ => None,
    }
}
