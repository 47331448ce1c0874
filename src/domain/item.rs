//! Menu items and the category pools derived from them.
//!
//! Items are supplied fresh on every run by an item source. Pools keep the
//! order the source supplied, because that order is the rotation order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A single menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawItem")]
pub struct Item {
    /// Unique key; also the calendar entry title
    pub name: String,

    /// Categories this item can be scheduled under
    #[serde(default, rename = "categories")]
    pub category_tags: BTreeSet<String>,

    /// Opaque free-text fields (recipe notes, links, ...)
    #[serde(flatten)]
    pub payload: BTreeMap<String, String>,
}

/// Item as written in a menu file; extra fields may be any YAML/JSON value.
#[derive(Deserialize)]
struct RawItem {
    name: String,

    #[serde(default)]
    categories: BTreeSet<String>,

    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

impl From<RawItem> for Item {
    fn from(raw: RawItem) -> Self {
        let mut payload = BTreeMap::new();
        for (key, value) in raw.extra {
            match scalar_text(&value) {
                Some(text) => {
                    payload.insert(key, text);
                }
                None if value.is_null() => {}
                None => {
                    log::warn!("Item '{}': ignoring non-scalar field '{}'", raw.name, key);
                }
            }
        }

        Self {
            name: raw.name,
            category_tags: raw.categories,
            payload,
        }
    }
}

fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl Item {
    /// Create an item with the given name and category tags.
    pub fn new<I, S>(name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            category_tags: tags.into_iter().map(Into::into).collect(),
            payload: BTreeMap::new(),
        }
    }

    /// Attach a payload field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.category_tags.contains(tag)
    }

    /// Look up a payload field by key.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.payload.get(key).map(String::as_str)
    }
}

/// Ordered candidate lists keyed by category.
///
/// An item carrying several tags appears in several pools.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPools {
    pools: BTreeMap<String, Vec<Item>>,
}

impl CategoryPools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build pools from items in supplied order.
    pub fn from_items(items: &[Item]) -> Self {
        let mut pools = Self::new();
        for item in items {
            if item.category_tags.is_empty() {
                log::warn!("Item '{}' has no categories and will never be scheduled", item.name);
                continue;
            }
            for tag in &item.category_tags {
                pools.pools.entry(tag.clone()).or_default().push(item.clone());
            }
        }
        pools
    }

    /// Replace the pool for a category.
    pub fn insert(&mut self, category: impl Into<String>, items: Vec<Item>) {
        self.pools.insert(category.into(), items);
    }

    /// The pool for a category, if any item carries that tag.
    pub fn get(&self, category: &str) -> Option<&[Item]> {
        self.pools.get(category).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_builder() {
        let item = Item::new("curry", ["stew", "spicy"]).with_field("notes", "use leftover rice");
        assert!(item.has_tag("stew"));
        assert!(!item.has_tag("fish"));
        assert_eq!(item.field("notes"), Some("use leftover rice"));
        assert_eq!(item.field("missing"), None);
    }

    #[test]
    fn test_item_deserializes_payload_fields() {
        let yaml = "name: grilled mackerel\ncategories: [fish, grill]\nnotes: salt only\n";
        let item: Item = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(item.name, "grilled mackerel");
        assert_eq!(item.category_tags.len(), 2);
        assert_eq!(item.field("notes"), Some("salt only"));
    }

    #[test]
    fn test_item_stringifies_scalar_fields() {
        let yaml = "- name: curry\n  categories: [meat]\n  servings: 4\n  favorite: true\n";
        let items: Vec<Item> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(items[0].field("servings"), Some("4"));
        assert_eq!(items[0].field("favorite"), Some("true"));
    }

    #[test]
    fn test_item_skips_nested_and_null_fields() {
        let yaml = concat!(
            "name: ramen\ncategories: [noodles]\n",
            "toppings: [egg, nori]\nsource: ~\nnotes: shoyu\n",
        );
        let item: Item = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(item.field("notes"), Some("shoyu"));
        assert_eq!(item.field("toppings"), None);
        assert_eq!(item.field("source"), None);
        assert_eq!(item.payload.len(), 1);
    }

    #[test]
    fn test_item_json_numeric_field() {
        let json = r#"{"name": "saba", "categories": ["fish"], "minutes": 20}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.field("minutes"), Some("20"));
        assert!(item.has_tag("fish"));
    }

    #[test]
    fn test_pools_preserve_supplied_order() {
        let items = vec![
            Item::new("z", ["a"]),
            Item::new("x", ["a", "b"]),
            Item::new("y", ["a"]),
        ];
        let pools = CategoryPools::from_items(&items);

        let a: Vec<&str> = pools.get("a").unwrap().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(a, vec!["z", "x", "y"]);

        let b: Vec<&str> = pools.get("b").unwrap().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(b, vec!["x"]);
    }

    #[test]
    fn test_pools_skip_untagged_items() {
        let items = vec![Item::new("orphan", Vec::<String>::new()), Item::new("x", ["a"])];
        let pools = CategoryPools::from_items(&items);
        assert_eq!(pools.len(), 1);
        assert_eq!(pools.categories().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_pools_missing_category() {
        let pools = CategoryPools::from_items(&[Item::new("x", ["a"])]);
        assert!(pools.get("b").is_none());
        assert!(!pools.is_empty());
    }
}
