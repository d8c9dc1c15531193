//! Core type definitions for catalog

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier of a category as served by the backend.
///
/// Backends hand out either numeric or string keys. The two are never
/// coerced into each other: `1` and `"1"` are different categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryId {
    Int(i64),
    Str(String),
}

impl CategoryId {
    /// Parse an identifier typed by a user; digits become `Int`
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => CategoryId::Int(n),
            Err(_) => CategoryId::Str(trimmed.to_string()),
        }
    }
}

impl From<i64> for CategoryId {
    fn from(n: i64) -> Self {
        CategoryId::Int(n)
    }
}

impl From<i32> for CategoryId {
    fn from(n: i32) -> Self {
        CategoryId::Int(i64::from(n))
    }
}

impl From<u32> for CategoryId {
    fn from(n: u32) -> Self {
        CategoryId::Int(i64::from(n))
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        CategoryId::Str(s.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(s: String) -> Self {
        CategoryId::Str(s)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryId::Int(n) => write!(f, "{}", n),
            CategoryId::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Descriptive fields of a category that the hierarchy code never interprets
/// (name, slug, icon, listing counts...). Carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Attributes {
    /// Create empty attributes
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are no attributes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Get a string value by key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key)?.as_str()
    }

    /// Set a value by key
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.data.insert(key.into(), v);
        }
    }

    /// Remove a value by key
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }
}

/// A flat category entity as delivered by the category service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Unique identifier
    pub category_id: CategoryId,
    /// Parent identifier; `None` for a root
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    /// Every other field of the record
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl CategoryRecord {
    /// Create a root record
    pub fn new(category_id: impl Into<CategoryId>) -> Self {
        Self {
            category_id: category_id.into(),
            parent_id: None,
            attributes: Attributes::new(),
        }
    }

    /// Set the parent identifier
    pub fn with_parent(mut self, parent_id: impl Into<CategoryId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set a descriptive attribute
    pub fn with_attribute<T: Serialize>(mut self, key: impl Into<String>, value: T) -> Self {
        self.attributes.set(key, value);
        self
    }

    /// A record is a root iff it has no parent
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Display label taken from `field`, falling back to the identifier
    pub fn label(&self, field: &str) -> String {
        match self.attributes.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => self.category_id.to_string(),
            Some(other) => other.to_string(),
        }
    }

    /// Try to read a record from an arbitrary JSON value
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

/// Unique identifier for a stored snapshot
/// Format: YYYYMMDDHHMMSS-<8 hex digits of the content digest>
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotId(pub String);

impl SnapshotId {
    /// Generate a SnapshotId for the given content
    pub fn generate(content: &[u8]) -> Self {
        let now = chrono::Utc::now();
        let hash = blake3::hash(content);
        SnapshotId(format!(
            "{}-{}",
            now.format("%Y%m%d%H%M%S"),
            &hash.to_hex()[..8]
        ))
    }

    /// Create from a string with validation
    pub fn from_string(s: impl Into<String>) -> crate::Result<Self> {
        let s = s.into();
        if Self::validate(&s) {
            Ok(SnapshotId(s))
        } else {
            Err(crate::CatalogError::Validation(format!(
                "Invalid snapshot ID format: {}",
                s
            )))
        }
    }

    fn validate(s: &str) -> bool {
        let Some((stamp, digest)) = s.split_once('-') else {
            return false;
        };
        stamp.len() == 14
            && stamp.chars().all(|c| c.is_ascii_digit())
            && digest.len() == 8
            && digest.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_id_untagged() {
        let int: CategoryId = serde_json::from_value(json!(7)).unwrap();
        let string: CategoryId = serde_json::from_value(json!("7")).unwrap();
        assert_eq!(int, CategoryId::Int(7));
        assert_eq!(string, CategoryId::Str("7".to_string()));
        assert_ne!(int, string);
    }

    #[test]
    fn test_category_id_parse() {
        assert_eq!(CategoryId::parse("42"), CategoryId::Int(42));
        assert_eq!(CategoryId::parse(" phones "), CategoryId::from("phones"));
    }

    #[test]
    fn test_record_carries_extra_fields() {
        let value = json!({
            "category_id": 3,
            "parent_id": 1,
            "name": "Phones",
            "listing_count": 12
        });
        let record: CategoryRecord = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(record.category_id, CategoryId::Int(3));
        assert_eq!(record.parent_id, Some(CategoryId::Int(1)));
        assert_eq!(record.attributes.get_str("name"), Some("Phones"));
        assert_eq!(record.attributes.get("listing_count"), Some(&json!(12)));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_record_null_or_missing_parent_is_root() {
        let explicit: CategoryRecord =
            serde_json::from_value(json!({"category_id": 1, "parent_id": null})).unwrap();
        let missing: CategoryRecord = serde_json::from_value(json!({"category_id": 1})).unwrap();
        assert!(explicit.is_root());
        assert!(missing.is_root());
    }

    #[test]
    fn test_record_from_value_rejects_malformed() {
        assert!(CategoryRecord::from_value(&json!("nope")).is_none());
        assert!(CategoryRecord::from_value(&json!({"name": "no id"})).is_none());
        assert!(CategoryRecord::from_value(&json!({"category_id": 1.5})).is_none());
    }

    #[test]
    fn test_label_fallback() {
        let named = CategoryRecord::new(1).with_attribute("name", "Art");
        let unnamed = CategoryRecord::new("coins");
        let numeric = CategoryRecord::new(2).with_attribute("name", 99);
        assert_eq!(named.label("name"), "Art");
        assert_eq!(unnamed.label("name"), "coins");
        assert_eq!(numeric.label("name"), "99");
    }

    #[test]
    fn test_snapshot_id_generation() {
        let id = SnapshotId::generate(b"[]");
        assert_eq!(id.0.len(), 23);
        assert!(SnapshotId::from_string(id.0.clone()).is_ok());
    }

    #[test]
    fn test_snapshot_id_validation() {
        assert!(SnapshotId::from_string("20241231120000-abcd1234").is_ok());
        assert!(SnapshotId::from_string("invalid").is_err());
        assert!(SnapshotId::from_string("2024-abcd1234").is_err());
        assert!(SnapshotId::from_string("20241231120000-xyz").is_err());
    }
}
