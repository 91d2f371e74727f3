use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Validated input for creating an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
}

/// Validated partial update.
///
/// `description` is doubly optional: `None` leaves the column alone,
/// `Some(None)` clears it, `Some(Some(s))` sets it (including to `""`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

const NAME_REQUIRED: &str = "the \"name\" field is required";
const NAME_INVALID: &str = "the \"name\" field must be a non-empty string";
const DESCRIPTION_INVALID: &str = "the \"description\" field must be a string or null";
const NOTHING_TO_UPDATE: &str = "at least one of \"name\" or \"description\" must be supplied";

impl NewItem {
    pub fn from_json(body: &Value) -> Result<Self, ModelError> {
        let obj = body.as_object().ok_or_else(|| invalid(NAME_REQUIRED))?;
        let name = match obj.get("name") {
            None => return Err(invalid(NAME_REQUIRED)),
            Some(v) => validate_name(v)?,
        };
        let description = match obj.get("description") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(invalid(DESCRIPTION_INVALID)),
        };
        Ok(Self { name, description })
    }
}

impl ItemChanges {
    /// Key presence decides what gets updated, not the truthiness of the value.
    pub fn from_json(body: &Value) -> Result<Self, ModelError> {
        let empty = Map::new();
        let obj = body.as_object().unwrap_or(&empty);

        let name = obj.get("name").map(validate_name).transpose()?;
        let description = match obj.get("description") {
            None => None,
            Some(Value::Null) => Some(None),
            Some(Value::String(s)) => Some(Some(s.clone())),
            Some(_) => return Err(invalid(DESCRIPTION_INVALID)),
        };
        let changes = Self { name, description };
        if changes.is_empty() {
            return Err(invalid(NOTHING_TO_UPDATE));
        }
        Ok(changes)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

fn validate_name(v: &Value) -> Result<String, ModelError> {
    match v {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        _ => Err(invalid(NAME_INVALID)),
    }
}

fn invalid(msg: &str) -> ModelError {
    ModelError::Validation(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_item_defaults_description_to_empty() {
        let item = NewItem::from_json(&json!({"name": "widget"})).unwrap();
        assert_eq!(item, NewItem { name: "widget".into(), description: String::new() });

        let item = NewItem::from_json(&json!({"name": "widget", "description": null})).unwrap();
        assert_eq!(item.description, "");
    }

    #[test]
    fn new_item_requires_text_name() {
        assert!(NewItem::from_json(&json!({})).is_err());
        assert!(NewItem::from_json(&json!({"name": ""})).is_err());
        assert!(NewItem::from_json(&json!({"name": 42})).is_err());
        assert!(NewItem::from_json(&json!({"name": null})).is_err());
        assert!(NewItem::from_json(&json!(["widget"])).is_err());
        assert!(NewItem::from_json(&json!({"name": "w", "description": 3})).is_err());
    }

    #[test]
    fn changes_track_key_presence() {
        let c = ItemChanges::from_json(&json!({"description": "new"})).unwrap();
        assert_eq!(c.name, None);
        assert_eq!(c.description, Some(Some("new".to_string())));

        // empty string is a real update, distinct from omitting the key
        let c = ItemChanges::from_json(&json!({"description": ""})).unwrap();
        assert_eq!(c.description, Some(Some(String::new())));

        let c = ItemChanges::from_json(&json!({"description": null})).unwrap();
        assert_eq!(c.description, Some(None));
        assert!(!c.is_empty());
    }

    #[test]
    fn changes_reject_empty_body_and_bad_name() {
        assert!(ItemChanges::from_json(&json!({})).is_err());
        assert!(ItemChanges::from_json(&json!({"other": 1})).is_err());
        assert!(ItemChanges::from_json(&json!(null)).is_err());
        assert!(ItemChanges::from_json(&json!({"name": ""})).is_err());
        assert!(ItemChanges::from_json(&json!({"name": "ok", "description": false})).is_err());
    }
}
