//! Builds DynamoDB update and condition expressions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::{ProductPatch, ID, UPDATED_AT};

pub const ID_NAME: &str = "#id";
pub const ITEM_EXISTS: &str = "attribute_exists(#id)";
pub const ITEM_NOT_EXISTS: &str = "attribute_not_exists(#id)";

const UPDATED_AT_NAME: &str = "#updatedAt";
const UPDATED_AT_VALUE: &str = ":updatedAt";

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: Vec<(String, Value)>,
}

/// Every field goes through a `#fN`/`:vN` placeholder pair so user keys
/// never collide with reserved words. `updatedAt` is always assigned first.
pub fn build_update(patch: &ProductPatch, updated_at: DateTime<Utc>) -> UpdateExpression {
    let mut clauses = vec![format!("{} = {}", UPDATED_AT_NAME, UPDATED_AT_VALUE)];
    let mut names = HashMap::from([
        (UPDATED_AT_NAME.to_string(), UPDATED_AT.to_string()),
        (ID_NAME.to_string(), ID.to_string()),
    ]);
    let mut values = vec![(
        UPDATED_AT_VALUE.to_string(),
        Value::String(timestamp(updated_at)),
    )];

    for (index, (field, value)) in patch.assignments().iter().enumerate() {
        let name = format!("#f{}", index);
        let placeholder = format!(":v{}", index);
        clauses.push(format!("{} = {}", name, placeholder));
        names.insert(name, field.clone());
        values.push((placeholder, value.clone()));
    }

    UpdateExpression {
        expression: format!("SET {}", clauses.join(", ")),
        names,
        values,
    }
}

/// Formats a timestamp exactly as `Product` serializes it.
pub fn timestamp(at: DateTime<Utc>) -> String {
    match serde_json::to_value(at) {
        Ok(Value::String(s)) => s,
        _ => at.to_rfc3339(),
    }
}
