use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::error::{AppError, Result};

pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const PRICE: &str = "price";
pub const DESCRIPTION: &str = "description";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Kept as the client's JSON number so integers stay integers.
    pub price: Number,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A validated creation payload.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: Option<String>,
    pub name: String,
    pub price: Number,
    pub description: String,
    pub extra: Map<String, Value>,
}

impl NewProduct {
    pub fn from_body(mut body: Map<String, Value>) -> Result<Self> {
        let incomplete =
            || AppError::BadRequest("Incomplete data. At least name and price are required.".to_string());

        let name = match body.remove(NAME) {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ => return Err(incomplete()),
        };

        let price = match body.remove(PRICE) {
            Some(Value::Number(price)) => price,
            _ => return Err(incomplete()),
        };

        let id = match body.remove(ID) {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) if id.is_empty() => None,
            Some(Value::String(id)) => Some(id),
            Some(_) => return Err(AppError::BadRequest("id must be a string".to_string())),
        };

        let description = match body.remove(DESCRIPTION) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(description)) => description,
            Some(_) => {
                return Err(AppError::BadRequest(
                    "description must be a string".to_string(),
                ))
            }
        };

        body.remove(CREATED_AT);
        body.remove(UPDATED_AT);

        Ok(Self {
            id,
            name,
            price,
            description,
            extra: body,
        })
    }

    /// Stamps both timestamps with `now` and assigns a fresh id when absent.
    pub fn into_product(self, now: DateTime<Utc>) -> Product {
        Product {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.name,
            price: self.price,
            description: self.description,
            created_at: now,
            updated_at: now,
            extra: self.extra,
        }
    }
}

/// Field assignments to merge into an existing product, in input order.
///
/// `id` and `createdAt` are never assignable; `updatedAt` is always
/// re-stamped by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPatch {
    assignments: Vec<(String, Value)>,
}

impl ProductPatch {
    pub fn from_body(body: Map<String, Value>) -> Result<Self> {
        if body.is_empty() {
            return Err(AppError::BadRequest(
                "No data provided for update".to_string(),
            ));
        }

        let mut assignments = Vec::with_capacity(body.len());
        for (key, value) in body {
            match key.as_str() {
                ID | CREATED_AT | UPDATED_AT => continue,
                NAME if !matches!(&value, Value::String(s) if !s.is_empty()) => {
                    return Err(AppError::BadRequest(
                        "name must be a non-empty string".to_string(),
                    ))
                }
                PRICE if !value.is_number() => {
                    return Err(AppError::BadRequest("price must be a number".to_string()))
                }
                DESCRIPTION if !value.is_string() => {
                    return Err(AppError::BadRequest(
                        "description must be a string".to_string(),
                    ))
                }
                _ => assignments.push((key, value)),
            }
        }

        Ok(Self { assignments })
    }

    pub fn assignments(&self) -> &[(String, Value)] {
        &self.assignments
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn apply(&self, product: &mut Product, updated_at: DateTime<Utc>) {
        for (key, value) in &self.assignments {
            match (key.as_str(), value) {
                (NAME, Value::String(name)) => product.name = name.clone(),
                (PRICE, Value::Number(price)) => product.price = price.clone(),
                (DESCRIPTION, Value::String(description)) => {
                    product.description = description.clone()
                }
                _ => {
                    product.extra.insert(key.clone(), value.clone());
                }
            }
        }
        product.updated_at = updated_at;
    }
}
