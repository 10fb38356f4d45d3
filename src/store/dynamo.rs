use std::{collections::HashMap, fmt::Debug};

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    error::{DisplayErrorContext, SdkError},
    operation::{delete_item::DeleteItemError, put_item::PutItemError, update_item::UpdateItemError},
    types::{AttributeValue, ReturnValue},
    Client,
};
use chrono::Utc;
use serde_json::Value;

use super::{
    expression::{self, ID_NAME, ITEM_EXISTS, ITEM_NOT_EXISTS},
    ItemStore, StoreError, StoreResult,
};
use crate::models::{Product, ProductPatch, ID};

type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
    table: String,
}

impl DynamoStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    fn key(id: &str) -> AttributeValue {
        AttributeValue::S(id.to_string())
    }
}

/// Maps a failed conditional check to `on_condition`, anything else to `Other`.
fn classify<E, R>(
    err: SdkError<E, R>,
    condition_failed: fn(&E) -> bool,
    on_condition: StoreError,
) -> StoreError
where
    E: std::error::Error + 'static,
    R: Debug + 'static,
{
    if err.as_service_error().is_some_and(condition_failed) {
        return on_condition;
    }
    request_failed(err)
}

fn request_failed<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: std::error::Error + 'static,
    R: Debug + 'static,
{
    let detail = DisplayErrorContext(&err).to_string();
    tracing::error!("DynamoDB request failed: {}", detail);
    StoreError::Other(detail)
}

fn decode(item: Item) -> StoreResult<Product> {
    serde_dynamo::from_item(item)
        .map_err(|e| StoreError::Other(format!("Failed to decode product: {}", e)))
}

fn encode_value(value: Value) -> StoreResult<AttributeValue> {
    serde_dynamo::to_attribute_value(value)
        .map_err(|e| StoreError::Other(format!("Failed to encode attribute: {}", e)))
}

#[async_trait]
impl ItemStore for DynamoStore {
    async fn put_new(&self, product: &Product) -> StoreResult<()> {
        let item: Item = serde_dynamo::to_item(product)
            .map_err(|e| StoreError::Other(format!("Failed to encode product: {}", e)))?;

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item))
            .condition_expression(ITEM_NOT_EXISTS)
            .expression_attribute_names(ID_NAME, ID)
            .send()
            .await
            .map_err(|e| {
                classify(
                    e,
                    PutItemError::is_conditional_check_failed_exception,
                    StoreError::Conflict,
                )
            })?;

        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key(ID, Self::key(id))
            .consistent_read(true)
            .send()
            .await
            .map_err(request_failed)?;

        output.item.map(decode).transpose()
    }

    async fn scan(&self) -> StoreResult<Vec<Product>> {
        let output = self
            .client
            .scan()
            .table_name(&self.table)
            .send()
            .await
            .map_err(request_failed)?;

        if output.last_evaluated_key.is_some() {
            tracing::warn!(
                table = %self.table,
                "Scan result truncated; only the first page of products is returned"
            );
        }

        output
            .items
            .unwrap_or_default()
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn update_existing(&self, id: &str, patch: &ProductPatch) -> StoreResult<Product> {
        let update = expression::build_update(patch, Utc::now());

        let mut request = self
            .client
            .update_item()
            .table_name(&self.table)
            .key(ID, Self::key(id))
            .update_expression(update.expression)
            .condition_expression(ITEM_EXISTS)
            .set_expression_attribute_names(Some(update.names))
            .return_values(ReturnValue::AllNew);

        for (placeholder, value) in update.values {
            request = request.expression_attribute_values(placeholder, encode_value(value)?);
        }

        let output = request.send().await.map_err(|e| {
            classify(
                e,
                UpdateItemError::is_conditional_check_failed_exception,
                StoreError::NotFound,
            )
        })?;

        output
            .attributes
            .map(decode)
            .unwrap_or_else(|| Err(StoreError::Other("Update returned no attributes".to_string())))
    }

    async fn delete_existing(&self, id: &str) -> StoreResult<Product> {
        let output = self
            .client
            .delete_item()
            .table_name(&self.table)
            .key(ID, Self::key(id))
            .condition_expression(ITEM_EXISTS)
            .expression_attribute_names(ID_NAME, ID)
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| {
                classify(
                    e,
                    DeleteItemError::is_conditional_check_failed_exception,
                    StoreError::NotFound,
                )
            })?;

        output.attributes.map(decode).unwrap_or(Err(StoreError::NotFound))
    }

    async fn check_health(&self) -> StoreResult<()> {
        self.client
            .describe_table()
            .table_name(&self.table)
            .send()
            .await
            .map_err(request_failed)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::{
        operation::{
            delete_item::DeleteItemOutput, get_item::GetItemOutput, put_item::PutItemInput,
            scan::ScanOutput, update_item::UpdateItemOutput,
        },
        types::error::{ConditionalCheckFailedException, ResourceNotFoundException},
    };
    use aws_smithy_mocks::{mock, mock_client};
    use serde_json::{json, Map, Number};

    const TABLE: &str = "products";

    fn stored_item(id: &str, price: &str) -> Item {
        HashMap::from([
            ("id".to_string(), AttributeValue::S(id.to_string())),
            ("name".to_string(), AttributeValue::S("Widget".to_string())),
            ("price".to_string(), AttributeValue::N(price.to_string())),
            ("description".to_string(), AttributeValue::S(String::new())),
            ("createdAt".to_string(), AttributeValue::S("2024-05-01T10:00:00Z".to_string())),
            ("updatedAt".to_string(), AttributeValue::S("2024-05-02T10:00:00Z".to_string())),
            ("color".to_string(), AttributeValue::S("red".to_string())),
        ])
    }

    fn patch(body: serde_json::Value) -> ProductPatch {
        let body: Map<String, Value> = serde_json::from_value(body).unwrap();
        ProductPatch::from_body(body).unwrap()
    }

    fn product(id: &str) -> Product {
        serde_dynamo::from_item(stored_item(id, "1")).unwrap()
    }

    fn condition_failed() -> ConditionalCheckFailedException {
        ConditionalCheckFailedException::builder()
            .message("The conditional request failed")
            .build()
    }

    #[tokio::test]
    async fn put_of_existing_id_is_a_conflict() {
        let rule = mock!(aws_sdk_dynamodb::Client::put_item)
            .match_requests(|req: &PutItemInput| {
                req.table_name() == Some(TABLE)
                    && req.condition_expression() == Some(ITEM_NOT_EXISTS)
            })
            .then_error(|| PutItemError::ConditionalCheckFailedException(condition_failed()));
        let store = DynamoStore::new(mock_client!(aws_sdk_dynamodb, [&rule]), TABLE);

        assert_eq!(store.put_new(&product("p1")).await, Err(StoreError::Conflict));
    }

    #[tokio::test]
    async fn other_service_errors_carry_their_detail() {
        let rule = mock!(aws_sdk_dynamodb::Client::put_item).then_error(|| {
            PutItemError::ResourceNotFoundException(
                ResourceNotFoundException::builder()
                    .message("Requested resource not found")
                    .build(),
            )
        });
        let store = DynamoStore::new(mock_client!(aws_sdk_dynamodb, [&rule]), TABLE);

        match store.put_new(&product("p1")).await {
            Err(StoreError::Other(detail)) => assert!(!detail.is_empty()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_sends_placeholders_and_decodes_new_item() {
        let rule = mock!(aws_sdk_dynamodb::Client::update_item)
            .match_requests(|req| {
                let names = req.expression_attribute_names();
                let values = req.expression_attribute_values();
                req.key().and_then(|key| key.get(ID)) == Some(&AttributeValue::S("p1".to_string()))
                    && req.update_expression() == Some("SET #updatedAt = :updatedAt, #f0 = :v0")
                    && req.condition_expression() == Some(ITEM_EXISTS)
                    && req.return_values() == Some(&ReturnValue::AllNew)
                    && names.and_then(|n| n.get("#f0")).map(String::as_str) == Some("price")
                    && names.and_then(|n| n.get(ID_NAME)).map(String::as_str) == Some(ID)
                    && values.and_then(|v| v.get(":v0")) == Some(&AttributeValue::N("42".to_string()))
                    && values.is_some_and(|v| v.contains_key(":updatedAt"))
            })
            .then_output(|| {
                UpdateItemOutput::builder()
                    .set_attributes(Some(stored_item("p1", "42")))
                    .build()
            });
        let store = DynamoStore::new(mock_client!(aws_sdk_dynamodb, [&rule]), TABLE);

        let updated = store
            .update_existing("p1", &patch(json!({ "price": 42 })))
            .await
            .unwrap();

        assert_eq!(updated.id, "p1");
        assert_eq!(updated.price, Number::from(42));
        assert_eq!(updated.extra.get("color"), Some(&json!("red")));
    }

    #[tokio::test]
    async fn update_of_missing_item_is_not_found() {
        let rule = mock!(aws_sdk_dynamodb::Client::update_item)
            .then_error(|| UpdateItemError::ConditionalCheckFailedException(condition_failed()));
        let store = DynamoStore::new(mock_client!(aws_sdk_dynamodb, [&rule]), TABLE);

        assert_eq!(
            store.update_existing("ghost", &patch(json!({ "name": "Lamp" }))).await,
            Err(StoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_returns_old_item_or_not_found() {
        let deleted = mock!(aws_sdk_dynamodb::Client::delete_item)
            .match_requests(|req| {
                req.condition_expression() == Some(ITEM_EXISTS)
                    && req.return_values() == Some(&ReturnValue::AllOld)
            })
            .then_output(|| {
                DeleteItemOutput::builder()
                    .set_attributes(Some(stored_item("p1", "9.99")))
                    .build()
            });
        let missing = mock!(aws_sdk_dynamodb::Client::delete_item)
            .then_error(|| DeleteItemError::ConditionalCheckFailedException(condition_failed()));
        let store = DynamoStore::new(mock_client!(aws_sdk_dynamodb, [&deleted, &missing]), TABLE);

        let product = store.delete_existing("p1").await.unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(Value::Number(product.price), json!(9.99));

        assert_eq!(store.delete_existing("p1").await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn get_and_scan_decode_stored_items() {
        let missing = mock!(aws_sdk_dynamodb::Client::get_item)
            .match_requests(|req| req.consistent_read() == Some(true))
            .then_output(|| GetItemOutput::builder().build());
        let listed = mock!(aws_sdk_dynamodb::Client::scan).then_output(|| {
            ScanOutput::builder()
                .items(stored_item("p1", "1"))
                .items(stored_item("p2", "2"))
                .build()
        });
        let store = DynamoStore::new(mock_client!(aws_sdk_dynamodb, [&missing, &listed]), TABLE);

        assert_eq!(store.get("p1").await, Ok(None));

        let ids: Vec<String> = store.scan().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["p1", "p2"]);
    }
}
