use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use aws_sdk_dynamodb::{config::Credentials, Client as DynamoClient};

use crate::{config::StoreConfig, error::Result};

pub async fn load_dynamo_client(config: &StoreConfig) -> Result<DynamoClient> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .retry_config(RetryConfig::standard().with_max_attempts(config.max_retries + 1))
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(config.operation_timeout)
                .build(),
        );

    if let Some(creds) = &config.credentials {
        loader = loader.credentials_provider(Credentials::new(
            creds.access_key_id.clone(),
            creds.secret_access_key.clone(),
            None,
            None,
            "env-credentials",
        ));
    }

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;
    let client = DynamoClient::new(&sdk_config);

    tracing::info!(
        region = %config.region,
        table = config.table_name.as_deref().unwrap_or_default(),
        max_retries = config.max_retries,
        timeout_ms = config.operation_timeout.as_millis() as u64,
        "AWS DynamoDB client initialized"
    );

    Ok(client)
}
