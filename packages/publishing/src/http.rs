// ABOUTME: Shared HTTP helpers for the publishing adapters
// ABOUTME: Client construction, status checking and id extraction from JSON replies

use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::Value;
use tracing::error;

use crate::error::{PublishError, PublishResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub(crate) fn build_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Turn non-2xx replies into `PublishError::Api`
pub(crate) async fn ensure_success(response: Response) -> PublishResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    error!("Platform API error: {} - {}", status, message);
    Err(PublishError::Api {
        status: status.as_u16(),
        message,
    })
}

pub(crate) async fn json_or_error(response: Response) -> PublishResult<Value> {
    Ok(ensure_success(response).await?.json().await?)
}

/// String value at a JSON pointer such as `/id` or `/data/share_id`
pub(crate) fn string_at(value: &Value, pointer: &str) -> PublishResult<String> {
    match value.pointer(pointer) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(PublishError::InvalidResponse(format!(
            "missing '{}' in {}",
            pointer, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_at() {
        let value = json!({ "id": "17890", "data": { "share_id": 42 } });
        assert_eq!(string_at(&value, "/id").unwrap(), "17890");
        assert_eq!(string_at(&value, "/data/share_id").unwrap(), "42");
        assert!(matches!(
            string_at(&value, "/data/upload_url"),
            Err(PublishError::InvalidResponse(_))
        ));
    }
}
