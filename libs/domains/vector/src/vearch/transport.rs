use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::VectorResult;

/// HTTP verbs used against Vearch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A single JSON-over-HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl TransportRequest {
    pub fn new(method: HttpMethod, url: String) -> Self {
        Self {
            method,
            url,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: String) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn put(url: String) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn post(url: String) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn delete(url: String) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Transport seam between the client layer and the network.
///
/// Implementations return the decoded body. Network-level failures are
/// returned as errors and are never classified by the response normalizer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> VectorResult<Value>;
}

/// reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> VectorResult<Value> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = request.method.as_str(), url = %request.url, "Vearch request");

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::trace!(status = status.as_u16(), "Vearch response received");

        Ok(decode_body(&text))
    }
}

/// Decode a response body; bodies that are not JSON are kept as a string.
pub fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_json_body() {
        assert_eq!(decode_body(r#"{"code":200}"#), json!({"code": 200}));
    }

    #[test]
    fn test_decode_empty_body() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body("  \n"), Value::Null);
    }

    #[test]
    fn test_decode_plain_text_body() {
        assert_eq!(decode_body("deleted"), Value::String("deleted".to_string()));
    }

    #[test]
    fn test_request_builders() {
        let request = TransportRequest::get("http://m/list/space".to_string())
            .with_query("db", "test_db");
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.query, vec![("db".to_string(), "test_db".to_string())]);
        assert!(request.body.is_none());

        let request = TransportRequest::put("http://m/db/_create".to_string())
            .with_body(json!({"name": "test_db"}));
        assert_eq!(request.method.as_str(), "PUT");
        assert_eq!(request.body, Some(json!({"name": "test_db"})));
    }
}
