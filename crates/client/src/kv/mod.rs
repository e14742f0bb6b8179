//! REST key-value cache client.
//!
//! Talks to an Upstash-compatible Redis REST endpoint.
//!
//! ### Protocol
//!
//! - **Endpoint**: the configured URL; every command is a POST of a JSON array.
//! - **Authentication**: `Authorization: Bearer <token>`.
//! - **Commands**: `["GET", key]` and `["SET", key, value, "EX", ttl]`.
//! - **Replies**: `{"result": ...}` on success, `{"error": "..."}` on failure.
//!
//! Values are stored as JSON text, so a GET returns exactly the string that
//! was SET.

pub mod error;

pub use error::KvError;

use advent_core::{CacheStore, Error};
use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::{Duration, Instant};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// REST key-value client configuration.
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// REST endpoint URL.
    pub url: String,
    /// Bearer token.
    pub token: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self { url: String::new(), token: String::new(), timeout: DEFAULT_TIMEOUT }
    }
}

/// Reply envelope of the REST endpoint.
#[derive(Debug, Deserialize)]
pub struct KvReply {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl KvReply {
    /// Turn the envelope into the command result.
    pub fn into_result(self) -> Result<Option<Value>, KvError> {
        match self.error {
            Some(message) => Err(KvError::Command(message)),
            None => Ok(self.result.filter(|v| !v.is_null())),
        }
    }
}

/// Build the JSON array for a SET command.
pub fn set_command(key: &str, payload: &str, ttl_secs: Option<u64>) -> Value {
    match ttl_secs {
        Some(ttl) => json!(["SET", key, payload, "EX", ttl.to_string()]),
        None => json!(["SET", key, payload]),
    }
}

/// Cache store backed by a REST key-value service.
#[derive(Debug, Clone)]
pub struct RestKvStore {
    http: reqwest::Client,
    config: KvConfig,
}

impl RestKvStore {
    /// Create a new client with the given configuration.
    pub fn new(config: KvConfig) -> Result<Self, KvError> {
        if config.url.is_empty() || config.token.is_empty() {
            return Err(KvError::MissingCredentials);
        }

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self { http, config })
    }

    /// Run one command and return its `result` value.
    pub async fn command(&self, command: &Value) -> Result<Option<Value>, KvError> {
        let start = Instant::now();

        let http_response = self
            .http
            .post(&self.config.url)
            .bearer_auth(&self.config.token)
            .header(header::ACCEPT, "application/json")
            .json(command)
            .send()
            .await?;

        let status = http_response.status();

        if status == 401 || status == 403 {
            return Err(KvError::AuthError);
        }

        let bytes = http_response.bytes().await?;

        // Error replies carry a JSON body with the reason; prefer it over the bare status.
        let reply: Result<KvReply, _> = serde_json::from_slice(&bytes);
        if status.is_client_error() || status.is_server_error() {
            return match reply {
                Ok(KvReply { error: Some(message), .. }) => Err(KvError::Command(message)),
                _ => Err(KvError::HttpError { status: status.as_u16() }),
            };
        }

        let reply = reply.map_err(|e| KvError::Parse(e.to_string()))?;

        tracing::debug!("kv command completed in {:?}", start.elapsed());

        reply.into_result()
    }

    /// GET a key as its stored string.
    pub async fn get_string(&self, key: &str) -> Result<Option<String>, KvError> {
        match self.command(&json!(["GET", key])).await? {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Ok(Some(other.to_string())),
        }
    }

    /// SET a key with an optional expiry in seconds.
    pub async fn set_string(&self, key: &str, payload: &str, ttl_secs: Option<u64>) -> Result<(), KvError> {
        self.command(&set_command(key, payload, ttl_secs)).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for RestKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.get_string(key).await?)
    }

    async fn set(&self, key: &str, payload: &str, ttl_secs: Option<u64>) -> Result<(), Error> {
        Ok(self.set_string(key, payload, ttl_secs).await?)
    }

    fn name(&self) -> &'static str {
        "rest-kv"
    }
}
