//! Azure Service Bus queue sink over the REST API.
//!
//! Events are sent as JSON to `https://<namespace>/<queue>/messages`,
//! authorised with a Shared Access Signature derived from the namespace
//! connection string. Tokens are short-lived and minted per publish.

use std::str::FromStr;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::debug;

use lingochat_core::notify::sink::NotificationSink;
use lingochat_types::error::NotificationError;
use lingochat_types::notification::NotificationEvent;

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of a minted SAS token.
const TOKEN_TTL: Duration = Duration::from_secs(300);

// ---------------------------------------------------------------------------
// Connection string
// ---------------------------------------------------------------------------

/// Parsed `Endpoint=sb://...;SharedAccessKeyName=...;SharedAccessKey=...`.
pub struct ServiceBusConnection {
    /// Namespace host, e.g. `lingochat.servicebus.windows.net`.
    pub host: String,
    pub key_name: String,
    pub key: SecretString,
    /// Queue baked into entity-scoped connection strings.
    pub entity_path: Option<String>,
}

impl FromStr for ServiceBusConnection {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut endpoint = None;
        let mut key_name = None;
        let mut key = None;
        let mut entity_path = None;

        for part in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            // Keys are base64 and may themselves contain '='.
            let Some((name, value)) = part.split_once('=') else {
                return Err(NotificationError::Config(format!(
                    "malformed connection string segment: '{part}'"
                )));
            };
            match name.trim() {
                "Endpoint" => endpoint = Some(value.trim().to_string()),
                "SharedAccessKeyName" => key_name = Some(value.trim().to_string()),
                "SharedAccessKey" => key = Some(value.trim().to_string()),
                "EntityPath" => entity_path = Some(value.trim().to_string()),
                _ => {}
            }
        }

        let endpoint =
            endpoint.ok_or_else(|| NotificationError::Config("missing Endpoint".to_string()))?;
        let host = endpoint
            .strip_prefix("sb://")
            .or_else(|| endpoint.strip_prefix("https://"))
            .unwrap_or(&endpoint)
            .trim_end_matches('/')
            .to_string();
        if host.is_empty() {
            return Err(NotificationError::Config("empty Endpoint host".to_string()));
        }

        Ok(Self {
            host,
            key_name: key_name.ok_or_else(|| {
                NotificationError::Config("missing SharedAccessKeyName".to_string())
            })?,
            key: key
                .map(SecretString::from)
                .ok_or_else(|| NotificationError::Config("missing SharedAccessKey".to_string()))?,
            entity_path: entity_path.filter(|p| !p.is_empty()),
        })
    }
}

// ---------------------------------------------------------------------------
// SAS token
// ---------------------------------------------------------------------------

/// Form-encode a single value (`:` and `/` included).
fn url_encode(value: &str) -> Result<String, NotificationError> {
    let url = reqwest::Url::parse_with_params("https://sas.invalid/", &[("v", value)])
        .map_err(|e| NotificationError::Config(format!("cannot encode SAS field: {e}")))?;
    Ok(url
        .query()
        .and_then(|q| q.strip_prefix("v="))
        .unwrap_or_default()
        .to_string())
}

/// Build a `SharedAccessSignature` header value for `resource_uri` that
/// expires at `expiry` (unix seconds).
pub fn sas_token(
    resource_uri: &str,
    key_name: &str,
    key: &SecretString,
    expiry: i64,
) -> Result<String, NotificationError> {
    let encoded_uri = url_encode(resource_uri)?;
    let string_to_sign = format!("{encoded_uri}\n{expiry}");

    let mut mac = HmacSha256::new_from_slice(key.expose_secret().as_bytes())
        .map_err(|e| NotificationError::Config(format!("invalid shared access key: {e}")))?;
    mac.update(string_to_sign.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    Ok(format!(
        "SharedAccessSignature sr={encoded_uri}&sig={}&se={expiry}&skn={}",
        url_encode(&signature)?,
        url_encode(key_name)?
    ))
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Publishes notification events to one Service Bus queue.
pub struct ServiceBusSink {
    client: reqwest::Client,
    connection: ServiceBusConnection,
    queue: String,
}

impl ServiceBusSink {
    /// Build a sink from a namespace connection string. An `EntityPath` in
    /// the connection string takes precedence over `queue`.
    pub fn new(
        connection_string: &SecretString,
        queue: &str,
        request_timeout: Duration,
    ) -> Result<Self, NotificationError> {
        let connection: ServiceBusConnection = connection_string.expose_secret().parse()?;
        let queue = connection
            .entity_path
            .clone()
            .unwrap_or_else(|| queue.to_string());
        if queue.is_empty() {
            return Err(NotificationError::Config("queue name is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| NotificationError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            connection,
            queue,
        })
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    fn resource_uri(&self) -> String {
        format!("https://{}/{}", self.connection.host, self.queue)
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.resource_uri())
    }

    fn authorization(&self) -> Result<String, NotificationError> {
        let expiry = Utc::now().timestamp() + TOKEN_TTL.as_secs() as i64;
        sas_token(
            &self.resource_uri(),
            &self.connection.key_name,
            &self.connection.key,
            expiry,
        )
    }
}

impl NotificationSink for ServiceBusSink {
    fn name(&self) -> &str {
        "service-bus"
    }

    async fn publish(&self, event: &NotificationEvent) -> Result<(), NotificationError> {
        let body = serde_json::to_vec(event)
            .map_err(|e| NotificationError::Transport(format!("failed to encode event: {e}")))?;

        let response = self
            .client
            .post(self.messages_url())
            .header(reqwest::header::AUTHORIZATION, self.authorization()?)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(queue = %self.queue, kind = %event.kind, "Event sent to Service Bus");
        Ok(())
    }

    async fn close(&self) -> Result<(), NotificationError> {
        // REST publishes hold no broker link to detach.
        debug!(queue = %self.queue, "Service Bus sink closed");
        Ok(())
    }
}
