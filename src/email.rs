//! Lead Notification Email
//!
//! Sends lead notifications through the Azure Communication Services Email
//! REST API. Requests are signed with HMAC-SHA256 using the access key from
//! the connection string; the send is a long-running operation that is polled
//! until it settles.
//!
//! Sending never fails the caller: every outcome collapses to a `bool`.

use backon::{ConstantBuilder, Retryable};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::EmailConfig;
use crate::constants::email::API_VERSION;
use crate::types::{CheckerError, LeadRequest, Result};

type HmacSha256 = Hmac<Sha256>;

/// Parsed `endpoint=...;accesskey=...` connection string
struct AcsConnection {
    endpoint: Url,
    /// Base64 encoded
    access_key: SecretString,
}

impl AcsConnection {
    fn parse(connection_string: &str) -> Result<Self> {
        let mut endpoint = None;
        let mut access_key = None;

        for part in connection_string.split(';').filter(|p| !p.trim().is_empty()) {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "endpoint" => endpoint = Some(value.trim().to_string()),
                "accesskey" => access_key = Some(value.trim().to_string()),
                _ => {}
            }
        }

        let endpoint = endpoint
            .ok_or_else(|| CheckerError::Config("connection string has no endpoint".to_string()))?;
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| CheckerError::Config(format!("invalid ACS endpoint: {}", e)))?;
        let access_key = access_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| CheckerError::Config("connection string has no accesskey".to_string()))?;

        Ok(Self {
            endpoint,
            access_key: SecretString::from(access_key),
        })
    }
}

pub struct EmailNotifier {
    client: reqwest::Client,
    connection: Option<AcsConnection>,
    sender: String,
    recipient: String,
    poll_attempts: usize,
    poll_interval: Duration,
}

impl EmailNotifier {
    /// Build from config. A missing or unusable connection string leaves the
    /// notifier disabled.
    pub fn from_config(config: &EmailConfig) -> Self {
        let connection = config
            .connection_string
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| match AcsConnection::parse(s) {
                Ok(connection) => Some(connection),
                Err(e) => {
                    warn!(error = %e, "Ignoring invalid ACS connection string");
                    None
                }
            });

        Self {
            client: reqwest::Client::new(),
            connection,
            sender: config.sender.clone(),
            recipient: config.recipient.clone(),
            poll_attempts: config.poll_attempts,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    pub fn disabled() -> Self {
        Self::from_config(&EmailConfig::default())
    }

    pub fn is_configured(&self) -> bool {
        self.connection.is_some()
    }

    /// Notify the sales inbox about a lead. Returns whether the email was sent.
    pub async fn send_lead_email(&self, lead: &LeadRequest) -> bool {
        let Some(connection) = &self.connection else {
            warn!("Azure Communication Services not configured, skipping lead email");
            return false;
        };

        match self.send(connection, lead).await {
            Ok(()) => {
                info!(name = %lead.name, company = %lead.company, "Lead email sent");
                true
            }
            Err(e) => {
                warn!(error = %e, name = %lead.name, "Failed to send lead email");
                false
            }
        }
    }

    async fn send(&self, connection: &AcsConnection, lead: &LeadRequest) -> Result<()> {
        let message = EmailMessage {
            sender_address: &self.sender,
            recipients: Recipients {
                to: vec![Address {
                    address: &self.recipient,
                }],
            },
            content: Content {
                subject: format!("Nieuwe lead via ToolChecker: {} ({})", lead.name, lead.company),
                html: build_email_html(lead),
            },
        };
        let body = serde_json::to_vec(&message)?;

        let url = connection
            .endpoint
            .join(&format!("/emails:send?api-version={}", API_VERSION))
            .map_err(|e| CheckerError::Email(e.to_string()))?;

        let response = self
            .signed_request(connection, Method::POST, &url, body)?
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckerError::Email(format!("send rejected ({}): {}", status, body)));
        }

        let operation = response
            .headers()
            .get("operation-location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match operation {
            Some(location) => self.wait_for_completion(connection, &location).await,
            None => {
                debug!("Send accepted without an operation location");
                Ok(())
            }
        }
    }

    async fn wait_for_completion(&self, connection: &AcsConnection, location: &str) -> Result<()> {
        let url = Url::parse(location)
            .map_err(|e| CheckerError::Email(format!("invalid operation location: {}", e)))?;

        let url = &url;
        let outcome = (|| async move { self.poll_once(connection, url).await })
            .retry(
                ConstantBuilder::default()
                    .with_delay(self.poll_interval)
                    .with_max_times(self.poll_attempts),
            )
            .when(|e| matches!(e, PollError::Pending(_)))
            .notify(|e, delay| debug!(?e, ?delay, "Email operation still running"))
            .await;

        match outcome {
            Ok(()) => Ok(()),
            Err(PollError::Pending(status)) => Err(CheckerError::Email(format!(
                "operation still {} after {} polls",
                status, self.poll_attempts
            ))),
            Err(PollError::Failed(e)) => Err(e),
        }
    }

    async fn poll_once(&self, connection: &AcsConnection, url: &Url) -> std::result::Result<(), PollError> {
        let response = self
            .signed_request(connection, Method::GET, url, Vec::new())
            .map_err(PollError::Failed)?
            .send()
            .await
            .map_err(|e| PollError::Failed(e.into()))?;

        if !response.status().is_success() {
            return Err(PollError::Failed(CheckerError::Email(format!(
                "status poll failed: {}",
                response.status()
            ))));
        }

        let operation: OperationStatus = response
            .json()
            .await
            .map_err(|e| PollError::Failed(e.into()))?;

        match operation.status.as_str() {
            "Succeeded" => Ok(()),
            "Failed" | "Canceled" => Err(PollError::Failed(CheckerError::Email(format!(
                "operation {}: {}",
                operation.status,
                operation.error.map(|e| e.to_string()).unwrap_or_default()
            )))),
            other => Err(PollError::Pending(other.to_string())),
        }
    }

    fn signed_request(
        &self,
        connection: &AcsConnection,
        method: Method,
        url: &Url,
        body: Vec<u8>,
    ) -> Result<reqwest::RequestBuilder> {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let content_hash = BASE64.encode(Sha256::digest(&body));
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(CheckerError::Email(format!("URL has no host: {}", url))),
        };
        let path_and_query = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let signature = compute_signature(
            connection.access_key.expose_secret(),
            &string_to_sign(method.as_str(), &path_and_query, &date, &host, &content_hash),
        )?;

        Ok(self
            .client
            .request(method, url.clone())
            .header("x-ms-date", date)
            .header("x-ms-content-sha256", content_hash)
            .header(
                "Authorization",
                format!(
                    "HMAC-SHA256 SignedHeaders=x-ms-date;host;x-ms-content-sha256&Signature={}",
                    signature
                ),
            )
            .header("Content-Type", "application/json")
            .body(body))
    }
}

#[derive(Debug)]
enum PollError {
    Pending(String),
    Failed(CheckerError),
}

fn string_to_sign(method: &str, path_and_query: &str, date: &str, host: &str, content_hash: &str) -> String {
    format!("{}\n{}\n{};{};{}", method, path_and_query, date, host, content_hash)
}

fn compute_signature(access_key: &str, string_to_sign: &str) -> Result<String> {
    let key = BASE64
        .decode(access_key)
        .map_err(|e| CheckerError::Email(format!("access key is not base64: {}", e)))?;
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| CheckerError::Email(format!("invalid access key: {}", e)))?;
    mac.update(string_to_sign.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

fn build_email_html(lead: &LeadRequest) -> String {
    let esc = htmlescape::encode_minimal;
    let row = |label: &str, value: String| {
        format!(
            "        <tr style=\"border-bottom: 1px solid #eee;\">\n            \
             <td style=\"padding: 10px; font-weight: bold; width: 120px;\">{}</td>\n            \
             <td style=\"padding: 10px;\">{}</td>\n        </tr>\n",
            label, value
        )
    };

    let email = esc(&lead.email);
    let rows = [
        row("Naam", esc(&lead.name)),
        row("Email", format!("<a href=\"mailto:{0}\">{0}</a>", email)),
        row("Bedrijf", esc(&lead.company)),
        row("Functie", esc(&lead.function)),
        row("Gecheckte tool", esc(&lead.tool_name)),
    ]
    .concat();

    format!(
        r#"<html>
<body style="font-family: 'Segoe UI', Arial, sans-serif; color: #333; max-width: 600px;">
    <h2 style="color: #0c2aad;">Nieuwe lead via ToolChecker</h2>
    <p>Er is een nieuw compliance rapport gedownload via ToolChecker.</p>
    <table style="border-collapse: collapse; width: 100%; margin: 20px 0;">
{rows}    </table>
    <p style="color: #666; font-size: 12px;">
        Dit bericht is automatisch verstuurd door ToolChecker by &amp;samhoud.
    </p>
</body>
</html>"#
    )
}

// Wire types

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailMessage<'a> {
    sender_address: &'a str,
    recipients: Recipients<'a>,
    content: Content,
}

#[derive(Serialize)]
struct Recipients<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Serialize)]
struct Address<'a> {
    address: &'a str,
}

#[derive(Serialize)]
struct Content {
    subject: String,
    html: String,
}

#[derive(Deserialize)]
struct OperationStatus {
    status: String,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ACCESS_KEY: &str = "c3VwZXItc2VjcmV0LWtleQ==";

    fn lead() -> LeadRequest {
        LeadRequest {
            name: "Jan <b>de Vries</b>".to_string(),
            email: "jan@acme.nl".to_string(),
            company: "Acme & Co".to_string(),
            function: "CTO".to_string(),
            tool_name: "Slack".to_string(),
        }
    }

    fn config(endpoint: &str) -> EmailConfig {
        EmailConfig {
            connection_string: Some(format!("endpoint={}/;accesskey={}", endpoint, ACCESS_KEY)),
            sender: "DoNotReply@toolchecker.example".to_string(),
            recipient: "leads@example.com".to_string(),
            poll_attempts: 3,
            poll_interval_ms: 10,
        }
    }

    #[tokio::test]
    async fn test_unconfigured_returns_false() {
        let notifier = EmailNotifier::disabled();
        assert!(!notifier.is_configured());
        assert!(!notifier.send_lead_email(&lead()).await);
    }

    #[test]
    fn test_parse_connection_string() {
        let connection =
            AcsConnection::parse("endpoint=https://acs.example.com/;accesskey=abc==").unwrap();
        assert_eq!(connection.endpoint.host_str(), Some("acs.example.com"));
        assert_eq!(connection.access_key.expose_secret(), "abc==");

        assert!(AcsConnection::parse("accesskey=abc").is_err());
        assert!(AcsConnection::parse("endpoint=https://acs.example.com").is_err());

        let invalid = EmailConfig {
            connection_string: Some("garbage".to_string()),
            ..Default::default()
        };
        assert!(!EmailNotifier::from_config(&invalid).is_configured());
    }

    #[test]
    fn test_signature_matches_reference() {
        let to_sign = string_to_sign(
            "POST",
            "/emails:send?api-version=2023-03-31",
            "Tue, 07 Oct 2025 10:00:00 GMT",
            "acs.example.com",
            &BASE64.encode(Sha256::digest(b"{}")),
        );
        assert_eq!(
            compute_signature(ACCESS_KEY, &to_sign).unwrap(),
            "lDph4YeXNPLsgfA822XeQ4QBoR1v3KCd3xRT42Id0kg="
        );
        assert!(compute_signature("not base64!", &to_sign).is_err());
    }

    #[test]
    fn test_email_html_escapes_lead_fields() {
        let html = build_email_html(&lead());
        assert!(html.contains("Jan &lt;b&gt;de Vries&lt;/b&gt;"));
        assert!(html.contains("Acme &amp; Co"));
        assert!(html.contains("<a href=\"mailto:jan@acme.nl\">jan@acme.nl</a>"));
        assert!(html.contains("Gecheckte tool"));
    }

    async fn mount_send(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/emails:send"))
            .and(query_param("api-version", API_VERSION))
            .and(header_exists("authorization"))
            .and(header_exists("x-ms-date"))
            .and(header_exists("x-ms-content-sha256"))
            .and(body_partial_json(json!({
                "senderAddress": "DoNotReply@toolchecker.example",
                "recipients": {"to": [{"address": "leads@example.com"}]},
                "content": {"subject": "Nieuwe lead via ToolChecker: Jan <b>de Vries</b> (Acme & Co)"}
            })))
            .respond_with(ResponseTemplate::new(202).insert_header(
                "Operation-Location",
                format!("{}/emails/operations/op-1?api-version={}", server.uri(), API_VERSION),
            ))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_send_polls_until_succeeded() {
        let server = MockServer::start().await;
        mount_send(&server).await;

        Mock::given(method("GET"))
            .and(path("/emails/operations/op-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Running"})))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/emails/operations/op-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Succeeded"})))
            .with_priority(2)
            .mount(&server)
            .await;

        let notifier = EmailNotifier::from_config(&config(&server.uri()));
        assert!(notifier.send_lead_email(&lead()).await);
    }

    #[tokio::test]
    async fn test_failed_operation_returns_false() {
        let server = MockServer::start().await;
        mount_send(&server).await;

        Mock::given(method("GET"))
            .and(path("/emails/operations/op-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Failed",
                "error": {"code": "InvalidSender"}
            })))
            .mount(&server)
            .await;

        let notifier = EmailNotifier::from_config(&config(&server.uri()));
        assert!(!notifier.send_lead_email(&lead()).await);
    }

    #[tokio::test]
    async fn test_rejected_send_returns_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let notifier = EmailNotifier::from_config(&config(&server.uri()));
        assert!(!notifier.send_lead_email(&lead()).await);
    }
}
