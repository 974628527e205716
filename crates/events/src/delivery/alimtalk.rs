//! KakaoTalk alimtalk delivery.
//!
//! [`KakaoAlimtalk`] submits a rendered template message to the Kakao i
//! Connect send API. The message must match the pre-registered template
//! exactly, and the provider falls back to SMS when the recipient cannot
//! receive KakaoTalk.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://api.kakaoi.ai";

/// Number shown as the sender of SMS fallbacks.
const DEFAULT_FALLBACK_SENDER_NO: &str = "18336025";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for alimtalk delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum AlimtalkError {
    /// The HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered but did not accept the message.
    #[error("Alimtalk rejected (HTTP {status}, code {code}): {message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },

    /// The receiver number is empty or not all digits after formatting.
    #[error("Invalid receiver number: '{0}'")]
    InvalidReceiver(String),
}

// ---------------------------------------------------------------------------
// AlimtalkConfig
// ---------------------------------------------------------------------------

/// Credentials and endpoint of the alimtalk gateway.
#[derive(Debug, Clone)]
pub struct AlimtalkConfig {
    pub base_url: String,
    pub sender_key: String,
    pub access_token: String,
    pub fallback_sender_no: String,
}

impl AlimtalkConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `KAKAO_SENDER_KEY` is not set, signalling that
    /// alimtalk delivery is not configured and should be skipped.
    ///
    /// | Variable                   | Required | Default                 |
    /// |----------------------------|----------|-------------------------|
    /// | `KAKAO_SENDER_KEY`         | yes      |                         |
    /// | `KAKAO_ACCESS_TOKEN`       | no       | empty                   |
    /// | `KAKAO_API_BASE_URL`       | no       | `https://api.kakaoi.ai` |
    /// | `KAKAO_FALLBACK_SENDER_NO` | no       | `18336025`              |
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Some(Self {
            sender_key: read("KAKAO_SENDER_KEY")?,
            access_token: read("KAKAO_ACCESS_TOKEN").unwrap_or_default(),
            base_url: read("KAKAO_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            fallback_sender_no: read("KAKAO_FALLBACK_SENDER_NO")
                .unwrap_or_else(|| DEFAULT_FALLBACK_SENDER_NO.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Message and receipt
// ---------------------------------------------------------------------------

/// A rendered template message for one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlimtalkMessage {
    pub template_code: String,
    /// Digits only; hyphens are stripped on construction.
    pub receiver_num: String,
    pub receiver_name: String,
    pub content: String,
}

impl AlimtalkMessage {
    pub fn new(
        template_code: impl Into<String>,
        receiver_num: &str,
        receiver_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            template_code: template_code.into(),
            receiver_num: format_receiver(receiver_num),
            receiver_name: receiver_name.into(),
            content: content.into(),
        }
    }
}

/// Strip hyphens and surrounding whitespace from a phone number.
pub fn format_receiver(number: &str) -> String {
    number.trim().replace('-', "")
}

/// Whether a formatted number can be sent to: non-empty and digits only.
pub fn is_valid_receiver(number: &str) -> bool {
    !number.is_empty() && number.chars().all(|c| c.is_ascii_digit())
}

/// Identifiers of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlimtalkReceipt {
    pub uid: Option<String>,
    pub cid: String,
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Something that can deliver an alimtalk message.
#[async_trait]
pub trait AlimtalkGateway: Send + Sync {
    async fn send(&self, message: &AlimtalkMessage) -> Result<AlimtalkReceipt, AlimtalkError>;
}

/// Alimtalk gateway over the Kakao i Connect HTTP API.
pub struct KakaoAlimtalk {
    client: reqwest::Client,
    config: AlimtalkConfig,
}

impl KakaoAlimtalk {
    /// Create a gateway reusing an existing HTTP client. The client's
    /// timeout applies to every send.
    pub fn with_client(client: reqwest::Client, config: AlimtalkConfig) -> Self {
        Self { client, config }
    }

    fn send_url(&self) -> String {
        format!("{}/v2/send/kakao", self.config.base_url.trim_end_matches('/'))
    }

    fn request_body(&self, message: &AlimtalkMessage, cid: &str) -> Value {
        json!({
            "message_type": "AT",
            "sender_key": self.config.sender_key,
            "cid": cid,
            "template_code": message.template_code,
            "phone_number": message.receiver_num,
            "message": message.content,
            "fall_back_yn": true,
            "sender_no": self.config.fallback_sender_no,
        })
    }
}

#[async_trait]
impl AlimtalkGateway for KakaoAlimtalk {
    async fn send(&self, message: &AlimtalkMessage) -> Result<AlimtalkReceipt, AlimtalkError> {
        if !is_valid_receiver(&message.receiver_num) {
            return Err(AlimtalkError::InvalidReceiver(message.receiver_num.clone()));
        }

        let cid = new_cid();
        let response = self
            .client
            .post(self.send_url())
            .header(ACCEPT, "*/*")
            .header(AUTHORIZATION, format!("Bearer {}", self.config.access_token))
            .json(&self.request_body(message, &cid))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        let receipt = interpret_response(status, &body, &cid)?;
        tracing::info!(
            template_code = %message.template_code,
            cid = %receipt.cid,
            "Alimtalk sent"
        );
        Ok(receipt)
    }
}

// ---- private helpers ----

/// Client-side message id, unique per send.
fn new_cid() -> String {
    format!("cnec_{}", uuid::Uuid::now_v7().simple())
}

#[derive(Debug, Default, Deserialize)]
struct SendResponse {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    uid: Option<Value>,
    #[serde(default)]
    cid: Option<String>,
    #[serde(default)]
    result: Option<SendResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SendResult {
    #[serde(default)]
    detail_message: Option<String>,
}

/// Accept only HTTP 2xx with `code == "200"`.
fn interpret_response(status: u16, body: &str, cid: &str) -> Result<AlimtalkReceipt, AlimtalkError> {
    let parsed: SendResponse = serde_json::from_str(body).unwrap_or_default();
    let code = match &parsed.code {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    if (200..300).contains(&status) && code == "200" {
        return Ok(AlimtalkReceipt {
            uid: parsed.uid.map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            }),
            cid: parsed.cid.unwrap_or_else(|| cid.to_string()),
        });
    }

    let message = parsed
        .result
        .and_then(|r| r.detail_message)
        .unwrap_or_else(|| {
            if body.is_empty() {
                "Unknown error".to_string()
            } else {
                body.to_string()
            }
        });

    Err(AlimtalkError::Rejected {
        status,
        code,
        message,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
