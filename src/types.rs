use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

/// Who authored a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: now_iso(),
        }
    }
}

/// Body of the single POST the gateway understands. `session_id` is omitted
/// entirely (not sent as null) on the zero-message info probe.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayRequest {
    pub slug: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Gateway reply envelope. Every field is optional and fields are not
/// mutually exclusive; a reply may carry both `error` and `response`.
///
/// `identified_product` keeps absent and explicit-null apart: `None` means
/// the field was missing, `Some(None)` means the backend sent null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayReply {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub identified_product: Option<Option<String>>,
}

fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
