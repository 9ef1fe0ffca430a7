// Request and response bodies for the HTTP surface

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::store::Document;

// Expense creation body
//
// Fields keep whatever JSON the caller sent. A key that is present with a
// `null` value is `Some(Value::Null)`, which is distinct from an absent key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddExpenseRequest {
    #[serde(default, deserialize_with = "present")]
    pub amount: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub note: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub timestamp: Option<Value>,
    #[serde(default, rename = "userId", deserialize_with = "present")]
    pub user_id: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// An expense ready to be written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    pub amount: Value,
    pub category: Value,
    pub note: Value,
    pub timestamp: Value,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
}

impl NewExpense {
    // Field map as stored in the expenses collection
    pub fn into_fields(self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

// Query string of GET /expenses/all
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListExpensesQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

// Body of POST /ai-advice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdviceRequest {
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<IncomingMessage>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

// A chat turn as sent by the frontend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Query used when the caller sends neither `query` nor usable `messages`
pub const DEFAULT_QUERY: &str = "Hi";

impl AdviceRequest {
    /// `userId`, else `user.id`; blank strings count as absent
    pub fn resolved_user_id(&self) -> Option<&str> {
        non_blank(self.user_id.as_deref())
            .or_else(|| non_blank(self.user.as_ref().and_then(|u| u.id.as_deref())))
    }

    /// `user.name`, when given
    pub fn resolved_user_name(&self) -> Option<&str> {
        non_blank(self.user.as_ref().and_then(|u| u.name.as_deref()))
    }

    /// `query`, else the content of the last message, else [`DEFAULT_QUERY`]
    pub fn resolved_query(&self) -> &str {
        non_blank(self.query.as_deref())
            .or_else(|| non_blank(
                self.messages
                    .as_ref()
                    .and_then(|m| m.last())
                    .and_then(|m| m.content.as_deref()),
            ))
            .unwrap_or(DEFAULT_QUERY)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// Influencer entry returned by GET /groq-influencers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Influencer {
    pub name: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub link: String,
}

// Response Types
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseCreatedResponse {
    pub message: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticResponse {
    pub message: String,
    pub document: Document,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdviceResponse {
    pub advice: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InfluencersResponse {
    pub influencers: Vec<Influencer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
