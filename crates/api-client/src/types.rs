//! Request and response payloads for the catalog API

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per-field error messages keyed by field name (e.g. "username", "password")
pub type FieldErrors = BTreeMap<String, String>;

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    /// Account username
    pub username: &'a str,
    /// Account password
    pub password: &'a str,
}

/// Registration request body
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    /// Desired username
    pub username: &'a str,
    /// Password
    pub password: &'a str,
    /// Email address
    pub email: &'a str,
}

/// Successful login payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    /// Session token issued by the backend
    pub token: String,
}

/// Registration acknowledgement
///
/// Some backends log the new account in straight away and return a token;
/// others only acknowledge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegisterResponse {
    /// Session token, when the backend issues one on registration
    #[serde(default)]
    pub token: Option<String>,
    /// Informational message
    #[serde(default)]
    pub message: Option<String>,
}

/// Backend identifier of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    /// Numeric id
    Number(u64),
    /// Opaque string id
    Text(String),
}

/// Profile of the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend identity, when sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// Username
    pub username: String,
    /// Email address
    pub email: String,
}

impl UserProfile {
    /// Create a profile without a backend id
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self { id: None, username: username.into(), email: email.into() }
    }
}

/// Payloads arrive either bare or wrapped in a `data` envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

/// Decode a success payload, accepting both envelope shapes
pub(crate) fn decode_payload<T: DeserializeOwned>(body: &str) -> serde_json::Result<T> {
    serde_json::from_str::<Envelope<T>>(body).map(Envelope::into_inner)
}

/// Error body sent by the backend
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<HashMap<String, serde_json::Value>>,
}

impl ErrorBody {
    /// Parse an error body; anything that is not JSON yields an empty body
    pub fn parse(body: &str) -> Self {
        decode_payload::<ErrorBody>(body).unwrap_or_default()
    }

    /// Top-level message, ignoring blank strings
    pub fn message(&self) -> Option<String> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    /// Field errors flattened to one string per field
    pub fn field_errors(&self) -> FieldErrors {
        let mut out = FieldErrors::new();
        if let Some(errors) = &self.errors {
            for (field, value) in errors {
                if let Some(text) = flatten_field_error(value) {
                    out.insert(field.clone(), text);
                }
            }
        }
        out
    }
}

fn flatten_field_error(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.trim().is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(flatten_field_error).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        other => Some(other.to_string()),
    }
}
