//! Users mirrored from the identity provider.

use async_trait::async_trait;
use serde::Deserialize;

use crate::shared::error::AppError;

/// Local copy of an identity provider user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub external_id: String,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmailAddress {
    email_address: String,
}

/// `data` of a `user.created` identity event.
#[derive(Debug, Deserialize)]
struct IdentityUser {
    id: String,
    #[serde(default)]
    email_addresses: Vec<EmailAddress>,
    first_name: Option<String>,
    last_name: Option<String>,
    image_url: Option<String>,
}

impl UserProfile {
    /// Build a profile from an identity event payload (`{"data": {...}}`).
    pub fn from_event(event: &serde_json::Value) -> Result<Self, AppError> {
        let data = event
            .get("data")
            .cloned()
            .ok_or_else(|| AppError::BadRequest("event has no data".into()))?;
        let user: IdentityUser = serde_json::from_value(data)
            .map_err(|e| AppError::BadRequest(format!("malformed user payload: {e}")))?;

        let name = [user.first_name, user.last_name]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(Self {
            external_id: user.id,
            email: user
                .email_addresses
                .into_iter()
                .next()
                .map(|e| e.email_address)
                .unwrap_or_default(),
            name,
            image: user.image_url,
        })
    }
}

/// Extract `data.id` from an identity event.
pub fn event_user_id(event: &serde_json::Value) -> Result<String, AppError> {
    event
        .pointer("/data/id")
        .and_then(|id| id.as_str())
        .map(str::to_owned)
        .ok_or_else(|| AppError::BadRequest("event has no data.id".into()))
}

/// Storage for mirrored users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn upsert(&self, user: &UserProfile) -> Result<(), AppError>;

    /// Returns whether a user was removed.
    async fn delete(&self, external_id: &str) -> Result<bool, AppError>;
}
