use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub id: Uuid,
    pub title: String,
    pub platform: String,
    pub stream_url: String,
    pub thumbnail_url: Option<String>,
    pub is_live: bool,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUpdateStreamInput {
    pub title: String,
    pub platform: String,
    pub stream_url: String,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub is_live: bool,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl CreateUpdateStreamInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Stream title is required".to_string());
        }
        if !(self.stream_url.starts_with("https://") || self.stream_url.starts_with("http://")) {
            return Err("Stream URL must be an http(s) URL".to_string());
        }
        Ok(())
    }
}
