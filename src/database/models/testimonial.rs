use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: Uuid,
    pub author_name: String,
    pub author_role: Option<String>,
    pub content: String,
    pub avatar_url: Option<String>,
    pub rating: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUpdateTestimonialInput {
    pub author_name: String,
    pub author_role: Option<String>,
    pub content: String,
    pub avatar_url: Option<String>,
    pub rating: i32,
    #[serde(default)]
    pub is_published: bool,
}

impl CreateUpdateTestimonialInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.author_name.trim().is_empty() || self.content.trim().is_empty() {
            return Err("Author name and content are required".to_string());
        }
        if !(1..=5).contains(&self.rating) {
            return Err("Rating must be between 1 and 5".to_string());
        }
        Ok(())
    }
}
