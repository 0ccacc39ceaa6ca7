use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamAuditLog {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub details: Option<String>, // JSON object serialized as text
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuditInput {
    pub team_id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub details: Option<HashMap<String, serde_json::Value>>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

// Audit actions written to team_audit_logs
#[allow(non_snake_case)]
pub mod AuditAction {
    pub const TEAM_CREATED: &str = "team_created";
    pub const TEAM_UPDATED: &str = "team_updated";
    pub const TEAM_APPROVED: &str = "team_approved";
    pub const TEAM_REJECTED: &str = "team_rejected";
    pub const TEAM_DELETED: &str = "team_deleted";
    pub const JOIN_REQUESTED: &str = "join_requested";
    pub const MEMBER_APPROVED: &str = "member_approved";
    pub const MEMBER_REJECTED: &str = "member_rejected";
    pub const MEMBER_KICKED: &str = "member_kicked";
    pub const MEMBER_LEFT: &str = "member_left";
    pub const CAPTAINCY_TRANSFERRED: &str = "captaincy_transferred";
}
