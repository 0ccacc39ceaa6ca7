use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub team_name: String,
    pub team_description: Option<String>,
    pub team_logo: Option<String>, // public URL
    pub captain_id: Uuid,
    pub status: TeamStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamInput {
    pub team_name: String,
    pub team_description: Option<String>,
    pub team_logo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamInput {
    pub team_name: String,
    pub team_description: Option<String>,
    pub team_logo: Option<String>,
}

/// Row values for a new team, resolved from the request and the creator's role.
#[derive(Debug, Clone)]
pub struct TeamInput {
    pub team_name: String,
    pub team_description: Option<String>,
    pub team_logo: Option<String>,
    pub captain_id: Uuid,
    pub status: TeamStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role_in_team: TeamRole,
    pub status: MemberStatus,
    pub joined_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    pub fn is_captain(&self) -> bool {
        self.role_in_team == TeamRole::Captain
    }
}

/// Member row joined with the public part of the member's profile.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberDetail {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role_in_team: TeamRole,
    pub status: MemberStatus,
    pub joined_at: Option<DateTime<Utc>>,
    pub username: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub id: Uuid,
    pub team_name: String,
    pub team_description: Option<String>,
    pub team_logo: Option<String>,
    pub captain_id: Uuid,
    pub status: TeamStatus,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

/// A user's membership together with the team it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserMembership {
    pub member_id: Uuid,
    pub team_id: Uuid,
    pub team_name: String,
    pub team_logo: Option<String>,
    pub team_status: TeamStatus,
    pub role_in_team: TeamRole,
    pub status: MemberStatus,
    pub joined_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetail {
    #[serde(flatten)]
    pub team: Team,
    pub members: Vec<TeamMemberDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferCaptaincyInput {
    pub new_captain_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamStatusQuery {
    pub status: Option<TeamStatus>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum TeamStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

impl TeamStatus {
    /// Teams are reviewed once: only a pending team moves, and only forward.
    pub fn can_transition_to(&self, next: TeamStatus) -> bool {
        matches!(
            (self, next),
            (TeamStatus::Pending, TeamStatus::Approved) | (TeamStatus::Pending, TeamStatus::Rejected)
        )
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum TeamRole {
        Captain => "captain",
        Member => "member",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum MemberStatus {
        Pending => "pending",
        Active => "active",
        Rejected => "rejected",
        Left => "left",
    }
}

impl MemberStatus {
    /// Pending and active rows count against the one-membership-per-team rule.
    pub fn is_open(&self) -> bool {
        matches!(self, MemberStatus::Pending | MemberStatus::Active)
    }

    pub fn can_transition_to(&self, next: MemberStatus) -> bool {
        matches!(
            (self, next),
            (MemberStatus::Pending, MemberStatus::Active)
                | (MemberStatus::Pending, MemberStatus::Rejected)
                | (MemberStatus::Active, MemberStatus::Left)
        )
    }
}
