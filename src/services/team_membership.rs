//! Team membership rules.
//!
//! Every membership operation loads the team's [`TeamRoster`], asks it for a
//! [`MembershipPlan`] and applies the plan's [`RosterChange`]s together with
//! the audit entry in one transaction. Nothing here touches the database, so
//! the rules can be checked against in-memory rosters.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{
    AuditAction, CreateTeamInput, MemberStatus, Team, TeamInput, TeamMember, TeamRole, TeamStatus,
};

pub const TEAM_NAME_MIN_LEN: usize = 3;
pub const TEAM_NAME_MAX_LEN: usize = 50;
pub const TEAM_DESCRIPTION_MAX_LEN: usize = 500;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    #[error("Team not found")]
    TeamNotFound,

    #[error("Membership not found")]
    MemberNotFound,

    #[error("Only the team captain can do this")]
    NotCaptain,

    #[error("You already have a pending or active membership in this team")]
    AlreadyMember,

    #[error("Team is not accepting members")]
    TeamNotApproved,

    #[error("Team has already been {0}")]
    AlreadyReviewed(TeamStatus),

    #[error("Membership request is no longer pending")]
    NotPending,

    #[error("Only active members can be removed")]
    NotActive,

    #[error("Captain cannot kick themselves")]
    CannotKickSelf,

    #[error("You must transfer captaincy to another member before leaving the team")]
    MustTransferFirst,

    #[error("New captain must be another active member of the team")]
    InvalidTransferTarget,

    #[error("You are not an active member of this team")]
    NotAMember,

    #[error("Invalid decision: {0}")]
    InvalidDecision(String),

    #[error("{0}")]
    InvalidTeamDetails(String),
}

/// A single write against the teams/team_members tables.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterChange {
    TeamStatus {
        team_id: Uuid,
        status: TeamStatus,
        reviewed_by: Uuid,
        reviewed_at: DateTime<Utc>,
    },
    MemberStatus {
        member_id: Uuid,
        status: MemberStatus,
        joined_at: Option<DateTime<Utc>>,
    },
    MemberRole {
        member_id: Uuid,
        role: TeamRole,
    },
    Captain {
        team_id: Uuid,
        captain_id: Uuid,
    },
    DeleteMember {
        member_id: Uuid,
    },
    /// Removes the team; member rows go with it through the cascade.
    DeleteTeam {
        team_id: Uuid,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MembershipPlan {
    pub changes: Vec<RosterChange>,
    pub action: &'static str,
    pub description: String,
    pub details: Vec<(&'static str, String)>,
}

impl MembershipPlan {
    pub fn deletes_team(&self) -> bool {
        self.changes
            .iter()
            .any(|change| matches!(change, RosterChange::DeleteTeam { .. }))
    }
}

/// Validate and normalise the fields of a new or edited team.
pub fn validate_team_details(
    team_name: &str,
    team_description: Option<&str>,
) -> Result<(String, Option<String>), MembershipError> {
    let team_name = team_name.trim();
    let name_len = team_name.chars().count();
    if !(TEAM_NAME_MIN_LEN..=TEAM_NAME_MAX_LEN).contains(&name_len) {
        return Err(MembershipError::InvalidTeamDetails(format!(
            "Team name must be between {} and {} characters",
            TEAM_NAME_MIN_LEN, TEAM_NAME_MAX_LEN
        )));
    }

    let description = team_description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    if let Some(ref d) = description {
        if d.chars().count() > TEAM_DESCRIPTION_MAX_LEN {
            return Err(MembershipError::InvalidTeamDetails(format!(
                "Team description must be at most {} characters",
                TEAM_DESCRIPTION_MAX_LEN
            )));
        }
    }

    Ok((team_name.to_string(), description))
}

/// Resolve the team row for a creation request.
///
/// Admin-created teams skip review; everyone else starts pending together
/// with their captain membership (see [`captain_status_for`]).
pub fn new_team(
    input: CreateTeamInput,
    creator_id: Uuid,
    creator_is_admin: bool,
    now: DateTime<Utc>,
) -> Result<TeamInput, MembershipError> {
    let (team_name, team_description) =
        validate_team_details(&input.team_name, input.team_description.as_deref())?;

    let (status, approved_by, approved_at) = if creator_is_admin {
        (TeamStatus::Approved, Some(creator_id), Some(now))
    } else {
        (TeamStatus::Pending, None, None)
    };

    Ok(TeamInput {
        team_name,
        team_description,
        team_logo: input.team_logo.filter(|logo| !logo.trim().is_empty()),
        captain_id: creator_id,
        status,
        approved_by,
        approved_at,
    })
}

pub fn captain_status_for(team_status: TeamStatus) -> MemberStatus {
    match team_status {
        TeamStatus::Approved => MemberStatus::Active,
        TeamStatus::Pending => MemberStatus::Pending,
        TeamStatus::Rejected => MemberStatus::Rejected,
    }
}

/// A team together with every membership row it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRoster {
    pub team: Team,
    pub members: Vec<TeamMember>,
}

impl TeamRoster {
    pub fn new(team: Team, members: Vec<TeamMember>) -> Self {
        Self { team, members }
    }

    pub fn team_id(&self) -> Uuid {
        self.team.id
    }

    pub fn member(&self, member_id: Uuid) -> Result<&TeamMember, MembershipError> {
        self.members
            .iter()
            .find(|m| m.id == member_id)
            .ok_or(MembershipError::MemberNotFound)
    }

    /// The user's pending or active membership, if any.
    pub fn open_membership_of(&self, user_id: Uuid) -> Option<&TeamMember> {
        self.members
            .iter()
            .find(|m| m.user_id == user_id && m.status.is_open())
    }

    pub fn active_members(&self) -> impl Iterator<Item = &TeamMember> {
        self.members.iter().filter(|m| m.is_active())
    }

    pub fn active_captain(&self) -> Option<&TeamMember> {
        self.active_members().find(|m| m.is_captain())
    }

    /// Row of the user recorded as `captain_id` on the team.
    fn captain_row(&self) -> Option<&TeamMember> {
        self.members
            .iter()
            .find(|m| m.user_id == self.team.captain_id && m.is_captain() && m.status.is_open())
    }

    fn require_captain(&self, user_id: Uuid) -> Result<&TeamMember, MembershipError> {
        self.active_captain()
            .filter(|captain| captain.user_id == user_id)
            .ok_or(MembershipError::NotCaptain)
    }

    pub fn is_captain(&self, user_id: Uuid) -> bool {
        self.require_captain(user_id).is_ok()
    }

    /// Approved teams are public; others are visible to admins and their own members.
    pub fn can_view(&self, user_id: Option<Uuid>, is_admin: bool) -> bool {
        if self.team.status == TeamStatus::Approved || is_admin {
            return true;
        }
        user_id.is_some_and(|id| self.open_membership_of(id).is_some())
    }

    /// The captain may fix team details while the team awaits review.
    pub fn can_edit(&self, user_id: Uuid, is_admin: bool) -> bool {
        is_admin || self.captain_row().is_some_and(|c| c.user_id == user_id)
    }

    /// Admin review: team and captain membership move together.
    pub fn plan_review_team(
        &self,
        admin_id: Uuid,
        decision: TeamStatus,
        now: DateTime<Utc>,
    ) -> Result<MembershipPlan, MembershipError> {
        if decision == TeamStatus::Pending {
            return Err(MembershipError::InvalidDecision(decision.to_string()));
        }
        if !self.team.status.can_transition_to(decision) {
            return Err(MembershipError::AlreadyReviewed(self.team.status));
        }

        let mut changes = vec![RosterChange::TeamStatus {
            team_id: self.team.id,
            status: decision,
            reviewed_by: admin_id,
            reviewed_at: now,
        }];

        let captain = self.captain_row().ok_or(MembershipError::MemberNotFound)?;
        let captain_status = captain_status_for(decision);
        changes.push(RosterChange::MemberStatus {
            member_id: captain.id,
            status: captain_status,
            joined_at: (captain_status == MemberStatus::Active).then_some(now),
        });

        let (action, verb) = match decision {
            TeamStatus::Approved => (AuditAction::TEAM_APPROVED, "approved"),
            _ => (AuditAction::TEAM_REJECTED, "rejected"),
        };

        Ok(MembershipPlan {
            changes,
            action,
            description: format!("Team '{}' {}", self.team.team_name, verb),
            details: vec![
                ("team_name", self.team.team_name.clone()),
                ("captain_id", captain.user_id.to_string()),
            ],
        })
    }

    /// Checks a join request; the insert itself is not a roster change.
    pub fn check_join(&self, user_id: Uuid) -> Result<(), MembershipError> {
        if self.team.status != TeamStatus::Approved {
            return Err(MembershipError::TeamNotApproved);
        }
        if self.open_membership_of(user_id).is_some() {
            return Err(MembershipError::AlreadyMember);
        }
        Ok(())
    }

    /// Captain decision on a pending join request.
    pub fn plan_review_member(
        &self,
        actor_id: Uuid,
        member_id: Uuid,
        decision: MemberStatus,
        now: DateTime<Utc>,
    ) -> Result<MembershipPlan, MembershipError> {
        if !matches!(decision, MemberStatus::Active | MemberStatus::Rejected) {
            return Err(MembershipError::InvalidDecision(decision.to_string()));
        }
        self.require_captain(actor_id)?;

        let member = self.member(member_id)?;
        if !member.status.can_transition_to(decision) {
            return Err(MembershipError::NotPending);
        }

        let (action, verb) = match decision {
            MemberStatus::Active => (AuditAction::MEMBER_APPROVED, "approved"),
            _ => (AuditAction::MEMBER_REJECTED, "rejected"),
        };

        Ok(MembershipPlan {
            changes: vec![RosterChange::MemberStatus {
                member_id: member.id,
                status: decision,
                joined_at: (decision == MemberStatus::Active).then_some(now),
            }],
            action,
            description: format!(
                "Join request of user {} {} for team '{}'",
                member.user_id, verb, self.team.team_name
            ),
            details: vec![
                ("member_id", member.id.to_string()),
                ("member_user_id", member.user_id.to_string()),
            ],
        })
    }

    pub fn plan_kick(
        &self,
        actor_id: Uuid,
        member_id: Uuid,
    ) -> Result<MembershipPlan, MembershipError> {
        self.require_captain(actor_id)?;

        let member = self.member(member_id)?;
        if member.user_id == actor_id {
            return Err(MembershipError::CannotKickSelf);
        }
        if !member.is_active() {
            return Err(MembershipError::NotActive);
        }

        Ok(MembershipPlan {
            changes: vec![RosterChange::DeleteMember {
                member_id: member.id,
            }],
            action: AuditAction::MEMBER_KICKED,
            description: format!(
                "User {} removed from team '{}'",
                member.user_id, self.team.team_name
            ),
            details: vec![("kicked_user_id", member.user_id.to_string())],
        })
    }

    /// Demote the current captain, promote the target, then repoint the team.
    pub fn plan_transfer(
        &self,
        actor_id: Uuid,
        new_captain_id: Uuid,
    ) -> Result<MembershipPlan, MembershipError> {
        let current = self.require_captain(actor_id)?;

        if new_captain_id == actor_id {
            return Err(MembershipError::InvalidTransferTarget);
        }
        let target = self
            .active_members()
            .find(|m| m.user_id == new_captain_id)
            .ok_or(MembershipError::InvalidTransferTarget)?;

        Ok(MembershipPlan {
            changes: vec![
                RosterChange::MemberRole {
                    member_id: current.id,
                    role: TeamRole::Member,
                },
                RosterChange::MemberRole {
                    member_id: target.id,
                    role: TeamRole::Captain,
                },
                RosterChange::Captain {
                    team_id: self.team.id,
                    captain_id: target.user_id,
                },
            ],
            action: AuditAction::CAPTAINCY_TRANSFERRED,
            description: format!(
                "Captaincy of team '{}' transferred to user {}",
                self.team.team_name, target.user_id
            ),
            details: vec![
                ("previous_captain_id", current.user_id.to_string()),
                ("new_captain_id", target.user_id.to_string()),
            ],
        })
    }

    /// A captain alone in the team disbands it; a captain with members must
    /// transfer first; anyone else is marked as left.
    pub fn plan_leave(&self, actor_id: Uuid) -> Result<MembershipPlan, MembershipError> {
        let membership = self
            .open_membership_of(actor_id)
            .ok_or(MembershipError::NotAMember)?;

        if membership.is_captain() {
            let others = self
                .active_members()
                .filter(|m| m.user_id != actor_id)
                .count();
            if others > 0 {
                return Err(MembershipError::MustTransferFirst);
            }

            return Ok(MembershipPlan {
                changes: vec![RosterChange::DeleteTeam {
                    team_id: self.team.id,
                }],
                action: AuditAction::TEAM_DELETED,
                description: format!(
                    "Team '{}' deleted after its captain left",
                    self.team.team_name
                ),
                details: vec![("team_name", self.team.team_name.clone())],
            });
        }

        if !membership.is_active() {
            return Err(MembershipError::NotAMember);
        }

        Ok(MembershipPlan {
            changes: vec![RosterChange::MemberStatus {
                member_id: membership.id,
                status: MemberStatus::Left,
                joined_at: membership.joined_at,
            }],
            action: AuditAction::MEMBER_LEFT,
            description: format!("User {} left team '{}'", actor_id, self.team.team_name),
            details: vec![("member_id", membership.id.to_string())],
        })
    }
}
