use chrono::Utc;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    database::{
        get_pool,
        models::{Team, TeamInput, TeamStatus, TeamSummary, UpdateTeamInput},
        repositories::team_member as team_member_repo,
        utils::sql,
    },
    services::team_membership::{RosterChange, TeamRoster},
};

// Team management methods
pub async fn create_team(
    tx: &mut Transaction<'_, Postgres>,
    input: TeamInput,
) -> Result<Team, sqlx::Error> {
    let now = Utc::now();
    let team = sqlx::query_as::<_, Team>(&sql(r#"
            INSERT INTO
                teams (
                    team_name,
                    team_description,
                    team_logo,
                    captain_id,
                    status,
                    approved_by,
                    approved_at,
                    created_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                team_name,
                team_description,
                team_logo,
                captain_id,
                status,
                approved_by,
                approved_at,
                created_at
        "#))
    .bind(input.team_name)
    .bind(input.team_description)
    .bind(input.team_logo)
    .bind(input.captain_id)
    .bind(input.status)
    .bind(input.approved_by)
    .bind(input.approved_at)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;

    Ok(team)
}

pub async fn get_team_by_id(id: Uuid) -> Result<Option<Team>, sqlx::Error> {
    let team = sqlx::query_as::<_, Team>(&sql(r#"
            SELECT
                id,
                team_name,
                team_description,
                team_logo,
                captain_id,
                status,
                approved_by,
                approved_at,
                created_at
            FROM
                teams
            WHERE
                id = ?
        "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(team)
}

/// Load a team and its members, locking the team row for the rest of the transaction.
pub async fn load_roster(
    tx: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> Result<Option<TeamRoster>, sqlx::Error> {
    let team = sqlx::query_as::<_, Team>(&sql(r#"
            SELECT
                id,
                team_name,
                team_description,
                team_logo,
                captain_id,
                status,
                approved_by,
                approved_at,
                created_at
            FROM
                teams
            WHERE
                id = ?
            FOR UPDATE
        "#))
    .bind(team_id)
    .fetch_optional(&mut **tx)
    .await?;

    let Some(team) = team else {
        return Ok(None);
    };

    let members = team_member_repo::get_team_members_tx(tx, team.id).await?;

    Ok(Some(TeamRoster::new(team, members)))
}

pub async fn get_teams_by_status(status: TeamStatus) -> Result<Vec<TeamSummary>, sqlx::Error> {
    let teams = sqlx::query_as::<_, TeamSummary>(&sql(r#"
            SELECT
                t.id,
                t.team_name,
                t.team_description,
                t.team_logo,
                t.captain_id,
                t.status,
                COUNT(tm.id) FILTER (WHERE tm.status = 'active') AS member_count,
                t.created_at
            FROM
                teams t
                LEFT JOIN team_members tm ON tm.team_id = t.id
            WHERE
                t.status = ?
            GROUP BY
                t.id
            ORDER BY
                t.created_at DESC
        "#))
    .bind(status)
    .fetch_all(get_pool())
    .await?;

    Ok(teams)
}

pub async fn update_team_details(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    input: UpdateTeamInput,
) -> Result<Option<Team>, sqlx::Error> {
    let team = sqlx::query_as::<_, Team>(&sql(r#"
            UPDATE
                teams
            SET
                team_name = ?,
                team_description = ?,
                team_logo = ?
            WHERE
                id = ?
            RETURNING
                id,
                team_name,
                team_description,
                team_logo,
                captain_id,
                status,
                approved_by,
                approved_at,
                created_at
        "#))
    .bind(input.team_name)
    .bind(input.team_description)
    .bind(input.team_logo)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(team)
}

async fn set_team_status(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    status: TeamStatus,
    reviewed_by: Uuid,
    reviewed_at: chrono::DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    // Only approvals are stamped; a rejection leaves approved_by empty
    let (approved_by, approved_at) = if status == TeamStatus::Approved {
        (Some(reviewed_by), Some(reviewed_at))
    } else {
        (None, None)
    };

    sqlx::query(&sql(r#"
            UPDATE
                teams
            SET
                status = ?,
                approved_by = ?,
                approved_at = ?
            WHERE
                id = ?
        "#))
    .bind(status)
    .bind(approved_by)
    .bind(approved_at)
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn set_captain(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    captain_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(&sql("UPDATE teams SET captain_id = ? WHERE id = ?"))
        .bind(captain_id)
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

pub async fn delete_team(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql("DELETE FROM teams WHERE id = ?"))
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}

/// Execute planned roster changes in order.
pub async fn apply_roster_changes(
    tx: &mut Transaction<'_, Postgres>,
    changes: &[RosterChange],
) -> Result<(), sqlx::Error> {
    for change in changes {
        match *change {
            RosterChange::TeamStatus {
                team_id,
                status,
                reviewed_by,
                reviewed_at,
            } => set_team_status(tx, team_id, status, reviewed_by, reviewed_at).await?,
            RosterChange::MemberStatus {
                member_id,
                status,
                joined_at,
            } => team_member_repo::update_member_status(tx, member_id, status, joined_at).await?,
            RosterChange::MemberRole { member_id, role } => {
                team_member_repo::update_member_role(tx, member_id, role).await?
            }
            RosterChange::Captain {
                team_id,
                captain_id,
            } => set_captain(tx, team_id, captain_id).await?,
            RosterChange::DeleteMember { member_id } => {
                team_member_repo::delete_member(tx, member_id).await?
            }
            RosterChange::DeleteTeam { team_id } => {
                delete_team(tx, team_id).await?;
            }
        }
    }

    Ok(())
}
