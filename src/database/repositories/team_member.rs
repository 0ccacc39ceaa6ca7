use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{MemberStatus, TeamMember, TeamMemberDetail, TeamRole, UserMembership},
    utils::sql,
};

pub async fn add_team_member(
    tx: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
    user_id: Uuid,
    role: TeamRole,
    status: MemberStatus,
    joined_at: Option<DateTime<Utc>>,
) -> Result<TeamMember, sqlx::Error> {
    let now = Utc::now();
    let team_member = sqlx::query_as::<_, TeamMember>(&sql(r#"
            INSERT INTO
                team_members (
                    team_id,
                    user_id,
                    role_in_team,
                    status,
                    joined_at,
                    created_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                team_id,
                user_id,
                role_in_team,
                status,
                joined_at,
                created_at
        "#))
    .bind(team_id)
    .bind(user_id)
    .bind(role)
    .bind(status)
    .bind(joined_at)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;

    Ok(team_member)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<TeamMember>, sqlx::Error> {
    let team_member = sqlx::query_as::<_, TeamMember>(&sql(r#"
            SELECT
                id,
                team_id,
                user_id,
                role_in_team,
                status,
                joined_at,
                created_at
            FROM
                team_members
            WHERE
                id = ?
        "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(team_member)
}

pub async fn get_team_members_tx(
    tx: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> Result<Vec<TeamMember>, sqlx::Error> {
    let team_members = sqlx::query_as::<_, TeamMember>(&sql(r#"
            SELECT
                id,
                team_id,
                user_id,
                role_in_team,
                status,
                joined_at,
                created_at
            FROM
                team_members
            WHERE
                team_id = ?
            ORDER BY
                created_at
        "#))
    .bind(team_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(team_members)
}

pub async fn get_team_members(team_id: Uuid) -> Result<Vec<TeamMember>, sqlx::Error> {
    let team_members = sqlx::query_as::<_, TeamMember>(&sql(r#"
            SELECT
                id,
                team_id,
                user_id,
                role_in_team,
                status,
                joined_at,
                created_at
            FROM
                team_members
            WHERE
                team_id = ?
            ORDER BY
                created_at
        "#))
    .bind(team_id)
    .fetch_all(get_pool())
    .await?;

    Ok(team_members)
}

/// Members of a team in the given status, joined with their profiles.
pub async fn get_member_details(
    team_id: Uuid,
    status: MemberStatus,
) -> Result<Vec<TeamMemberDetail>, sqlx::Error> {
    let members = sqlx::query_as::<_, TeamMemberDetail>(&sql(r#"
            SELECT
                tm.id,
                tm.team_id,
                tm.user_id,
                tm.role_in_team,
                tm.status,
                tm.joined_at,
                p.username,
                p.avatar_url
            FROM
                team_members tm
                INNER JOIN profiles p ON p.id = tm.user_id
            WHERE
                tm.team_id = ?
                AND tm.status = ?
            ORDER BY
                tm.role_in_team = 'captain' DESC,
                tm.joined_at NULLS LAST,
                tm.created_at
        "#))
    .bind(team_id)
    .bind(status)
    .fetch_all(get_pool())
    .await?;

    Ok(members)
}

pub async fn get_user_memberships(user_id: Uuid) -> Result<Vec<UserMembership>, sqlx::Error> {
    let memberships = sqlx::query_as::<_, UserMembership>(&sql(r#"
            SELECT
                tm.id AS member_id,
                t.id AS team_id,
                t.team_name,
                t.team_logo,
                t.status AS team_status,
                tm.role_in_team,
                tm.status,
                tm.joined_at
            FROM
                team_members tm
                INNER JOIN teams t ON t.id = tm.team_id
            WHERE
                tm.user_id = ?
                AND tm.status IN ('pending', 'active')
            ORDER BY
                tm.created_at DESC
        "#))
    .bind(user_id)
    .fetch_all(get_pool())
    .await?;

    Ok(memberships)
}

pub async fn update_member_status(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    status: MemberStatus,
    joined_at: Option<DateTime<Utc>>,
) -> Result<(), sqlx::Error> {
    sqlx::query(&sql(r#"
            UPDATE
                team_members
            SET
                status = ?,
                joined_at = ?
            WHERE
                id = ?
        "#))
    .bind(status)
    .bind(joined_at)
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn update_member_role(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    role: TeamRole,
) -> Result<(), sqlx::Error> {
    sqlx::query(&sql("UPDATE team_members SET role_in_team = ? WHERE id = ?"))
        .bind(role)
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

pub async fn delete_member(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(&sql("DELETE FROM team_members WHERE id = ?"))
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
