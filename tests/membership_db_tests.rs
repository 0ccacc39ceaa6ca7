use chrono::Utc;
use pretty_assertions::assert_eq;
use sqlx::PgPool;
use squadhub::AppError;
use squadhub::database::models::{CreateTeamInput, MemberStatus, Team, TeamRole, TeamStatus};
use squadhub::database::repositories::{
    profile as profile_repo, team as team_repo, team_member as team_member_repo,
};
use squadhub::handlers::teams::apply_plan;
use squadhub::middleware::RequestInfo;
use squadhub::services::team_membership::{self, RosterChange, TeamRoster};
use uuid::Uuid;

fn request_info() -> RequestInfo {
    RequestInfo {
        user_agent: "squadhub-tests".to_string(),
        ip_address: "127.0.0.1".to_string(),
    }
}

async fn create_user(pool: &PgPool, username: &str) -> Uuid {
    let mut tx = pool.begin().await.unwrap();
    let profile = profile_repo::create_profile(
        &mut tx,
        &format!("{}@example.com", username),
        "not-a-real-hash",
        username,
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    profile.id
}

/// Team with its captain row, created the way the create endpoint does it.
async fn create_team(pool: &PgPool, captain_id: Uuid, by_admin: bool) -> Team {
    let now = Utc::now();
    let input = team_membership::new_team(
        CreateTeamInput {
            team_name: "Night Owls".to_string(),
            team_description: None,
            team_logo: None,
        },
        captain_id,
        by_admin,
        now,
    )
    .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let team = team_repo::create_team(&mut tx, input).await.unwrap();
    let status = team_membership::captain_status_for(team.status);
    team_member_repo::add_team_member(
        &mut tx,
        team.id,
        captain_id,
        TeamRole::Captain,
        status,
        (status == MemberStatus::Active).then_some(now),
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    team
}

async fn add_member(pool: &PgPool, team_id: Uuid, user_id: Uuid, status: MemberStatus) -> Uuid {
    let mut tx = pool.begin().await.unwrap();
    let member =
        team_member_repo::add_team_member(&mut tx, team_id, user_id, TeamRole::Member, status, None)
            .await
            .unwrap();
    tx.commit().await.unwrap();
    member.id
}

async fn fetch_roster(pool: &PgPool, team_id: Uuid) -> Option<TeamRoster> {
    let mut tx = pool.begin().await.unwrap();
    let roster = team_repo::load_roster(&mut tx, team_id).await.unwrap();
    tx.commit().await.unwrap();
    roster
}

async fn count(pool: &PgPool, query: &str, id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>(query)
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn audit_actions(pool: &PgPool, team_id: Uuid) -> Vec<String> {
    sqlx::query_scalar::<_, String>(
        "SELECT action FROM team_audit_logs WHERE team_id = $1 ORDER BY action",
    )
    .bind(team_id)
    .fetch_all(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_approving_team_updates_team_and_captain_rows(pool: PgPool) {
    let captain_id = create_user(&pool, "captain").await;
    let admin_id = create_user(&pool, "admin").await;
    let team = create_team(&pool, captain_id, false).await;

    let mut tx = pool.begin().await.unwrap();
    apply_plan(&mut tx, team.id, admin_id, request_info(), move |roster| {
        roster.plan_review_team(admin_id, TeamStatus::Approved, Utc::now())
    })
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let roster = fetch_roster(&pool, team.id).await.unwrap();
    assert_eq!(roster.team.status, TeamStatus::Approved);
    assert_eq!(roster.team.approved_by, Some(admin_id));
    assert!(roster.team.approved_at.is_some());

    let captain = roster.active_captain().unwrap();
    assert_eq!(captain.user_id, captain_id);
    assert!(captain.joined_at.is_some());

    assert_eq!(audit_actions(&pool, team.id).await, vec!["team_approved"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rejecting_team_rejects_captain_row(pool: PgPool) {
    let captain_id = create_user(&pool, "captain").await;
    let admin_id = create_user(&pool, "admin").await;
    let team = create_team(&pool, captain_id, false).await;

    let mut tx = pool.begin().await.unwrap();
    apply_plan(&mut tx, team.id, admin_id, request_info(), move |roster| {
        roster.plan_review_team(admin_id, TeamStatus::Rejected, Utc::now())
    })
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let roster = fetch_roster(&pool, team.id).await.unwrap();
    assert_eq!(roster.team.status, TeamStatus::Rejected);
    assert_eq!(roster.team.approved_by, None);
    assert_eq!(roster.members.len(), 1);
    assert_eq!(roster.members[0].status, MemberStatus::Rejected);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_last_captain_leaving_deletes_team_and_members(pool: PgPool) {
    let captain_id = create_user(&pool, "captain").await;
    let former = create_user(&pool, "former").await;
    let team = create_team(&pool, captain_id, true).await;
    add_member(&pool, team.id, former, MemberStatus::Rejected).await;

    let mut tx = pool.begin().await.unwrap();
    let plan = apply_plan(&mut tx, team.id, captain_id, request_info(), move |roster| {
        roster.plan_leave(captain_id)
    })
    .await
    .unwrap();
    tx.commit().await.unwrap();

    assert!(plan.deletes_team());
    assert!(fetch_roster(&pool, team.id).await.is_none());
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM team_members WHERE team_id = $1", team.id).await,
        0
    );
    // Audit rows outlive the team
    assert_eq!(audit_actions(&pool, team.id).await, vec!["team_deleted"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_captain_with_members_cannot_leave(pool: PgPool) {
    let captain_id = create_user(&pool, "captain").await;
    let player = create_user(&pool, "player").await;
    let team = create_team(&pool, captain_id, true).await;
    add_member(&pool, team.id, player, MemberStatus::Active).await;
    let before = fetch_roster(&pool, team.id).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let result = apply_plan(&mut tx, team.id, captain_id, request_info(), move |roster| {
        roster.plan_leave(captain_id)
    })
    .await;
    tx.rollback().await.unwrap();

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(fetch_roster(&pool, team.id).await.unwrap(), before);
    assert!(audit_actions(&pool, team.id).await.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_open_membership_is_a_conflict(pool: PgPool) {
    let captain_id = create_user(&pool, "captain").await;
    let player = create_user(&pool, "player").await;
    let team = create_team(&pool, captain_id, true).await;
    add_member(&pool, team.id, player, MemberStatus::Pending).await;

    let mut tx = pool.begin().await.unwrap();
    let err = team_member_repo::add_team_member(
        &mut tx,
        team.id,
        player,
        TeamRole::Member,
        MemberStatus::Pending,
        None,
    )
    .await
    .unwrap_err();
    tx.rollback().await.unwrap();

    assert!(matches!(AppError::from(err), AppError::Conflict(_)));
    assert_eq!(
        count(
            &pool,
            "SELECT COUNT(*) FROM team_members WHERE user_id = $1",
            player
        )
        .await,
        1
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_closed_membership_allows_new_request(pool: PgPool) {
    let captain_id = create_user(&pool, "captain").await;
    let player = create_user(&pool, "player").await;
    let team = create_team(&pool, captain_id, true).await;
    add_member(&pool, team.id, player, MemberStatus::Rejected).await;

    let roster_before = fetch_roster(&pool, team.id).await.unwrap();
    assert!(roster_before.check_join(player).is_ok());

    add_member(&pool, team.id, player, MemberStatus::Pending).await;

    let roster = fetch_roster(&pool, team.id).await.unwrap();
    let statuses: Vec<MemberStatus> = roster
        .members
        .iter()
        .filter(|m| m.user_id == player)
        .map(|m| m.status)
        .collect();
    assert_eq!(statuses, vec![MemberStatus::Rejected, MemberStatus::Pending]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failed_step_rolls_back_earlier_changes(pool: PgPool) {
    let captain_id = create_user(&pool, "captain").await;
    let player = create_user(&pool, "player").await;
    let team = create_team(&pool, captain_id, true).await;
    let member_id = add_member(&pool, team.id, player, MemberStatus::Pending).await;

    // Promoting without demoting breaks the one-active-captain index
    let changes = vec![
        RosterChange::MemberStatus {
            member_id,
            status: MemberStatus::Active,
            joined_at: Some(Utc::now()),
        },
        RosterChange::MemberRole {
            member_id,
            role: TeamRole::Captain,
        },
    ];

    let mut tx = pool.begin().await.unwrap();
    let result = team_repo::apply_roster_changes(&mut tx, &changes).await;
    tx.rollback().await.unwrap();

    assert!(result.is_err());
    let roster = fetch_roster(&pool, team.id).await.unwrap();
    let member = roster.member(member_id).unwrap();
    assert_eq!(member.status, MemberStatus::Pending);
    assert_eq!(member.role_in_team, TeamRole::Member);
    assert_eq!(roster.active_captain().unwrap().user_id, captain_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_transfer_captaincy_swaps_rows(pool: PgPool) {
    let captain_id = create_user(&pool, "captain").await;
    let player = create_user(&pool, "player").await;
    let team = create_team(&pool, captain_id, true).await;
    add_member(&pool, team.id, player, MemberStatus::Pending).await;

    let mut tx = pool.begin().await.unwrap();
    let roster_now = team_repo::load_roster(&mut tx, team.id).await.unwrap().unwrap();
    let pending = roster_now
        .members
        .iter()
        .find(|m| m.user_id == player)
        .unwrap()
        .id;
    apply_plan(&mut tx, team.id, captain_id, request_info(), move |roster| {
        roster.plan_review_member(captain_id, pending, MemberStatus::Active, Utc::now())
    })
    .await
    .unwrap();
    apply_plan(&mut tx, team.id, captain_id, request_info(), move |roster| {
        roster.plan_transfer(captain_id, player)
    })
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let roster = fetch_roster(&pool, team.id).await.unwrap();
    assert_eq!(roster.team.captain_id, player);
    assert_eq!(roster.active_captain().unwrap().user_id, player);
    let previous = roster
        .members
        .iter()
        .find(|m| m.user_id == captain_id)
        .unwrap();
    assert_eq!(previous.role_in_team, TeamRole::Member);
    assert_eq!(previous.status, MemberStatus::Active);
    assert_eq!(
        audit_actions(&pool, team.id).await,
        vec!["captaincy_transferred", "member_approved"]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_kick_deletes_member_row(pool: PgPool) {
    let captain_id = create_user(&pool, "captain").await;
    let player = create_user(&pool, "player").await;
    let team = create_team(&pool, captain_id, true).await;
    let member_id = add_member(&pool, team.id, player, MemberStatus::Active).await;

    let mut tx = pool.begin().await.unwrap();
    apply_plan(&mut tx, team.id, captain_id, request_info(), move |roster| {
        roster.plan_kick(captain_id, member_id)
    })
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let roster = fetch_roster(&pool, team.id).await.unwrap();
    assert!(roster.member(member_id).is_err());
    assert_eq!(roster.active_members().count(), 1);
}
