use actix_web::{
    HttpResponse, Result,
    web::{Json, Path},
};
use chrono::Utc;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    database::{
        models::{
            AuditAction, CreateTeamInput, MemberStatus, TeamDetail, TeamRole, TeamStatus,
            TransferCaptaincyInput, UpdateTeamInput,
        },
        repositories::{team as team_repo, team_member as team_member_repo},
        transaction::DatabaseTransaction,
    },
    error::AppError,
    handlers::shared::ApiResponse,
    middleware::request_info::RequestInfo,
    services::{
        audit_logger,
        team_membership::{self, MembershipError, MembershipPlan, TeamRoster},
        user_context::UserContext,
    },
};

/// Load the roster under lock, let `plan` decide, then apply and audit the result.
pub(crate) async fn execute_plan<F>(
    team_id: Uuid,
    actor_id: Uuid,
    req_info: RequestInfo,
    plan: F,
) -> Result<MembershipPlan, AppError>
where
    F: FnOnce(&TeamRoster) -> Result<MembershipPlan, MembershipError> + Send + 'static,
{
    DatabaseTransaction::run(|tx| Box::pin(apply_plan(tx, team_id, actor_id, req_info, plan)))
        .await
}

/// Transaction body of `execute_plan`; the caller owns commit and rollback.
pub async fn apply_plan<F>(
    tx: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
    actor_id: Uuid,
    req_info: RequestInfo,
    plan: F,
) -> Result<MembershipPlan, AppError>
where
    F: FnOnce(&TeamRoster) -> Result<MembershipPlan, MembershipError> + Send,
{
    let roster = team_repo::load_roster(tx, team_id)
        .await?
        .ok_or(MembershipError::TeamNotFound)?;

    let plan = plan(&roster)?;

    team_repo::apply_roster_changes(tx, &plan.changes).await?;
    audit_logger::log_plan(tx, team_id, actor_id, &plan, &req_info).await?;

    log::info!("{}", plan.description);
    Ok(plan)
}

async fn roster_for(team_id: Uuid) -> Result<TeamRoster, AppError> {
    let team = team_repo::get_team_by_id(team_id)
        .await?
        .ok_or(MembershipError::TeamNotFound)?;
    let members = team_member_repo::get_team_members(team_id).await?;

    Ok(TeamRoster::new(team, members))
}

pub async fn list_teams() -> Result<HttpResponse> {
    let teams = team_repo::get_teams_by_status(TeamStatus::Approved)
        .await
        .map_err(|e| {
            log::error!("Failed to list approved teams: {}", e);
            AppError::from(e)
        })?;

    Ok(ApiResponse::success(teams))
}

pub async fn create_team(
    ctx: UserContext,
    input: Json<CreateTeamInput>,
    req_info: RequestInfo,
) -> Result<HttpResponse> {
    let user_id = ctx.user_id();
    let now = Utc::now();
    let team_input = team_membership::new_team(input.into_inner(), user_id, ctx.is_admin(), now)
        .map_err(AppError::from)?;

    let team = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            let team = team_repo::create_team(tx, team_input).await?;

            let captain_status = team_membership::captain_status_for(team.status);
            let joined_at = (captain_status == MemberStatus::Active).then_some(now);
            team_member_repo::add_team_member(
                tx,
                team.id,
                user_id,
                TeamRole::Captain,
                captain_status,
                joined_at,
            )
            .await?;

            let metadata = audit_logger::metadata(vec![
                ("team_name", team.team_name.clone()),
                ("status", team.status.to_string()),
            ]);

            audit_logger::log_team_activity(
                tx,
                team.id,
                Some(user_id),
                AuditAction::TEAM_CREATED,
                format!("Team '{}' created by user {}", team.team_name, user_id),
                Some(metadata),
                &req_info,
            )
            .await?;

            Ok::<_, AppError>(team)
        })
    })
    .await?;

    log::info!("User {} created team {} ({})", user_id, team.id, team.status);
    Ok(ApiResponse::created(team))
}

pub async fn my_teams(ctx: UserContext) -> Result<HttpResponse> {
    let user_id = ctx.user_id();
    let memberships = team_member_repo::get_user_memberships(user_id)
        .await
        .map_err(|e| {
            log::error!("Failed to get memberships for user {}: {}", user_id, e);
            AppError::from(e)
        })?;

    Ok(ApiResponse::success(memberships))
}

pub async fn get_team(path: Path<Uuid>, ctx: Option<UserContext>) -> Result<HttpResponse> {
    let team_id = path.into_inner();
    let roster = roster_for(team_id).await?;

    let (user_id, is_admin) = match &ctx {
        Some(ctx) => (Some(ctx.user_id()), ctx.is_admin()),
        None => (None, false),
    };
    if !roster.can_view(user_id, is_admin) {
        // Unreviewed teams stay invisible to outsiders
        return Err(AppError::from(MembershipError::TeamNotFound).into());
    }

    let members = team_member_repo::get_member_details(team_id, MemberStatus::Active)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(TeamDetail {
        team: roster.team,
        members,
    }))
}

pub async fn update_team(
    path: Path<Uuid>,
    ctx: UserContext,
    input: Json<UpdateTeamInput>,
    req_info: RequestInfo,
) -> Result<HttpResponse> {
    let team_id = path.into_inner();
    let user_id = ctx.user_id();
    let is_admin = ctx.is_admin();

    let input = input.into_inner();
    let (team_name, team_description) =
        team_membership::validate_team_details(&input.team_name, input.team_description.as_deref())
            .map_err(AppError::from)?;
    let input = UpdateTeamInput {
        team_name,
        team_description,
        team_logo: input.team_logo.filter(|logo| !logo.trim().is_empty()),
    };

    let team = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            let roster = team_repo::load_roster(tx, team_id)
                .await?
                .ok_or(MembershipError::TeamNotFound)?;
            if !roster.can_edit(user_id, is_admin) {
                return Err(AppError::PermissionDenied(
                    "Only the team captain or an admin can edit this team".to_string(),
                ));
            }

            let team = team_repo::update_team_details(tx, team_id, input)
                .await?
                .ok_or(MembershipError::TeamNotFound)?;

            let metadata = audit_logger::metadata(vec![("team_name", team.team_name.clone())]);
            audit_logger::log_team_activity(
                tx,
                team_id,
                Some(user_id),
                AuditAction::TEAM_UPDATED,
                format!("Team '{}' updated by user {}", team.team_name, user_id),
                Some(metadata),
                &req_info,
            )
            .await?;

            Ok::<_, AppError>(team)
        })
    })
    .await?;

    Ok(ApiResponse::success(team))
}

pub async fn request_join(
    path: Path<Uuid>,
    ctx: UserContext,
    req_info: RequestInfo,
) -> Result<HttpResponse> {
    let team_id = path.into_inner();
    let user_id = ctx.user_id();

    let member = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            let roster = team_repo::load_roster(tx, team_id)
                .await?
                .ok_or(MembershipError::TeamNotFound)?;
            roster.check_join(user_id)?;

            let member = team_member_repo::add_team_member(
                tx,
                team_id,
                user_id,
                TeamRole::Member,
                MemberStatus::Pending,
                None,
            )
            .await?;

            let metadata = audit_logger::metadata(vec![("member_id", member.id.to_string())]);
            audit_logger::log_team_activity(
                tx,
                team_id,
                Some(user_id),
                AuditAction::JOIN_REQUESTED,
                format!(
                    "User {} requested to join team '{}'",
                    user_id, roster.team.team_name
                ),
                Some(metadata),
                &req_info,
            )
            .await?;

            Ok::<_, AppError>(member)
        })
    })
    .await?;

    Ok(ApiResponse::created(member))
}

pub async fn get_join_requests(path: Path<Uuid>, ctx: UserContext) -> Result<HttpResponse> {
    let team_id = path.into_inner();
    let roster = roster_for(team_id).await?;

    if !roster.is_captain(ctx.user_id()) {
        return Err(AppError::from(MembershipError::NotCaptain).into());
    }

    let requests = team_member_repo::get_member_details(team_id, MemberStatus::Pending)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(requests))
}

pub async fn leave_team(
    path: Path<Uuid>,
    ctx: UserContext,
    req_info: RequestInfo,
) -> Result<HttpResponse> {
    let user_id = ctx.user_id();
    let plan = execute_plan(path.into_inner(), user_id, req_info, move |roster| {
        roster.plan_leave(user_id)
    })
    .await?;

    if plan.deletes_team() {
        Ok(ApiResponse::success_message(
            "You were the last member, so the team has been deleted",
        ))
    } else {
        Ok(ApiResponse::success_message("You have left the team"))
    }
}

pub async fn transfer_captaincy(
    path: Path<Uuid>,
    ctx: UserContext,
    input: Json<TransferCaptaincyInput>,
    req_info: RequestInfo,
) -> Result<HttpResponse> {
    let team_id = path.into_inner();
    let user_id = ctx.user_id();
    let new_captain_id = input.new_captain_id;

    execute_plan(team_id, user_id, req_info, move |roster| {
        roster.plan_transfer(user_id, new_captain_id)
    })
    .await?;

    let team = team_repo::get_team_by_id(team_id)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::from(MembershipError::TeamNotFound))?;

    Ok(ApiResponse::success(team))
}
