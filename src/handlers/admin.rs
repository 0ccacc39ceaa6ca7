use actix_web::{HttpResponse, Result, web};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    database::{
        models::{AppRole, TeamStatus, TeamStatusQuery, UpdateRoleInput},
        repositories::{profile as profile_repo, team as team_repo},
        transaction::DatabaseTransaction,
    },
    error::AppError,
    handlers::{shared::ApiResponse, teams::execute_plan},
    middleware::request_info::RequestInfo,
    services::{team_membership::MembershipError, user_context::UserContext},
};

// Team review
pub async fn get_teams_by_status(
    query: web::Query<TeamStatusQuery>,
    ctx: UserContext,
) -> Result<HttpResponse> {
    ctx.requires_admin()?;

    let status = query.status.unwrap_or(TeamStatus::Pending);
    let teams = team_repo::get_teams_by_status(status).await.map_err(|e| {
        log::error!("Failed to get {} teams: {}", status, e);
        AppError::from(e)
    })?;

    Ok(ApiResponse::success(teams))
}

async fn review_team(
    team_id: Uuid,
    ctx: UserContext,
    req_info: RequestInfo,
    decision: TeamStatus,
) -> Result<HttpResponse> {
    ctx.requires_admin()?;

    let admin_id = ctx.user_id();
    execute_plan(team_id, admin_id, req_info, move |roster| {
        roster.plan_review_team(admin_id, decision, Utc::now())
    })
    .await?;

    let team = team_repo::get_team_by_id(team_id)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::from(MembershipError::TeamNotFound))?;

    Ok(ApiResponse::success(team))
}

pub async fn approve_team(
    path: web::Path<Uuid>,
    ctx: UserContext,
    req_info: RequestInfo,
) -> Result<HttpResponse> {
    review_team(path.into_inner(), ctx, req_info, TeamStatus::Approved).await
}

pub async fn reject_team(
    path: web::Path<Uuid>,
    ctx: UserContext,
    req_info: RequestInfo,
) -> Result<HttpResponse> {
    review_team(path.into_inner(), ctx, req_info, TeamStatus::Rejected).await
}

// User management
pub async fn get_users(ctx: UserContext) -> Result<HttpResponse> {
    ctx.requires_admin()?;

    let users = profile_repo::get_all_profiles().await.map_err(|e| {
        log::error!("Failed to list users: {}", e);
        AppError::from(e)
    })?;

    Ok(ApiResponse::success(users))
}

pub async fn update_user_role(
    path: web::Path<Uuid>,
    ctx: UserContext,
    input: web::Json<UpdateRoleInput>,
) -> Result<HttpResponse> {
    ctx.requires_admin()?;

    let user_id = path.into_inner();
    if user_id == ctx.user_id() && !input.is_admin {
        return Err(AppError::BadRequest("You cannot revoke your own admin role".to_string()).into());
    }

    profile_repo::find_by_id(user_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let grant = input.is_admin;
    DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            if grant {
                profile_repo::grant_role(tx, user_id, AppRole::Admin).await?;
            } else {
                profile_repo::revoke_role(tx, user_id, AppRole::Admin).await?;
            }

            Ok::<_, AppError>(())
        })
    })
    .await
    .map_err(|e| {
        log::error!("Failed to update admin role for {}: {}", user_id, e);
        e
    })?;

    log::info!(
        "Admin {} set admin={} for user {}",
        ctx.user_id(),
        input.is_admin,
        user_id
    );

    Ok(ApiResponse::success_message("User role updated successfully"))
}
