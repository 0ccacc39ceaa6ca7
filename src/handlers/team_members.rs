use actix_web::{HttpResponse, Result, web::Path};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    database::{models::MemberStatus, repositories::team_member as team_member_repo},
    error::AppError,
    handlers::{shared::ApiResponse, teams::execute_plan},
    middleware::request_info::RequestInfo,
    services::{team_membership::MembershipError, user_context::UserContext},
};

async fn team_of_member(member_id: Uuid) -> Result<Uuid, AppError> {
    let member = team_member_repo::find_by_id(member_id)
        .await?
        .ok_or(MembershipError::MemberNotFound)?;

    Ok(member.team_id)
}

async fn review_member(
    member_id: Uuid,
    ctx: UserContext,
    req_info: RequestInfo,
    decision: MemberStatus,
) -> Result<HttpResponse> {
    let team_id = team_of_member(member_id).await?;
    let actor_id = ctx.user_id();

    execute_plan(team_id, actor_id, req_info, move |roster| {
        roster.plan_review_member(actor_id, member_id, decision, Utc::now())
    })
    .await?;

    let member = team_member_repo::find_by_id(member_id)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::from(MembershipError::MemberNotFound))?;

    Ok(ApiResponse::success(member))
}

pub async fn approve_member(
    path: Path<Uuid>,
    ctx: UserContext,
    req_info: RequestInfo,
) -> Result<HttpResponse> {
    review_member(path.into_inner(), ctx, req_info, MemberStatus::Active).await
}

pub async fn reject_member(
    path: Path<Uuid>,
    ctx: UserContext,
    req_info: RequestInfo,
) -> Result<HttpResponse> {
    review_member(path.into_inner(), ctx, req_info, MemberStatus::Rejected).await
}

pub async fn kick_member(
    path: Path<Uuid>,
    ctx: UserContext,
    req_info: RequestInfo,
) -> Result<HttpResponse> {
    let member_id = path.into_inner();
    let team_id = team_of_member(member_id).await?;
    let actor_id = ctx.user_id();

    execute_plan(team_id, actor_id, req_info, move |roster| {
        roster.plan_kick(actor_id, member_id)
    })
    .await?;

    Ok(ApiResponse::success_message("Member removed from the team"))
}
