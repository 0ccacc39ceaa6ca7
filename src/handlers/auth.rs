use actix_web::{HttpResponse, Result, web};

use crate::config::Config;
use crate::database::models::{LoginInput, ProfileInfo, RegisterInput, UpdateProfileInput};
use crate::database::repositories::profile as profile_repo;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{
    auth::{self, USERNAME_MAX_LEN, USERNAME_MIN_LEN},
    user_context::UserContext,
};

pub async fn register(
    config: web::Data<Config>,
    request: web::Json<RegisterInput>,
) -> Result<HttpResponse> {
    let response = auth::register(&config, request.into_inner()).await?;

    Ok(ApiResponse::created(response))
}

pub async fn login(
    config: web::Data<Config>,
    request: web::Json<LoginInput>,
) -> Result<HttpResponse> {
    let response = auth::login(&config, request.into_inner()).await?;

    Ok(ApiResponse::success(response))
}

pub async fn me(ctx: UserContext) -> Result<HttpResponse> {
    Ok(ApiResponse::success(ctx.info()))
}

pub async fn update_me(
    ctx: UserContext,
    input: web::Json<UpdateProfileInput>,
) -> Result<HttpResponse> {
    let mut input = input.into_inner();

    if let Some(username) = input.username.as_mut() {
        *username = username.trim().to_string();
        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.chars().count()) {
            return Err(AppError::BadRequest(format!(
                "Username must be between {} and {} characters",
                USERNAME_MIN_LEN, USERNAME_MAX_LEN
            ))
            .into());
        }
    }

    let user_id = ctx.user_id();
    let profile = profile_repo::update_profile(user_id, input)
        .await
        .map_err(|e| {
            log::error!("Failed to update profile {}: {}", user_id, e);
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(ApiResponse::success(ProfileInfo::new(profile, ctx.is_admin())))
}
