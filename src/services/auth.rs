use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    web::Data,
};
use anyhow::{Result, anyhow};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{AppRole, AuthResponse, LoginInput, ProfileInfo, RegisterInput};
use crate::database::repositories::profile as profile_repo;
use crate::database::transaction::DatabaseTransaction;
use crate::error::AppError;

pub const PASSWORD_MIN_LEN: usize = 8;
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub email: String,
    pub is_admin: bool, // admin flag at issue time; requests re-check user_roles
    pub exp: usize,     // expiration time
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = token else {
            return ready(Err(ErrorUnauthorized(
                "Missing or invalid authorization header",
            )));
        };

        let Some(config) = req.app_data::<Data<Config>>() else {
            log::error!("Config missing from app data; cannot verify tokens");
            return ready(Err(ErrorUnauthorized("Invalid token")));
        };

        match verify_token(config, token) {
            Ok(claims) => ready(Ok(claims)),
            Err(e) => {
                log::debug!("Rejected bearer token: {}", e);
                ready(Err(ErrorUnauthorized("Invalid token")))
            }
        }
    }
}

pub fn generate_token(config: &Config, user_id: Uuid, email: &str, is_admin: bool) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(config.jwt_expiration_days))
        .ok_or_else(|| anyhow!("Token expiration overflow"))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        is_admin,
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )?;

    Ok(token)
}

pub fn verify_token(config: &Config, token: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims)
}

/// Check registration fields, returning the normalised email and username.
pub fn validate_registration(input: &RegisterInput) -> Result<(String, String), AppError> {
    let email = input.email.trim().to_lowercase();
    let username = input.username.trim().to_string();

    let at = email.find('@');
    if !matches!(at, Some(i) if i > 0 && i < email.len() - 1) {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }
    if input.password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LEN
        )));
    }
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.chars().count()) {
        return Err(AppError::BadRequest(format!(
            "Username must be between {} and {} characters",
            USERNAME_MIN_LEN, USERNAME_MAX_LEN
        )));
    }

    Ok((email, username))
}

pub async fn register(config: &Config, input: RegisterInput) -> Result<AuthResponse, AppError> {
    let (email, username) = validate_registration(&input)?;

    if profile_repo::email_exists(&email).await? {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash(&input.password, DEFAULT_COST).map_err(|e| {
        log::error!("Failed to hash password: {}", e);
        AppError::internal_server_error()
    })?;

    // Profile and base role land together or not at all
    let profile = DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            let profile =
                profile_repo::create_profile(tx, &email, &password_hash, &username).await?;
            profile_repo::grant_role(tx, profile.id, AppRole::User).await?;

            Ok::<_, AppError>(profile)
        })
    })
    .await?;

    let token = generate_token(config, profile.id, &profile.email, false)?;
    log::info!("Registered user {}", profile.id);

    Ok(AuthResponse {
        token,
        user: ProfileInfo::new(profile, false),
    })
}

pub async fn login(config: &Config, input: LoginInput) -> Result<AuthResponse, AppError> {
    let profile = profile_repo::find_by_email(input.email.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = verify(&input.password, &profile.password_hash).map_err(|e| {
        log::error!("Failed to verify password hash for {}: {}", profile.id, e);
        AppError::internal_server_error()
    })?;
    if !valid {
        log::warn!("Failed login attempt for user {}", profile.id);
        return Err(AppError::Unauthorized);
    }

    let is_admin = profile_repo::has_role(profile.id, AppRole::Admin).await?;
    let token = generate_token(config, profile.id, &profile.email, is_admin)?;

    Ok(AuthResponse {
        token,
        user: ProfileInfo::new(profile, is_admin),
    })
}
