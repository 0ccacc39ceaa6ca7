use actix_web::{Error as ActixError, FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{AppRole, Profile, ProfileInfo};
use crate::database::repositories::profile as profile_repo;
use crate::error::AppError;
use crate::services::auth::Claims;

/// The authenticated caller, reloaded from the database on every request
/// so that role changes apply immediately.
#[derive(Debug, Clone, Serialize)]
pub struct UserContext {
    pub profile: Profile,
    pub is_admin: bool,
}

impl UserContext {
    pub async fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        let profile = profile_repo::find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| {
                log::warn!("Token references unknown user {}", claims.user_id());
                AppError::Unauthorized
            })?;

        let is_admin = profile_repo::has_role(profile.id, AppRole::Admin).await?;

        Ok(UserContext { profile, is_admin })
    }

    pub fn user_id(&self) -> Uuid {
        self.profile.id
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn requires_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            log::warn!("User {} attempted an admin-only action", self.user_id());
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }

    pub fn info(&self) -> ProfileInfo {
        ProfileInfo::new(self.profile.clone(), self.is_admin)
    }
}

impl FromRequest for UserContext {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let claims = Claims::from_request(req, payload).into_inner();

        Box::pin(async move {
            let claims = claims?;
            let ctx = UserContext::from_claims(&claims).await?;
            Ok(ctx)
        })
    }
}
