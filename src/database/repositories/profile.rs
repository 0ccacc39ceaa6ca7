use chrono::Utc;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{AppRole, Profile, ProfileWithRole, UpdateProfileInput},
    utils::sql,
};

pub async fn create_profile(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
    password_hash: &str,
    username: &str,
) -> Result<Profile, sqlx::Error> {
    let now = Utc::now();
    let profile = sqlx::query_as::<_, Profile>(&sql(r#"
        INSERT INTO
            profiles (
                email,
                password_hash,
                username,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?)
        RETURNING
            id,
            email,
            password_hash,
            username,
            avatar_url,
            created_at,
            updated_at
    "#))
    .bind(email)
    .bind(password_hash)
    .bind(username)
    .bind(now)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;

    Ok(profile)
}

pub async fn find_by_email(email: &str) -> Result<Option<Profile>, sqlx::Error> {
    let profile = sqlx::query_as::<_, Profile>(&sql(r#"
        SELECT
            id,
            email,
            password_hash,
            username,
            avatar_url,
            created_at,
            updated_at
        FROM
            profiles
        WHERE
            LOWER(email) = LOWER(?)
    "#))
    .bind(email)
    .fetch_optional(get_pool())
    .await?;

    Ok(profile)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    let profile = sqlx::query_as::<_, Profile>(&sql(r#"
        SELECT
            id,
            email,
            password_hash,
            username,
            avatar_url,
            created_at,
            updated_at
        FROM
            profiles
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(profile)
}

pub async fn email_exists(email: &str) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(&sql(
        "SELECT EXISTS (SELECT 1 FROM profiles WHERE LOWER(email) = LOWER(?))",
    ))
    .bind(email)
    .fetch_one(get_pool())
    .await?;

    Ok(exists)
}

pub async fn update_profile(
    id: Uuid,
    input: UpdateProfileInput,
) -> Result<Option<Profile>, sqlx::Error> {
    let profile = sqlx::query_as::<_, Profile>(&sql(r#"
        UPDATE
            profiles
        SET
            username = COALESCE(?, username),
            avatar_url = COALESCE(?, avatar_url),
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            email,
            password_hash,
            username,
            avatar_url,
            created_at,
            updated_at
    "#))
    .bind(input.username)
    .bind(input.avatar_url)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(profile)
}

pub async fn get_all_profiles() -> Result<Vec<ProfileWithRole>, sqlx::Error> {
    let profiles = sqlx::query_as::<_, ProfileWithRole>(&sql(r#"
        SELECT
            p.id,
            p.email,
            p.username,
            p.avatar_url,
            EXISTS (
                SELECT 1 FROM user_roles ur
                WHERE ur.user_id = p.id AND ur.role = 'admin'
            ) AS is_admin,
            p.created_at
        FROM
            profiles p
        ORDER BY
            p.created_at DESC
    "#))
    .fetch_all(get_pool())
    .await?;

    Ok(profiles)
}

pub async fn has_role(user_id: Uuid, role: AppRole) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(&sql(
        "SELECT EXISTS (SELECT 1 FROM user_roles WHERE user_id = ? AND role = ?)",
    ))
    .bind(user_id)
    .bind(role)
    .fetch_one(get_pool())
    .await?;

    Ok(exists)
}

pub async fn grant_role(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    role: AppRole,
) -> Result<(), sqlx::Error> {
    sqlx::query(&sql(r#"
        INSERT INTO user_roles (user_id, role)
        VALUES (?, ?)
        ON CONFLICT (user_id, role) DO NOTHING
    "#))
    .bind(user_id)
    .bind(role)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn revoke_role(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    role: AppRole,
) -> Result<(), sqlx::Error> {
    sqlx::query(&sql("DELETE FROM user_roles WHERE user_id = ? AND role = ?"))
        .bind(user_id)
        .bind(role)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
