use chrono::Utc;
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{CreateUpdateSponsorInput, Sponsor},
    utils::sql,
};

pub async fn create_sponsor(input: CreateUpdateSponsorInput) -> Result<Sponsor, sqlx::Error> {
    let now = Utc::now();
    let sponsor = sqlx::query_as::<_, Sponsor>(&sql(r#"
        INSERT INTO
            sponsors (
                name,
                logo_url,
                website_url,
                tier,
                is_active,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            name,
            logo_url,
            website_url,
            tier,
            is_active,
            created_at,
            updated_at
    "#))
    .bind(input.name)
    .bind(input.logo_url)
    .bind(input.website_url)
    .bind(input.tier)
    .bind(input.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(get_pool())
    .await?;

    Ok(sponsor)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Sponsor>, sqlx::Error> {
    let sponsor = sqlx::query_as::<_, Sponsor>(&sql(r#"
        SELECT
            id,
            name,
            logo_url,
            website_url,
            tier,
            is_active,
            created_at,
            updated_at
        FROM
            sponsors
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(sponsor)
}

/// Sponsors ordered from the highest tier down.
pub async fn get_sponsors(active_only: bool) -> Result<Vec<Sponsor>, sqlx::Error> {
    let sponsors = sqlx::query_as::<_, Sponsor>(&sql(r#"
        SELECT
            id,
            name,
            logo_url,
            website_url,
            tier,
            is_active,
            created_at,
            updated_at
        FROM
            sponsors
        WHERE
            is_active OR NOT ?
        ORDER BY
            CASE tier
                WHEN 'platinum' THEN 0
                WHEN 'gold' THEN 1
                WHEN 'silver' THEN 2
                ELSE 3
            END,
            name
    "#))
    .bind(active_only)
    .fetch_all(get_pool())
    .await?;

    Ok(sponsors)
}

pub async fn update_sponsor(
    id: Uuid,
    input: CreateUpdateSponsorInput,
) -> Result<Option<Sponsor>, sqlx::Error> {
    let sponsor = sqlx::query_as::<_, Sponsor>(&sql(r#"
        UPDATE
            sponsors
        SET
            name = ?,
            logo_url = ?,
            website_url = ?,
            tier = ?,
            is_active = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            name,
            logo_url,
            website_url,
            tier,
            is_active,
            created_at,
            updated_at
    "#))
    .bind(input.name)
    .bind(input.logo_url)
    .bind(input.website_url)
    .bind(input.tier)
    .bind(input.is_active)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(sponsor)
}

pub async fn delete_sponsor(id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql("DELETE FROM sponsors WHERE id = ?"))
        .bind(id)
        .execute(get_pool())
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}
