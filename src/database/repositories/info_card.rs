use chrono::Utc;
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{CreateUpdateInfoCardInput, InfoCard},
    utils::sql,
};

pub async fn create_info_card(input: CreateUpdateInfoCardInput) -> Result<InfoCard, sqlx::Error> {
    let now = Utc::now();
    let card = sqlx::query_as::<_, InfoCard>(&sql(r#"
        INSERT INTO
            info_cards (
                title,
                description,
                image_url,
                link_url,
                sort_order,
                is_active,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            title,
            description,
            image_url,
            link_url,
            sort_order,
            is_active,
            created_at,
            updated_at
    "#))
    .bind(input.title)
    .bind(input.description)
    .bind(input.image_url)
    .bind(input.link_url)
    .bind(input.sort_order)
    .bind(input.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(get_pool())
    .await?;

    Ok(card)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<InfoCard>, sqlx::Error> {
    let card = sqlx::query_as::<_, InfoCard>(&sql(r#"
        SELECT
            id,
            title,
            description,
            image_url,
            link_url,
            sort_order,
            is_active,
            created_at,
            updated_at
        FROM
            info_cards
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(card)
}

pub async fn get_info_cards(active_only: bool) -> Result<Vec<InfoCard>, sqlx::Error> {
    let cards = sqlx::query_as::<_, InfoCard>(&sql(r#"
        SELECT
            id,
            title,
            description,
            image_url,
            link_url,
            sort_order,
            is_active,
            created_at,
            updated_at
        FROM
            info_cards
        WHERE
            is_active OR NOT ?
        ORDER BY
            sort_order,
            created_at
    "#))
    .bind(active_only)
    .fetch_all(get_pool())
    .await?;

    Ok(cards)
}

pub async fn update_info_card(
    id: Uuid,
    input: CreateUpdateInfoCardInput,
) -> Result<Option<InfoCard>, sqlx::Error> {
    let card = sqlx::query_as::<_, InfoCard>(&sql(r#"
        UPDATE
            info_cards
        SET
            title = ?,
            description = ?,
            image_url = ?,
            link_url = ?,
            sort_order = ?,
            is_active = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            title,
            description,
            image_url,
            link_url,
            sort_order,
            is_active,
            created_at,
            updated_at
    "#))
    .bind(input.title)
    .bind(input.description)
    .bind(input.image_url)
    .bind(input.link_url)
    .bind(input.sort_order)
    .bind(input.is_active)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(card)
}

pub async fn delete_info_card(id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql("DELETE FROM info_cards WHERE id = ?"))
        .bind(id)
        .execute(get_pool())
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}
