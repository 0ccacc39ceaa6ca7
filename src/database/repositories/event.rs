use chrono::Utc;
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{CreateUpdateEventInput, Event},
    utils::sql,
};

pub async fn create_event(input: CreateUpdateEventInput) -> Result<Event, sqlx::Error> {
    let now = Utc::now();
    let event = sqlx::query_as::<_, Event>(&sql(r#"
        INSERT INTO
            events (
                title,
                description,
                event_date,
                location,
                image_url,
                registration_url,
                is_published,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            title,
            description,
            event_date,
            location,
            image_url,
            registration_url,
            is_published,
            created_at,
            updated_at
    "#))
    .bind(input.title)
    .bind(input.description)
    .bind(input.event_date)
    .bind(input.location)
    .bind(input.image_url)
    .bind(input.registration_url)
    .bind(input.is_published)
    .bind(now)
    .bind(now)
    .fetch_one(get_pool())
    .await?;

    Ok(event)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Event>, sqlx::Error> {
    let event = sqlx::query_as::<_, Event>(&sql(r#"
        SELECT
            id,
            title,
            description,
            event_date,
            location,
            image_url,
            registration_url,
            is_published,
            created_at,
            updated_at
        FROM
            events
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(event)
}

pub async fn get_all_events() -> Result<Vec<Event>, sqlx::Error> {
    let events = sqlx::query_as::<_, Event>(&sql(r#"
        SELECT
            id,
            title,
            description,
            event_date,
            location,
            image_url,
            registration_url,
            is_published,
            created_at,
            updated_at
        FROM
            events
        ORDER BY
            event_date DESC
    "#))
    .fetch_all(get_pool())
    .await?;

    Ok(events)
}

/// Published events, upcoming ones first.
pub async fn get_published_events() -> Result<Vec<Event>, sqlx::Error> {
    let events = sqlx::query_as::<_, Event>(&sql(r#"
        SELECT
            id,
            title,
            description,
            event_date,
            location,
            image_url,
            registration_url,
            is_published,
            created_at,
            updated_at
        FROM
            events
        WHERE
            is_published = TRUE
        ORDER BY
            event_date < NOW(),
            event_date
    "#))
    .fetch_all(get_pool())
    .await?;

    Ok(events)
}

pub async fn update_event(
    id: Uuid,
    input: CreateUpdateEventInput,
) -> Result<Option<Event>, sqlx::Error> {
    let event = sqlx::query_as::<_, Event>(&sql(r#"
        UPDATE
            events
        SET
            title = ?,
            description = ?,
            event_date = ?,
            location = ?,
            image_url = ?,
            registration_url = ?,
            is_published = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            title,
            description,
            event_date,
            location,
            image_url,
            registration_url,
            is_published,
            created_at,
            updated_at
    "#))
    .bind(input.title)
    .bind(input.description)
    .bind(input.event_date)
    .bind(input.location)
    .bind(input.image_url)
    .bind(input.registration_url)
    .bind(input.is_published)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(event)
}

pub async fn delete_event(id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql("DELETE FROM events WHERE id = ?"))
        .bind(id)
        .execute(get_pool())
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}
