use chrono::Utc;
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{CreateUpdateStreamInput, Stream},
    utils::sql,
};

pub async fn create_stream(input: CreateUpdateStreamInput) -> Result<Stream, sqlx::Error> {
    let now = Utc::now();
    let stream = sqlx::query_as::<_, Stream>(&sql(r#"
        INSERT INTO
            streams (
                title,
                platform,
                stream_url,
                thumbnail_url,
                is_live,
                scheduled_at,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            title,
            platform,
            stream_url,
            thumbnail_url,
            is_live,
            scheduled_at,
            created_at,
            updated_at
    "#))
    .bind(input.title)
    .bind(input.platform)
    .bind(input.stream_url)
    .bind(input.thumbnail_url)
    .bind(input.is_live)
    .bind(input.scheduled_at)
    .bind(now)
    .bind(now)
    .fetch_one(get_pool())
    .await?;

    Ok(stream)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Stream>, sqlx::Error> {
    let stream = sqlx::query_as::<_, Stream>(&sql(r#"
        SELECT
            id,
            title,
            platform,
            stream_url,
            thumbnail_url,
            is_live,
            scheduled_at,
            created_at,
            updated_at
        FROM
            streams
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(stream)
}

/// Live streams first, then upcoming by schedule.
pub async fn get_all_streams() -> Result<Vec<Stream>, sqlx::Error> {
    let streams = sqlx::query_as::<_, Stream>(&sql(r#"
        SELECT
            id,
            title,
            platform,
            stream_url,
            thumbnail_url,
            is_live,
            scheduled_at,
            created_at,
            updated_at
        FROM
            streams
        ORDER BY
            is_live DESC,
            scheduled_at NULLS LAST,
            created_at DESC
    "#))
    .fetch_all(get_pool())
    .await?;

    Ok(streams)
}

pub async fn update_stream(
    id: Uuid,
    input: CreateUpdateStreamInput,
) -> Result<Option<Stream>, sqlx::Error> {
    let stream = sqlx::query_as::<_, Stream>(&sql(r#"
        UPDATE
            streams
        SET
            title = ?,
            platform = ?,
            stream_url = ?,
            thumbnail_url = ?,
            is_live = ?,
            scheduled_at = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            title,
            platform,
            stream_url,
            thumbnail_url,
            is_live,
            scheduled_at,
            created_at,
            updated_at
    "#))
    .bind(input.title)
    .bind(input.platform)
    .bind(input.stream_url)
    .bind(input.thumbnail_url)
    .bind(input.is_live)
    .bind(input.scheduled_at)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(stream)
}

pub async fn delete_stream(id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql("DELETE FROM streams WHERE id = ?"))
        .bind(id)
        .execute(get_pool())
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}
