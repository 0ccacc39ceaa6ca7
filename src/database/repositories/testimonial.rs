use chrono::Utc;
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{CreateUpdateTestimonialInput, Testimonial},
    utils::sql,
};

pub async fn create_testimonial(
    input: CreateUpdateTestimonialInput,
) -> Result<Testimonial, sqlx::Error> {
    let now = Utc::now();
    let testimonial = sqlx::query_as::<_, Testimonial>(&sql(r#"
        INSERT INTO
            testimonials (
                author_name,
                author_role,
                content,
                avatar_url,
                rating,
                is_published,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            author_name,
            author_role,
            content,
            avatar_url,
            rating,
            is_published,
            created_at,
            updated_at
    "#))
    .bind(input.author_name)
    .bind(input.author_role)
    .bind(input.content)
    .bind(input.avatar_url)
    .bind(input.rating)
    .bind(input.is_published)
    .bind(now)
    .bind(now)
    .fetch_one(get_pool())
    .await?;

    Ok(testimonial)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Testimonial>, sqlx::Error> {
    let testimonial = sqlx::query_as::<_, Testimonial>(&sql(r#"
        SELECT
            id,
            author_name,
            author_role,
            content,
            avatar_url,
            rating,
            is_published,
            created_at,
            updated_at
        FROM
            testimonials
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(testimonial)
}

pub async fn get_testimonials(published_only: bool) -> Result<Vec<Testimonial>, sqlx::Error> {
    let testimonials = sqlx::query_as::<_, Testimonial>(&sql(r#"
        SELECT
            id,
            author_name,
            author_role,
            content,
            avatar_url,
            rating,
            is_published,
            created_at,
            updated_at
        FROM
            testimonials
        WHERE
            is_published OR NOT ?
        ORDER BY
            created_at DESC
    "#))
    .bind(published_only)
    .fetch_all(get_pool())
    .await?;

    Ok(testimonials)
}

pub async fn update_testimonial(
    id: Uuid,
    input: CreateUpdateTestimonialInput,
) -> Result<Option<Testimonial>, sqlx::Error> {
    let testimonial = sqlx::query_as::<_, Testimonial>(&sql(r#"
        UPDATE
            testimonials
        SET
            author_name = ?,
            author_role = ?,
            content = ?,
            avatar_url = ?,
            rating = ?,
            is_published = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            id,
            author_name,
            author_role,
            content,
            avatar_url,
            rating,
            is_published,
            created_at,
            updated_at
    "#))
    .bind(input.author_name)
    .bind(input.author_role)
    .bind(input.content)
    .bind(input.avatar_url)
    .bind(input.rating)
    .bind(input.is_published)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(get_pool())
    .await?;

    Ok(testimonial)
}

pub async fn delete_testimonial(id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql("DELETE FROM testimonials WHERE id = ?"))
        .bind(id)
        .execute(get_pool())
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}
