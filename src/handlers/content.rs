//! Site content managed from the admin console.
//!
//! Each content type gets the same admin CRUD surface, generated by
//! `content_crud!`, plus a hand-written public listing.

use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use crate::{
    database::{
        models::{
            CreateUpdateEventInput, CreateUpdateInfoCardInput, CreateUpdateSponsorInput,
            CreateUpdateStreamInput, CreateUpdateTestimonialInput,
        },
        repositories::{
            event as event_repo, info_card as info_card_repo, sponsor as sponsor_repo,
            stream as stream_repo, testimonial as testimonial_repo,
        },
    },
    error::AppError,
    handlers::shared::ApiResponse,
    services::user_context::UserContext,
};

macro_rules! content_crud {
    (
        $module:ident,
        label: $label:literal,
        input: $input:ty,
        create: $create:path,
        list: $list:expr,
        find: $find:path,
        update: $update:path,
        delete: $delete:path $(,)?
    ) => {
        pub mod $module {
            use super::*;

            fn not_found() -> AppError {
                AppError::NotFound(format!("{} not found", $label))
            }

            pub async fn create(
                ctx: UserContext,
                input: web::Json<$input>,
            ) -> Result<HttpResponse> {
                ctx.requires_admin()?;

                let input = input.into_inner();
                input.validate().map_err(AppError::BadRequest)?;

                let item = $create(input).await.map_err(|e| {
                    log::error!("Failed to create {}: {}", $label, e);
                    AppError::from(e)
                })?;

                log::info!("Admin {} created {} {}", ctx.user_id(), $label, item.id);
                Ok(ApiResponse::created(item))
            }

            pub async fn list(ctx: UserContext) -> Result<HttpResponse> {
                ctx.requires_admin()?;

                let items = $list.await.map_err(|e| {
                    log::error!("Failed to list {}: {}", $label, e);
                    AppError::from(e)
                })?;

                Ok(ApiResponse::success(items))
            }

            pub async fn get(path: web::Path<Uuid>, ctx: UserContext) -> Result<HttpResponse> {
                ctx.requires_admin()?;

                let item = $find(path.into_inner())
                    .await
                    .map_err(AppError::from)?
                    .ok_or_else(not_found)?;

                Ok(ApiResponse::success(item))
            }

            pub async fn update(
                path: web::Path<Uuid>,
                ctx: UserContext,
                input: web::Json<$input>,
            ) -> Result<HttpResponse> {
                ctx.requires_admin()?;

                let input = input.into_inner();
                input.validate().map_err(AppError::BadRequest)?;

                let id = path.into_inner();
                let item = $update(id, input)
                    .await
                    .map_err(|e| {
                        log::error!("Failed to update {} {}: {}", $label, id, e);
                        AppError::from(e)
                    })?
                    .ok_or_else(not_found)?;

                Ok(ApiResponse::success(item))
            }

            pub async fn delete(path: web::Path<Uuid>, ctx: UserContext) -> Result<HttpResponse> {
                ctx.requires_admin()?;

                let id = path.into_inner();
                $delete(id)
                    .await
                    .map_err(|e| {
                        log::error!("Failed to delete {} {}: {}", $label, id, e);
                        AppError::from(e)
                    })?
                    .ok_or_else(not_found)?;

                log::info!("Admin {} deleted {} {}", ctx.user_id(), $label, id);
                Ok(ApiResponse::success_message(&format!("{} deleted", $label)))
            }
        }
    };
}

content_crud!(
    events,
    label: "Event",
    input: CreateUpdateEventInput,
    create: event_repo::create_event,
    list: event_repo::get_all_events(),
    find: event_repo::find_by_id,
    update: event_repo::update_event,
    delete: event_repo::delete_event,
);

content_crud!(
    streams,
    label: "Stream",
    input: CreateUpdateStreamInput,
    create: stream_repo::create_stream,
    list: stream_repo::get_all_streams(),
    find: stream_repo::find_by_id,
    update: stream_repo::update_stream,
    delete: stream_repo::delete_stream,
);

content_crud!(
    testimonials,
    label: "Testimonial",
    input: CreateUpdateTestimonialInput,
    create: testimonial_repo::create_testimonial,
    list: testimonial_repo::get_testimonials(false),
    find: testimonial_repo::find_by_id,
    update: testimonial_repo::update_testimonial,
    delete: testimonial_repo::delete_testimonial,
);

content_crud!(
    info_cards,
    label: "Info card",
    input: CreateUpdateInfoCardInput,
    create: info_card_repo::create_info_card,
    list: info_card_repo::get_info_cards(false),
    find: info_card_repo::find_by_id,
    update: info_card_repo::update_info_card,
    delete: info_card_repo::delete_info_card,
);

content_crud!(
    sponsors,
    label: "Sponsor",
    input: CreateUpdateSponsorInput,
    create: sponsor_repo::create_sponsor,
    list: sponsor_repo::get_sponsors(false),
    find: sponsor_repo::find_by_id,
    update: sponsor_repo::update_sponsor,
    delete: sponsor_repo::delete_sponsor,
);

// Public listings
pub async fn published_events() -> Result<HttpResponse> {
    let events = event_repo::get_published_events()
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(events))
}

pub async fn public_streams() -> Result<HttpResponse> {
    let streams = stream_repo::get_all_streams()
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(streams))
}

pub async fn published_testimonials() -> Result<HttpResponse> {
    let testimonials = testimonial_repo::get_testimonials(true)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(testimonials))
}

pub async fn active_info_cards() -> Result<HttpResponse> {
    let cards = info_card_repo::get_info_cards(true)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(cards))
}

pub async fn active_sponsors() -> Result<HttpResponse> {
    let sponsors = sponsor_repo::get_sponsors(true)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(sponsors))
}
