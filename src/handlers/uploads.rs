use actix_web::{
    HttpRequest, HttpResponse, Result,
    http::header::{self, CacheControl, CacheDirective},
    web,
};

use crate::{
    config::Config,
    error::AppError,
    handlers::shared::ApiResponse,
    services::{
        storage::{self, Bucket},
        user_context::UserContext,
    },
};

pub async fn upload(
    path: web::Path<String>,
    ctx: UserContext,
    config: web::Data<Config>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let bucket: Bucket = path.into_inner().parse()?;
    if bucket.requires_admin() {
        ctx.requires_admin()?;
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let stored = storage::store_upload(&config, bucket, content_type, &body).await?;

    log::info!(
        "User {} uploaded {} to {}",
        ctx.user_id(),
        stored.file_name,
        stored.bucket
    );
    Ok(ApiResponse::created(stored))
}

pub async fn serve_object(
    path: web::Path<(String, String)>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let (bucket, file_name) = path.into_inner();
    let bucket: Bucket = bucket.parse()?;
    let object_path = storage::object_path(&config, bucket, &file_name)?;

    let bytes = match tokio::fs::read(&object_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("File not found".to_string()).into());
        }
        Err(e) => {
            log::error!("Failed to read {}: {}", object_path.display(), e);
            return Err(AppError::internal_server_error().into());
        }
    };

    Ok(HttpResponse::Ok()
        .content_type(storage::content_type_for(&file_name))
        .insert_header(CacheControl(vec![
            CacheDirective::Public,
            CacheDirective::MaxAge(86400),
        ]))
        .body(bytes))
}
