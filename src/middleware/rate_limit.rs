use actix_web::{
    Error, HttpResponse, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::LocalBoxFuture;
use std::{
    collections::HashMap,
    net::IpAddr,
    rc::Rc,
    sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError},
};

use crate::handlers::shared::ApiResponse;

pub const LOGIN_MAX_ATTEMPTS: u32 = 5;
pub const LOGIN_WINDOW_SECONDS: i64 = 300;
pub const REGISTRATION_MAX_ATTEMPTS: u32 = 3;
pub const REGISTRATION_WINDOW_SECONDS: i64 = 3600;

// Shared across workers so limits hold per process, not per worker
static LOGIN_ATTEMPTS: LazyLock<RateLimitStore> = LazyLock::new(RateLimitStore::new);
static REGISTRATION_ATTEMPTS: LazyLock<RateLimitStore> = LazyLock::new(RateLimitStore::new);

/// Rate limit configuration
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Window duration in seconds
    pub window_seconds: i64,
    /// Message to return when rate limit is exceeded
    pub message: String,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            max_requests,
            window_seconds,
            message: "Rate limit exceeded. Please try again later.".to_string(),
        }
    }

    pub fn with_message(mut self, message: String) -> Self {
        self.message = message;
        self
    }
}

#[derive(Debug, Clone)]
struct RequestTracker {
    count: u32,
    window_start: DateTime<Utc>,
}

impl RequestTracker {
    fn new() -> Self {
        Self {
            count: 0,
            window_start: Utc::now(),
        }
    }

    fn is_expired(&self, window_seconds: i64) -> bool {
        let window_duration =
            Duration::try_seconds(window_seconds).unwrap_or(Duration::seconds(60));
        Utc::now() > self.window_start + window_duration
    }

    fn increment(&mut self) {
        self.count += 1;
    }

    fn reset(&mut self) {
        self.count = 1;
        self.window_start = Utc::now();
    }
}

/// Per-IP request counters
#[derive(Clone, Default)]
pub struct RateLimitStore {
    ip_trackers: Arc<Mutex<HashMap<IpAddr, RequestTracker>>>,
}

impl RateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn trackers(&self) -> MutexGuard<'_, HashMap<IpAddr, RequestTracker>> {
        // Counters stay usable even if a holder panicked
        self.ip_trackers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Count a request from `ip`, returning false once the window is exhausted.
    pub fn check_and_update(&self, ip: IpAddr, config: &RateLimitConfig) -> bool {
        let mut trackers = self.trackers();

        let tracker = trackers.entry(ip).or_insert_with(RequestTracker::new);

        if tracker.is_expired(config.window_seconds) {
            tracker.reset();
            true
        } else if tracker.count >= config.max_requests {
            false
        } else {
            tracker.increment();
            true
        }
    }

    /// Clean up expired entries to prevent memory leaks
    pub fn cleanup_expired(&self, window_seconds: i64) {
        self.trackers()
            .retain(|_, tracker| !tracker.is_expired(window_seconds));
    }

    pub fn len(&self) -> usize {
        self.trackers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rate limiting middleware keyed on the client IP
pub struct RateLimitMiddleware {
    store: RateLimitStore,
    config: RateLimitConfig,
}

impl RateLimitMiddleware {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_store(config, RateLimitStore::new())
    }

    pub fn with_store(config: RateLimitConfig, store: RateLimitStore) -> Self {
        Self { store, config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitService<S>;
    type InitError = ();
    type Future = futures_util::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        futures_util::future::ready(Ok(RateLimitService {
            service: Rc::new(service),
            store: self.store.clone(),
            config: self.config.clone(),
        }))
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    store: RateLimitStore,
    config: RateLimitConfig,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let store = self.store.clone();
        let config = self.config.clone();

        Box::pin(async move {
            let client_ip = req.peer_addr().map(|addr| addr.ip());

            if let Some(ip) = client_ip {
                if !store.check_and_update(ip, &config) {
                    log::warn!("Rate limit exceeded for IP {} on {}", ip, req.path());
                    let response = HttpResponse::TooManyRequests()
                        .json(ApiResponse::<()>::error(&config.message));
                    return Ok(req.into_response(response).map_into_right_body());
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Specialized rate limiters for authentication endpoints
pub struct AuthRateLimiter;

impl AuthRateLimiter {
    pub fn login() -> RateLimitMiddleware {
        RateLimitMiddleware::with_store(
            RateLimitConfig::new(LOGIN_MAX_ATTEMPTS, LOGIN_WINDOW_SECONDS).with_message(
                "Too many login attempts. Please try again in 5 minutes.".to_string(),
            ),
            LOGIN_ATTEMPTS.clone(),
        )
    }

    pub fn registration() -> RateLimitMiddleware {
        RateLimitMiddleware::with_store(
            RateLimitConfig::new(REGISTRATION_MAX_ATTEMPTS, REGISTRATION_WINDOW_SECONDS)
                .with_message("Too many registration attempts. Please try again later.".to_string()),
            REGISTRATION_ATTEMPTS.clone(),
        )
    }
}

/// Background task to clean up expired auth rate limit entries
pub async fn cleanup_rate_limits(interval_seconds: u64) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_seconds));

    loop {
        interval.tick().await;
        LOGIN_ATTEMPTS.cleanup_expired(LOGIN_WINDOW_SECONDS);
        REGISTRATION_ATTEMPTS.cleanup_expired(REGISTRATION_WINDOW_SECONDS);
        log::debug!("Cleaned up expired rate limit entries");
    }
}
