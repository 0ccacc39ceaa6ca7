pub mod rate_limit;
pub mod request_id;
pub mod request_info;

pub use rate_limit::{AuthRateLimiter, RateLimitConfig, RateLimitMiddleware, RateLimitStore};
pub use request_id::{CorrelationId, RequestIdExt, RequestIdMiddleware};
pub use request_info::{RequestInfo, RequestInfoMiddleware};
