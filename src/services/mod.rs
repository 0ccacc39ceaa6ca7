pub mod audit_logger;
pub mod auth;
pub mod storage;
pub mod team_membership;
pub mod user_context;
