pub mod admin;
pub mod auth;
pub mod content;
pub mod shared;
pub mod system;
pub mod team_members;
pub mod teams;
pub mod uploads;
