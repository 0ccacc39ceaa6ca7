#![allow(dead_code)]

use std::env;

use squadhub::config::Config;
use squadhub::services::auth;
use tempfile::TempDir;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-key-that-is-long-enough";

/// Quiet logging and a predictable environment for every test binary.
pub fn setup_test_env() {
    let _ = env_logger::builder().is_test(true).try_init();

    unsafe {
        env::set_var("JWT_SECRET", TEST_JWT_SECRET);
        env::set_var("ENVIRONMENT", "test");
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost:5432/squadhub_test".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiration_days: 1,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        client_base_url: "http://localhost:5173".to_string(),
        storage_dir: "./storage".to_string(),
        public_base_url: "http://localhost:8080".to_string(),
    }
}

/// Config whose storage lives in a temporary directory.
pub fn storage_config() -> (Config, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let config = Config {
        storage_dir: dir.path().display().to_string(),
        ..test_config()
    };
    (config, dir)
}

/// A token signed with a secret the app does not know.
pub fn foreign_token() -> String {
    let config = Config {
        jwt_secret: "some-other-secret".to_string(),
        ..test_config()
    };
    auth::generate_token(&config, Uuid::new_v4(), "intruder@example.com", true)
        .expect("token")
}
