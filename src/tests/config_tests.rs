use crate::config::{Config, DEFAULT_PORT};
use std::env;
use std::sync::Mutex;

// Environment variables are process-wide; serialize the tests touching them
static ENV_LOCK: Mutex<()> = Mutex::new(());

// Helper function to clear environment variables
fn clear_env_vars() {
    for name in [
        "HOST",
        "PORT",
        "UPLOAD_PATH",
        "PUBLIC_DIR",
        "OCR_LANGUAGE",
        "MAX_FILE_SIZE_MB",
        "EXTRACTION_TIMEOUT_SECONDS",
        "CORS_ENABLED",
    ] {
        env::remove_var(name);
    }
}

#[test]
fn test_defaults_when_environment_is_empty() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();

    let config = Config::from_env().expect("Config should load successfully");

    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.port, 3000);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.upload_path, "uploads");
    assert_eq!(config.public_dir, "public");
    assert_eq!(config.ocr_language, "eng");
    assert_eq!(config.max_file_size_mb, 50);
    assert_eq!(config.extraction_timeout_seconds, 120);
    assert!(config.cors_enabled);
}

#[test]
fn test_port_override_from_environment() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("PORT", "8080");
    env::set_var("HOST", "127.0.0.1");

    let config = Config::from_env().expect("Config should load successfully");
    clear_env_vars();

    assert_eq!(config.port, 8080);
    assert_eq!(config.host, "127.0.0.1");
}

#[test]
fn test_hostname_is_accepted_as_host() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("HOST", "localhost");

    let config = Config::from_env().expect("hostnames should be accepted");
    clear_env_vars();

    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, DEFAULT_PORT);
}

#[tokio::test]
async fn test_listener_binds_to_hostname() {
    let config = Config {
        host: "localhost".to_string(),
        port: 0,
        ..Config::default()
    };

    let listener = config.bind().await.expect("localhost should resolve and bind");
    assert!(listener.local_addr().unwrap().ip().is_loopback());
}

#[test]
fn test_all_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("UPLOAD_PATH", "/var/tmp/doctext");
    env::set_var("PUBLIC_DIR", "/srv/www");
    env::set_var("OCR_LANGUAGE", "eng+deu");
    env::set_var("MAX_FILE_SIZE_MB", "10");
    env::set_var("EXTRACTION_TIMEOUT_SECONDS", "30");
    env::set_var("CORS_ENABLED", "false");

    let config = Config::from_env().expect("Config should load successfully");
    clear_env_vars();

    assert_eq!(config.upload_path, "/var/tmp/doctext");
    assert_eq!(config.public_dir, "/srv/www");
    assert_eq!(config.ocr_language, "eng+deu");
    assert_eq!(config.max_file_size_bytes(), 10 * 1024 * 1024);
    assert_eq!(config.extraction_timeout().as_secs(), 30);
    assert!(!config.cors_enabled);
}

#[test]
fn test_invalid_port_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("PORT", "not-a-port");

    let result = Config::from_env();
    clear_env_vars();

    let err = result.expect_err("invalid PORT should fail");
    assert!(err.to_string().contains("PORT"));
}

#[test]
fn test_invalid_ocr_language_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("OCR_LANGUAGE", "English");

    let result = Config::from_env();
    clear_env_vars();

    assert!(result.is_err());
}

#[test]
fn test_invalid_bool_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("CORS_ENABLED", "maybe");

    let result = Config::from_env();
    clear_env_vars();

    assert!(result.is_err());
}

#[test]
fn test_zero_max_file_size_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("MAX_FILE_SIZE_MB", "0");

    let result = Config::from_env();
    clear_env_vars();

    assert!(result.is_err());
}
