//! Tests for layered configuration loading.
//!
//! Environment access is process-global, so every test takes the same lock
//! and clears the variables it touches.

use aromara::config::ConfigLoader;
use std::{
    env, fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

fn clear_env() {
    unsafe {
        env::remove_var("AROMARA_PROFILE");
        env::remove_var("AROMARA_API_BIND_ADDR");
        env::remove_var("AROMARA_LOG_LEVEL");
        env::remove_var("AROMARA_SESSION_SECRET");
        env::remove_var("AROMARA_SESSION_TTL_SECONDS");
        env::remove_var("AROMARA_GEMINI_API_KEY");
    }
}

fn write_env_file(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::write(path, contents).unwrap();
}

#[test]
fn loads_defaults_when_no_env_present() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.session_ttl_seconds, 7 * 24 * 60 * 60);
    cfg.bind_addr().expect("default bind addr parses");

    clear_env();
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    // The profile hint comes from .env, selecting which profile file loads.
    write_env_file(
        &temp_dir,
        ".env",
        "AROMARA_PROFILE=test\nAROMARA_API_BIND_ADDR=127.0.0.1:3000\nAROMARA_LOG_LEVEL=debug\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test",
        "AROMARA_API_BIND_ADDR=192.168.0.10:5000\n",
    );
    write_env_file(
        &temp_dir,
        ".env.local",
        "AROMARA_API_BIND_ADDR=127.0.0.1:4000\n",
    );

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with layered env files");

    assert_eq!(cfg.profile, "test");
    // .env.local wins over .env.test which wins over .env
    assert_eq!(cfg.api_bind_addr, "127.0.0.1:4000");
    // Untouched by later layers
    assert_eq!(cfg.log_level, "debug");

    clear_env();
}

#[test]
fn os_environment_has_highest_precedence() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "AROMARA_API_BIND_ADDR=127.0.0.1:3000\n");

    unsafe {
        env::set_var("AROMARA_API_BIND_ADDR", "0.0.0.0:9090");
    }

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with env override");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:9090");

    clear_env();
}

#[test]
fn invalid_bind_addr_returns_error() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("AROMARA_API_BIND_ADDR", "not-an-addr");
    }

    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let err = loader.load().expect_err("invalid bind addr should fail");
    assert!(format!("{}", err).contains("invalid api bind address"));

    clear_env();
}

#[test]
fn session_secret_must_be_32_bytes_of_base64() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();

    // Not base64 at all
    unsafe {
        env::set_var("AROMARA_SESSION_SECRET", "%%%not-base64%%%");
    }
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    assert!(loader.load().is_err());

    // Valid base64, wrong length
    unsafe {
        env::set_var("AROMARA_SESSION_SECRET", "c2hvcnQ=");
    }
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    assert!(loader.load().is_err());

    // 32 bytes of base64
    unsafe {
        env::set_var(
            "AROMARA_SESSION_SECRET",
            "YWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWE=",
        );
    }
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("32-byte secret is accepted");
    assert_eq!(cfg.session_key().len(), 32);

    clear_env();
}
