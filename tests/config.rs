//! Configuration loading: file values, env overrides, validation.

use std::sync::Mutex;

use tempfile::NamedTempFile;

use ar_bridge::BridgeConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "ARBRIDGE_CONFIG",
        "ARBRIDGE_FPS",
        "ARBRIDGE_WIDTH",
        "ARBRIDGE_HEIGHT",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_apply_with_empty_environment() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = BridgeConfig::load().expect("load config");
    assert_eq!(cfg.session.target_fps, 30);
    assert_eq!(cfg.session.width, 640);
    assert_eq!(cfg.session.height, 480);
    assert_eq!(cfg.tracking().target_fps, 30);
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "session": {
            "target_fps": 24,
            "width": 800,
            "height": 600
        }
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("ARBRIDGE_CONFIG", file.path());
    std::env::set_var("ARBRIDGE_FPS", "60");

    let cfg = BridgeConfig::load().expect("load config");
    assert_eq!(cfg.session.target_fps, 60);
    assert_eq!(cfg.session.width, 800);
    assert_eq!(cfg.session.height, 600);

    clear_env();
}

#[test]
fn rejects_zero_frame_rate() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("ARBRIDGE_FPS", "0");
    let err = BridgeConfig::load().expect_err("zero fps must fail validation");
    assert!(err.to_string().contains("target_fps"));

    clear_env();
}

#[test]
fn rejects_non_numeric_env_override() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("ARBRIDGE_WIDTH", "wide");
    let err = BridgeConfig::load().expect_err("non-numeric width must fail");
    assert!(err.to_string().contains("ARBRIDGE_WIDTH"));

    clear_env();
}
