//! Integration tests for configuration loading

use framehost::config::{global_config_path, ConfigLoader, HostConfig};
use framehost::OwnerThread;
use std::sync::{mpsc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

// Tests here mutate process-wide environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn set(vars: &[(&'static str, Option<&str>)]) -> Self {
        let saved = vars
            .iter()
            .map(|(key, value)| {
                let previous = std::env::var(key).ok();
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
                (*key, previous)
            })
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}

#[test]
fn test_load_without_files_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let config_home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let _env = EnvGuard::set(&[
        ("XDG_CONFIG_HOME", config_home.path().to_str()),
        ("FRAMEHOST__RUNNER__THREAD_NAME", None),
        ("FRAMEHOST__LOGGING__LEVEL", None),
    ]);

    let config = ConfigLoader::load(workspace.path()).unwrap();
    assert_eq!(config, HostConfig::default());
}

#[test]
fn test_local_file_overrides_global_file() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let config_home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let _env = EnvGuard::set(&[
        ("XDG_CONFIG_HOME", config_home.path().to_str()),
        ("FRAMEHOST__RUNNER__THREAD_NAME", None),
        ("FRAMEHOST__LOGGING__LEVEL", None),
    ]);

    let global = global_config_path().unwrap();
    assert!(global.starts_with(config_home.path()));
    std::fs::create_dir_all(global.parent().unwrap()).unwrap();
    std::fs::write(
        &global,
        r#"
[runner]
thread_name = "global-owner"

[logging]
level = "debug"
"#,
    )
    .unwrap();
    std::fs::write(
        workspace.path().join("framehost.toml"),
        r#"
[logging]
level = "warn"
format = "json"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load(workspace.path()).unwrap();
    assert_eq!(config.runner.thread_name, "global-owner");
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, "json");
}

#[test]
fn test_environment_overrides_files() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let config_home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let _env = EnvGuard::set(&[
        ("XDG_CONFIG_HOME", config_home.path().to_str()),
        ("FRAMEHOST__RUNNER__THREAD_NAME", Some("env-owner")),
        ("FRAMEHOST__LOGGING__LEVEL", None),
    ]);
    std::fs::write(
        workspace.path().join("framehost.toml"),
        "[runner]\nthread_name = \"local-owner\"\n",
    )
    .unwrap();

    let config = ConfigLoader::load(workspace.path()).unwrap();
    assert_eq!(config.runner.thread_name, "env-owner");
}

#[test]
fn test_invalid_local_file_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let config_home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let _env = EnvGuard::set(&[
        ("XDG_CONFIG_HOME", config_home.path().to_str()),
        ("FRAMEHOST__RUNNER__THREAD_NAME", None),
        ("FRAMEHOST__LOGGING__LEVEL", None),
    ]);
    std::fs::write(
        workspace.path().join("framehost.toml"),
        "[runner]\nthread_name = \"\"\n",
    )
    .unwrap();

    let result = ConfigLoader::load(workspace.path());
    assert!(matches!(result, Err(framehost::ConfigError::Invalid(_))));
}

#[test]
fn test_owner_thread_uses_configured_name() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("host.toml");
    std::fs::write(&config_file, "[runner]\nthread_name = \"ui-owner\"\n").unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let owner = OwnerThread::spawn(&config.runner).unwrap();

    let (tx, rx) = mpsc::channel();
    owner.runner().post(move || {
        tx.send(std::thread::current().name().map(String::from))
            .unwrap();
    });

    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap().as_deref(),
        Some("ui-owner")
    );
}

#[test]
fn test_init_logging_installs_subscriber_once() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("host.toml");
    std::fs::write(&config_file, "[logging]\nlevel = \"warn\"\nformat = \"json\"\n").unwrap();
    let config = ConfigLoader::load_from_file(&config_file).unwrap();

    framehost::logging::init_logging(Some(&config.logging)).unwrap();

    let second = framehost::logging::init_logging(Some(&config.logging));
    assert!(matches!(second, Err(framehost::ConfigError::Logging(_))));
}
