use anyhow::{Context, Result};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;

use crate::config::ConfigManager;

/// Log files above this size are rotated to `.log.old`
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Initialize the logging system
///
/// Console output goes through `env_logger` and honours `RUST_LOG`
/// (`error`, `warn`, `info` (default), `debug`, `trace`, `off`). Export and
/// sync also append a summary line to `porting-sync.log` in the config
/// directory via [`log_to_file`].
///
/// ```bash
/// # Show every group move while syncing
/// RUST_LOG=debug porting-sync sync --scene scene.json
/// ```
pub fn init_logger() -> Result<()> {
    ConfigManager::ensure_config_dir()?;

    let default_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{:5}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(default_level)
        .target(env_logger::Target::Stderr)
        .try_init()
        .ok(); // already initialized in tests

    log_to_file(&format!("Logger initialized with level: {default_level:?}"))?;

    Ok(())
}

/// Append a timestamped line to the log file
pub fn log_to_file(message: &str) -> Result<()> {
    let log_path = ConfigManager::log_file_path()?;

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        message
    )?;

    Ok(())
}

/// Rotate the log file once it grows past 10MB
pub fn rotate_log_if_needed() -> Result<()> {
    let log_path = ConfigManager::log_file_path()?;

    if log_path.exists() {
        let metadata = std::fs::metadata(&log_path)?;

        if metadata.len() > MAX_LOG_SIZE {
            let old_log_path = log_path.with_extension("log.old");

            if old_log_path.exists() {
                std::fs::remove_file(&old_log_path)?;
            }

            std::fs::rename(&log_path, &old_log_path)?;

            log::info!("Log file rotated to {}", old_log_path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs::File;
    use tempfile::TempDir;

    /// Point the config dir at a temp directory for the duration of a test
    fn with_temp_config<F: FnOnce() -> Result<()>>(f: F) -> Result<()> {
        let temp = TempDir::new()?;
        let previous = std::env::var("XDG_CONFIG_HOME").ok();
        std::env::set_var("XDG_CONFIG_HOME", temp.path());
        let result = f();
        match previous {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
        result
    }

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn test_init_logger_succeeds() -> Result<()> {
        with_temp_config(init_logger)
    }

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn test_log_to_file() -> Result<()> {
        with_temp_config(|| {
            log_to_file("Test log message")?;

            let log_path = ConfigManager::log_file_path()?;
            let contents = std::fs::read_to_string(&log_path)?;
            assert!(contents.contains("Test log message"));
            Ok(())
        })
    }

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn test_rotate_log_creates_backup() -> Result<()> {
        with_temp_config(|| {
            ConfigManager::ensure_config_dir()?;
            let log_path = ConfigManager::log_file_path()?;
            let mut file = File::create(&log_path)?;
            file.write_all(&vec![b'a'; (MAX_LOG_SIZE + 1024) as usize])?;
            drop(file);

            rotate_log_if_needed()?;

            assert!(log_path.with_extension("log.old").exists());
            assert!(!log_path.exists());
            Ok(())
        })
    }
}
