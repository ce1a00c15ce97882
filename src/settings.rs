use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User settings for export and sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Only consider mesh objects in a selection
    #[serde(default = "default_true")]
    pub mesh_only: bool,

    /// Ask before overwriting the snapshot or a scene file in an interactive terminal
    #[serde(default = "default_true")]
    pub confirm_overwrite: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mesh_only: true,
            confirm_overwrite: true,
        }
    }
}

impl Settings {
    /// Load settings from the config directory, falling back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(settings)
    }

    /// Save settings to the config directory
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn settings_path() -> Result<PathBuf> {
        crate::config::ConfigManager::settings_path()
    }
}

/// Update settings from command line arguments
pub fn update_settings(mesh_only: Option<bool>, confirm_overwrite: Option<bool>) -> Result<()> {
    let mut settings = Settings::load()?;

    if let Some(value) = mesh_only {
        settings.mesh_only = value;
        println!("  {} mesh_only = {}", "Set".green(), value);
    }

    if let Some(value) = confirm_overwrite {
        settings.confirm_overwrite = value;
        println!("  {} confirm_overwrite = {}", "Set".green(), value);
    }

    settings.save()?;
    println!("{}", "Configuration saved.".green().bold());

    Ok(())
}

/// Print the current settings
pub fn show_settings() -> Result<()> {
    let settings = Settings::load()?;
    let path = Settings::settings_path()?;

    println!("{}", "Current configuration:".bold());
    println!("  {}: {}", "File".cyan(), path.display());
    println!("  {}: {}", "mesh_only".cyan(), settings.mesh_only);
    println!("  {}: {}", "confirm_overwrite".cyan(), settings.confirm_overwrite);
    println!(
        "  {}: {}",
        "snapshot".cyan(),
        crate::config::ConfigManager::snapshot_file_path()?.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load_from(&temp.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let settings = Settings {
            mesh_only: false,
            confirm_overwrite: true,
        };
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "confirm_overwrite = false\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert!(settings.mesh_only);
        assert!(!settings.confirm_overwrite);
    }
}
