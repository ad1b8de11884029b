//! Configuration management for the backdrop
//!
//! Loads config from ~/.config/backdrop/config.toml with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial logical width
    pub width: u32,
    /// Initial logical height
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Backdrop".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Backdrop colors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// RGBA fill color drawn by the shader pass
    pub color: [f32; 4],
    /// RGBA clear color behind the quad
    pub clear: [f32; 4],
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            color: backdrop_renderer::DEFAULT_COLOR,
            clear: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub backdrop: BackdropConfig,
}

impl Config {
    /// Get the config file path (~/.config/backdrop/config.toml)
    fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("backdrop").join("config.toml"))
    }

    /// Load config from disk, or defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            log::info!("Could not determine config path, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific path, falling back to defaults on any
    /// read or parse failure.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse config {:?}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read config {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_fill_with_opaque_red() {
        let config = Config::default();
        assert_eq!(config.backdrop.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(config.backdrop.clear, [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(config.window.title, "Backdrop");
    }

    #[test]
    fn partial_config_keeps_defaults_for_the_rest() {
        let config: Config = toml::from_str(
            r#"
            [backdrop]
            color = [0.0, 0.5, 1.0, 1.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.backdrop.color, [0.0, 0.5, 1.0, 1.0]);
        assert_eq!(config.backdrop.clear, [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(config.window.width, 800);
    }

    #[test]
    fn load_from_reads_a_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [window]
            title = "Test"
            width = 320
            height = 240
            "#
        )
        .unwrap();

        let config = Config::load_from(file.path());
        assert_eq!(config.window.title, "Test");
        assert_eq!(config.window.width, 320);
        assert_eq!(config.window.height, 240);
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not valid toml [").unwrap();

        let config = Config::load_from(file.path());
        assert_eq!(config.window.title, "Backdrop");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/backdrop/config.toml"));
        assert_eq!(config.backdrop.color, [1.0, 0.0, 0.0, 1.0]);
    }
}
