use crate::error::AppError;
use crate::model::Theme;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TODOLIST_CONFIG_PATH";

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        if self.accent.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.accent, text, self.reset)
        }
    }

    pub fn mutedize(&self, text: &str) -> String {
        if self.muted.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.muted, text, self.reset)
        }
    }
}

/// The light theme is the terminal's own colors; dark swaps in a warm
/// accent on a dim foreground.
pub fn palette_for(theme: Theme, color: bool) -> Palette {
    match theme {
        Theme::Dark if color => Palette {
            accent: "\x1b[38;5;208m",
            muted: "\x1b[38;5;245m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            accent: "",
            muted: "",
            reset: "",
        },
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    #[serde(default)]
    pub color: Option<bool>,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl Config {
    pub fn color_enabled(&self) -> bool {
        self.color.unwrap_or(true)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Replaces a leading alias word with its expansion.
    pub fn expand_alias(&self, line: &str) -> Option<String> {
        let trimmed = line.trim_start();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, Some(rest)),
            None => (trimmed, None),
        };
        let expansion = self.aliases.get(head)?;
        Some(match rest {
            Some(rest) => format!("{expansion} {rest}"),
            None => expansion.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub store_path: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub color: Option<bool>,
    pub aliases: HashMap<String, String>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("todolist")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("todolist")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(path) = overrides.store_path.as_ref() {
        merged.store_path = Some(path.clone());
    }
    if let Some(dir) = overrides.export_dir.as_ref() {
        merged.export_dir = Some(dir.clone());
    }
    if overrides.color.is_some() {
        merged.color = overrides.color;
    }

    for (alias, value) in overrides.aliases.iter() {
        merged.aliases.insert(alias.clone(), value.clone());
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::{
        Config, ConfigOverrides, load_config_from_path, load_config_with_fallback_from_path,
        merge_overrides, palette_for,
    };
    use crate::model::Theme;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("todolist-{nanos}-{file_name}"))
    }

    #[test]
    fn load_config_missing_returns_defaults_without_error() {
        let path = temp_path("missing-config.json");
        let result = load_config_with_fallback_from_path(&path);

        assert_eq!(result.config, Config::default());
        assert!(result.error.is_none());
    }

    #[test]
    fn load_config_invalid_returns_defaults_and_error() {
        let path = temp_path("invalid-config.json");
        fs::write(&path, "{ invalid json ").unwrap();

        let result = load_config_with_fallback_from_path(&path);
        fs::remove_file(&path).ok();

        assert_eq!(result.config, Config::default());
        assert_eq!(result.error.unwrap().code(), "invalid_data");
    }

    #[test]
    fn load_config_reads_valid_file() {
        let path = temp_path("valid-config.json");
        let content = serde_json::json!({
            "store_path": "/tmp/todolist/state.json",
            "color": false,
            "aliases": {
                "ls": "list --filter pending"
            }
        });
        fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(
            loaded.store_path,
            Some(PathBuf::from("/tmp/todolist/state.json"))
        );
        assert!(!loaded.color_enabled());
        assert_eq!(
            loaded.aliases.get("ls").map(String::as_str),
            Some("list --filter pending")
        );
    }

    #[test]
    fn merge_overrides_updates_fields_and_aliases() {
        let base = Config {
            export_dir: Some(PathBuf::from("exports")),
            aliases: [("ls".into(), "list".into())].into_iter().collect(),
            ..Config::default()
        };

        let overrides = ConfigOverrides {
            store_path: Some(PathBuf::from("elsewhere.json")),
            color: Some(false),
            aliases: [
                ("ls".into(), "list --filter completed".into()),
                ("x".into(), "delete".into()),
            ]
            .into_iter()
            .collect(),
            ..ConfigOverrides::default()
        };

        let merged = merge_overrides(&base, &overrides);
        assert_eq!(merged.store_path, Some(PathBuf::from("elsewhere.json")));
        assert_eq!(merged.export_dir, Some(PathBuf::from("exports")));
        assert_eq!(merged.color, Some(false));
        assert_eq!(
            merged.aliases.get("ls").map(String::as_str),
            Some("list --filter completed")
        );
        assert_eq!(merged.aliases.get("x").map(String::as_str), Some("delete"));
        assert!(base.aliases.get("x").is_none());
    }

    #[test]
    fn merge_overrides_with_empty_overrides_returns_clone() {
        let base = Config {
            color: Some(true),
            aliases: [("ls".into(), "list".into())].into_iter().collect(),
            ..Config::default()
        };

        let merged = merge_overrides(&base, &ConfigOverrides::default());

        assert_eq!(merged, base);
    }

    #[test]
    fn expand_alias_keeps_trailing_arguments() {
        let config = Config {
            aliases: [("rm".into(), "delete".into())].into_iter().collect(),
            ..Config::default()
        };

        assert_eq!(config.expand_alias("rm 12").as_deref(), Some("delete 12"));
        assert_eq!(config.expand_alias("rm").as_deref(), Some("delete"));
        assert!(config.expand_alias("list").is_none());
    }

    #[test]
    fn palette_follows_theme_and_color_switch() {
        let light = palette_for(Theme::Light, true);
        assert!(light.accent.is_empty());
        assert_eq!(light.accentize("x"), "x");

        let dark = palette_for(Theme::Dark, true);
        assert_eq!(dark.accent, "\x1b[38;5;208m");
        assert_eq!(dark.mutedize("x"), "\x1b[38;5;245mx\x1b[0m");

        let plain_dark = palette_for(Theme::Dark, false);
        assert!(plain_dark.muted.is_empty());
    }
}
