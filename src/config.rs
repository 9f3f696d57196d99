//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. `--config <path>` CLI flag
//! 2. `$TUI_EXPLORER_CONFIG` environment variable (path to config file)
//! 3. Project-local `.tui-explorer.toml` in the current working directory
//! 4. Global `~/.config/tui-explorer/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::fs::listing::SortKey;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory to open at startup. Defaults to the home directory.
    pub start_path: Option<String>,
    /// Show hidden files at startup.
    pub show_hidden: Option<bool>,
    /// Enable mouse wheel support.
    pub mouse: Option<bool>,
}

/// Directory listing settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ListingConfig {
    /// Sort order: "name", "size", "modified".
    pub sort_by: Option<String>,
}

/// Preview pane settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PreviewConfig {
    /// Whether the preview pane is shown.
    pub enabled: Option<bool>,
    /// Bytes of file content to show before truncating.
    pub max_bytes: Option<usize>,
    /// Syntax highlighting theme (syntect theme name).
    pub syntax_theme: Option<String>,
}

/// External program settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OpenerConfig {
    /// Editors tried in order after `$VISUAL` and `$EDITOR`.
    pub editors: Option<Vec<String>>,
}

/// Color overrides for the custom theme.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub selected_bg: Option<String>,
    pub selected_fg: Option<String>,
    pub dir_fg: Option<String>,
    pub file_fg: Option<String>,
    pub hidden_fg: Option<String>,
    pub symlink_fg: Option<String>,
    pub border_fg: Option<String>,
    pub border_focused_fg: Option<String>,
    pub path_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub dialog_bg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

/// Log sink settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. "debug" or "tui_explorer=trace".
    pub level: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub listing: ListingConfig,
    pub preview: PreviewConfig,
    pub opener: OpenerConfig,
    pub theme: ThemeConfig,
    pub log: LogConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default number of content bytes shown in the preview pane.
pub const DEFAULT_PREVIEW_MAX_BYTES: usize = 4096;
/// Default syntect theme.
pub const DEFAULT_SYNTAX_THEME: &str = "base16-ocean.dark";
/// Editors tried when none is configured.
pub const DEFAULT_EDITORS: &[&str] = &["nano", "vim", "vi", "emacs", "gedit", "code"];
/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path, which is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("TUI_EXPLORER_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".tui-explorer.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("tui-explorer").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                start_path: other
                    .general
                    .start_path
                    .clone()
                    .or(self.general.start_path),
                show_hidden: other.general.show_hidden.or(self.general.show_hidden),
                mouse: other.general.mouse.or(self.general.mouse),
            },
            listing: ListingConfig {
                sort_by: other.listing.sort_by.clone().or(self.listing.sort_by),
            },
            preview: PreviewConfig {
                enabled: other.preview.enabled.or(self.preview.enabled),
                max_bytes: other.preview.max_bytes.or(self.preview.max_bytes),
                syntax_theme: other
                    .preview
                    .syntax_theme
                    .clone()
                    .or(self.preview.syntax_theme),
            },
            opener: OpenerConfig {
                editors: other.opener.editors.clone().or(self.opener.editors),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: other.theme.custom.clone().or(self.theme.custom),
            },
            log: LogConfig {
                level: other.log.level.clone().or(self.log.level),
                file: other.log.file.clone().or(self.log.file),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    pub fn load(cli_config_path: Option<&Path>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            match load_file(cli_path) {
                Some(file_cfg) => config = config.merge(&file_cfg),
                None if !cli_path.exists() => {
                    eprintln!("Warning: config file {} not found", cli_path.display());
                }
                None => {}
            }
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Configured start directory, if any.
    pub fn start_path(&self) -> Option<PathBuf> {
        self.general.start_path.as_deref().map(expand_tilde)
    }

    pub fn show_hidden(&self) -> bool {
        self.general.show_hidden.unwrap_or(false)
    }

    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(true)
    }

    pub fn sort_key(&self) -> SortKey {
        self.listing
            .sort_by
            .as_deref()
            .map(SortKey::from_config)
            .unwrap_or_default()
    }

    pub fn preview_enabled(&self) -> bool {
        self.preview.enabled.unwrap_or(true)
    }

    pub fn preview_max_bytes(&self) -> usize {
        self.preview.max_bytes.unwrap_or(DEFAULT_PREVIEW_MAX_BYTES)
    }

    pub fn syntax_theme_name(&self) -> &str {
        self.preview
            .syntax_theme
            .as_deref()
            .unwrap_or(DEFAULT_SYNTAX_THEME)
    }

    pub fn editors(&self) -> Vec<String> {
        match &self.opener.editors {
            Some(list) => list.clone(),
            None => DEFAULT_EDITORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Configured log file, or `<cache_dir>/tui-explorer/explorer.log`.
    pub fn log_file(&self) -> PathBuf {
        if let Some(file) = self.log.file.as_deref() {
            return expand_tilde(file);
        }
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("tui-explorer")
            .join("explorer.log")
    }
}

/// Expand a leading `~` or `~/` to the home directory.
fn expand_tilde(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

// ── Tests ────────────────────────────────────────────────────────────────────
