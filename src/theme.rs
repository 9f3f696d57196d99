//! Built-in palettes and resolution from config.
//!
//! Two palettes ship with the browser (Catppuccin Mocha and Latte); the
//! `custom` scheme starts from the dark one and applies hex overrides.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Entry lists
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub dir_fg: Color,
    pub file_fg: Color,
    pub hidden_fg: Color,
    pub symlink_fg: Color,

    // Chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,
    pub path_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub dialog_bg: Color,

    // Semantic colors, not configurable
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

/// Catppuccin Mocha.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        selected_bg: Color::Rgb(69, 71, 90),     // surface1
        selected_fg: Color::Rgb(205, 214, 244),  // text
        dir_fg: Color::Rgb(137, 220, 235),       // sky
        file_fg: Color::Rgb(205, 214, 244),      // text
        hidden_fg: Color::Rgb(108, 112, 134),    // overlay0
        symlink_fg: Color::Rgb(245, 194, 231),   // pink

        border_fg: Color::Rgb(88, 91, 112),          // surface2
        border_focused_fg: Color::Rgb(166, 227, 161), // green
        path_fg: Color::Rgb(249, 226, 175),          // yellow
        status_bg: Color::Rgb(30, 30, 46),           // base
        status_fg: Color::Rgb(205, 214, 244),
        dialog_bg: Color::Rgb(49, 50, 68), // surface0

        error_fg: Color::Rgb(243, 139, 168),
        warning_fg: Color::Rgb(249, 226, 175),
        success_fg: Color::Rgb(166, 227, 161),
        info_fg: Color::Rgb(137, 180, 250),
        accent_fg: Color::Rgb(203, 166, 247),
        dim_fg: Color::Rgb(108, 112, 134),
    }
}

/// Catppuccin Latte.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        selected_bg: Color::Rgb(204, 208, 218),
        selected_fg: Color::Rgb(76, 79, 105),
        dir_fg: Color::Rgb(4, 165, 229),
        file_fg: Color::Rgb(76, 79, 105),
        hidden_fg: Color::Rgb(156, 160, 176),
        symlink_fg: Color::Rgb(234, 118, 203),

        border_fg: Color::Rgb(172, 176, 190),
        border_focused_fg: Color::Rgb(64, 160, 43),
        path_fg: Color::Rgb(223, 142, 29),
        status_bg: Color::Rgb(239, 241, 245),
        status_fg: Color::Rgb(76, 79, 105),
        dialog_bg: Color::Rgb(230, 233, 239),

        error_fg: Color::Rgb(210, 15, 57),
        warning_fg: Color::Rgb(223, 142, 29),
        success_fg: Color::Rgb(64, 160, 43),
        info_fg: Color::Rgb(30, 102, 245),
        accent_fg: Color::Rgb(136, 57, 239),
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

/// Parse `"#aabbcc"` (hash optional). Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Resolve the final `ThemeColors` from config. Unknown schemes are dark.
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref().unwrap_or("dark") {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    let overrides: [(&Option<String>, &mut Color); 12] = [
        (&custom.selected_bg, &mut theme.selected_bg),
        (&custom.selected_fg, &mut theme.selected_fg),
        (&custom.dir_fg, &mut theme.dir_fg),
        (&custom.file_fg, &mut theme.file_fg),
        (&custom.hidden_fg, &mut theme.hidden_fg),
        (&custom.symlink_fg, &mut theme.symlink_fg),
        (&custom.border_fg, &mut theme.border_fg),
        (&custom.border_focused_fg, &mut theme.border_focused_fg),
        (&custom.path_fg, &mut theme.path_fg),
        (&custom.status_bg, &mut theme.status_bg),
        (&custom.status_fg, &mut theme.status_fg),
        (&custom.dialog_bg, &mut theme.dialog_bg),
    ];
    for (hex, slot) in overrides {
        if let Some(color) = hex.as_deref().and_then(parse_hex_color) {
            *slot = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color_valid() {
        assert_eq!(parse_hex_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("#1a1b26"), Some(Color::Rgb(26, 27, 38)));
        assert_eq!(parse_hex_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
    }

    #[test]
    fn test_parse_hex_color_invalid() {
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_resolve_schemes() {
        let light = resolve_theme(&ThemeConfig {
            scheme: Some("light".into()),
            custom: None,
        });
        assert_eq!(light.dir_fg, Color::Rgb(4, 165, 229));

        let default = resolve_theme(&ThemeConfig::default());
        assert_eq!(default.dir_fg, dark_theme().dir_fg);

        let unknown = resolve_theme(&ThemeConfig {
            scheme: Some("neon".into()),
            custom: None,
        });
        assert_eq!(unknown.dir_fg, dark_theme().dir_fg);
    }

    #[test]
    fn test_custom_overrides_and_invalid_fallback() {
        let config = ThemeConfig {
            scheme: Some("custom".into()),
            custom: Some(ThemeColorsConfig {
                selected_bg: Some("#1a1b26".into()),
                dir_fg: Some("not-a-color".into()),
                ..Default::default()
            }),
        };
        let theme = resolve_theme(&config);
        assert_eq!(theme.selected_bg, Color::Rgb(26, 27, 38));
        assert_eq!(theme.dir_fg, dark_theme().dir_fg);
        assert_eq!(theme.file_fg, dark_theme().file_fg);
    }

    #[test]
    fn test_custom_ignored_outside_custom_scheme() {
        let config = ThemeConfig {
            scheme: Some("dark".into()),
            custom: Some(ThemeColorsConfig {
                selected_bg: Some("#000000".into()),
                ..Default::default()
            }),
        };
        assert_eq!(resolve_theme(&config).selected_bg, dark_theme().selected_bg);
    }
}
