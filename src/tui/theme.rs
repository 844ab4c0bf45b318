// SPDX-FileCopyrightText: 2026 Patchdeck Authors
// SPDX-License-Identifier: MIT

//! Panel colors.
//!
//! The backend background colors are a user-facing contract, not cosmetics:
//! they are the only cue for which backend a port belongs to before a
//! connect is attempted. Defaults match the classic patchbay scheme (ALSA
//! white-on-red, JACK white-on-blue); both backgrounds can be overridden via
//! `PATCHDECK_TUI_PALETTE` / `PATCHDECK_PALETTE` as `<alsa>,<jack>` colors in
//! `#RRGGBB` or `rgb:RR/GG/BB` form.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

use crate::model::Backend;

const FOCUS_COLOR: Color = Color::LightGreen;
const STATUS_KEY_COLOR: Color = Color::Cyan;
const STATUS_LABEL_COLOR: Color = Color::Gray;
const UNAVAILABLE_COLOR: Color = Color::Red;

#[derive(Debug, Clone)]
pub(crate) struct Theme {
    alsa_bg: Color,
    jack_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self { alsa_bg: Color::Red, jack_bg: Color::Blue }
    }
}

impl Theme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        match palette_override_from_env()? {
            Some((alsa_bg, jack_bg)) => Ok(Self { alsa_bg, jack_bg }),
            None => Ok(Self::default()),
        }
    }

    pub(crate) fn backend_style(&self, backend: Backend) -> Style {
        let bg = match backend {
            Backend::Alsa => self.alsa_bg,
            Backend::Jack => self.jack_bg,
        };
        Style::default().fg(Color::White).bg(bg)
    }

    /// Row style: backend background, REVERSED under the cursor of the
    /// focused panel, UNDERLINED for the remembered cursor elsewhere.
    pub(crate) fn row_style(&self, backend: Backend, selected: bool, focused: bool) -> Style {
        let base = self.backend_style(backend);
        match (selected, focused) {
            (true, true) => base.add_modifier(Modifier::REVERSED),
            (true, false) => base.add_modifier(Modifier::UNDERLINED),
            (false, _) => base,
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(FOCUS_COLOR)
        } else {
            Style::default()
        }
    }

    pub(crate) fn unavailable_style(&self) -> Style {
        Style::default().fg(UNAVAILABLE_COLOR)
    }

    pub(crate) fn status_key_style(&self) -> Style {
        Style::default().fg(STATUS_KEY_COLOR)
    }

    pub(crate) fn status_label_style(&self) -> Style {
        Style::default().fg(STATUS_LABEL_COLOR)
    }
}

fn palette_override_from_env() -> Result<Option<(Color, Color)>, ThemeError> {
    let (name, value) = match env::var("PATCHDECK_TUI_PALETTE") {
        Ok(value) => ("PATCHDECK_TUI_PALETTE", value),
        Err(env::VarError::NotPresent) => match env::var("PATCHDECK_PALETTE") {
            Ok(value) => ("PATCHDECK_PALETTE", value),
            Err(env::VarError::NotPresent) => return Ok(None),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ThemeError::InvalidEnv {
                    name: "PATCHDECK_PALETTE".to_owned(),
                    value: "<non-unicode>".to_owned(),
                });
            }
        },
        Err(env::VarError::NotUnicode(_)) => {
            return Err(ThemeError::InvalidEnv {
                name: "PATCHDECK_TUI_PALETTE".to_owned(),
                value: "<non-unicode>".to_owned(),
            });
        }
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    parse_palette_csv(trimmed)
        .map(Some)
        .map_err(|error| ThemeError::InvalidEnv {
            name: name.to_owned(),
            value: format!("{trimmed} ({error})"),
        })
}

fn parse_palette_csv(value: &str) -> Result<(Color, Color), String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(format!(
            "expected 2 comma-separated colors (alsa_bg,jack_bg), got {}",
            parts.len()
        ));
    }
    Ok((parse_palette_color(parts[0])?, parse_palette_color(parts[1])?))
}

fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_owned());
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("rgb:") {
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != 3 {
            return Err(format!("invalid rgb: value: {trimmed}"));
        }
        let r = parse_hex_channel(parts[0])?;
        let g = parse_hex_channel(parts[1])?;
        let b = parse_hex_channel(parts[2])?;
        return Ok(Color::Rgb(r, g, b));
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    Ok(Color::Rgb(((rgb >> 16) & 0xFF) as u8, ((rgb >> 8) & 0xFF) as u8, (rgb & 0xFF) as u8))
}

fn parse_hex_channel(value: &str) -> Result<u8, String> {
    let value = value.trim();
    if value.len() == 2 {
        return u8::from_str_radix(value, 16)
            .map_err(|_| format!("invalid rgb: component {value}"));
    }
    if value.len() == 4 {
        let parsed = u16::from_str_radix(value, 16)
            .map_err(|_| format!("invalid rgb: component {value}"))?;
        return Ok((parsed >> 8) as u8);
    }
    Err(format!("invalid rgb: component {value} (expected 2 or 4 hex digits)"))
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Modifier};

    use super::{parse_palette_csv, Theme};
    use crate::model::Backend;

    #[test]
    fn default_backend_colors_are_red_and_blue() {
        let theme = Theme::default();
        assert_eq!(theme.backend_style(Backend::Alsa).bg, Some(Color::Red));
        assert_eq!(theme.backend_style(Backend::Jack).bg, Some(Color::Blue));
    }

    #[test]
    fn cursor_is_reversed_only_in_the_focused_panel() {
        let theme = Theme::default();
        let focused = theme.row_style(Backend::Jack, true, true);
        assert!(focused.add_modifier.contains(Modifier::REVERSED));

        let unfocused = theme.row_style(Backend::Jack, true, false);
        assert!(unfocused.add_modifier.contains(Modifier::UNDERLINED));
        assert!(!unfocused.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn palette_override_parses_hex_and_rgb_forms() {
        let (alsa, jack) = parse_palette_csv("#112233,rgb:44/55/66").expect("palette");
        assert_eq!(alsa, Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(jack, Color::Rgb(0x44, 0x55, 0x66));
    }

    #[test]
    fn palette_override_rejects_wrong_arity() {
        let err = parse_palette_csv("#112233").unwrap_err();
        assert!(err.contains("expected 2"));
    }
}
