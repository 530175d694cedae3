//! Color theme and styling for the guide TUI

use ratatui::style::{Color, Modifier, Style};

/// Guide UI color theme
#[derive(Debug, Clone)]
pub struct GuideTheme {
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    pub user_text: Color,
    pub assistant_text: Color,
    pub system_text: Color,

    pub site_name: Color,
    pub model_ok: Color,
    pub fallback: Color,
}

impl Default for GuideTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            user_text: Color::Cyan,
            assistant_text: Color::White,
            system_text: Color::DarkGray,

            site_name: Color::Yellow,
            model_ok: Color::Green,
            fallback: Color::LightRed,
        }
    }
}

impl GuideTheme {
    /// Style for user chat turns
    pub fn user_style(&self) -> Style {
        Style::default()
            .fg(self.user_text)
            .add_modifier(Modifier::ITALIC)
    }

    /// Style for assistant chat turns
    pub fn assistant_style(&self) -> Style {
        Style::default().fg(self.assistant_text)
    }

    /// Style for system hints
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::ITALIC)
    }

    /// Border style for a panel
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Best-effort terminal color for a `#rrggbb` hex string.
    pub fn hex_color(hex: &str) -> Color {
        let parse = |s: &str| u8::from_str_radix(s, 16).ok();
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() == 6 {
            if let (Some(r), Some(g), Some(b)) = (
                parse(&digits[0..2]),
                parse(&digits[2..4]),
                parse(&digits[4..6]),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_parses() {
        assert_eq!(GuideTheme::hex_color("#8b4513"), Color::Rgb(0x8b, 0x45, 0x13));
        assert_eq!(GuideTheme::hex_color("ffffff"), Color::Rgb(255, 255, 255));
        assert_eq!(GuideTheme::hex_color("#nope"), Color::White);
    }
}
