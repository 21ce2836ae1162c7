//! Colors used when drawing dialogs
//!
//! A trimmed palette in the charmtone family: just what the backdrop,
//! dialog chrome and buttons need.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub is_dark: bool,

    pub primary: Color,
    pub accent: Color,

    pub bg_base: Color,
    pub bg_overlay: Color,

    pub fg_base: Color,
    pub fg_muted: Color,
    pub fg_subtle: Color,
    pub fg_selected: Color,

    pub border: Color,
    pub border_focus: Color,

    pub error: Color,
    pub info: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            is_dark: true,
            primary: Color::Rgb(0x8A, 0x67, 0xFF),   // Charple
            accent: Color::Rgb(0xFF, 0xA5, 0x00),    // Zest
            bg_base: Color::Rgb(0x2D, 0x2D, 0x2D),   // Pepper
            bg_overlay: Color::Rgb(0x1A, 0x1A, 0x1A),
            fg_base: Color::Rgb(0xD0, 0xD0, 0xD0),   // Ash
            fg_muted: Color::Rgb(0xA0, 0xA0, 0xA0),  // Squid
            fg_subtle: Color::Rgb(0x70, 0x70, 0x70),
            fg_selected: Color::Rgb(0xF5, 0xF5, 0xF5), // Salt
            border: Color::Rgb(0x4A, 0x4A, 0x4A),    // Charcoal
            border_focus: Color::Rgb(0x8A, 0x67, 0xFF),
            error: Color::Rgb(0xF4, 0x43, 0x36),     // Sriracha
            info: Color::Rgb(0x29, 0xB6, 0xF6),      // Malibu
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            is_dark: false,
            primary: Color::Rgb(0x6B, 0x46, 0xC1),
            accent: Color::Rgb(0xD9, 0x77, 0x06),
            bg_base: Color::Rgb(0xFA, 0xFA, 0xFA),
            bg_overlay: Color::Rgb(0xBD, 0xBD, 0xBD),
            fg_base: Color::Rgb(0x21, 0x21, 0x21),
            fg_muted: Color::Rgb(0x61, 0x61, 0x61),
            fg_subtle: Color::Rgb(0x9E, 0x9E, 0x9E),
            fg_selected: Color::Rgb(0x00, 0x00, 0x00),
            border: Color::Rgb(0xBD, 0xBD, 0xBD),
            border_focus: Color::Rgb(0x6B, 0x46, 0xC1),
            error: Color::Rgb(0xC6, 0x28, 0x28),
            info: Color::Rgb(0x02, 0x77, 0xBD),
        }
    }

    /// Look up a preset by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    pub fn backdrop(&self) -> Style {
        Style::default()
            .bg(self.bg_overlay)
            .fg(self.fg_subtle)
            .add_modifier(Modifier::DIM)
    }

    pub fn dialog_border(&self, active: bool) -> Style {
        if active {
            Style::default().fg(self.border_focus)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn dialog_title(&self, active: bool) -> Style {
        if active {
            Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.fg_muted)
        }
    }

    pub fn dialog_content(&self, active: bool) -> Style {
        let style = Style::default().bg(self.bg_base);
        if active {
            style.fg(self.fg_base)
        } else {
            style.fg(self.fg_subtle).add_modifier(Modifier::DIM)
        }
    }

    pub fn button(&self, selected: bool, active: bool) -> Style {
        match (selected, active) {
            (true, true) => Style::default()
                .fg(self.fg_selected)
                .bg(self.primary)
                .add_modifier(Modifier::BOLD),
            (false, true) => Style::default().fg(self.fg_base),
            _ => Style::default().fg(self.fg_subtle),
        }
    }

    pub fn close_button(&self, active: bool) -> Style {
        if active {
            Style::default().fg(self.error)
        } else {
            Style::default().fg(self.fg_subtle)
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_by_name() {
        assert!(Theme::by_name("dark").unwrap().is_dark);
        assert!(!Theme::by_name("light").unwrap().is_dark);
        assert!(Theme::by_name("neon").is_none());
    }

    #[test]
    fn test_inactive_styles_are_muted() {
        let theme = Theme::dark();
        assert_eq!(theme.dialog_border(false).fg, Some(theme.border));
        assert_eq!(theme.dialog_border(true).fg, Some(theme.border_focus));
        assert!(theme
            .dialog_content(false)
            .add_modifier
            .contains(Modifier::DIM));
    }
}
