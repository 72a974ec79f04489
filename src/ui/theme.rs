//! # Theme System
//!
//! The [`Theme`] struct names every color the renderer uses by its role
//! (border, title, highlighted row...). Rendering code never hardcodes a
//! color; it asks the active theme.
//!
//! Only the 16 standard terminal colors are used, so every theme works on
//! terminals without 256-color or true-color support.
//!
//! ## Built-in Themes
//!
//! - **Default** - cyan accents on the terminal's own background
//! - **Ocean** - blue and white
//! - **Amber** - yellow accents, reminiscent of old monochrome CRTs
//! - **Mono** - no hues at all, selection shown in black on white

use crossterm::style::Color;

/// Colors used by the menu box, grouped by semantic role.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Human-readable name, matched case-insensitively by [`Theme::by_name`].
    pub name: &'static str,

    /// Box-drawing characters.
    pub border: Color,
    /// The title row.
    pub title: Color,

    /// Item labels.
    pub fg: Color,
    /// Secondary labels, preview text, footer.
    pub fg_dim: Color,

    // -- Selection --
    pub highlight_fg: Color,
    pub highlight_bg: Color,

    // -- Status row --
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// All built-in themes, default first.
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Find a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }
}

static BUILT_IN_THEMES: [Theme; 4] = [
    Theme {
        name: "Default",
        border: Color::DarkCyan,
        title: Color::Cyan,
        fg: Color::Reset,
        fg_dim: Color::DarkGrey,
        highlight_fg: Color::Black,
        highlight_bg: Color::Cyan,
        success: Color::Green,
        error: Color::Red,
    },
    Theme {
        name: "Ocean",
        border: Color::DarkBlue,
        title: Color::White,
        fg: Color::Grey,
        fg_dim: Color::DarkGrey,
        highlight_fg: Color::White,
        highlight_bg: Color::DarkBlue,
        success: Color::Cyan,
        error: Color::Magenta,
    },
    Theme {
        name: "Amber",
        border: Color::DarkYellow,
        title: Color::Yellow,
        fg: Color::Yellow,
        fg_dim: Color::DarkYellow,
        highlight_fg: Color::Black,
        highlight_bg: Color::Yellow,
        success: Color::Yellow,
        error: Color::Red,
    },
    Theme {
        name: "Mono",
        border: Color::Reset,
        title: Color::Reset,
        fg: Color::Reset,
        fg_dim: Color::Reset,
        highlight_fg: Color::Black,
        highlight_bg: Color::White,
        success: Color::Reset,
        error: Color::Reset,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_themes_count() {
        assert_eq!(Theme::all().len(), 4);
    }

    #[test]
    fn test_default_theme() {
        assert_eq!(Theme::default_theme().name, "Default");
    }

    #[test]
    fn test_by_name_case_insensitive() {
        assert!(Theme::by_name("ocean").is_some());
        assert!(Theme::by_name("MONO").is_some());
        assert!(Theme::by_name("nonexistent").is_none());
    }

    #[test]
    fn test_selection_is_always_distinguishable() {
        for theme in Theme::all() {
            assert_ne!(theme.highlight_fg, theme.highlight_bg, "{}", theme.name);
        }
    }

    #[test]
    fn test_all_themes_have_distinct_names() {
        let names: Vec<&str> = Theme::all().iter().map(|t| t.name).collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(names.len(), unique.len(), "duplicate theme names found");
    }
}
