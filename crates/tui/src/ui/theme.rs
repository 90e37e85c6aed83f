use ratatui::style::Color;

/// Palette selected once at startup from the configuration object; no
/// screen mutates it afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub panel: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub error: Color,
    pub positive: Color,
    pub border: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(8, 12, 16),
            panel: Color::Rgb(20, 26, 32),
            text: Color::Rgb(220, 220, 220),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(80, 160, 160),
            error: Color::Rgb(200, 80, 80),
            positive: Color::Rgb(110, 180, 110),
            border: Color::Rgb(60, 70, 80),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(245, 245, 240),
            panel: Color::Rgb(230, 232, 235),
            text: Color::Rgb(30, 30, 30),
            dim: Color::Rgb(110, 110, 110),
            accent: Color::Rgb(30, 110, 110),
            error: Color::Rgb(170, 40, 40),
            positive: Color::Rgb(40, 130, 40),
            border: Color::Rgb(180, 185, 190),
        }
    }

    /// Unknown names fall back to the dark palette.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}
