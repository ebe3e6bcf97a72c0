use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub positive: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(220, 220, 220),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(59, 130, 246),
            border: Color::Rgb(70, 78, 90),
            border_focused: Color::Rgb(80, 160, 160),
            positive: Color::Rgb(16, 185, 129),
            error: Color::Rgb(239, 68, 68),
        }
    }
}

impl Theme {
    /// Bar color of a budget row: the category color, or red once over budget.
    pub fn budget(&self, color: &str, over_budget: bool) -> Color {
        if over_budget {
            return self.error;
        }
        parse_hex(color).unwrap_or(self.accent)
    }
}

/// `#RRGGBB` to an RGB color.
pub fn parse_hex(color: &str) -> Option<Color> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(hex.get(at..at + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}
