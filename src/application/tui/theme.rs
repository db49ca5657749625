use crossterm::style::{Color as CrosstermColor, Stylize};
use ratatui::style::{Color as RatatuiColor, Modifier, Style as RatatuiStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Chrome
    pub title: ColorPair,
    pub nav: ColorPair,
    pub weekday: ColorPair,
    pub weekend: ColorPair,
    pub summary: ColorPair,

    // Day states
    pub day: ColorPair,
    pub today: ColorPair,
    pub disabled: ColorPair,
    pub holiday: ColorPair,
    pub selected: ColorPair,
    pub in_range: ColorPair,
    pub hover_range: ColorPair,
    pub cursor: ColorPair,

    // Availability
    pub full: ColorPair,
    pub low: ColorPair,
    pub sold_out: ColorPair,
    pub price: ColorPair,

    // Text
    pub legend: ColorPair,
    pub help_text: ColorPair,
    pub accent: ColorPair,
}

#[derive(Debug, Clone)]
pub struct ColorPair {
    pub fg: CrosstermColor,
    pub bg: Option<CrosstermColor>,
}

impl ColorPair {
    pub fn new(fg: CrosstermColor) -> Self {
        Self { fg, bg: None }
    }

    pub fn with_bg(fg: CrosstermColor, bg: CrosstermColor) -> Self {
        Self { fg, bg: Some(bg) }
    }

    /// Convert to ratatui style
    pub fn to_ratatui(&self) -> RatatuiStyle {
        let mut style = RatatuiStyle::default().fg(crossterm_to_ratatui(self.fg));
        if let Some(bg) = self.bg {
            style = style.bg(crossterm_to_ratatui(bg));
        }
        style
    }

    /// Convert to ratatui style with modifier
    pub fn to_ratatui_with_modifier(&self, modifier: Modifier) -> RatatuiStyle {
        self.to_ratatui().add_modifier(modifier)
    }

    /// Apply color to text for terminal output
    pub fn colorize(&self, text: &str) -> String {
        let mut styled = text.with(self.fg);
        if let Some(bg) = self.bg {
            styled = styled.on(bg);
        }
        format!("{}", styled)
    }
}

/// Convert crossterm color to ratatui color
pub fn crossterm_to_ratatui(color: CrosstermColor) -> RatatuiColor {
    match color {
        CrosstermColor::Black => RatatuiColor::Black,
        CrosstermColor::DarkRed => RatatuiColor::Red,
        CrosstermColor::DarkGreen => RatatuiColor::Green,
        CrosstermColor::DarkYellow => RatatuiColor::Yellow,
        CrosstermColor::DarkBlue => RatatuiColor::Blue,
        CrosstermColor::DarkMagenta => RatatuiColor::Magenta,
        CrosstermColor::DarkCyan => RatatuiColor::Cyan,
        CrosstermColor::Grey => RatatuiColor::Gray,
        CrosstermColor::DarkGrey => RatatuiColor::DarkGray,
        CrosstermColor::Red => RatatuiColor::LightRed,
        CrosstermColor::Green => RatatuiColor::LightGreen,
        CrosstermColor::Yellow => RatatuiColor::LightYellow,
        CrosstermColor::Blue => RatatuiColor::LightBlue,
        CrosstermColor::Magenta => RatatuiColor::LightMagenta,
        CrosstermColor::Cyan => RatatuiColor::LightCyan,
        CrosstermColor::White => RatatuiColor::White,
        CrosstermColor::Rgb { r, g, b } => RatatuiColor::Rgb(r, g, b),
        CrosstermColor::AnsiValue(v) => RatatuiColor::Indexed(v),
        _ => RatatuiColor::White,
    }
}

/// Parse a `#rrggbb` (or `#rgb`) legend color.
pub fn parse_hex_color(value: &str) -> Option<CrosstermColor> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(CrosstermColor::Rgb {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
        }),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(CrosstermColor::Rgb {
                r: expand(0)?,
                g: expand(1)?,
                b: expand(2)?,
            })
        }
        _ => None,
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            colors: ThemeColors {
                title: ColorPair::new(CrosstermColor::White),
                nav: ColorPair::new(CrosstermColor::DarkCyan),
                weekday: ColorPair::new(CrosstermColor::DarkCyan),
                weekend: ColorPair::new(CrosstermColor::Rgb { r: 150, g: 150, b: 150 }),
                summary: ColorPair::new(CrosstermColor::White),

                day: ColorPair::new(CrosstermColor::White),
                today: ColorPair::with_bg(CrosstermColor::Black, CrosstermColor::Yellow),
                disabled: ColorPair::new(CrosstermColor::DarkGrey),
                holiday: ColorPair::new(CrosstermColor::Red),
                selected: ColorPair::with_bg(
                    CrosstermColor::Black,
                    CrosstermColor::Rgb { r: 196, g: 175, b: 135 },
                ),
                in_range: ColorPair::with_bg(
                    CrosstermColor::White,
                    CrosstermColor::Rgb { r: 70, g: 62, b: 48 },
                ),
                hover_range: ColorPair::with_bg(
                    CrosstermColor::White,
                    CrosstermColor::Rgb { r: 40, g: 40, b: 40 },
                ),
                cursor: ColorPair::with_bg(CrosstermColor::White, CrosstermColor::DarkBlue),

                full: ColorPair::new(CrosstermColor::Green),
                low: ColorPair::new(CrosstermColor::Yellow),
                sold_out: ColorPair::new(CrosstermColor::DarkGrey),
                price: ColorPair::new(CrosstermColor::Grey),

                legend: ColorPair::new(CrosstermColor::Grey),
                help_text: ColorPair::new(CrosstermColor::DarkCyan),
                accent: ColorPair::new(CrosstermColor::Blue),
            },
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            colors: ThemeColors {
                title: ColorPair::new(CrosstermColor::Black),
                nav: ColorPair::new(CrosstermColor::DarkBlue),
                weekday: ColorPair::new(CrosstermColor::DarkBlue),
                weekend: ColorPair::new(CrosstermColor::DarkGrey),
                summary: ColorPair::new(CrosstermColor::Black),

                day: ColorPair::new(CrosstermColor::Black),
                today: ColorPair::with_bg(CrosstermColor::Black, CrosstermColor::Yellow),
                disabled: ColorPair::new(CrosstermColor::Grey),
                holiday: ColorPair::new(CrosstermColor::DarkRed),
                selected: ColorPair::with_bg(CrosstermColor::White, CrosstermColor::DarkBlue),
                in_range: ColorPair::with_bg(
                    CrosstermColor::Black,
                    CrosstermColor::Rgb { r: 220, g: 228, b: 245 },
                ),
                hover_range: ColorPair::with_bg(
                    CrosstermColor::Black,
                    CrosstermColor::Rgb { r: 240, g: 240, b: 240 },
                ),
                cursor: ColorPair::with_bg(CrosstermColor::White, CrosstermColor::DarkCyan),

                full: ColorPair::new(CrosstermColor::DarkGreen),
                low: ColorPair::new(CrosstermColor::DarkYellow),
                sold_out: ColorPair::new(CrosstermColor::Grey),
                price: ColorPair::new(CrosstermColor::DarkGrey),

                legend: ColorPair::new(CrosstermColor::DarkGrey),
                help_text: ColorPair::new(CrosstermColor::DarkBlue),
                accent: ColorPair::new(CrosstermColor::DarkBlue),
            },
        }
    }

    pub fn minimal() -> Self {
        Self {
            name: "Minimal".to_string(),
            colors: ThemeColors {
                title: ColorPair::new(CrosstermColor::White),
                nav: ColorPair::new(CrosstermColor::White),
                weekday: ColorPair::new(CrosstermColor::Grey),
                weekend: ColorPair::new(CrosstermColor::Grey),
                summary: ColorPair::new(CrosstermColor::White),

                day: ColorPair::new(CrosstermColor::White),
                today: ColorPair::new(CrosstermColor::White),
                disabled: ColorPair::new(CrosstermColor::DarkGrey),
                holiday: ColorPair::new(CrosstermColor::White),
                selected: ColorPair::with_bg(CrosstermColor::Black, CrosstermColor::White),
                in_range: ColorPair::with_bg(
                    CrosstermColor::White,
                    CrosstermColor::Rgb { r: 60, g: 60, b: 60 },
                ),
                hover_range: ColorPair::with_bg(
                    CrosstermColor::White,
                    CrosstermColor::Rgb { r: 28, g: 28, b: 28 },
                ),
                cursor: ColorPair::with_bg(CrosstermColor::Black, CrosstermColor::Grey),

                full: ColorPair::new(CrosstermColor::White),
                low: ColorPair::new(CrosstermColor::White),
                sold_out: ColorPair::new(CrosstermColor::DarkGrey),
                price: ColorPair::new(CrosstermColor::Grey),

                legend: ColorPair::new(CrosstermColor::Grey),
                help_text: ColorPair::new(CrosstermColor::Grey),
                accent: ColorPair::new(CrosstermColor::White),
            },
        }
    }

    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "minimal" => Self::minimal(),
            _ => Self::dark(), // default
        }
    }

    /// Color for a legend dot: its own `#rrggbb` color, else the accent.
    pub fn legend_color(&self, color: Option<&str>) -> RatatuiColor {
        color
            .and_then(parse_hex_color)
            .map(crossterm_to_ratatui)
            .unwrap_or_else(|| crossterm_to_ratatui(self.colors.accent.fg))
    }
}
