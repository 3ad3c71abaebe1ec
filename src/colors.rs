use crate::level::Level;
use serde::Deserialize;

/// Returned by [`color_code`] for indices outside the color set.
pub const UNKNOWN_COLOR: &str = "unknown";

/// Escape sequence that restores the terminal's default color.
pub const RESET_CODE: &str = "\x1b[0m";

/// Symbolic colors a level can be displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Reset = 0,
    Green = 1,
    Yellow = 2,
    Blue = 3,
    Magenta = 4,
    Cyan = 5,
    Red = 6,
    AnsiReset = 7,
}

impl Color {
    pub fn from_index(index: u8) -> Option<Color> {
        match index {
            0 => Some(Color::Reset),
            1 => Some(Color::Green),
            2 => Some(Color::Yellow),
            3 => Some(Color::Blue),
            4 => Some(Color::Magenta),
            5 => Some(Color::Cyan),
            6 => Some(Color::Red),
            7 => Some(Color::AnsiReset),
            _ => None,
        }
    }

    /// ANSI escape sequence for this color
    pub fn code(self) -> &'static str {
        match self {
            Color::Reset | Color::AnsiReset => RESET_CODE,
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
            Color::Magenta => "\x1b[35m",
            Color::Cyan => "\x1b[36m",
            Color::Red => "\x1b[31m",
        }
    }
}

/// Resolve a raw color index to its escape sequence, or [`UNKNOWN_COLOR`].
pub fn color_code(index: u8) -> &'static str {
    Color::from_index(index).map_or(UNKNOWN_COLOR, Color::code)
}

/// Default color for each level, indexed by `Level::index()`.
pub const DEFAULT_LEVEL_COLORS: [Color; 5] = [
    Color::Green,  // DEBUG
    Color::Cyan,   // INFO
    Color::Yellow, // WARNING
    Color::Red,    // ERROR
    Color::Red,    // CRITICAL
];

pub fn default_color(level: Level) -> Color {
    DEFAULT_LEVEL_COLORS[level.index()]
}

/// When records written to standard output get colored.
///
/// Files and custom writers are never colored regardless of the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    #[default]
    #[value(name = "always", help = "Always color standard output")]
    Always,
    #[value(name = "auto", help = "Color standard output when it is a terminal")]
    Auto,
    #[value(name = "never", help = "Never write escape sequences")]
    Never,
}

impl ColorMode {
    pub fn colors_stdout(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Auto => crate::tty::should_use_colors(),
            ColorMode::Never => false,
        }
    }
}
