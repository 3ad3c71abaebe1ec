use std::fmt;

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Critical = 4,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Critical,
    ];

    /// Map a raw level index to a level, `None` outside 0..=4.
    pub fn from_index(index: i64) -> Option<Level> {
        match index {
            0 => Some(Level::Debug),
            1 => Some(Level::Info),
            2 => Some(Level::Warn),
            3 => Some(Level::Error),
            4 => Some(Level::Critical),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Name printed between the brackets of a record.
    pub fn name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }
}

impl From<Level> for i64 {
    fn from(level: Level) -> Self {
        level as i64
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index = parse_level_index(s)?;
        Level::from_index(index).ok_or_else(|| format!("Level out of range: {}", s))
    }
}

/// Parse a level name or integer without range-checking integers.
///
/// Out-of-range integers are left for the logger to diagnose and coerce.
pub fn parse_level_index(s: &str) -> Result<i64, String> {
    let trimmed = s.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n);
    }
    match trimmed.to_lowercase().as_str() {
        "debug" => Ok(0),
        "info" => Ok(1),
        "warn" | "warning" => Ok(2),
        "error" => Ok(3),
        "critical" => Ok(4),
        _ => Err(format!("Unknown log level: {}", s)),
    }
}
