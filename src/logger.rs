use crate::call_site::CallSite;
use crate::colors::{
    color_code, default_color, Color, ColorMode, DEFAULT_LEVEL_COLORS, UNKNOWN_COLOR,
};
use crate::config::{LoggerSettings, CTIME_FORMAT};
use crate::destination::Destination;
use crate::error::{report, ConfigError, LogError};
use crate::level::Level;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

/// Logger configuration and the destination it owns.
///
/// A logger is built once, passed by reference to every emit, and consumed by
/// [`Logger::teardown`]. It is single-threaded: custom writers live behind a
/// `RefCell`, so the type is not `Sync`.
#[derive(Debug)]
pub struct Logger {
    min_level: Level,
    destination: Destination,
    level_colors: [Color; 5],
    pub show_timestamp: bool,
    pub show_function: bool,
    pub show_line: bool,
    pub color_mode: ColorMode,
    /// chrono format string for the timestamp field
    pub time_format: String,
}

impl Logger {
    /// Log to `file_path` (truncated) or, when absent or empty, to stdout.
    ///
    /// Never fails: a minimum level outside 0..=4 is reported and coerced to
    /// `Info`, and a file that cannot be opened is reported here and again on
    /// every emit.
    pub fn init<L: Into<i64>>(min_level: L, file_path: Option<&Path>) -> Logger {
        let destination = match non_empty(file_path) {
            Some(path) => Destination::create(path).unwrap_or_else(|err| {
                report(&err);
                let reason = match &err {
                    LogError::Open { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                Destination::Invalid {
                    path: path.to_path_buf(),
                    reason,
                }
            }),
            None => Destination::Stdout,
        };
        Self::with_destination(min_level, destination)
    }

    /// Like [`Logger::init`], but a file that cannot be opened is an error.
    pub fn try_init<L: Into<i64>>(
        min_level: L,
        file_path: Option<&Path>,
    ) -> Result<Logger, LogError> {
        let destination = match non_empty(file_path) {
            Some(path) => Destination::create(path)?,
            None => Destination::Stdout,
        };
        Ok(Self::with_destination(min_level, destination))
    }

    /// Log to a caller-supplied writer. Writers are never colored.
    pub fn with_writer<L: Into<i64>>(min_level: L, writer: Box<dyn Write>) -> Logger {
        Self::with_destination(min_level, Destination::writer(writer))
    }

    pub fn with_destination<L: Into<i64>>(min_level: L, destination: Destination) -> Logger {
        let raw = min_level.into();
        let min_level = Level::from_index(raw).unwrap_or_else(|| {
            report(&LogError::InvalidMinLevel(raw));
            Level::Info
        });

        Logger {
            min_level,
            destination,
            level_colors: DEFAULT_LEVEL_COLORS,
            show_timestamp: true,
            show_function: true,
            show_line: true,
            color_mode: ColorMode::default(),
            time_format: CTIME_FORMAT.to_string(),
        }
    }

    pub fn from_settings(settings: &LoggerSettings) -> Result<Logger, ConfigError> {
        let min_level = settings.min_level.resolve()?;
        validate_time_format(&settings.time_format)?;
        let mut logger = Logger::init(min_level, settings.file.as_deref());

        logger.show_timestamp = settings.show_timestamp;
        logger.show_function = settings.show_function;
        logger.show_line = settings.show_line;
        logger.color_mode = settings.color;
        logger.time_format = settings.time_format.clone();
        for (level, color) in settings.colors.overrides() {
            logger.set_level_color(level, color);
        }

        Ok(logger)
    }

    /// Flush and close the destination. Standard output stays open.
    pub fn teardown(self) {
        if let Err(err) = self.destination.close() {
            report(&err);
        }
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn level_color(&self, level: Level) -> Color {
        self.level_colors[level.index()]
    }

    pub fn set_level_color(&mut self, level: Level, color: Color) {
        self.level_colors[level.index()] = color;
    }

    /// Set a level's color from raw indices, rejecting anything out of range.
    pub fn set_level_color_index(&mut self, level: i64, color: u8) -> Result<(), LogError> {
        let level = Level::from_index(level).ok_or(LogError::InvalidLevel(level))?;
        let color = Color::from_index(color).ok_or(LogError::InvalidColor(color))?;
        self.set_level_color(level, color);
        Ok(())
    }

    /// Restore the default color for every level.
    pub fn reset_level_colors(&mut self) {
        for level in Level::ALL {
            self.level_colors[level.index()] = default_color(level);
        }
    }

    /// Whether records written by this logger carry escape sequences.
    pub fn is_colored(&self) -> bool {
        self.destination.is_stdout() && self.color_mode.colors_stdout()
    }

    /// Format and write one record. Failures go to stderr, never to the caller.
    pub fn emit(&self, level: i64, site: CallSite<'_>, message: &str) {
        if let Err(err) = self.try_emit(level, site, message) {
            report(&err);
        }
    }

    pub fn log(&self, level: Level, site: CallSite<'_>, message: &str) {
        self.emit(level.into(), site, message);
    }

    /// The fallible core of [`Logger::emit`]. Records below the minimum level
    /// are dropped with `Ok(())`.
    pub fn try_emit(&self, level: i64, site: CallSite<'_>, message: &str) -> Result<(), LogError> {
        let level = Level::from_index(level).ok_or(LogError::InvalidLevel(level))?;
        let color = self.level_color(level);
        let code = color_code(color as u8);
        if code == UNKNOWN_COLOR {
            return Err(LogError::InvalidColor(color as u8));
        }

        if level < self.min_level {
            return Ok(());
        }

        let line = self.format_line(level, site, message);
        let code = self.is_colored().then_some(code);
        self.destination
            .with_stream(|out| write_record(out, code, &line))
    }

    /// The uncolored record line, trailing newline included.
    pub fn format_line(&self, level: Level, site: CallSite<'_>, message: &str) -> String {
        self.format_line_at(Local::now(), level, site, message)
    }

    pub fn format_line_at(
        &self,
        now: DateTime<Local>,
        level: Level,
        site: CallSite<'_>,
        message: &str,
    ) -> String {
        format!("{} [{}]: {}\n", self.format_prefix_at(now, site), level.name(), message)
    }

    /// Timestamp, function and line fields, each only when enabled.
    ///
    /// Fields are concatenated without separators; the default timestamp ends
    /// in a newline, so it sits on its own line above the rest of the record.
    pub fn format_prefix_at(&self, now: DateTime<Local>, site: CallSite<'_>) -> String {
        let mut prefix = String::new();

        if self.show_timestamp {
            let mut timestamp = String::new();
            if write!(timestamp, "{}", now.format(&self.time_format)).is_err() {
                timestamp = now.format(CTIME_FORMAT).to_string();
            }
            prefix.push_str(&timestamp);
        }
        if self.show_function {
            let _ = write!(prefix, "In Function: {}() ", site.function);
        }
        if self.show_line {
            let _ = write!(prefix, "At Line: {}", site.line);
        }

        prefix
    }
}

/// Emit through an optional logger; a missing logger is reported and ignored.
pub fn emit(logger: Option<&Logger>, level: i64, site: CallSite<'_>, message: &str) {
    match logger {
        Some(logger) => logger.emit(level, site, message),
        None => report(&LogError::MissingLogger),
    }
}

/// Write a record line, wrapped in `color` and followed by a separate reset
/// write when a color is given.
pub fn write_record<W: Write + ?Sized>(
    out: &mut W,
    color: Option<&str>,
    line: &str,
) -> io::Result<()> {
    match color {
        Some(code) => {
            out.write_all(code.as_bytes())?;
            out.write_all(line.as_bytes())?;
            out.flush()?;
            out.write_all(Color::AnsiReset.code().as_bytes())
        }
        None => out.write_all(line.as_bytes()),
    }
}

/// Reject chrono format strings that cannot be rendered.
pub fn validate_time_format(format: &str) -> Result<(), ConfigError> {
    let mut rendered = String::new();
    write!(rendered, "{}", Local::now().format(format))
        .map_err(|_| ConfigError::Invalid(format!("Invalid time format: {:?}", format)))
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Capture(Rc<RefCell<Vec<u8>>>);

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_logger(min_level: Level) -> (Logger, Capture) {
        let capture = Capture::default();
        let logger = Logger::with_writer(min_level, Box::new(capture.clone()));
        (logger, capture)
    }

    fn site() -> CallSite<'static> {
        CallSite::new("main", 42)
    }

    #[test]
    fn test_defaults() {
        let logger = Logger::init(Level::Warn, None);
        assert_eq!(logger.min_level(), Level::Warn);
        assert!(logger.destination().is_stdout());
        assert!(logger.show_timestamp && logger.show_function && logger.show_line);
        assert_eq!(logger.level_color(Level::Info), Color::Cyan);
        assert_eq!(logger.color_mode, ColorMode::Always);
    }

    #[test]
    fn test_out_of_range_min_level_coerced_to_info() {
        assert_eq!(Logger::init(5, None).min_level(), Level::Info);
        assert_eq!(Logger::init(-3, None).min_level(), Level::Info);
        assert_eq!(Logger::init(0, None).min_level(), Level::Debug);
    }

    #[test]
    fn test_empty_path_means_stdout() {
        let logger = Logger::init(0, Some(Path::new("")));
        assert!(logger.destination().is_stdout());
    }

    #[test]
    fn test_threshold_filtering() {
        for min in Level::ALL {
            for level in Level::ALL {
                let (logger, capture) = capture_logger(min);
                logger.log(level, site(), "msg");
                assert_eq!(
                    !capture.text().is_empty(),
                    level >= min,
                    "level {:?} with minimum {:?}",
                    level,
                    min
                );
            }
        }
    }

    #[test]
    fn test_all_fields_off() {
        let (mut logger, capture) = capture_logger(Level::Debug);
        logger.show_timestamp = false;
        logger.show_function = false;
        logger.show_line = false;

        logger.log(Level::Error, site(), "boom");
        assert_eq!(capture.text(), " [ERROR]: boom\n");
    }

    #[test]
    fn test_function_and_line_fields() {
        let (mut logger, capture) = capture_logger(Level::Debug);
        logger.show_timestamp = false;

        logger.log(Level::Warn, site(), "disk low");
        assert_eq!(
            capture.text(),
            "In Function: main() At Line: 42 [WARNING]: disk low\n"
        );
    }

    #[test]
    fn test_each_toggle_removes_only_its_field() {
        let now = Local.with_ymd_and_hms(2024, 1, 5, 9, 3, 7).unwrap();
        let (mut logger, _) = capture_logger(Level::Debug);

        let full = logger.format_line_at(now, Level::Info, site(), "m");
        assert_eq!(
            full,
            "Fri Jan  5 09:03:07 2024\nIn Function: main() At Line: 42 [INFO]: m\n"
        );

        logger.show_timestamp = false;
        assert_eq!(
            logger.format_line_at(now, Level::Info, site(), "m"),
            "In Function: main() At Line: 42 [INFO]: m\n"
        );

        logger.show_timestamp = true;
        logger.show_function = false;
        assert_eq!(
            logger.format_line_at(now, Level::Info, site(), "m"),
            "Fri Jan  5 09:03:07 2024\nAt Line: 42 [INFO]: m\n"
        );

        logger.show_function = true;
        logger.show_line = false;
        assert_eq!(
            logger.format_line_at(now, Level::Info, site(), "m"),
            "Fri Jan  5 09:03:07 2024\nIn Function: main()  [INFO]: m\n"
        );
    }

    #[test]
    fn test_custom_time_format() {
        let now = Local.with_ymd_and_hms(2024, 1, 5, 9, 3, 7).unwrap();
        let (mut logger, _) = capture_logger(Level::Debug);
        logger.time_format = "%H:%M:%S ".to_string();
        logger.show_function = false;
        logger.show_line = false;

        assert_eq!(
            logger.format_line_at(now, Level::Debug, site(), "tick"),
            "09:03:07  [DEBUG]: tick\n"
        );
    }

    #[test]
    fn test_bad_time_format_falls_back_to_ctime() {
        let now = Local.with_ymd_and_hms(2024, 1, 5, 9, 3, 7).unwrap();
        let (mut logger, _) = capture_logger(Level::Debug);
        logger.time_format = "%Q".to_string();
        logger.show_function = false;
        logger.show_line = false;

        assert_eq!(
            logger.format_line_at(now, Level::Info, site(), "m"),
            "Fri Jan  5 09:03:07 2024\n [INFO]: m\n"
        );
    }

    #[test]
    fn test_from_settings_rejects_bad_time_format() {
        let settings = LoggerSettings::from_yaml("time_format: \"%Q\"\n").unwrap();
        assert!(matches!(
            Logger::from_settings(&settings),
            Err(ConfigError::Invalid(msg)) if msg.contains("%Q")
        ));

        assert!(validate_time_format(CTIME_FORMAT).is_ok());
        assert!(validate_time_format("%H:%M:%S ").is_ok());
    }

    #[test]
    fn test_writer_output_has_no_escape_codes() {
        let (logger, capture) = capture_logger(Level::Debug);
        for level in Level::ALL {
            logger.log(level, site(), "plain");
        }
        assert_eq!(capture.text().lines().filter(|l| l.contains("]: plain")).count(), 5);
        assert!(!capture.text().contains("\x1b["));
        assert!(!logger.is_colored());
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let (logger, capture) = capture_logger(Level::Debug);
        assert!(matches!(
            logger.try_emit(5, site(), "x"),
            Err(LogError::InvalidLevel(5))
        ));
        logger.emit(-1, site(), "x");
        assert!(capture.text().is_empty());
    }

    #[test]
    fn test_below_threshold_is_silent_ok() {
        let (logger, capture) = capture_logger(Level::Error);
        assert!(logger.try_emit(0, site(), "quiet").is_ok());
        assert!(capture.text().is_empty());
    }

    #[test]
    fn test_set_level_color_index_validates() {
        let (mut logger, _) = capture_logger(Level::Debug);
        logger.set_level_color_index(0, 3).unwrap();
        assert_eq!(logger.level_color(Level::Debug), Color::Blue);

        assert!(matches!(
            logger.set_level_color_index(0, 8),
            Err(LogError::InvalidColor(8))
        ));
        assert!(matches!(
            logger.set_level_color_index(9, 1),
            Err(LogError::InvalidLevel(9))
        ));
        assert_eq!(logger.level_color(Level::Debug), Color::Blue);

        logger.reset_level_colors();
        assert_eq!(logger.level_color(Level::Debug), Color::Green);
    }

    #[test]
    fn test_write_record_colored() {
        let mut out = Vec::new();
        write_record(
            &mut out,
            Some(Color::Yellow.code()),
            "At Line: 42 [WARNING]: disk low\n",
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\x1b[33mAt Line: 42 [WARNING]: disk low\n\x1b[0m"
        );
    }

    #[test]
    fn test_write_record_plain() {
        let mut out = Vec::new();
        write_record(&mut out, None, " [INFO]: hi\n").unwrap();
        assert_eq!(out, b" [INFO]: hi\n");
    }

    #[test]
    fn test_color_mode_never_disables_stdout_color() {
        let mut logger = Logger::init(Level::Debug, None);
        assert!(logger.is_colored());
        logger.color_mode = ColorMode::Never;
        assert!(!logger.is_colored());
    }

    #[test]
    fn test_missing_logger_does_not_panic() {
        emit(None, 1, site(), "nobody listens");
    }

    #[test]
    fn test_file_round_trip_after_teardown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");

        let mut logger = Logger::init(Level::Info, Some(path.as_path()));
        logger.show_timestamp = false;
        logger.log(Level::Info, site(), "first");
        logger.log(Level::Debug, site(), "hidden");
        logger.log(Level::Critical, site(), "last");
        logger.teardown();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "In Function: main() At Line: 42 [INFO]: first\n\
             In Function: main() At Line: 42 [CRITICAL]: last\n"
        );
    }

    #[test]
    fn test_unopenable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("app.log");

        assert!(matches!(
            Logger::try_init(Level::Info, Some(path.as_path())),
            Err(LogError::Open { .. })
        ));

        let logger = Logger::init(Level::Info, Some(path.as_path()));
        assert!(!logger.destination().is_valid());
        assert!(matches!(
            logger.try_emit(Level::Error.into(), site(), "lost"),
            Err(LogError::InvalidDestination(_))
        ));
    }

    #[test]
    fn test_from_settings() {
        let settings = LoggerSettings::from_yaml(
            "min_level: error\nshow_line: false\ncolor: never\ncolors:\n  error: magenta\n",
        )
        .unwrap();
        let logger = Logger::from_settings(&settings).unwrap();

        assert_eq!(logger.min_level(), Level::Error);
        assert!(!logger.show_line);
        assert!(logger.show_function);
        assert_eq!(logger.color_mode, ColorMode::Never);
        assert_eq!(logger.level_color(Level::Error), Color::Magenta);
        assert_eq!(logger.level_color(Level::Critical), Color::Red);
    }
}
