use anyhow::Context;
use clap::Parser;
use std::borrow::Cow;
use std::io::{self, BufRead};
use std::path::PathBuf;

use timber::level::parse_level_index;
use timber::{CallSite, ColorMode, Logger, LoggerSettings};

#[derive(Parser)]
#[command(name = "timber")]
#[command(about = "Write log records to stdout or a file")]
#[command(version)]
struct Args {
    /// Messages to log, one record each (default: one record per stdin line)
    #[arg(value_name = "MESSAGE")]
    messages: Vec<String>,

    /// Level of the records (name or 0-4)
    #[arg(short = 'l', long = "level", default_value = "info", value_parser = parse_level_index)]
    level: i64,

    /// Minimum level that gets written (name or 0-4)
    #[arg(short = 'm', long = "min-level", value_parser = parse_level_index)]
    min_level: Option<i64>,

    /// Log file, truncated on start (default: stdout)
    #[arg(short = 'o', long = "output")]
    output_file: Option<PathBuf>,

    /// YAML settings file; command line flags take precedence
    #[arg(short = 'c', long = "config")]
    config_file: Option<PathBuf>,

    /// Function name shown in each record
    #[arg(long, default_value = "main")]
    function: String,

    /// Line number shown in each record (default: position of the message)
    #[arg(long)]
    line: Option<u32>,

    /// Omit the timestamp
    #[arg(long)]
    no_timestamp: bool,

    /// Omit the function name
    #[arg(long)]
    no_function: bool,

    /// Omit the line number
    #[arg(long)]
    no_line: bool,

    /// When to color standard output
    #[arg(long, value_enum)]
    color: Option<ColorMode>,

    /// Debug mode - show setup details on stderr
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn settings(&self) -> anyhow::Result<LoggerSettings> {
        let mut settings = match &self.config_file {
            Some(path) => LoggerSettings::load(path)?,
            None => LoggerSettings::default(),
        };

        if let Some(min_level) = self.min_level {
            settings.min_level = timber::config::LevelSetting::Index(min_level);
        }
        if let Some(path) = &self.output_file {
            settings.file = Some(path.clone());
        }
        if let Some(color) = self.color {
            settings.color = color;
        }
        settings.show_timestamp &= !self.no_timestamp;
        settings.show_function &= !self.no_function;
        settings.show_line &= !self.no_line;

        Ok(settings)
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("timber: error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let settings = args.settings()?;
    let logger = Logger::from_settings(&settings).context("Failed to configure logger")?;

    if args.debug {
        eprintln!("timber: writing to {}", logger.destination());
        eprintln!("timber: minimum level {}", logger.min_level());
        eprintln!("timber: colored output {}", logger.is_colored());
    }

    if args.messages.is_empty() {
        if args.debug {
            eprintln!("timber: reading from stdin");
        }
        let stdin = io::stdin();
        for (i, bytes) in stdin.lock().split(b'\n').enumerate() {
            let bytes = match bytes {
                Ok(bytes) => bytes,
                Err(e) => {
                    logger.teardown();
                    return Err(e).context("Failed to read stdin");
                }
            };
            let site = CallSite::new(&args.function, args.line.unwrap_or_else(|| position(i)));
            logger.emit(args.level, site, &decode_line(&bytes));
        }
    } else {
        for (i, message) in args.messages.iter().enumerate() {
            let site = CallSite::new(&args.function, args.line.unwrap_or_else(|| position(i)));
            logger.emit(args.level, site, message);
        }
    }

    logger.teardown();
    Ok(())
}

/// 1-based line label for the `i`th message, saturating at `u32::MAX`.
fn position(i: usize) -> u32 {
    u32::try_from(i)
        .ok()
        .and_then(|n| n.checked_add(1))
        .unwrap_or(u32::MAX)
}

/// Strip the line terminator and replace invalid UTF-8 instead of failing.
fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes)
}
