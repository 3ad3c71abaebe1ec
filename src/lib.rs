// src/lib.rs
pub mod call_site;
pub mod colors;
pub mod config;
pub mod destination;
pub mod error;
pub mod level;
pub mod logger;
pub mod macros;
pub mod tty;

pub use error::*;

pub use call_site::CallSite;
pub use colors::{color_code, Color, ColorMode, RESET_CODE, UNKNOWN_COLOR};
pub use config::{LoggerSettings, CTIME_FORMAT};
pub use destination::Destination;
pub use level::Level;
pub use logger::{emit, write_record, Logger};
