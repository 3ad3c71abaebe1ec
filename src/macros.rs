//! Logging macros that capture the calling function and line.
//!
//! ```no_run
//! use timber::{Level, Logger};
//!
//! let logger = Logger::init(Level::Info, None);
//! timber::warn!(logger, "disk low: {}%", 93);
//! timber::log!(&logger, Level::Critical, "shutting down");
//! logger.teardown();
//! ```

use crate::logger::Logger;
use std::borrow::Borrow;

#[doc(hidden)]
pub fn as_logger<L: Borrow<Logger> + ?Sized>(logger: &L) -> &Logger {
    logger.borrow()
}

/// Log a formatted message at `level` (a [`Level`](crate::Level) or raw index).
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::emit(
            ::core::option::Option::Some($crate::macros::as_logger(&$logger)),
            ::core::convert::Into::<i64>::into($level),
            $crate::call_site!(),
            &::std::format!($($arg)+),
        )
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($arg)+)
    };
}
