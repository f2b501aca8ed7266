//! Formatted `aoconv` output.

use std::fmt;

use log;

const AOCONV_BANNER_LENGTH: usize = 80;

/// Logs an error to the `aoconv-output` logger as well as the main logger.
macro_rules! aoconv_error {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        log::error!($fmt, $($($arg)*)?);
        log::error!(target: "aoconv-output", $fmt, $($($arg)*)?);
    }
}

/// Logs a warning to the `aoconv-output` logger.
macro_rules! aoconv_warn {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::warn!(target: "aoconv-output", $fmt, $($($arg)*)?); }
}

/// Logs a main output line to the `aoconv-output` logger.
macro_rules! aoconv_output {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::info!(target: "aoconv-output", $fmt, $($($arg)*)?); }
}

pub(crate) use {aoconv_error, aoconv_output, aoconv_warn};

/// Logs a boxed section title to the `aoconv-output` logger.
pub(crate) fn log_title(title: &str) {
    let length = title.chars().count().max(AOCONV_BANNER_LENGTH - 6);
    let bar = "─".repeat(length);
    aoconv_output!("┌──{bar}──┐");
    aoconv_output!("│§ {title:^length$} §│");
    aoconv_output!("└──{bar}──┘");
}

/// Logs an underlined subtitle to the `aoconv-output` logger.
pub(crate) fn log_subtitle(subtitle: &str) {
    let bar = "═".repeat(subtitle.chars().count());
    aoconv_output!("{}", subtitle);
    aoconv_output!("{}", bar);
}

/// Turns a boolean into a string of `yes` or `no`.
pub(crate) fn nice_bool(b: bool) -> String {
    if b {
        "yes".to_string()
    } else {
        "no".to_string()
    }
}

/// A trait for logging the displays of `aoconv` structures line by line.
pub(crate) trait AOConvOutput: fmt::Display {
    /// Logs display output.
    fn log_output_display(&self) {
        self.to_string().lines().for_each(|line| {
            aoconv_output!("{line}");
        })
    }
}

// Blanket implementation
impl<T> AOConvOutput for T where T: fmt::Display {}
