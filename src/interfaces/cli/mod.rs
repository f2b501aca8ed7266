//! Command-line interface of the `aoconv` binary.

use std::path::{Path, PathBuf};

use anyhow::{self, format_err};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::interfaces::input::Input;
use crate::io::format::aoconv_output;
use crate::io::write_aoconv_yaml;


const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Logs the `aoconv` heading to the `aoconv-output` logger.
pub fn log_heading() {
    let version = if let Some(ver) = VERSION {
        format!("v{ver}")
    } else {
        "v unknown".to_string()
    };
    aoconv_output!("╭──────────────────────────────────────────────────────────────────────────────╮");
    aoconv_output!("│   aoconv: conversion of atomic-orbital basis-function ordering conventions   │");
    aoconv_output!("│{version:>77} │");
    aoconv_output!("╰──────────────────────────────────────────────────────────────────────────────╯");
    aoconv_output!("");
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Runs a convention conversion from a YAML configuration file.
    Run {
        /// The YAML configuration file.
        #[arg(short, long)]
        config: PathBuf,

        /// The output file. If absent, the output is written to standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also logs debugging messages to standard error.
        #[arg(short, long)]
        debug: bool,
    },

    /// Writes a template YAML configuration file.
    Template {
        /// The name of the template file (without the `.yml` extension).
        #[arg(short, long, default_value = "aoconv_template")]
        name: PathBuf,
    },
}

/// Builds the logging configuration of the binary.
///
/// Program output goes to the `aoconv-output` logger, which writes plain messages to `output` if
/// given or to standard output otherwise. All other records are written to standard error.
pub fn logger_config(output: Option<&Path>, debug: bool) -> Result<Config, anyhow::Error> {
    let output_appender = if let Some(path) = output {
        Appender::builder().build(
            "aoconv-output",
            Box::new(
                FileAppender::builder()
                    .encoder(Box::new(PatternEncoder::new("{m}{n}")))
                    .append(false)
                    .build(path)?,
            ),
        )
    } else {
        Appender::builder().build(
            "aoconv-output",
            Box::new(
                ConsoleAppender::builder()
                    .encoder(Box::new(PatternEncoder::new("{m}{n}")))
                    .build(),
            ),
        )
    };
    let stderr_appender = Appender::builder().build(
        "stderr",
        Box::new(
            ConsoleAppender::builder()
                .target(Target::Stderr)
                .encoder(Box::new(PatternEncoder::new("[{l}] {M}: {m}{n}")))
                .build(),
        ),
    );
    Config::builder()
        .appender(output_appender)
        .appender(stderr_appender)
        .logger(
            Logger::builder()
                .appender("aoconv-output")
                .additive(false)
                .build("aoconv-output", LevelFilter::Info),
        )
        .build(Root::builder().appender("stderr").build(if debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }))
        .map_err(|err| format_err!(err))
}

/// Writes the default input configuration as a YAML file.
pub fn write_template(name: &Path) -> Result<(), anyhow::Error> {
    write_aoconv_yaml(name, &Input::default())
}
