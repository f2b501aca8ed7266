use std::process;

use anyhow::{self, format_err};
use clap::Parser;
use log4rs;

use aoconv::interfaces::cli::{log_heading, logger_config, write_template, Cli, Command};
use aoconv::interfaces::input::Input;
use aoconv::interfaces::InputHandle;
use aoconv::io::read_aoconv_yaml;

fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            config,
            output,
            debug,
        } => {
            log4rs::init_config(logger_config(output.as_deref(), debug)?)
                .map_err(|err| format_err!(err))?;
            log_heading();
            let input = read_aoconv_yaml::<Input, _>(&config)?;
            input.handle()
        }
        Command::Template { name } => {
            write_template(&name)?;
            let mut path = name;
            path.set_extension("yml");
            println!("Template configuration written to {}.", path.display());
            Ok(())
        }
    }
}

fn main() {
    if let Err(err) = run() {
        log::error!("{err}");
        eprintln!("aoconv: {err}");
        process::exit(1);
    }
}
