// src/bin/wekaenv.rs

use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use wekaenv::{
    cli::{Cli, dispatcher::Dispatcher},
    system::output::{ConsoleSink, SharedSink},
};

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    log::debug!("Raw args received by clap: {:?}", cli.args);

    let dispatcher = match Dispatcher::from_config() {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    };

    let sink: SharedSink = Arc::new(ConsoleSink);
    let success = dispatcher.dispatch(&cli.args, &sink);
    std::process::exit(if success { 0 } else { 1 });
}
