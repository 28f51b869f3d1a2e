// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pictograph Animator command-line front-end.
//!
//! Loads sequences from PNG images (or raw JSON), answers pose queries,
//! steps through them at a fixed frame rate, and browses a sequence catalog.
//!
//! ## Architecture
//!
//! The binary is a thin shell: parsing and interpolation live in
//! `pictograph_animator_core`, file decoding and the catalog in
//! `pictograph_animator_library`.

mod cli;
mod commands;
mod config;

use clap::Parser;
use cli::Cli;
use config::{AnimatorConfig, CONFIG_FILE_NAME};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    tracing::debug!("Starting Pictograph Animator v{}", env!("CARGO_PKG_VERSION"));

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    let result = AnimatorConfig::load(&config_path)
        .map_err(commands::AppError::from)
        .and_then(|config| commands::execute(cli.command, &config, &config_path));

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

/// Install the fmt subscriber; `RUST_LOG` overrides the verbosity flags
fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,pictograph_animator={level},pictograph_animator_core={level},pictograph_animator_library={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
