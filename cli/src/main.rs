// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Graphene Signer
//!
//! Entry point for the `graphene-signer` binary. Parses CLI arguments,
//! initializes logging, resolves the chain configuration and dispatches to
//! a command handler.
//!
//! - `derive-key` - public key and address for a WIF
//! - `serialize`  - canonical hex, id and digest of a transaction
//! - `sign`       - cross-check against a captured node reference, then sign
//! - `verify`     - per-signature recovery report
//! - `version`    - print build version information

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::{Commands, LogFormatArg, SignerCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = SignerCli::parse();

    let format = match cli.global.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Json => LogFormat::Json,
    };
    logging::init_logging(&cli.global.log_level, format);

    if matches!(cli.command, Commands::Version) {
        print_version();
        return Ok(());
    }

    let config = commands::load_config(&cli.global)?;
    let output = match &cli.command {
        Commands::DeriveKey(args) => commands::derive_key(args, &config)?,
        Commands::Serialize(args) => commands::serialize(args, &config)?,
        Commands::Sign(args) => commands::sign(args, &config)?,
        Commands::Verify(args) => commands::verify(args, &config)?,
        Commands::Version => String::new(),
    };
    print!("{output}");
    Ok(())
}

fn print_version() {
    println!("graphene-signer {}", env!("CARGO_PKG_VERSION"));
    println!("rustc           {}", rustc_version());
}

fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
