// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Config --> Command Dispatch
//!   Version | SelfUpdate | Clone | Config
//! ```

use std::process::ExitCode;

use grit::cli::global::GlobalOptions;
use grit::cli::{self, Command};
use grit::cmd::clone::run_clone_command;
use grit::cmd::config::run_config_command;
use grit::cmd::self_update::run_self_update_command;
use grit::config::Config;
use grit::config::paths::default_config_path;
use grit::logging::init_logging;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let _log_guard = match init_logging(&cli.global.log_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::SelfUpdate(args)) => match load_config(&cli.global) {
            Ok(config) => run_self_update_command(args, &config).await,
            Err(e) => Err(e),
        },
        Some(Command::Clone(args)) => {
            load_config(&cli.global).and_then(|config| run_clone_command(args, &config))
        }
        Some(Command::Config(args)) => {
            let loader = Config::loader(cli.global.config.as_deref());
            let file = loader
                .file_in_use()
                .map_or_else(default_config_path, std::path::Path::to_path_buf);
            loader
                .build()
                .and_then(|config| run_config_command(args, &config, &file))
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn load_config(global: &GlobalOptions) -> grit::error::Result<Config> {
    Config::load(global.config.as_deref())
}
