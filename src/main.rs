// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolves the migration settings and reports where each value came from.
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=flagcfg=debug`).

use flagcfg::domain::ConfigError;
use flagcfg::service::Bootstrap;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Bootstrap::from_process().run() {
        Ok(None) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Ok(Some(loaded)) => {
            let config = &loaded.config;
            tracing::info!(
                "postgres {}:{} db={} pool={}/{}",
                config.postgres.host,
                config.postgres.port,
                config.postgres.db,
                config.postgres.conn_max_idle,
                config.postgres.conn_max_open
            );
            tracing::info!(
                "clickhouse {}:{} db={}",
                config.clickhouse.ip,
                config.clickhouse.port,
                config.clickhouse.name
            );
            tracing::info!(
                "migrating {} in batches of {}",
                config.migrate.tables.join(","),
                config.migrate.batch_size
            );
            for (name, origin) in loaded.provenance.iter() {
                println!("{} <- {}", name, origin);
            }
            if !loaded.positional.is_empty() {
                tracing::warn!("Ignoring arguments: {}", loaded.positional.join(" "));
            }
            ExitCode::SUCCESS
        }
        Err(ConfigError::HelpRequested { usage }) => {
            eprintln!("{}", usage);
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("Configuration failed: {}", e);
            eprintln!("[FATAL] {}", e);
            ExitCode::FAILURE
        }
    }
}
