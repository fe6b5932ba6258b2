/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

use std::path::Path;

use clap::CommandFactory;
use photon::{Command, Options, PhotonConfig};
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let options = Options::load();
    if options.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    setup_logging(options.debug);

    let sub_cmd = match &options.sub_cmd {
        None => {
            return Ok(Options::command().print_long_help()?);
        }
        Some(s) => s,
    };
    match sub_cmd {
        Command::Migrate(migrate) => {
            tracing::info!("Running migrations");
            let pool = PgPool::connect(&migrate.datastore).await?;
            db::migrations::migrate(&pool).await?;
        }
        Command::Run(daemon) => {
            let config = PhotonConfig::load(daemon.config_path.as_deref().map(Path::new))?;
            photon::run(config).await?;
        }
    }
    Ok(())
}

fn setup_logging(debug: u8) {
    let filter = if debug > 0 {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
