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

//! photon-api: the REST management plane in front of one Huawei GPON OLT.
//! Durable state (users, sessions, credentials) lives in Postgres; the
//! device projection lives in memory and is rebuilt by refresh.

use std::sync::Arc;

use photon_secrets::PasswordCipher;
use sqlx::PgPool;

pub mod auth;
pub mod cfg;
pub mod error;
pub mod state;
pub mod web;

pub use cfg::command_line::{Command, Options};
pub use cfg::file::PhotonConfig;

use crate::state::Api;

/// Bring the whole service up and serve until the process dies.
pub async fn run(config: PhotonConfig) -> eyre::Result<()> {
    let database_url = config.database_url()?.to_string();
    let session_secret = config.session_secret()?.to_string();

    let pool = PgPool::connect(&database_url).await?;
    db::migrations::migrate(&pool).await?;
    {
        // No shell survives a restart; make the table say so.
        let mut conn = pool.acquire().await?;
        db::olt_credentials::clear_connected_flags(&mut conn).await?;
    }

    let olt = Arc::new(olt::OltManager::new());
    let _refresh_task = olt.clone().spawn_periodic_refresh(config.refresh_interval);

    let api = Arc::new(Api {
        pool,
        olt,
        cipher: PasswordCipher::from_secret(&session_secret),
    });
    let app = web::routes(api);

    let listener = tokio::net::TcpListener::bind(config.listen_address).await?;
    tracing::info!(address = %config.listen_address, "photon-api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
