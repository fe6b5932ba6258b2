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

//! OLT connection credentials: CRUD plus the connect action that makes one
//! credential the single active device.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::Utc;
use model::credential::{OltCredential, Protocol};
use model::session::Session;
use olt_shell::{ConnectParams, SessionState};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{Action, require};
use crate::error::ApiError;
use crate::state::Api;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCredentialRequest {
    pub name: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default = "default_protocol")]
    pub protocol: Protocol,
}

fn default_port() -> u16 {
    22
}

fn default_protocol() -> Protocol {
    Protocol::Ssh
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCredentialRequest {
    pub name: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub protocol: Option<Protocol>,
}

pub async fn list(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<OltCredential>>, ApiError> {
    require(&session, Action::ViewOlt)?;
    let mut conn = api.pool.acquire().await?;
    Ok(Json(db::olt_credentials::find_all(&mut conn).await?))
}

pub async fn create(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
    Json(request): Json<CreateCredentialRequest>,
) -> Result<Json<OltCredential>, ApiError> {
    require(&session, Action::ConfigureOlt)?;
    if request.host.trim().is_empty() {
        return Err(ApiError::BadRequest("host must not be empty".to_string()));
    }

    let credential = OltCredential {
        id: Uuid::new_v4(),
        name: request.name,
        host: request.host,
        port: request.port,
        username: request.username,
        encrypted_password: api.cipher.encrypt(&request.password),
        protocol: request.protocol,
        is_active: false,
        is_connected: false,
        last_connected: None,
    };

    let mut conn = api.pool.acquire().await?;
    db::olt_credentials::persist(&credential, &mut conn).await?;
    Ok(Json(credential))
}

pub async fn update(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCredentialRequest>,
) -> Result<Json<OltCredential>, ApiError> {
    require(&session, Action::ConfigureOlt)?;

    let mut conn = api.pool.acquire().await?;
    let Some(mut credential) = db::olt_credentials::find_by_id(&mut conn, &id).await? else {
        return Err(ApiError::NotFound("credential not found".to_string()));
    };

    if let Some(name) = request.name {
        credential.name = name;
    }
    if let Some(host) = request.host {
        credential.host = host;
    }
    if let Some(port) = request.port {
        credential.port = port;
    }
    if let Some(username) = request.username {
        credential.username = username;
    }
    if let Some(password) = request.password {
        credential.encrypted_password = api.cipher.encrypt(&password);
    }
    if let Some(protocol) = request.protocol {
        credential.protocol = protocol;
    }

    db::olt_credentials::update(&credential, &mut conn).await?;
    Ok(Json(credential))
}

/// Deleting the active credential is allowed and forces a disconnect.
pub async fn remove(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require(&session, Action::ConfigureOlt)?;

    let mut conn = api.pool.acquire().await?;
    let Some(credential) = db::olt_credentials::find_by_id(&mut conn, &id).await? else {
        return Err(ApiError::NotFound("credential not found".to_string()));
    };
    if credential.is_active || credential.is_connected {
        tracing::info!(name = %credential.name, "deleting active credential, disconnecting");
        api.olt.disconnect();
    }
    db::olt_credentials::delete(&mut conn, &id).await?;
    Ok(Json(json!({ "success": true })))
}

/// Dial the device. Exactly one session may exist: a previous one is torn
/// down and its credential deactivated by `set_active`.
pub async fn connect(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require(&session, Action::ConfigureOlt)?;

    let mut conn = api.pool.acquire().await?;
    let Some(credential) = db::olt_credentials::find_by_id(&mut conn, &id).await? else {
        return Err(ApiError::NotFound("credential not found".to_string()));
    };
    if credential.protocol != Protocol::Ssh {
        return Err(ApiError::BadRequest(format!(
            "protocol {} is not operational, only ssh",
            credential.protocol
        )));
    }
    let password = api.cipher.decrypt(&credential.encrypted_password).map_err(|_| {
        ApiError::Internal(
            "stored password cannot be decrypted; re-save the credential".to_string(),
        )
    })?;

    api.olt
        .connect(&ConnectParams {
            host: credential.host.clone(),
            port: credential.port,
            username: credential.username.clone(),
            password,
        })
        .await?;

    let mut txn = api.pool.begin().await?;
    db::olt_credentials::set_active(&mut txn, &id).await?;
    db::olt_credentials::set_connected(&mut txn, &id, true, Some(Utc::now())).await?;
    txn.commit().await?;

    spawn_disconnect_watcher(&api, id);

    // Warm the projection in the background; the operator sees progress
    // through /api/olt/refresh/status.
    let olt = api.olt.clone();
    tokio::spawn(async move {
        if let Err(error) = olt.refresh_all().await {
            tracing::warn!(%error, "initial refresh after connect failed");
        }
    });

    tracing::info!(name = %credential.name, host = %credential.host, "OLT connected");
    Ok(Json(json!({ "connected": true })))
}

/// Flip `is_connected` off when the shell drops, however it drops.
fn spawn_disconnect_watcher(api: &Arc<Api>, credential_id: Uuid) {
    let Some(mut state_rx) = api.olt.session_state() else {
        return;
    };
    let pool = api.pool.clone();
    tokio::spawn(async move {
        loop {
            if *state_rx.borrow() == SessionState::Closed {
                break;
            }
            if state_rx.changed().await.is_err() {
                break;
            }
        }
        tracing::info!(%credential_id, "OLT session closed, clearing connected flag");
        match pool.acquire().await {
            Ok(mut conn) => {
                if let Err(error) =
                    db::olt_credentials::set_connected(&mut conn, &credential_id, false, None).await
                {
                    tracing::warn!(%error, "failed to clear connected flag");
                }
            }
            Err(error) => tracing::warn!(%error, "failed to clear connected flag"),
        }
    });
}
