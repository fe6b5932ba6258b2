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

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use chrono::Utc;
use model::session::{SESSION_TTL, Session};
use model::user::Role;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::{SUPER_ADMIN_AUTH, SUPER_ADMIN_USER_ID, new_session_id};
use crate::error::ApiError;
use crate::state::Api;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: SessionUser,
    pub session_id: String,
}

pub async fn login(
    State(api): State<Arc<Api>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let mut conn = api.pool.acquire().await?;

    // Opportunistic housekeeping; a failure here is not the caller's
    // problem.
    if let Err(error) = db::sessions::purge_expired(&mut conn).await {
        tracing::warn!(%error, "expired session purge failed");
    }

    let (user_id, username, role) = match SUPER_ADMIN_AUTH.split_once(':') {
        Some((user, pass)) if request.username == user && request.password == pass => {
            (SUPER_ADMIN_USER_ID, user.to_string(), Role::SuperAdmin)
        }
        _ => {
            let Some(user) = db::users::find_by_username(&mut conn, &request.username).await?
            else {
                return Err(ApiError::Unauthorized);
            };
            if !user.active || !pwhash::bcrypt::verify(&request.password, &user.password_hash) {
                return Err(ApiError::Unauthorized);
            }
            (user.id, user.username, user.role)
        }
    };

    let session = Session {
        id: new_session_id(),
        user_id,
        username: username.clone(),
        role,
        expires_at: Utc::now()
            + chrono::Duration::from_std(SESSION_TTL)
                .expect("BUG: static session TTL fits chrono"),
    };
    db::sessions::persist(&session, &mut conn).await?;

    tracing::info!(%username, %role, "login");
    Ok(Json(LoginResponse {
        user: SessionUser {
            id: user_id,
            username,
            role,
        },
        session_id: session.id,
    }))
}

pub async fn logout(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut conn = api.pool.acquire().await?;
    db::sessions::delete(&mut conn, &session.id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn me(Extension(session): Extension<Session>) -> Json<SessionUser> {
    Json(SessionUser {
        id: session.user_id,
        username: session.username,
        role: session.role,
    })
}
