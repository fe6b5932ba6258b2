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

use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::Utc;
use model::session::Session;
use model::user::{Role, User};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{Action, require};
use crate::error::ApiError;
use crate::state::Api;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub email: String,
}

pub async fn list(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<User>>, ApiError> {
    require(&session, Action::ManageUsers)?;
    let mut conn = api.pool.acquire().await?;
    Ok(Json(db::users::find_all(&mut conn).await?))
}

pub async fn create(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<User>, ApiError> {
    require(&session, Action::ManageUsers)?;
    if !session.role.may_create(request.role) {
        return Err(ApiError::Forbidden);
    }
    let username = request.username.trim();
    if username.is_empty() {
        return Err(ApiError::BadRequest("username must not be empty".to_string()));
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = pwhash::bcrypt::hash(&request.password)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?;
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        password_hash,
        role: request.role,
        email: request.email,
        active: true,
        created_at: Utc::now(),
        created_by: Some(session.user_id),
    };

    let mut conn = api.pool.acquire().await?;
    db::users::persist(&user, &mut conn).await?;
    tracing::info!(username = %user.username, role = %user.role, by = %session.username, "user created");
    Ok(Json(user))
}

pub async fn remove(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require(&session, Action::ManageUsers)?;
    if id == session.user_id {
        return Err(ApiError::BadRequest("cannot delete your own account".to_string()));
    }

    let mut conn = api.pool.acquire().await?;
    let Some(target) = db::users::find_by_id(&mut conn, &id).await? else {
        return Err(ApiError::NotFound("user not found".to_string()));
    };
    // Deletion follows the creation hierarchy: admins manage plain users,
    // only a super-admin touches admins.
    if !session.role.may_create(target.role) {
        return Err(ApiError::Forbidden);
    }

    db::users::delete(&mut conn, &id).await?;
    tracing::info!(username = %target.username, by = %session.username, "user deleted");
    Ok(Json(json!({ "success": true })))
}
