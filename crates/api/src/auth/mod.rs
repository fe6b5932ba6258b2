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

//! Session authentication and the static role/permission table.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use model::session::Session;
use model::user::Role;
use rand::Rng;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::Api;

/// Break-glass credential that bypasses the user table entirely.
pub const SUPER_ADMIN_AUTH: &str = "superadmin:Welcome123";

/// Synthetic user id for sessions of the built-in super-admin.
pub const SUPER_ADMIN_USER_ID: Uuid = Uuid::nil();

/// Header carrying the opaque session id.
pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ManageUsers,
    ConfigureOlt,
    ViewOlt,
    ManageOnus,
    ViewProfiles,
    ViewVlans,
}

/// The permission table: user management and OLT configuration are
/// administrative; everything else is open to every authenticated role.
pub fn allowed(role: Role, action: Action) -> bool {
    match action {
        Action::ManageUsers | Action::ConfigureOlt => {
            matches!(role, Role::SuperAdmin | Role::Admin)
        }
        Action::ViewOlt | Action::ManageOnus | Action::ViewProfiles | Action::ViewVlans => true,
    }
}

pub fn require(session: &Session, action: Action) -> Result<(), ApiError> {
    if allowed(session.role, action) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Opaque random 128-bit session id, hex encoded.
pub fn new_session_id() -> String {
    format!("{:032x}", rand::rng().random::<u128>())
}

/// Middleware in front of every route except login: resolve the
/// `x-session-id` header to a live session and stash it in the request
/// extensions. Expired sessions look exactly like missing ones.
pub async fn require_session(
    State(api): State<Arc<Api>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(session_id) = request
        .headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        return Err(ApiError::Unauthorized);
    };

    let mut conn = api.pool.acquire().await?;
    let Some(session) = db::sessions::find_valid_by_id(&mut conn, session_id).await? else {
        return Err(ApiError::Unauthorized);
    };

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_table() {
        use Action::*;
        for action in [ManageUsers, ConfigureOlt] {
            assert!(allowed(Role::SuperAdmin, action));
            assert!(allowed(Role::Admin, action));
            assert!(!allowed(Role::User, action));
        }
        for action in [ViewOlt, ManageOnus, ViewProfiles, ViewVlans] {
            for role in [Role::SuperAdmin, Role::Admin, Role::User] {
                assert!(allowed(role, action));
            }
        }
    }

    #[test]
    fn session_ids_are_opaque_hex() {
        let id = new_session_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_session_id());
    }
}
