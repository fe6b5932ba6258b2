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

//! Route table. Everything under `/api` except the login endpoint sits
//! behind the session middleware.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, patch, post};

use crate::auth::require_session;
use crate::state::Api;

mod auth;
mod credentials;
mod olt;
mod onu;
mod profiles;
mod users;

pub fn routes(api: Arc<Api>) -> Router {
    let authenticated = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", delete(users::remove))
        .route(
            "/olt/credentials",
            get(credentials::list).post(credentials::create),
        )
        .route(
            "/olt/credentials/{id}",
            patch(credentials::update).delete(credentials::remove),
        )
        .route("/olt/connect/{id}", post(credentials::connect))
        .route("/olt/info", get(olt::info))
        .route("/olt/refresh", post(olt::refresh))
        .route("/olt/refresh/status", get(olt::refresh_status))
        .route("/onu/unbound", get(onu::unbound))
        .route("/onu/unbound/count", get(onu::unbound_count))
        .route("/onu/bound", get(onu::bound))
        .route("/onu/validate", post(onu::validate))
        .route("/onu/verify/{sn}", get(onu::verify))
        .route("/onu/bind", post(onu::bind))
        .route("/onu/unbind", post(onu::unbind))
        .route("/onu/next-id", get(onu::next_id))
        .route("/profiles/line", get(profiles::line))
        .route("/profiles/service", get(profiles::service))
        .route("/profiles/refresh", post(profiles::refresh))
        .route("/vlans", get(profiles::vlans))
        .route("/vlans/refresh", post(profiles::refresh))
        .route("/tr069-profiles", get(profiles::tr069))
        .route("/gpon-ports", get(profiles::gpon_ports))
        .layer(middleware::from_fn_with_state(api.clone(), require_session));

    let api_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .merge(authenticated);

    Router::new().nest("/api", api_routes).with_state(api)
}
