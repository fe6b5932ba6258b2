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
use model::olt_info::OltInfo;
use model::refresh::RefreshStatus;
use model::session::Session;

use crate::auth::{Action, require};
use crate::error::ApiError;
use crate::state::Api;

pub async fn info(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<OltInfo>, ApiError> {
    require(&session, Action::ViewOlt)?;
    let mut info = api
        .olt
        .snapshot()
        .olt_info
        .clone()
        .unwrap_or_default();
    info.connected = api.olt.is_connected();
    Ok(Json(info))
}

/// Explicit full refresh. Synchronous: the response carries the status
/// after the run, success or error.
pub async fn refresh(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<RefreshStatus>, ApiError> {
    require(&session, Action::ViewOlt)?;
    api.olt.clone().refresh_all().await?;
    Ok(Json(api.olt.refresh_status()))
}

pub async fn refresh_status(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<RefreshStatus>, ApiError> {
    require(&session, Action::ViewOlt)?;
    Ok(Json(api.olt.refresh_status()))
}
