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
use model::profile::{LineProfile, ServiceProfile, Tr069Profile};
use model::refresh::RefreshStatus;
use model::session::Session;
use model::vlan::Vlan;

use crate::auth::{Action, require};
use crate::error::ApiError;
use crate::state::Api;

pub async fn line(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<LineProfile>>, ApiError> {
    require(&session, Action::ViewProfiles)?;
    Ok(Json(api.olt.snapshot().line_profiles.clone()))
}

pub async fn service(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<ServiceProfile>>, ApiError> {
    require(&session, Action::ViewProfiles)?;
    Ok(Json(api.olt.snapshot().service_profiles.clone()))
}

pub async fn vlans(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<Vlan>>, ApiError> {
    require(&session, Action::ViewVlans)?;
    Ok(Json(api.olt.snapshot().vlans.clone()))
}

pub async fn tr069(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<Tr069Profile>>, ApiError> {
    require(&session, Action::ViewProfiles)?;
    Ok(Json(api.olt.snapshot().tr069_profiles.clone()))
}

/// Slot-scan result as plain `f/s/p` strings.
pub async fn gpon_ports(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<String>>, ApiError> {
    require(&session, Action::ViewOlt)?;
    Ok(Json(
        api.olt
            .snapshot()
            .gpon_ports
            .iter()
            .map(ToString::to_string)
            .collect(),
    ))
}

/// Profiles and VLANs are only refreshed together with everything else;
/// both refresh endpoints share this handler.
pub async fn refresh(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<RefreshStatus>, ApiError> {
    require(&session, Action::ViewProfiles)?;
    api.olt.clone().refresh_all().await?;
    Ok(Json(api.olt.refresh_status()))
}
