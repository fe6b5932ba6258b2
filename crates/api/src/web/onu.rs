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

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use model::onu::{
    BindRequest, BoundOnu, MAX_ONU_ID, SerialNumber, UnbindRequest, UnboundOnu, VerifyReport,
};
use model::port::GponPort;
use model::session::Session;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{Action, require};
use crate::error::ApiError;
use crate::state::Api;

pub async fn unbound(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<UnboundOnu>>, ApiError> {
    require(&session, Action::ManageOnus)?;
    let snapshot = api.olt.snapshot();
    Ok(Json(snapshot.unbound_by_serial.values().cloned().collect()))
}

pub async fn unbound_count(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require(&session, Action::ManageOnus)?;
    let count = api.olt.snapshot().unbound_by_serial.len();
    Ok(Json(json!({ "count": count })))
}

pub async fn bound(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<BoundOnu>>, ApiError> {
    require(&session, Action::ManageOnus)?;
    let snapshot = api.olt.snapshot();
    Ok(Json(snapshot.bound_by_key.values().cloned().collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub serial_number: String,
}

pub async fn validate(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require(&session, Action::ManageOnus)?;
    let serial: SerialNumber = request
        .serial_number
        .parse()
        .map_err(|_| ApiError::BadRequest("serial number must be 16 hex digits".to_string()))?;
    api.olt.validate(&serial)?;
    Ok(Json(json!({ "valid": true })))
}

pub async fn verify(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
    Path(serial): Path<String>,
) -> Result<Json<VerifyReport>, ApiError> {
    require(&session, Action::ManageOnus)?;
    let serial: SerialNumber = serial
        .parse()
        .map_err(|_| ApiError::BadRequest("serial number must be 16 hex digits".to_string()))?;
    Ok(Json(api.olt.verify(&serial)))
}

pub async fn bind(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
    Json(request): Json<BindRequest>,
) -> Result<Json<BoundOnu>, ApiError> {
    require(&session, Action::ManageOnus)?;
    tracing::info!(
        serial = %request.serial_number,
        port = %request.port,
        by = %session.username,
        "bind requested"
    );
    Ok(Json(api.olt.bind(request).await?))
}

pub async fn unbind(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
    Json(request): Json<UnbindRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require(&session, Action::ManageOnus)?;
    tracing::info!(
        port = %request.port,
        onu_id = request.onu_id,
        clean_config = request.clean_config,
        by = %session.username,
        "unbind requested"
    );
    api.olt.unbind(request).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct NextIdQuery {
    pub port: String,
}

pub async fn next_id(
    State(api): State<Arc<Api>>,
    Extension(session): Extension<Session>,
    Query(query): Query<NextIdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require(&session, Action::ManageOnus)?;
    let port: GponPort = query
        .port
        .parse()
        .map_err(|_| ApiError::BadRequest("port must look like 0/1/0".to_string()))?;
    let next = api.olt.next_free_onu_id(port)?;
    Ok(Json(json!({ "nextId": next, "maxId": MAX_ONU_ID })))
}
