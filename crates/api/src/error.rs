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

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use olt::OltError;
use serde_json::json;

/// Everything a handler can fail with, mapped onto the HTTP status space:
/// 401/403 for auth, 400 for validation and preconditions, 404/409 where
/// they mean something, 500 for CLI or infrastructure failure. The CLI
/// message travels verbatim in the `error` field.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("authentication required")]
    Unauthorized,
    #[error("permission denied")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<db::DatabaseError> for ApiError {
    fn from(error: db::DatabaseError) -> Self {
        if error.is_unique_violation() {
            ApiError::Conflict("a record with that name already exists".to_string())
        } else {
            ApiError::Internal(error.to_string())
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::Internal(error.to_string())
    }
}

impl From<OltError> for ApiError {
    fn from(error: OltError) -> Self {
        match error {
            OltError::NotConnected => {
                ApiError::BadRequest("no OLT connection is active".to_string())
            }
            OltError::Precondition(message) => ApiError::BadRequest(message),
            OltError::NoIdAvailable { .. } => ApiError::BadRequest(error.to_string()),
            OltError::NotFound(message) => ApiError::NotFound(message),
            OltError::Cli { .. }
            | OltError::Bind { .. }
            | OltError::Refresh(_)
            | OltError::Shell(_)
            | OltError::Connect(_) => ApiError::Internal(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use model::port::GponPort;

    use super::*;

    #[test]
    fn olt_errors_map_to_the_right_status() {
        let cases: Vec<(OltError, StatusCode)> = vec![
            (OltError::NotConnected, StatusCode::BAD_REQUEST),
            (
                OltError::Precondition("ONU is already bound".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                OltError::NoIdAvailable {
                    port: "0/1/0".parse::<GponPort>().unwrap(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                OltError::NotFound("nope".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                OltError::Cli {
                    command: "display x".to_string(),
                    message: "Unknown command".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                OltError::Refresh("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn cli_message_travels_verbatim() {
        let error = ApiError::from(OltError::Cli {
            command: "ont add 0 0".to_string(),
            message: "Error: The ONT does not exist".to_string(),
        });
        assert!(error.to_string().contains("Error: The ONT does not exist"));
    }
}
