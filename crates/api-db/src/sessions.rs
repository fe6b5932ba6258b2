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

use chrono::Utc;
use model::session::Session;
use sqlx::PgConnection;

use super::DatabaseError;

pub async fn persist(value: &Session, txn: &mut PgConnection) -> Result<(), DatabaseError> {
    let query = "
INSERT INTO sessions (id, user_id, username, role, expires_at)
VALUES ($1::varchar, $2::uuid, $3::varchar, $4::varchar, $5)";
    sqlx::query(query)
        .bind(&value.id)
        .bind(value.user_id)
        .bind(&value.username)
        .bind(value.role.to_string())
        .bind(value.expires_at)
        .execute(txn)
        .await
        .map(|_| ())
        .map_err(|e| DatabaseError::query(query, e))
}

/// Look a session up, ignoring expired rows. Expiry enforcement happens
/// here so a stale row behaves exactly like a missing one.
pub async fn find_valid_by_id(
    txn: &mut PgConnection,
    id: &str,
) -> Result<Option<Session>, DatabaseError> {
    let query = "SELECT * FROM sessions WHERE id = $1::varchar AND expires_at > $2";
    sqlx::query_as(query)
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

pub async fn delete(txn: &mut PgConnection, id: &str) -> Result<(), DatabaseError> {
    let query = "DELETE FROM sessions WHERE id = $1::varchar";
    sqlx::query(query)
        .bind(id)
        .execute(txn)
        .await
        .map(|_| ())
        .map_err(|e| DatabaseError::query(query, e))
}

/// Lazy housekeeping, run opportunistically at login time.
pub async fn purge_expired(txn: &mut PgConnection) -> Result<u64, DatabaseError> {
    let query = "DELETE FROM sessions WHERE expires_at <= $1";
    let result = sqlx::query(query)
        .bind(Utc::now())
        .execute(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))?;
    Ok(result.rows_affected())
}
