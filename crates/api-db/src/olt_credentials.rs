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

use chrono::{DateTime, Utc};
use model::credential::OltCredential;
use sqlx::PgConnection;
use uuid::Uuid;

use super::DatabaseError;

pub async fn find_all(txn: &mut PgConnection) -> Result<Vec<OltCredential>, DatabaseError> {
    let query = "SELECT * FROM olt_credentials ORDER BY name";
    sqlx::query_as(query)
        .fetch_all(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

pub async fn find_by_id(
    txn: &mut PgConnection,
    id: &Uuid,
) -> Result<Option<OltCredential>, DatabaseError> {
    let query = "SELECT * FROM olt_credentials WHERE id = $1::uuid";
    sqlx::query_as(query)
        .bind(id)
        .fetch_optional(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

pub async fn persist(value: &OltCredential, txn: &mut PgConnection) -> Result<(), DatabaseError> {
    let query = "
INSERT INTO olt_credentials
    (id, name, host, port, username, encrypted_password, protocol,
     is_active, is_connected, last_connected)
VALUES ($1::uuid, $2::varchar, $3::varchar, $4::int, $5::varchar, $6::varchar,
        $7::varchar, $8::bool, $9::bool, $10)";
    sqlx::query(query)
        .bind(value.id)
        .bind(&value.name)
        .bind(&value.host)
        .bind(i32::from(value.port))
        .bind(&value.username)
        .bind(&value.encrypted_password)
        .bind(value.protocol.to_string())
        .bind(value.is_active)
        .bind(value.is_connected)
        .bind(value.last_connected)
        .execute(txn)
        .await
        .map(|_| ())
        .map_err(|e| DatabaseError::query(query, e))
}

/// Patch the editable fields. The caller passes the already-merged record.
pub async fn update(value: &OltCredential, txn: &mut PgConnection) -> Result<(), DatabaseError> {
    let query = "
UPDATE olt_credentials
SET name = $2::varchar, host = $3::varchar, port = $4::int,
    username = $5::varchar, encrypted_password = $6::varchar,
    protocol = $7::varchar
WHERE id = $1::uuid";
    sqlx::query(query)
        .bind(value.id)
        .bind(&value.name)
        .bind(&value.host)
        .bind(i32::from(value.port))
        .bind(&value.username)
        .bind(&value.encrypted_password)
        .bind(value.protocol.to_string())
        .execute(txn)
        .await
        .map(|_| ())
        .map_err(|e| DatabaseError::query(query, e))
}

/// Make one credential the single active one. Run inside a transaction:
/// the partial unique index on `is_active` forbids two active rows.
pub async fn set_active(txn: &mut PgConnection, id: &Uuid) -> Result<(), DatabaseError> {
    let clear = "UPDATE olt_credentials SET is_active = FALSE WHERE is_active";
    sqlx::query(clear)
        .execute(&mut *txn)
        .await
        .map_err(|e| DatabaseError::query(clear, e))?;

    let set = "UPDATE olt_credentials SET is_active = TRUE WHERE id = $1::uuid";
    sqlx::query(set)
        .bind(id)
        .execute(txn)
        .await
        .map(|_| ())
        .map_err(|e| DatabaseError::query(set, e))
}

pub async fn set_connected(
    txn: &mut PgConnection,
    id: &Uuid,
    connected: bool,
    last_connected: Option<DateTime<Utc>>,
) -> Result<(), DatabaseError> {
    let query = "
UPDATE olt_credentials
SET is_connected = $2::bool,
    last_connected = COALESCE($3, last_connected)
WHERE id = $1::uuid";
    sqlx::query(query)
        .bind(id)
        .bind(connected)
        .bind(last_connected)
        .execute(txn)
        .await
        .map(|_| ())
        .map_err(|e| DatabaseError::query(query, e))
}

pub async fn delete(txn: &mut PgConnection, id: &Uuid) -> Result<bool, DatabaseError> {
    let query = "DELETE FROM olt_credentials WHERE id = $1::uuid";
    let result = sqlx::query(query)
        .bind(id)
        .execute(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))?;
    Ok(result.rows_affected() > 0)
}

/// Everything is marked disconnected at service start: no shell survives a
/// process restart.
pub async fn clear_connected_flags(txn: &mut PgConnection) -> Result<(), DatabaseError> {
    let query = "UPDATE olt_credentials SET is_connected = FALSE WHERE is_connected";
    sqlx::query(query)
        .execute(txn)
        .await
        .map(|_| ())
        .map_err(|e| DatabaseError::query(query, e))
}
