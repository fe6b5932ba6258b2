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

use model::user::User;
use sqlx::PgConnection;
use uuid::Uuid;

use super::DatabaseError;

pub async fn find_all(txn: &mut PgConnection) -> Result<Vec<User>, DatabaseError> {
    let query = "SELECT * FROM users ORDER BY created_at";
    sqlx::query_as(query)
        .fetch_all(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

pub async fn find_by_id(
    txn: &mut PgConnection,
    id: &Uuid,
) -> Result<Option<User>, DatabaseError> {
    let query = "SELECT * FROM users WHERE id = $1::uuid";
    sqlx::query_as(query)
        .bind(id)
        .fetch_optional(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

pub async fn find_by_username(
    txn: &mut PgConnection,
    username: &str,
) -> Result<Option<User>, DatabaseError> {
    let query = "SELECT * FROM users WHERE username = $1::varchar";
    sqlx::query_as(query)
        .bind(username)
        .fetch_optional(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

pub async fn persist(value: &User, txn: &mut PgConnection) -> Result<(), DatabaseError> {
    let query = "
INSERT INTO users (id, username, password_hash, role, email, active, created_at, created_by)
VALUES ($1::uuid, $2::varchar, $3::varchar, $4::varchar, $5::varchar, $6::bool, $7, $8)";
    sqlx::query(query)
        .bind(value.id)
        .bind(&value.username)
        .bind(&value.password_hash)
        .bind(value.role.to_string())
        .bind(&value.email)
        .bind(value.active)
        .bind(value.created_at)
        .bind(value.created_by)
        .execute(txn)
        .await
        .map(|_| ())
        .map_err(|e| DatabaseError::query(query, e))
}

pub async fn delete(txn: &mut PgConnection, id: &Uuid) -> Result<bool, DatabaseError> {
    let query = "DELETE FROM users WHERE id = $1::uuid";
    let result = sqlx::query(query)
        .bind(id)
        .execute(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))?;
    Ok(result.rows_affected() > 0)
}
