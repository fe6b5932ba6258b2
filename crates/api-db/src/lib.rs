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

//! Database functions for photon-api. Plain SQL over `PgConnection`; the
//! handlers own transactions where an operation spans statements.

pub mod migrations;
pub mod olt_credentials;
pub mod sessions;
pub mod users;

#[derive(thiserror::Error, Debug)]
pub enum DatabaseError {
    #[error("query failed: {source} (query: {query})")]
    Query {
        query: String,
        source: sqlx::Error,
    },
}

impl DatabaseError {
    pub fn query(query: &str, source: sqlx::Error) -> Self {
        Self::Query {
            query: query.to_string(),
            source,
        }
    }

    /// Unique-constraint violation, e.g. a duplicate username. Handlers map
    /// this to 409 rather than 500.
    pub fn is_unique_violation(&self) -> bool {
        let DatabaseError::Query { source, .. } = self;
        matches!(
            source,
            sqlx::Error::Database(db) if db.is_unique_violation()
        )
    }
}
