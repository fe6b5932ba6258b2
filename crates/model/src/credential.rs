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

use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Protocol {
    Ssh,
    /// Carried in the data model for parity; connect rejects it.
    Telnet,
}

impl Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Ssh => f.write_str("ssh"),
            Protocol::Telnet => f.write_str("telnet"),
        }
    }
}

/// A stored OLT connection credential. The password is encrypted at rest
/// (AES-256-GCM keyed from `SESSION_SECRET`) and never serialized out.
/// Invariant: at most one credential has `is_active = true`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OltCredential {
    pub id: Uuid,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(skip_serializing)]
    pub encrypted_password: String,
    pub protocol: Protocol,
    pub is_active: bool,
    pub is_connected: bool,
    pub last_connected: Option<DateTime<Utc>>,
}

impl<'r> FromRow<'r, PgRow> for OltCredential {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let protocol =
            Protocol::from_str(row.try_get("protocol")?).map_err(|e| sqlx::Error::ColumnDecode {
                index: "protocol".to_string(),
                source: Box::new(e),
            })?;
        let port: i32 = row.try_get("port")?;
        let port = u16::try_from(port).map_err(|e| sqlx::Error::ColumnDecode {
            index: "port".to_string(),
            source: Box::new(e),
        })?;
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            host: row.try_get("host")?,
            port,
            username: row.try_get("username")?,
            encrypted_password: row.try_get("encrypted_password")?,
            protocol,
            is_active: row.try_get("is_active")?,
            is_connected: row.try_get("is_connected")?,
            last_connected: row.try_get("last_connected")?,
        })
    }
}
