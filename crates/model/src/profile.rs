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

use serde::{Deserialize, Serialize};

/// GPON line profile (`display ont-lineprofile gpon all`). The summary
/// listing only carries id and name; T-CONT/GEM details are filled in when
/// the per-profile view has been fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineProfile {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcont_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gem_port_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_mode: Option<String>,
}

/// GPON service profile (`display ont-srvprofile gpon all`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProfile {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_count: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_type: Option<String>,
}

/// TR-069 ACS profile used to point bound ONUs at an auto-configuration
/// server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tr069Profile {
    pub id: u16,
    /// Alphanumeric plus underscore.
    pub name: String,
    pub acs_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periodic_inform_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
