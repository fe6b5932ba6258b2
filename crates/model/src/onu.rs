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
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::port::GponPort;

/// Highest ONU id assignable on a single GPON port.
pub const MAX_ONU_ID: u8 = 127;

/// A GPON ONU serial number: exactly 16 hex digits, held uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SerialNumber(String);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid ONU serial number: {0:?}")]
pub struct SerialParseError(pub String);

impl SerialNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SerialNumber {
    type Err = SerialParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 16 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SerialParseError(s.to_string()));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }
}

impl Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for SerialNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SerialNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Operational state reported by `display ont info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    Online,
    Offline,
    Los,
    AuthFail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnuConfigState {
    Normal,
    Initial,
    Failed,
}

/// Authentication family used when binding. Huawei ONUs bind by serial over
/// OMCI; third-party ("general") ONUs authenticate by password without OMCI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnuType {
    Huawei,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PppoeCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiConfig {
    pub ssid: String,
    pub password: String,
}

/// An ONU the OLT has detected optically (autofind) but which is not yet
/// provisioned. Disappears on bind or operator dismissal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnboundOnu {
    pub serial_number: SerialNumber,
    pub port: GponPort,
    pub equipment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovered_at: Option<DateTime<Utc>>,
    /// Reported only by general (non-OMCI) devices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// A provisioned ONU. Keyed by (port, onu id); also indexed by serial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundOnu {
    /// Stable synthetic id of the form `<port>-<onu id>`.
    pub id: String,
    pub serial_number: SerialNumber,
    pub port: GponPort,
    pub onu_id: u8,
    pub description: String,
    pub line_profile_id: u16,
    pub service_profile_id: u16,
    pub run_status: RunStatus,
    pub config_state: OnuConfigState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_vlan_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemport_id: Option<u16>,
    pub bound_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pppoe: Option<PppoeCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi: Option<WifiConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tr069_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onu_type: Option<OnuType>,
}

impl BoundOnu {
    pub fn synthetic_id(port: GponPort, onu_id: u8) -> String {
        format!("{port}-{onu_id}")
    }

    pub fn key(&self) -> (GponPort, u8) {
        (self.port, self.onu_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindRequest {
    pub serial_number: SerialNumber,
    pub port: GponPort,
    pub line_profile_id: u16,
    pub service_profile_id: u16,
    pub description: String,
    #[serde(default)]
    pub vlan_id: Option<u16>,
    #[serde(default)]
    pub management_vlan_id: Option<u16>,
    #[serde(default)]
    pub pppoe: Option<PppoeCredentials>,
    #[serde(default)]
    pub tr069_profile: Option<String>,
    pub onu_type: OnuType,
    #[serde(default)]
    pub onu_password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnbindRequest {
    pub port: GponPort,
    pub onu_id: u8,
    /// Also purge service-ports and residual ONT configuration.
    #[serde(default)]
    pub clean_config: bool,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyState {
    Bound,
    Unbound,
    Unknown,
}

/// Non-mutating diagnostic for a serial number, served by `verify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReport {
    pub serial_number: SerialNumber,
    pub state: VerifyState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<GponPort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onu_id: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_attached: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serials_are_uppercased() {
        let sn: SerialNumber = "485754430a1b2c3d".parse().unwrap();
        assert_eq!(sn.as_str(), "485754430A1B2C3D");
    }

    #[test]
    fn serial_rejects_wrong_shape() {
        assert!("485754430A1B2C3".parse::<SerialNumber>().is_err());
        assert!("485754430A1B2C3DF".parse::<SerialNumber>().is_err());
        assert!("485754430A1B2C3G".parse::<SerialNumber>().is_err());
    }

    #[test]
    fn synthetic_id_shape() {
        let port: GponPort = "0/1/0".parse().unwrap();
        assert_eq!(BoundOnu::synthetic_id(port, 5), "0/1/0-5");
    }

    #[test]
    fn run_status_serializes_kebab() {
        assert_eq!(
            serde_json::to_string(&RunStatus::AuthFail).unwrap(),
            "\"auth-fail\""
        );
    }
}
