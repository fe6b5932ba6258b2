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

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VlanKind {
    Smart,
    Mux,
    Standard,
}

impl Display for VlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VlanKind::Smart => f.write_str("smart"),
            VlanKind::Mux => f.write_str("mux"),
            VlanKind::Standard => f.write_str("standard"),
        }
    }
}

/// A VLAN known to the OLT. `in_use` means "has ever carried a
/// service-port": it is set when a bind first attaches the VLAN and never
/// cleared, because one VLAN commonly serves many ONUs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vlan {
    /// 1..=4094.
    pub id: u16,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: VlanKind,
    pub tagged: bool,
    pub in_use: bool,
}

impl Vlan {
    pub fn id_is_valid(id: u16) -> bool {
        (1..=4094).contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn kind_parses_device_tags() {
        assert_eq!(VlanKind::from_str("smart").unwrap(), VlanKind::Smart);
        assert_eq!(VlanKind::from_str("mux").unwrap(), VlanKind::Mux);
        assert_eq!(VlanKind::from_str("standard").unwrap(), VlanKind::Standard);
        assert!(VlanKind::from_str("super").is_err());
    }

    #[test]
    fn id_bounds() {
        assert!(!Vlan::id_is_valid(0));
        assert!(Vlan::id_is_valid(1));
        assert!(Vlan::id_is_valid(4094));
        assert!(!Vlan::id_is_valid(4095));
    }
}
