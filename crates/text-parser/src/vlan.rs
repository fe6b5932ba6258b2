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

use std::str::FromStr;

use lazy_static::lazy_static;
use model::vlan::{Vlan, VlanKind};
use regex::Regex;

lazy_static! {
    static ref ROW_RE: Regex = Regex::new(
        r"(?i)^\s*(\d+)\s+(smart|mux|standard|super)\s+(\S+)(?:\s+(\d+))?(?:\s+(\d+))?(?:\s+(\d+))?"
    )
    .expect("BUG: static vlan row regex must be valid");
}

/// Parse `display vlan all`: rows of
/// `id type attribute [standard-ports] [service-ports] [vlan-connects]`.
///
/// Ids outside 1..=4094 and `super` VLANs (an aggregation construct this
/// plane does not manage) are skipped. `in_use` is seeded from the
/// service-port count column when the firmware prints one.
pub fn parse_vlans(text: &str) -> Vec<Vlan> {
    let mut vlans = Vec::new();
    for line in text.lines() {
        let Some(caps) = ROW_RE.captures(line) else {
            continue;
        };
        let Ok(id) = caps[1].parse::<u16>() else {
            continue;
        };
        if !Vlan::id_is_valid(id) {
            continue;
        }
        let Ok(kind) = VlanKind::from_str(&caps[2].to_ascii_lowercase()) else {
            continue;
        };
        let attribute = caps[3].to_ascii_lowercase();
        let tagged = attribute.contains("tag") && !attribute.contains("untag");
        let service_ports = caps
            .get(5)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0);
        vlans.push(Vlan {
            id,
            name: String::new(),
            description: String::new(),
            kind,
            tagged,
            in_use: service_ports > 0,
        });
    }
    vlans
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn rows_with_counts() {
        let text = indoc! {"
               VLAN ID  Type     Attribute  STND-Port NUM  SERV-Port NUM  VLAN-Con NUM
               -----------------------------------------------------------------------
                   100  smart    common            2              5             0
                   200  smart    tag               0              0             0
                   300  mux      untag             0              1             0
                  4093  standard common            0              0             0
        "};
        let vlans = parse_vlans(text);
        assert_eq!(vlans.len(), 4);

        assert_eq!(vlans[0].id, 100);
        assert_eq!(vlans[0].kind, VlanKind::Smart);
        assert!(!vlans[0].tagged);
        assert!(vlans[0].in_use);

        assert_eq!(vlans[1].id, 200);
        assert!(vlans[1].tagged);
        assert!(!vlans[1].in_use);

        assert_eq!(vlans[2].kind, VlanKind::Mux);
        assert!(!vlans[2].tagged);
        assert!(vlans[2].in_use);

        assert_eq!(vlans[3].kind, VlanKind::Standard);
    }

    #[test]
    fn out_of_range_and_super_rows_skipped() {
        let text = indoc! {"
            4095  smart  common  0  0  0
            0     smart  common  0  0  0
            500   super  common  0  0  0
        "};
        assert!(parse_vlans(text).is_empty());
    }
}
