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

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use model::port::GponPort;
use regex::Regex;

lazy_static! {
    static ref KV_RE: Regex = Regex::new(r"^\s*([A-Za-z/-][A-Za-z/ -]*?)\s*:\s*(.*?)\s*$")
        .expect("BUG: static key-value regex must be valid");
}

/// Per-ONT fields only the detail view reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OntDetail {
    pub description: Option<String>,
    pub line_profile_id: Option<u16>,
    pub service_profile_id: Option<u16>,
}

/// Pull per-ONT detail out of `display ont info <frame> all detail` blocks,
/// in which an `F/S/P :` line precedes `ONT-ID :` and, somewhere below,
/// `Description :` and the profile id lines.
pub fn parse_ont_details(text: &str) -> BTreeMap<(GponPort, u8), OntDetail> {
    let mut details: BTreeMap<(GponPort, u8), OntDetail> = BTreeMap::new();
    let mut port: Option<GponPort> = None;
    let mut onu_id: Option<u8> = None;

    for line in text.lines() {
        let Some(caps) = KV_RE.captures(line) else {
            continue;
        };
        let key = caps[1].trim();
        let value = caps[2].trim();
        if key == "F/S/P" {
            port = value.parse().ok();
            onu_id = None;
            continue;
        }
        if key == "ONT-ID" || key == "ONT ID" {
            onu_id = value.parse().ok();
            continue;
        }
        let (Some(port), Some(onu_id)) = (port, onu_id) else {
            continue;
        };
        if key == "Description" && !value.is_empty() {
            details.entry((port, onu_id)).or_default().description = Some(value.to_string());
        } else if key.eq_ignore_ascii_case("Line profile ID") {
            if let Ok(id) = value.parse() {
                details.entry((port, onu_id)).or_default().line_profile_id = Some(id);
            }
        } else if key.eq_ignore_ascii_case("Service profile ID") {
            if let Ok(id) = value.parse() {
                details.entry((port, onu_id)).or_default().service_profile_id = Some(id);
            }
        }
    }
    details
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn blocks_associate_by_port_and_id() {
        let text = indoc! {"
            F/S/P                   : 0/ 1/0
            ONT-ID                  : 0
            ONT Profile-ID          : 10
            Description             : Cust A
            Line profile ID         : 10
            Service profile ID      : 20
            ------------------------------------------------------
            F/S/P                   : 0/1/0
            ONT-ID                  : 1
            Description             : Cust B
            ------------------------------------------------------
            F/S/P                   : 0/1/1
            ONT-ID                  : 0
            Description             :
        "};
        let details = parse_ont_details(text);
        let port: GponPort = "0/1/0".parse().unwrap();

        let first = details.get(&(port, 0)).unwrap();
        assert_eq!(first.description.as_deref(), Some("Cust A"));
        assert_eq!(first.line_profile_id, Some(10));
        assert_eq!(first.service_profile_id, Some(20));

        let second = details.get(&(port, 1)).unwrap();
        assert_eq!(second.description.as_deref(), Some("Cust B"));
        assert_eq!(second.line_profile_id, None);

        // An empty description leaves no entry behind.
        let other: GponPort = "0/1/1".parse().unwrap();
        assert!(!details.contains_key(&(other, 0)));
    }

    #[test]
    fn detail_without_preceding_ids_is_ignored() {
        let text = "Description : orphaned\n";
        assert!(parse_ont_details(text).is_empty());
    }
}
