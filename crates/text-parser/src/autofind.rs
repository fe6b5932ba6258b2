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

//! `display ont autofind <port>` comes in three shapes depending on
//! firmware: columnar rows leading with `F/S/P`, key-value blocks
//! (`Ont SN : ...`), and bare `index SN` tables. All three land here.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use model::onu::SerialNumber;
use model::port::GponPort;
use regex::Regex;

lazy_static! {
    static ref COLUMNAR_RE: Regex =
        Regex::new(r"^\s*(\d+\s*/\s*\d+\s*/\s*\d+)\s+([0-9A-Fa-f]{16})\b(.*)$")
            .expect("BUG: static autofind row regex must be valid");
    static ref KV_RE: Regex = Regex::new(r"^\s*([A-Za-z][A-Za-z/ ]*?)\s*:\s*(.*?)\s*$")
        .expect("BUG: static key-value regex must be valid");
    static ref INDEX_RE: Regex = Regex::new(r"^\s*\d+\s+([0-9A-Fa-f]{16})\b(.*)$")
        .expect("BUG: static index row regex must be valid");
    static ref SOFTWARE_RE: Regex =
        Regex::new(r"^V\d+R\d+C\d+\S*$").expect("BUG: static software regex must be valid");
}

/// One freshly discovered, not yet provisioned ONU.
#[derive(Debug, Clone, PartialEq)]
pub struct AutofindOnu {
    pub serial_number: SerialNumber,
    pub port: GponPort,
    pub equipment_id: String,
    pub software_version: Option<String>,
    pub discovered_at: Option<DateTime<Utc>>,
    pub password: Option<String>,
}

#[derive(Default)]
struct BlockAcc {
    port: Option<GponPort>,
    serial: Option<SerialNumber>,
    equipment_id: Option<String>,
    software_version: Option<String>,
    discovered_at: Option<DateTime<Utc>>,
    password: Option<String>,
}

impl BlockAcc {
    fn flush(
        &mut self,
        fallback_port: Option<GponPort>,
        seen: &mut BTreeSet<String>,
        out: &mut Vec<AutofindOnu>,
    ) {
        let acc = std::mem::take(self);
        let (Some(serial), Some(port)) = (acc.serial, acc.port.or(fallback_port)) else {
            return;
        };
        if !seen.insert(serial.as_str().to_string()) {
            return;
        }
        out.push(AutofindOnu {
            serial_number: serial,
            port,
            equipment_id: acc.equipment_id.unwrap_or_else(|| "Unknown".to_string()),
            software_version: acc.software_version,
            discovered_at: acc.discovered_at,
            password: acc.password,
        });
    }
}

/// Parse autofind output. `fallback_port` fills in the port for layouts
/// that omit it (the bare `index SN` table); rows with no determinable port
/// are skipped.
pub fn parse_autofind(text: &str, fallback_port: Option<GponPort>) -> Vec<AutofindOnu> {
    let mut out = Vec::new();
    let mut seen = BTreeSet::new();
    let mut block = BlockAcc::default();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.chars().all(|c| c == '-') {
            block.flush(fallback_port, &mut seen, &mut out);
            continue;
        }

        if let Some(caps) = COLUMNAR_RE.captures(line) {
            let Ok(port) = caps[1].parse::<GponPort>() else {
                continue;
            };
            let Ok(serial) = caps[2].parse::<SerialNumber>() else {
                continue;
            };
            if !seen.insert(serial.as_str().to_string()) {
                continue;
            }
            let rest: Vec<&str> = caps[3].split_whitespace().collect();
            let software_version = rest
                .iter()
                .find(|token| SOFTWARE_RE.is_match(token))
                .map(|token| token.to_string());
            let equipment_id = rest
                .first()
                .filter(|token| !SOFTWARE_RE.is_match(token))
                .map(|token| token.to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            out.push(AutofindOnu {
                serial_number: serial,
                port,
                equipment_id,
                software_version,
                discovered_at: None,
                password: None,
            });
            continue;
        }

        if let Some(caps) = KV_RE.captures(line) {
            let key = caps[1].trim();
            let value = caps[2].trim();
            if value.is_empty() {
                continue;
            }
            if key == "Number" {
                // Each discovery block opens with its number.
                block.flush(fallback_port, &mut seen, &mut out);
            } else if key == "F/S/P" {
                block.port = value.parse().ok();
            } else if key.ends_with("SN") {
                // `485754439D1FA342 (HWTC-9D1FA342)` -> take the hex part.
                let bare = value.split_whitespace().next().unwrap_or(value);
                block.serial = bare.parse().ok();
            } else if key.ends_with("EquipmentID") {
                block.equipment_id = Some(value.to_string());
            } else if key.ends_with("SoftwareVersion") {
                block.software_version = Some(value.to_string());
            } else if key.ends_with("autofind time") {
                block.discovered_at = parse_autofind_time(value);
            } else if key == "Password" {
                block.password = Some(value.to_string());
            }
            continue;
        }

        if fallback_port.is_some()
            && let Some(caps) = INDEX_RE.captures(line)
        {
            let Ok(serial) = caps[1].parse::<SerialNumber>() else {
                continue;
            };
            if !seen.insert(serial.as_str().to_string()) {
                continue;
            }
            let rest: Vec<&str> = caps[2].split_whitespace().collect();
            out.push(AutofindOnu {
                serial_number: serial,
                port: fallback_port.expect("BUG: checked above"),
                equipment_id: rest
                    .first()
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
                software_version: rest
                    .iter()
                    .find(|t| SOFTWARE_RE.is_match(t))
                    .map(|t| t.to_string()),
                discovered_at: None,
                password: None,
            });
        }
    }
    block.flush(fallback_port, &mut seen, &mut out);

    out
}

fn parse_autofind_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(with_offset.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn columnar_row_with_spaced_port() {
        let text = "  0/ 1/0 485754430A1B2C3D HG8310M HWTC V3R017C10S120\n";
        let found = parse_autofind(text, None);
        assert_eq!(found.len(), 1);
        let onu = &found[0];
        assert_eq!(onu.serial_number.as_str(), "485754430A1B2C3D");
        assert_eq!(onu.port.to_string(), "0/1/0");
        assert_eq!(onu.equipment_id, "HG8310M");
        assert_eq!(onu.software_version.as_deref(), Some("V3R017C10S120"));
    }

    #[test]
    fn key_value_blocks() {
        let text = indoc! {"
            ----------------------------------------------------------------------------
            Number              : 1
            F/S/P               : 0/1/0
            Ont SN              : 485754439D1FA342 (HWTC-9D1FA342)
            Password            : 0x303030303030
            VendorID            : HWTC
            Ont SoftwareVersion : V3R017C10S120
            Ont EquipmentID     : HG8310M
            Ont autofind time   : 2023-10-05 14:33:12+08:00
            ----------------------------------------------------------------------------
        "};
        let found = parse_autofind(text, None);
        assert_eq!(found.len(), 1);
        let onu = &found[0];
        assert_eq!(onu.serial_number.as_str(), "485754439D1FA342");
        assert_eq!(onu.port.to_string(), "0/1/0");
        assert_eq!(onu.equipment_id, "HG8310M");
        assert_eq!(onu.password.as_deref(), Some("0x303030303030"));
        let discovered = onu.discovered_at.expect("autofind time parsed");
        assert_eq!(discovered.to_rfc3339(), "2023-10-05T06:33:12+00:00");
    }

    #[test]
    fn index_table_uses_fallback_port() {
        let text = indoc! {"
            Index  SN
            1      485754430A1B2C3D
            2      485754439D1FA342
        "};
        let port: GponPort = "0/2/3".parse().unwrap();
        let found = parse_autofind(text, Some(port));
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|o| o.port == port));

        // Without a port context those rows are unusable.
        assert!(parse_autofind(text, None).is_empty());
    }

    #[test]
    fn duplicate_serials_discarded() {
        let text = indoc! {"
            0/1/0 485754430A1B2C3D HG8310M
            0/1/1 485754430A1B2C3D HG8310M
        "};
        assert_eq!(parse_autofind(text, None).len(), 1);
    }

    #[test]
    fn serials_uppercased() {
        let text = "0/1/0 485754430a1b2c3d HG8310M\n";
        let found = parse_autofind(text, None);
        assert_eq!(found[0].serial_number.as_str(), "485754430A1B2C3D");
    }
}
