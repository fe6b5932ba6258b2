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

use lazy_static::lazy_static;
use model::onu::{OnuConfigState, RunStatus, SerialNumber};
use model::port::GponPort;
use regex::Regex;

lazy_static! {
    static ref LONG_RE: Regex = Regex::new(
        r"^\s*(\d+\s*/\s*\d+\s*/\s*\d+)\s+(\d+)\s+([0-9A-Fa-f]{16})\s+(\S+)\s+(\S+)\s+(\S+)(?:\s+(\S+))?"
    )
    .expect("BUG: static ont info regex must be valid");
    static ref SHORT_RE: Regex = Regex::new(
        r"^\s*(\d+)\s+([0-9A-Fa-f]{16})\s+(\S+)\s+(\S+)\s+(\S+)(?:\s+(\S+))?"
    )
    .expect("BUG: static short ont info regex must be valid");
}

/// One provisioned ONT as reported by `display ont info <port> all`:
/// `F/S/P ont-id SN control-flag run-state config-state match-state`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntInfoRow {
    pub port: GponPort,
    pub onu_id: u8,
    pub serial_number: SerialNumber,
    pub run_status: RunStatus,
    pub config_state: OnuConfigState,
    pub match_state: Option<String>,
}

fn run_status_from(raw: &str) -> RunStatus {
    let lower = raw.to_ascii_lowercase();
    if lower.contains("online") {
        RunStatus::Online
    } else if lower.contains("los") || lower.contains("dying") {
        RunStatus::Los
    } else {
        RunStatus::Offline
    }
}

fn config_state_from(raw: &str) -> OnuConfigState {
    let lower = raw.to_ascii_lowercase();
    if lower.contains("initial") {
        OnuConfigState::Initial
    } else if lower.contains("fail") {
        OnuConfigState::Failed
    } else {
        OnuConfigState::Normal
    }
}

/// Parse bound-ONT rows. `fallback_port` serves the short per-interface
/// layout that omits the `F/S/P` column.
pub fn parse_ont_info(text: &str, fallback_port: Option<GponPort>) -> Vec<OntInfoRow> {
    let mut rows = Vec::new();
    for line in text.lines() {
        if let Some(caps) = LONG_RE.captures(line) {
            let Ok(port) = caps[1].parse::<GponPort>() else {
                continue;
            };
            let Ok(onu_id) = caps[2].parse::<u8>() else {
                continue;
            };
            let Ok(serial_number) = caps[3].parse::<SerialNumber>() else {
                continue;
            };
            rows.push(OntInfoRow {
                port,
                onu_id,
                serial_number,
                run_status: run_status_from(&caps[5]),
                config_state: config_state_from(&caps[6]),
                match_state: caps.get(7).map(|m| m.as_str().to_string()),
            });
        } else if let Some(fallback) = fallback_port
            && let Some(caps) = SHORT_RE.captures(line)
        {
            let Ok(onu_id) = caps[1].parse::<u8>() else {
                continue;
            };
            let Ok(serial_number) = caps[2].parse::<SerialNumber>() else {
                continue;
            };
            rows.push(OntInfoRow {
                port: fallback,
                onu_id,
                serial_number,
                run_status: run_status_from(&caps[4]),
                config_state: config_state_from(&caps[5]),
                match_state: caps.get(6).map(|m| m.as_str().to_string()),
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn long_rows_with_state_mapping() {
        let text = indoc! {"
            -----------------------------------------------------------------------------
            F/S/P   ONT  SN                Control  Run      Config   Match
                    ID                     flag     state    state    state
            -----------------------------------------------------------------------------
            0/ 1/0    0  485754430A1B2C3D  active   online   normal   match
            0/ 1/0    1  485754439D1FA342  active   offline  initial  initial
            0/ 1/1    0  48575443AABBCCDD  active   dying-gasp  failed  match
        "};
        let rows = parse_ont_info(text, None);
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].port.to_string(), "0/1/0");
        assert_eq!(rows[0].onu_id, 0);
        assert_eq!(rows[0].run_status, RunStatus::Online);
        assert_eq!(rows[0].config_state, OnuConfigState::Normal);

        assert_eq!(rows[1].run_status, RunStatus::Offline);
        assert_eq!(rows[1].config_state, OnuConfigState::Initial);

        assert_eq!(rows[2].port.to_string(), "0/1/1");
        assert_eq!(rows[2].run_status, RunStatus::Los);
        assert_eq!(rows[2].config_state, OnuConfigState::Failed);
    }

    #[test]
    fn short_rows_need_port_context() {
        let text = "  0  485754430A1B2C3D  active  online  normal  match\n";
        assert!(parse_ont_info(text, None).is_empty());

        let port: GponPort = "0/1/0".parse().unwrap();
        let rows = parse_ont_info(text, Some(port));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].port, port);
        assert_eq!(rows[0].serial_number.as_str(), "485754430A1B2C3D");
    }

    #[test]
    fn garbage_rows_skipped() {
        let text = indoc! {"
            In port 0/1/0, the total of ONTs are: 2, online: 1
            0/1/0  300  485754430A1B2C3D  active  online  normal  match
        "};
        // ONT id 300 does not fit the id space; the row is dropped.
        assert!(parse_ont_info(text, None).is_empty());
    }
}
