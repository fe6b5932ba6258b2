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
use model::port::GponPort;
use regex::Regex;

lazy_static! {
    static ref LONG_RE: Regex = Regex::new(
        r"^\s*(\d+\s*/\s*\d+\s*/\s*\d+)\s+(\d+)\s+(-?[\d.]+|NaN|-)\s+(-?[\d.]+|NaN|-)(?:\s+(-?[\d.]+|NaN|-))?(?:\s+(-?[\d.]+|NaN|-))?"
    )
    .expect("BUG: static optical regex must be valid");
    static ref SHORT_RE: Regex = Regex::new(
        r"^\s*(\d+)\s+(-?[\d.]+|NaN|-)\s+(-?[\d.]+|NaN|-)(?:\s+(-?[\d.]+|NaN|-))?(?:\s+(-?[\d.]+|NaN|-))?"
    )
    .expect("BUG: static short optical regex must be valid");
    static ref CONTEXT_RE: Regex = Regex::new(r"F/S/P\s*:?\s*(\d+\s*/\s*\d+\s*/\s*\d+)")
        .expect("BUG: static context regex must be valid");
}

/// Optical measurements for one ONT: `ont-id rx tx olt-rx temperature`,
/// with or without a leading `F/S/P` column.
#[derive(Debug, Clone, PartialEq)]
pub struct OpticalRow {
    pub port: Option<GponPort>,
    pub onu_id: u8,
    pub rx_power: Option<f64>,
    pub tx_power: Option<f64>,
    pub olt_rx_power: Option<f64>,
    pub temperature: Option<f64>,
}

/// `-` and `NaN` mean "no reading"; so does anything that fails to parse.
fn parse_power(raw: Option<&str>) -> Option<f64> {
    let raw = raw?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

pub fn parse_optical_info(text: &str) -> Vec<OpticalRow> {
    let mut rows = Vec::new();
    let mut context_port: Option<GponPort> = None;

    for line in text.lines() {
        if let Some(caps) = CONTEXT_RE.captures(line)
            && !LONG_RE.is_match(line)
        {
            context_port = caps[1].parse().ok();
            continue;
        }

        if let Some(caps) = LONG_RE.captures(line) {
            let Ok(port) = caps[1].parse::<GponPort>() else {
                continue;
            };
            let Ok(onu_id) = caps[2].parse::<u8>() else {
                continue;
            };
            rows.push(OpticalRow {
                port: Some(port),
                onu_id,
                rx_power: parse_power(caps.get(3).map(|m| m.as_str())),
                tx_power: parse_power(caps.get(4).map(|m| m.as_str())),
                olt_rx_power: parse_power(caps.get(5).map(|m| m.as_str())),
                temperature: parse_power(caps.get(6).map(|m| m.as_str())),
            });
        } else if let Some(caps) = SHORT_RE.captures(line) {
            let Ok(onu_id) = caps[1].parse::<u8>() else {
                continue;
            };
            rows.push(OpticalRow {
                port: context_port,
                onu_id,
                rx_power: parse_power(caps.get(2).map(|m| m.as_str())),
                tx_power: parse_power(caps.get(3).map(|m| m.as_str())),
                olt_rx_power: parse_power(caps.get(4).map(|m| m.as_str())),
                temperature: parse_power(caps.get(5).map(|m| m.as_str())),
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
    fn short_form_with_context() {
        let text = indoc! {"
            F/S/P: 0/1/0
            ONT-ID  Rx power(dBm)  Tx power(dBm)  OLT Rx ONT power(dBm)  Temperature(C)
            0       -18.52         2.31           -20.11                 45
            1       -              2.40           NaN                    41
        "};
        let rows = parse_optical_info(text);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].port.unwrap().to_string(), "0/1/0");
        assert_eq!(rows[0].onu_id, 0);
        assert_eq!(rows[0].rx_power, Some(-18.52));
        assert_eq!(rows[0].tx_power, Some(2.31));
        assert_eq!(rows[0].olt_rx_power, Some(-20.11));
        assert_eq!(rows[0].temperature, Some(45.0));

        // Dashes and NaN leave the reading undefined.
        assert_eq!(rows[1].rx_power, None);
        assert_eq!(rows[1].tx_power, Some(2.40));
        assert_eq!(rows[1].olt_rx_power, None);
    }

    #[test]
    fn long_form_rows() {
        let text = "  0/ 1/0  3  -17.01  2.05  -19.44  39\n";
        let rows = parse_optical_info(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].port.unwrap().to_string(), "0/1/0");
        assert_eq!(rows[0].onu_id, 3);
        assert_eq!(rows[0].temperature, Some(39.0));
    }

    #[test]
    fn rows_without_any_port_keep_none() {
        let rows = parse_optical_info("  5  -18.0  2.0\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].port, None);
        assert_eq!(rows[0].onu_id, 5);
    }
}
