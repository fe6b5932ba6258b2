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
    static ref ROW_RE: Regex = Regex::new(r"^\s*(\d+)\s+(\S+)\s+(\S+)")
        .expect("BUG: static board row regex must be valid");
    static ref PORT_COUNT_RE: Regex =
        Regex::new(r"GP(\d+)").expect("BUG: static port count regex must be valid");
}

/// A GPON board without an explicit port count in its name still exposes
/// this many ports.
const DEFAULT_GPON_PORTS: u8 = 16;

/// Derive the GPON port list from `display board 0`: every healthy slot
/// whose board name carries a `GP` code contributes `0/<slot>/0..n` ports,
/// `n` taken from the board code (`GP08` -> 8) when present.
pub fn parse_board_ports(text: &str) -> Vec<GponPort> {
    let mut ports = Vec::new();
    for line in text.lines() {
        let Some(caps) = ROW_RE.captures(line) else {
            continue;
        };
        let Ok(slot) = caps[1].parse::<u8>() else {
            continue;
        };
        let board_name = &caps[2];
        let status = caps[3].to_ascii_lowercase();
        if !board_name.contains("GP") || !status.contains("normal") {
            continue;
        }
        let count = PORT_COUNT_RE
            .captures(board_name)
            .and_then(|c| c[1].parse::<u8>().ok())
            .filter(|count| (1..=64).contains(count))
            .unwrap_or(DEFAULT_GPON_PORTS);
        for port in 0..count {
            ports.push(GponPort::new(0, slot, port));
        }
    }
    ports
}
