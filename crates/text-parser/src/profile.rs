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

//! `display ont-lineprofile gpon all`, `display ont-srvprofile gpon all`
//! and `display tr069-server-profile all` share the same `id name` table
//! shape; the TR-069 listing additionally carries per-profile detail lines.

use lazy_static::lazy_static;
use model::profile::{LineProfile, ServiceProfile, Tr069Profile};
use regex::Regex;

lazy_static! {
    static ref ROW_RE: Regex = Regex::new(r"^\s*(\d+)\s+([A-Za-z0-9_.-]+)\s*(.*)$")
        .expect("BUG: static profile row regex must be valid");
    static ref KV_RE: Regex = Regex::new(r"^\s*([A-Za-z][A-Za-z ]*?)\s*:\s*(.*?)\s*$")
        .expect("BUG: static key-value regex must be valid");
}

fn is_table_noise(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('-')
        || trimmed.contains("Profile-ID")
        || trimmed.contains("Profile ID")
        || trimmed.contains("in set")
}

fn parse_id_name_rows(text: &str) -> Vec<(u16, String)> {
    text.lines()
        .filter(|line| !is_table_noise(line))
        .filter_map(|line| {
            let caps = ROW_RE.captures(line)?;
            let id = caps[1].parse::<u16>().ok()?;
            Some((id, caps[2].to_string()))
        })
        .collect()
}

pub fn parse_line_profiles(text: &str) -> Vec<LineProfile> {
    parse_id_name_rows(text)
        .into_iter()
        .map(|(id, name)| LineProfile {
            id,
            name,
            description: String::new(),
            tcont_id: None,
            gem_port_id: None,
            mapping_mode: None,
        })
        .collect()
}

pub fn parse_service_profiles(text: &str) -> Vec<ServiceProfile> {
    parse_id_name_rows(text)
        .into_iter()
        .map(|(id, name)| ServiceProfile {
            id,
            name,
            description: String::new(),
            port_count: None,
            port_type: None,
        })
        .collect()
}

/// TR-069 ACS profiles: `id name` rows, each optionally followed by detail
/// lines (`URL :`, `Periodic inform interval :`, `Username :`) that attach
/// to the most recent row.
pub fn parse_tr069_profiles(text: &str) -> Vec<Tr069Profile> {
    let mut profiles: Vec<Tr069Profile> = Vec::new();

    for line in text.lines() {
        if is_table_noise(line) {
            continue;
        }
        if let Some(caps) = ROW_RE.captures(line) {
            if let Ok(id) = caps[1].parse::<u16>() {
                profiles.push(Tr069Profile {
                    id,
                    name: caps[2].to_string(),
                    acs_url: String::new(),
                    periodic_inform_interval: None,
                    username: None,
                    password: None,
                });
                continue;
            }
        }
        if let Some(caps) = KV_RE.captures(line) {
            let Some(current) = profiles.last_mut() else {
                continue;
            };
            let key = caps[1].trim().to_ascii_lowercase();
            let value = caps[2].trim();
            if value.is_empty() {
                continue;
            }
            if key == "url" || key == "acs url" {
                current.acs_url = value.to_string();
            } else if key.contains("inform interval") {
                current.periodic_inform_interval = value.parse().ok();
            } else if key == "username" {
                current.username = Some(value.to_string());
            }
        }
    }
    profiles
}
