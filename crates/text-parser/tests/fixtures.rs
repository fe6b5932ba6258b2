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

//! Every parser against a recorded fixture of its command, one file per
//! command under `tests/fixtures/`.

use model::onu::{OnuConfigState, RunStatus};
use model::port::GponPort;
use model::vlan::VlanKind;
use olt_text_parser::*;

fn port(s: &str) -> GponPort {
    s.parse().unwrap()
}

#[test]
fn display_version_fixture() {
    let info = parse_display_version(include_str!("fixtures/display_version.txt"));
    assert_eq!(info.product, "MA5801-GP08");
    assert_eq!(info.version, "V100R021C00");
    assert_eq!(info.patch, "SPC100");
    assert_eq!(info.uptime, "32 day(s), 11 hour(s), 26 minute(s), 42 second(s)");
}

#[test]
fn autofind_columnar_fixture() {
    let found = parse_autofind(include_str!("fixtures/ont_autofind_columnar.txt"), None);
    assert_eq!(found.len(), 3);

    assert_eq!(found[0].serial_number.as_str(), "485754430A1B2C3D");
    assert_eq!(found[0].port, port("0/1/0"));
    assert_eq!(found[0].equipment_id, "HG8310M");
    assert_eq!(found[0].software_version.as_deref(), Some("V3R017C10S120"));

    assert_eq!(found[2].port, port("0/1/1"));

    // Port strings come out normalized even though the fixture spells
    // `0/ 1/0`.
    for onu in &found {
        let rendered = onu.port.to_string();
        assert!(!rendered.contains(' '), "unnormalized port {rendered:?}");
    }
}

#[test]
fn autofind_block_fixture() {
    let found = parse_autofind(include_str!("fixtures/ont_autofind_blocks.txt"), None);
    assert_eq!(found.len(), 2);

    assert_eq!(found[0].serial_number.as_str(), "485754439D1FA342");
    assert_eq!(found[0].equipment_id, "HG8310M");
    assert_eq!(
        found[0].password.as_deref(),
        Some("0x303030303030303030303030")
    );
    assert!(found[0].discovered_at.is_some());

    assert_eq!(found[1].serial_number.as_str(), "48575443C0FFEE00");
    assert_eq!(found[1].port, port("0/1/2"));
    assert_eq!(found[1].equipment_id, "EG8145V5");
}

#[test]
fn ont_info_fixture() {
    let rows = parse_ont_info(include_str!("fixtures/ont_info.txt"), None);
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].port, port("0/1/0"));
    assert_eq!(rows[0].onu_id, 0);
    assert_eq!(rows[0].run_status, RunStatus::Online);
    assert_eq!(rows[0].config_state, OnuConfigState::Normal);

    assert_eq!(rows[1].onu_id, 1);
    assert_eq!(rows[1].run_status, RunStatus::Offline);
    assert_eq!(rows[1].config_state, OnuConfigState::Initial);

    assert_eq!(rows[2].port, port("0/1/1"));
    assert_eq!(rows[2].run_status, RunStatus::Los);
}

#[test]
fn optical_info_fixture() {
    let rows = parse_optical_info(include_str!("fixtures/ont_optical_info.txt"));
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].port, Some(port("0/1/0")));
    assert_eq!(rows[0].onu_id, 0);
    assert_eq!(rows[0].rx_power, Some(-18.52));
    assert_eq!(rows[0].tx_power, Some(2.31));

    assert_eq!(rows[1].rx_power, None);
    assert_eq!(rows[1].olt_rx_power, None);
    assert_eq!(rows[1].temperature, Some(41.0));
}

#[test]
fn ont_detail_fixture() {
    let details = parse_ont_details(include_str!("fixtures/ont_info_detail.txt"));
    assert_eq!(details.len(), 2);

    let first = details.get(&(port("0/1/0"), 0)).unwrap();
    assert_eq!(first.description.as_deref(), Some("Cust A"));
    assert_eq!(first.line_profile_id, Some(10));
    assert_eq!(first.service_profile_id, Some(20));

    let second = details.get(&(port("0/1/0"), 1)).unwrap();
    assert_eq!(second.description.as_deref(), Some("Cust B apartment 12"));
}

#[test]
fn line_profile_fixture() {
    let profiles = parse_line_profiles(include_str!("fixtures/ont_lineprofile.txt"));
    assert_eq!(
        profiles
            .iter()
            .map(|p| (p.id, p.name.as_str()))
            .collect::<Vec<_>>(),
        vec![(10, "ftth_basic"), (20, "ftth_100m"), (30, "biz_dedicated")]
    );
}

#[test]
fn service_profile_fixture() {
    let profiles = parse_service_profiles(include_str!("fixtures/ont_srvprofile.txt"));
    assert_eq!(
        profiles
            .iter()
            .map(|p| (p.id, p.name.as_str()))
            .collect::<Vec<_>>(),
        vec![(20, "hgu_1ge"), (21, "hgu_4ge_wifi")]
    );
}

#[test]
fn vlan_fixture() {
    let vlans = parse_vlans(include_str!("fixtures/vlan_all.txt"));
    assert_eq!(vlans.len(), 4);
    assert_eq!(vlans[0].id, 100);
    assert!(vlans[0].in_use);
    assert_eq!(vlans[2].kind, VlanKind::Mux);
    assert_eq!(vlans[3].id, 4093);
    assert_eq!(vlans[3].kind, VlanKind::Standard);
}

#[test]
fn tr069_fixture() {
    let profiles = parse_tr069_profiles(include_str!("fixtures/tr069_profiles.txt"));
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].name, "default_acs");
    assert_eq!(profiles[0].acs_url, "http://acs.example.net:7547/acs");
    assert_eq!(profiles[0].periodic_inform_interval, Some(86400));
    assert_eq!(profiles[1].acs_url, "http://lab-acs.example.net:7547/");
}

#[test]
fn board_fixture() {
    let ports = parse_board_ports(include_str!("fixtures/display_board.txt"));
    assert_eq!(ports.len(), 8);
    assert_eq!(ports.first().unwrap(), &port("0/1/0"));
    assert_eq!(ports.last().unwrap(), &port("0/1/7"));
}
