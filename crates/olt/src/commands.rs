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

//! Composition of the mutating CLI command strings. Pure string building,
//! kept separate from the controller so the exact wire text is testable.

use model::onu::{BindRequest, OnuType};
use model::port::GponPort;

/// `ont add` in `interface gpon <f/s>` mode. Huawei-built ONUs bind by
/// serial over OMCI; general ONUs authenticate by password without OMCI.
pub fn add_ont(request: &BindRequest, onu_id: u8, password: &str) -> String {
    let port_id = request.port.port;
    let description = sanitize_description(&request.description);
    match request.onu_type {
        OnuType::Huawei => format!(
            "ont add {port_id} {onu_id} sn-auth {sn} omci ont-lineprofile-id {line} \
             ont-srvprofile-id {service} desc \"{description}\"",
            sn = request.serial_number,
            line = request.line_profile_id,
            service = request.service_profile_id,
        ),
        OnuType::General => format!(
            "ont add {port_id} {onu_id} password-auth {password} ont-lineprofile-id {line} \
             ont-srvprofile-id {service} desc \"{description}\"",
            line = request.line_profile_id,
            service = request.service_profile_id,
        ),
    }
}

/// `ont delete` in `interface gpon <f/s>` mode.
pub fn delete_ont(port: GponPort, onu_id: u8) -> String {
    format!("ont delete {} {onu_id}", port.port)
}

/// Data-plane service-port, issued from `config` mode.
pub fn data_service_port(port: GponPort, onu_id: u8, vlan: u16, gemport: u16) -> String {
    format!(
        "service-port vlan {vlan} gpon {port} ont {onu_id} gemport {gemport} \
         multi-service user-vlan {vlan} tag-transform translate"
    )
}

pub fn undo_service_port(port: GponPort, onu_id: u8, vlan: u16) -> String {
    format!("undo service-port vlan {vlan} gpon {port} ont {onu_id}")
}

/// Management-plane ip host on ip-index 1, issued from the interface mode.
pub fn management_ipconfig(port: GponPort, onu_id: u8, vlan: u16) -> String {
    format!(
        "ont ipconfig {} {onu_id} ip-index 1 dhcp vlan {vlan}",
        port.port
    )
}

/// TR-069 ACS association, issued from the interface mode.
pub fn tr069_association(port: GponPort, onu_id: u8, profile_name: &str) -> String {
    format!(
        "ont tr069-server-config {} {onu_id} profile-name {profile_name}",
        port.port
    )
}

/// The CLI treats `"` as the description delimiter; drop embedded quotes
/// and collapse newlines rather than producing an unparseable command.
fn sanitize_description(description: &str) -> String {
    description
        .chars()
        .map(|c| match c {
            '"' => '\'',
            '\r' | '\n' => ' ',
            c => c,
        })
        .collect()
}
