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

//! Composition of CLI sequences into a fresh [`Inventory`]. Any constituent
//! command failing aborts the whole fetch; the caller keeps the previous
//! snapshot.

use chrono::Utc;
use model::olt_info::OltInfo;
use model::onu::{BoundOnu, UnboundOnu};
use model::port::GponPort;
use olt_shell::{ShellMode, ShellSession};
use olt_text_parser as parser;

use crate::error::OltError;
use crate::inventory::Inventory;

/// MA5801 fallback when the slot scan reports nothing usable: eight GPON
/// ports on slot 1.
pub(crate) fn default_gpon_ports() -> Vec<GponPort> {
    (0..8).map(|port| GponPort::new(0, 1, port)).collect()
}

/// Run a command and fail on any device-reported error.
pub(crate) async fn run_checked(
    shell: &ShellSession,
    mode: ShellMode,
    command: &str,
) -> Result<String, OltError> {
    let output = shell.execute_in(mode, command).await?;
    if let Some(message) = parser::find_cli_error(&output.text) {
        return Err(OltError::Cli {
            command: command.to_string(),
            message,
        });
    }
    Ok(output.text)
}

/// Run a listing command. An empty listing surfaces as a `Failure: ... not
/// exist` line on this firmware; that is a result, not an error.
pub(crate) async fn run_listing(
    shell: &ShellSession,
    mode: ShellMode,
    command: &str,
) -> Result<String, OltError> {
    let output = shell.execute_in(mode, command).await?;
    if let Some(message) = parser::find_cli_error(&output.text) {
        if message.contains("not exist") {
            return Ok(String::new());
        }
        return Err(OltError::Cli {
            command: command.to_string(),
            message,
        });
    }
    Ok(output.text)
}

/// The GPON subset: autofind, bound info and optical readings for every
/// port, entering each `interface gpon <f/s>` as needed.
pub(crate) async fn fetch_gpon_data(
    shell: &ShellSession,
    ports: &[GponPort],
    previous: &Inventory,
) -> Result<(Vec<UnboundOnu>, Vec<BoundOnu>), OltError> {
    let mut unbound = Vec::new();
    let mut info_rows = Vec::new();
    let mut optical_rows = Vec::new();

    for port in ports {
        let mode = ShellMode::Interface(port.interface());

        let autofind_text = run_listing(
            shell,
            mode.clone(),
            &format!("display ont autofind {}", port.port),
        )
        .await?;
        for found in parser::parse_autofind(&autofind_text, Some(*port)) {
            unbound.push(UnboundOnu {
                serial_number: found.serial_number,
                port: found.port,
                equipment_id: found.equipment_id,
                software_version: found.software_version,
                discovered_at: found.discovered_at,
                password: found.password,
            });
        }

        let info_text = run_listing(
            shell,
            mode.clone(),
            &format!("display ont info {} all", port.port),
        )
        .await?;
        info_rows.extend(parser::parse_ont_info(&info_text, Some(*port)));

        let optical_text = run_listing(
            shell,
            mode,
            &format!("display ont optical-info {} all", port.port),
        )
        .await?;
        optical_rows.extend(parser::parse_optical_info(&optical_text).into_iter().map(
            |mut row| {
                if row.port.is_none() {
                    row.port = Some(*port);
                }
                row
            },
        ));
    }

    // Description and profile ids live in the detail view, frame-wide.
    let detail_text = run_listing(shell, ShellMode::Config, "display ont info 0 all detail").await?;
    let details = parser::parse_ont_details(&detail_text);

    let bound = info_rows
        .into_iter()
        .map(|row| {
            let key = (row.port, row.onu_id);
            let detail = details.get(&key);
            let optical = optical_rows
                .iter()
                .find(|o| o.port == Some(row.port) && o.onu_id == row.onu_id);
            // Fields the CLI cannot answer (VLAN attachments, PPPoE, WiFi,
            // bind metadata) survive from the previous projection as long
            // as the serial still matches.
            let previous_onu = previous
                .bound_by_key
                .get(&key)
                .filter(|b| b.serial_number == row.serial_number);
            BoundOnu {
                id: BoundOnu::synthetic_id(row.port, row.onu_id),
                serial_number: row.serial_number,
                port: row.port,
                onu_id: row.onu_id,
                description: detail
                    .and_then(|d| d.description.clone())
                    .or_else(|| previous_onu.map(|b| b.description.clone()))
                    .unwrap_or_default(),
                line_profile_id: detail
                    .and_then(|d| d.line_profile_id)
                    .or_else(|| previous_onu.map(|b| b.line_profile_id))
                    .unwrap_or(0),
                service_profile_id: detail
                    .and_then(|d| d.service_profile_id)
                    .or_else(|| previous_onu.map(|b| b.service_profile_id))
                    .unwrap_or(0),
                run_status: row.run_status,
                config_state: row.config_state,
                rx_power: optical.and_then(|o| o.rx_power),
                tx_power: optical.and_then(|o| o.tx_power),
                distance: previous_onu.and_then(|b| b.distance),
                vlan_id: previous_onu.and_then(|b| b.vlan_id),
                management_vlan_id: previous_onu.and_then(|b| b.management_vlan_id),
                gemport_id: previous_onu.and_then(|b| b.gemport_id),
                bound_at: previous_onu.map(|b| b.bound_at).unwrap_or_else(Utc::now),
                pppoe: previous_onu.and_then(|b| b.pppoe.clone()),
                wifi: previous_onu.and_then(|b| b.wifi.clone()),
                tr069_profile: previous_onu.and_then(|b| b.tr069_profile.clone()),
                onu_type: previous_onu.and_then(|b| b.onu_type),
            }
        })
        .collect();

    Ok((unbound, bound))
}

/// `refresh_all`: the full projection rebuild.
pub(crate) async fn fetch_inventory(
    shell: &ShellSession,
    previous: &Inventory,
    initial_vlan_capture: Option<String>,
) -> Result<Inventory, OltError> {
    let version_text = run_checked(shell, ShellMode::Config, "display version").await?;
    let version = parser::parse_display_version(&version_text);

    let board_text = run_checked(shell, ShellMode::Config, "display board 0").await?;
    let mut gpon_ports = parser::parse_board_ports(&board_text);
    if gpon_ports.is_empty() {
        gpon_ports = if previous.gpon_ports.is_empty() {
            tracing::warn!("slot scan found no GPON boards, assuming slot 1");
            default_gpon_ports()
        } else {
            previous.gpon_ports.clone()
        };
    }

    let (unbound, bound) = fetch_gpon_data(shell, &gpon_ports, previous).await?;

    let line_text = run_checked(shell, ShellMode::Config, "display ont-lineprofile gpon all").await?;
    let line_profiles = parser::parse_line_profiles(&line_text);

    let srv_text = run_checked(shell, ShellMode::Config, "display ont-srvprofile gpon all").await?;
    let service_profiles = parser::parse_service_profiles(&srv_text);

    // The dialer captured `display vlan all` before entering config; after
    // that first use the command wants privileged mode, so the dispatcher
    // briefly quits config and re-enters on the next command.
    let vlan_text = match initial_vlan_capture {
        Some(captured) => captured,
        None => run_checked(shell, ShellMode::Privileged, "display vlan all").await?,
    };
    let mut vlans = parser::parse_vlans(&vlan_text);
    for vlan in &mut vlans {
        // `in_use` is monotone: once a bind attached the VLAN it stays
        // marked even if the firmware hides service-port counts.
        if previous.vlan(vlan.id).is_some_and(|v| v.in_use) {
            vlan.in_use = true;
        }
    }

    // Not every firmware build ships the TR-069 command set; its absence
    // must not wedge the whole refresh.
    let tr069_profiles =
        match run_checked(shell, ShellMode::Config, "display tr069-server-profile all").await {
            Ok(text) => parser::parse_tr069_profiles(&text),
            Err(OltError::Cli { message, .. }) => {
                tracing::warn!(%message, "TR-069 profile listing unavailable");
                Vec::new()
            }
            Err(error) => return Err(error),
        };

    let mut inventory = Inventory {
        olt_info: Some(OltInfo {
            product: version.product,
            version: version.version,
            patch: version.patch,
            uptime: version.uptime,
            connected: true,
            hostname: Some(shell.hostname().to_string()),
            model: None,
            serial: None,
        }),
        line_profiles,
        service_profiles,
        vlans,
        tr069_profiles,
        gpon_ports,
        ..Inventory::default()
    };
    inventory.replace_onus(unbound, bound);

    Ok(inventory)
}
