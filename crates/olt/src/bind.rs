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

//! The bind/unbind controller: precondition checks, ONU id allocation,
//! command sequencing with best-effort rollback, and the cache move that
//! completes a successful bind.

use chrono::Utc;
use model::onu::{
    BindRequest, BoundOnu, OnuConfigState, OnuType, RunStatus, SerialNumber, UnbindRequest,
    VerifyReport, VerifyState,
};
use olt_shell::{ShellMode, ShellSession};

use crate::commands;
use crate::error::{BindStage, OltError};
use crate::fetch::run_checked;
use crate::manager::OltManager;

impl OltManager {
    /// Bind precondition: the serial must be discovered and not yet bound.
    pub fn validate(&self, serial: &SerialNumber) -> Result<(), OltError> {
        let snapshot = self.cache.snapshot();
        if snapshot.bound_by_serial(serial.as_str()).is_some() {
            return Err(OltError::Precondition("ONU is already bound".to_string()));
        }
        if !snapshot.unbound_by_serial.contains_key(serial.as_str()) {
            return Err(OltError::Precondition(
                "ONU has not been discovered by autofind".to_string(),
            ));
        }
        Ok(())
    }

    /// Non-mutating diagnostic: where does this serial stand right now?
    pub fn verify(&self, serial: &SerialNumber) -> VerifyReport {
        let snapshot = self.cache.snapshot();
        if let Some(bound) = snapshot.bound_by_serial(serial.as_str()) {
            return VerifyReport {
                serial_number: serial.clone(),
                state: VerifyState::Bound,
                port: Some(bound.port),
                onu_id: Some(bound.onu_id),
                rx_power: bound.rx_power,
                vlan_attached: Some(bound.vlan_id.is_some()),
            };
        }
        if let Some(unbound) = snapshot.unbound_by_serial.get(serial.as_str()) {
            return VerifyReport {
                serial_number: serial.clone(),
                state: VerifyState::Unbound,
                port: Some(unbound.port),
                onu_id: None,
                rx_power: None,
                vlan_attached: None,
            };
        }
        VerifyReport {
            serial_number: serial.clone(),
            state: VerifyState::Unknown,
            port: None,
            onu_id: None,
            rx_power: None,
            vlan_attached: None,
        }
    }

    pub fn next_free_onu_id(&self, port: model::port::GponPort) -> Result<u8, OltError> {
        self.cache
            .snapshot()
            .next_free_onu_id(port)
            .ok_or(OltError::NoIdAvailable { port })
    }

    /// Provision an autofound ONU. On any command failure the resources
    /// created by this invocation are removed again, then the failure
    /// surfaces with its stage.
    pub async fn bind(&self, request: BindRequest) -> Result<BoundOnu, OltError> {
        let shell = self.shell()?;
        let _guard = self.mutation_lock.lock().await;

        // Preconditions may have changed since the operator loaded the form.
        self.validate(&request.serial_number)?;
        let snapshot = self.cache.snapshot();
        if snapshot.line_profile(request.line_profile_id).is_none() {
            return Err(OltError::Precondition(format!(
                "line profile {} does not exist",
                request.line_profile_id
            )));
        }
        if snapshot.service_profile(request.service_profile_id).is_none() {
            return Err(OltError::Precondition(format!(
                "service profile {} does not exist",
                request.service_profile_id
            )));
        }
        for vlan_id in [request.vlan_id, request.management_vlan_id]
            .into_iter()
            .flatten()
        {
            if snapshot.vlan(vlan_id).is_none() {
                return Err(OltError::Precondition(format!(
                    "VLAN {vlan_id} does not exist"
                )));
            }
        }
        if let Some(name) = &request.tr069_profile
            && snapshot.tr069_profile_by_name(name).is_none()
        {
            return Err(OltError::Precondition(format!(
                "TR-069 profile {name} does not exist"
            )));
        }
        let password = match request.onu_type {
            OnuType::Huawei => String::new(),
            OnuType::General => request
                .onu_password
                .clone()
                .or_else(|| {
                    snapshot
                        .unbound_by_serial
                        .get(request.serial_number.as_str())
                        .and_then(|u| u.password.clone())
                })
                .ok_or_else(|| {
                    OltError::Precondition(
                        "general ONUs require a password for authentication".to_string(),
                    )
                })?,
        };

        let onu_id = snapshot
            .next_free_onu_id(request.port)
            .ok_or(OltError::NoIdAvailable { port: request.port })?;

        let interface = ShellMode::Interface(request.port.interface());
        let mut rollback: Vec<(ShellMode, String)> = Vec::new();

        let add_command = commands::add_ont(&request, onu_id, &password);
        self.bind_step(
            &shell,
            interface.clone(),
            &add_command,
            BindStage::AddingOnt,
            &rollback,
        )
        .await?;
        rollback.push((
            interface.clone(),
            commands::delete_ont(request.port, onu_id),
        ));

        let gemport = 1u16;
        if let Some(vlan) = request.vlan_id {
            let command = commands::data_service_port(request.port, onu_id, vlan, gemport);
            self.bind_step(&shell, ShellMode::Config, &command, BindStage::DataVlan, &rollback)
                .await?;
            rollback.push((
                ShellMode::Config,
                commands::undo_service_port(request.port, onu_id, vlan),
            ));
        }

        if let Some(vlan) = request.management_vlan_id {
            let command = commands::management_ipconfig(request.port, onu_id, vlan);
            self.bind_step(
                &shell,
                interface.clone(),
                &command,
                BindStage::ManagementVlan,
                &rollback,
            )
            .await?;
            let command = commands::data_service_port(request.port, onu_id, vlan, gemport + 1);
            self.bind_step(
                &shell,
                ShellMode::Config,
                &command,
                BindStage::ManagementVlan,
                &rollback,
            )
            .await?;
            rollback.push((
                ShellMode::Config,
                commands::undo_service_port(request.port, onu_id, vlan),
            ));
        }

        if let Some(profile) = &request.tr069_profile {
            let command = commands::tr069_association(request.port, onu_id, profile);
            self.bind_step(&shell, interface, &command, BindStage::Tr069, &rollback)
                .await?;
        }

        let bound = BoundOnu {
            id: BoundOnu::synthetic_id(request.port, onu_id),
            serial_number: request.serial_number.clone(),
            port: request.port,
            onu_id,
            description: request.description.clone(),
            line_profile_id: request.line_profile_id,
            service_profile_id: request.service_profile_id,
            run_status: RunStatus::Offline,
            config_state: OnuConfigState::Initial,
            rx_power: None,
            tx_power: None,
            distance: None,
            vlan_id: request.vlan_id,
            management_vlan_id: request.management_vlan_id,
            gemport_id: request.vlan_id.map(|_| gemport),
            bound_at: Utc::now(),
            pppoe: request.pppoe.clone(),
            wifi: None,
            tr069_profile: request.tr069_profile.clone(),
            onu_type: Some(request.onu_type),
        };

        let mut inventory = (*self.cache.snapshot()).clone();
        inventory
            .unbound_by_serial
            .remove(request.serial_number.as_str());
        inventory.insert_bound(bound.clone());
        for vlan_id in [request.vlan_id, request.management_vlan_id]
            .into_iter()
            .flatten()
        {
            inventory.mark_vlan_in_use(vlan_id);
        }
        self.cache.publish(inventory);

        tracing::info!(
            serial = %bound.serial_number,
            port = %bound.port,
            onu_id = bound.onu_id,
            "ONU bound"
        );
        Ok(bound)
    }

    async fn bind_step(
        &self,
        shell: &ShellSession,
        mode: ShellMode,
        command: &str,
        stage: BindStage,
        rollback: &[(ShellMode, String)],
    ) -> Result<(), OltError> {
        match run_checked(shell, mode, command).await {
            Ok(_) => Ok(()),
            Err(error) => {
                let message = match &error {
                    OltError::Cli { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                tracing::warn!(%command, %message, "bind step failed, rolling back");
                for (mode, undo) in rollback.iter().rev() {
                    if let Err(undo_error) = run_checked(shell, mode.clone(), undo).await {
                        tracing::warn!(command = %undo, %undo_error, "rollback command failed");
                    }
                }
                Err(OltError::Bind { stage, message })
            }
        }
    }

    /// Remove a bound ONU, optionally purging its service-ports. With
    /// `force`, device-side refusals are logged and the cache entry is
    /// dropped regardless.
    pub async fn unbind(&self, request: UnbindRequest) -> Result<(), OltError> {
        let shell = self.shell()?;
        let _guard = self.mutation_lock.lock().await;

        let snapshot = self.cache.snapshot();
        let Some(onu) = snapshot.bound_by_key.get(&(request.port, request.onu_id)) else {
            return Err(OltError::NotFound(format!(
                "no bound ONU {} on port {}",
                request.onu_id, request.port
            )));
        };

        // Reverse order of bind: service-ports first, then the ONT itself.
        if request.clean_config {
            for vlan in [onu.management_vlan_id, onu.vlan_id].into_iter().flatten() {
                let command = commands::undo_service_port(onu.port, onu.onu_id, vlan);
                match run_checked(&shell, ShellMode::Config, &command).await {
                    Ok(_) => {}
                    Err(OltError::Cli { message, .. }) if message.contains("not exist") => {}
                    Err(error) if request.force => {
                        tracing::warn!(%command, %error, "ignoring service-port removal failure");
                    }
                    Err(error) => return Err(error),
                }
            }
        }

        let interface = ShellMode::Interface(onu.port.interface());
        let delete = commands::delete_ont(onu.port, onu.onu_id);
        match run_checked(&shell, interface, &delete).await {
            Ok(_) => {}
            Err(error) if request.force => {
                tracing::warn!(%error, "ignoring ONT delete failure");
            }
            Err(error) => return Err(error),
        }

        let mut inventory = (*self.cache.snapshot()).clone();
        inventory.remove_bound(request.port, request.onu_id);
        self.cache.publish(inventory);

        tracing::info!(port = %request.port, onu_id = request.onu_id, "ONU unbound");
        Ok(())
    }
}
