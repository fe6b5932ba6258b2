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

use std::fmt::{self, Display};

use model::port::GponPort;

/// Which step of the bind sequence failed. Everything up to the failing
/// stage has been rolled back best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindStage {
    AddingOnt,
    DataVlan,
    ManagementVlan,
    Tr069,
}

impl Display for BindStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindStage::AddingOnt => f.write_str("adding the ONT"),
            BindStage::DataVlan => f.write_str("attaching the data VLAN"),
            BindStage::ManagementVlan => f.write_str("attaching the management VLAN"),
            BindStage::Tr069 => f.write_str("associating the TR-069 profile"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum OltError {
    #[error("no OLT connection is active")]
    NotConnected,
    #[error(transparent)]
    Connect(#[from] olt_shell::ConnectError),
    #[error(transparent)]
    Shell(#[from] olt_shell::ShellError),
    #[error("device rejected `{command}`: {message}")]
    Cli { command: String, message: String },
    #[error("{0}")]
    Precondition(String),
    #[error("no free ONU id on port {port}")]
    NoIdAvailable { port: GponPort },
    #[error("{0}")]
    NotFound(String),
    #[error("bind failed while {stage}: {message}")]
    Bind { stage: BindStage, message: String },
    #[error("refresh failed: {0}")]
    Refresh(String),
}
