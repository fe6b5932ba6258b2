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

//! Interactive SSH CLI session engine for Huawei GPON OLTs.
//!
//! One connected device means one [`ShellSession`]: a serialized actor that
//! owns the PTY byte stream and adapts a request/response API onto it. See
//! [`dispatcher`] for the completion grammar and queue discipline.

pub mod dialer;
pub mod dispatcher;
pub mod prompt;
pub mod singleflight;
pub mod state;
pub mod stream;
pub mod transport;

pub use dispatcher::{CommandOutput, ShellError, ShellSession};
pub use singleflight::Singleflight;
pub use state::{SessionState, ShellMode};
pub use transport::TransportError;

use crate::stream::RusshStream;

/// Where and how to reach the device.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ConnectError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Dial(#[from] dialer::DialError),
}

/// Connect, authenticate, climb the login staircase and hand the shell to a
/// freshly spawned dispatcher.
pub async fn connect(params: &ConnectParams) -> Result<ShellSession, ConnectError> {
    let client =
        transport::connect(&params.host, params.port, &params.username, &params.password).await?;
    let channel = transport::open_shell(&client).await?;
    let mut stream = RusshStream::new(channel, client);

    let dialed = dialer::dial(&mut stream).await?;
    tracing::info!(
        host = %params.host,
        hostname = %dialed.grammar.hostname(),
        "OLT CLI shell ready"
    );

    Ok(ShellSession::over_stream(
        stream,
        dialed.grammar,
        dialed.mode,
        Some(dialed.vlan_capture),
    ))
}
