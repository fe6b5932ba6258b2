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

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use russh::client::{AuthResult, GexParams};
use russh::keys::PublicKey;
use russh::{Channel, Preferred, cipher, kex};

/// How long the whole connect + authenticate sequence may take.
pub const READY_TIMEOUT: Duration = Duration::from_secs(30);
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(10);

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("error reaching {host}:{port}: {error}")]
    Unreachable {
        host: String,
        port: u16,
        error: russh::Error,
    },
    #[error("authentication as {user} to {host} failed")]
    Auth { user: String, host: String },
    #[error("SSH session not ready within {}", humantime::format_duration(READY_TIMEOUT))]
    Timeout,
    #[error("SSH session closed: {0}")]
    Closed(russh::Error),
}

pub struct ClientHandler;

impl russh::client::Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        // OLTs ship self-signed host keys that change on firmware swaps;
        // operators pin trust at the credential level instead.
        Ok(true)
    }
}

/// Configuration for russh's SSH client connections.
///
/// OLT firmwares frequently negotiate only legacy primitives, so the client
/// advertises the old Diffie-Hellman groups and CBC ciphers alongside the
/// modern defaults.
fn russh_client_config() -> russh::client::Config {
    russh::client::Config {
        preferred: Preferred {
            kex: Cow::Borrowed(&[
                kex::CURVE25519,
                kex::DH_GEX_SHA256,
                kex::DH_G14_SHA256,
                kex::DH_G14_SHA1,
                kex::DH_GEX_SHA1,
                kex::DH_G1_SHA1,
            ]),
            cipher: Cow::Borrowed(&[
                cipher::AES_256_GCM,
                cipher::AES_128_CTR,
                cipher::AES_192_CTR,
                cipher::AES_256_CTR,
                cipher::AES_128_CBC,
                cipher::AES_192_CBC,
                cipher::AES_256_CBC,
                cipher::TRIPLE_DES_CBC,
            ]),
            ..Preferred::DEFAULT
        },
        // Old firmware offers 1024-bit DH groups for group exchange.
        gex: GexParams::new(1024, 4096, 8192).expect("BUG: static DH group parameters must be valid"),
        keepalive_interval: Some(KEEPALIVE_INTERVAL),
        keepalive_max: 3,
        window_size: 2097152 * 3,
        maximum_packet_size: 65535,
        ..Default::default()
    }
}

/// Open and authenticate one SSH session.
pub(crate) async fn connect(
    host: &str,
    port: u16,
    username: &str,
    password: &str,
) -> Result<russh::client::Handle<ClientHandler>, TransportError> {
    let config = Arc::new(russh_client_config());
    let mut handle = tokio::time::timeout(
        READY_TIMEOUT,
        russh::client::connect(config, (host, port), ClientHandler),
    )
    .await
    .map_err(|_| TransportError::Timeout)?
    .map_err(|error| TransportError::Unreachable {
        host: host.to_string(),
        port,
        error,
    })?;

    let auth = tokio::time::timeout(READY_TIMEOUT, handle.authenticate_password(username, password))
        .await
        .map_err(|_| TransportError::Timeout)?
        .map_err(TransportError::Closed)?;

    match auth {
        AuthResult::Success => Ok(handle),
        AuthResult::Failure { .. } => Err(TransportError::Auth {
            user: username.to_string(),
            host: host.to_string(),
        }),
    }
}

/// Request the interactive PTY shell on a fresh session channel.
pub(crate) async fn open_shell(
    handle: &russh::client::Handle<ClientHandler>,
) -> Result<Channel<russh::client::Msg>, TransportError> {
    let channel = handle
        .channel_open_session()
        .await
        .map_err(TransportError::Closed)?;
    channel
        .request_pty(false, "vt100", 80, 24, 0, 0, &[])
        .await
        .map_err(TransportError::Closed)?;
    channel
        .request_shell(false)
        .await
        .map_err(TransportError::Closed)?;
    Ok(channel)
}
