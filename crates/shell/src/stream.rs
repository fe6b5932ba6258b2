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

use std::future::Future;

use russh::{Channel, ChannelMsg};

#[derive(thiserror::Error, Debug)]
#[error("shell stream closed")]
pub struct StreamClosed;

/// The byte stream the dispatcher owns. The production implementation wraps
/// a russh channel; tests drive the dispatcher with scripted streams.
pub trait ShellStream: Send + 'static {
    /// Next chunk of terminal output, or `None` once the stream is closed.
    fn read(&mut self) -> impl Future<Output = Option<Vec<u8>>> + Send;

    /// Write keystrokes to the terminal.
    fn write(&mut self, data: &[u8]) -> impl Future<Output = Result<(), StreamClosed>> + Send;
}

/// Interactive shell over a russh session channel. Owns the client handle so
/// the TCP session lives exactly as long as the stream.
pub struct RusshStream {
    channel: Channel<russh::client::Msg>,
    _client: russh::client::Handle<crate::transport::ClientHandler>,
}

impl RusshStream {
    pub(crate) fn new(
        channel: Channel<russh::client::Msg>,
        client: russh::client::Handle<crate::transport::ClientHandler>,
    ) -> Self {
        Self {
            channel,
            _client: client,
        }
    }
}

impl ShellStream for RusshStream {
    async fn read(&mut self) -> Option<Vec<u8>> {
        loop {
            match self.channel.wait().await? {
                ChannelMsg::Data { data } => return Some(data.to_vec()),
                ChannelMsg::ExtendedData { data, .. } => return Some(data.to_vec()),
                ChannelMsg::Eof | ChannelMsg::Close => return None,
                msg => {
                    tracing::trace!("ignoring channel message: {msg:?}");
                }
            }
        }
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), StreamClosed> {
        self.channel.data(data).await.map_err(|_| StreamClosed)
    }
}
