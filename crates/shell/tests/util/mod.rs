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

//! A scripted device standing in for the SSH PTY: byte channels in both
//! directions, so tests play the OLT side of the conversation.

use olt_shell::stream::{ShellStream, StreamClosed};
use tokio::sync::mpsc;

pub struct ScriptedShell {
    incoming: mpsc::UnboundedReceiver<Vec<u8>>,
    written: mpsc::UnboundedSender<Vec<u8>>,
}

impl ShellStream for ScriptedShell {
    async fn read(&mut self) -> Option<Vec<u8>> {
        self.incoming.recv().await
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), StreamClosed> {
        self.written.send(data.to_vec()).map_err(|_| StreamClosed)
    }
}

/// Handles the test holds to play the device: send terminal output, observe
/// keystrokes the dispatcher writes.
pub struct DeviceSide {
    pub to_shell: mpsc::UnboundedSender<Vec<u8>>,
    pub written: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl DeviceSide {
    pub fn send(&self, text: &str) {
        self.to_shell
            .send(text.as_bytes().to_vec())
            .expect("scripted shell closed");
    }

    /// Next chunk the dispatcher wrote, as text.
    pub async fn next_write(&mut self) -> Option<String> {
        self.written
            .recv()
            .await
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub fn scripted_shell() -> (ScriptedShell, DeviceSide) {
    let (to_shell, incoming) = mpsc::unbounded_channel();
    let (written_tx, written_rx) = mpsc::unbounded_channel();
    (
        ScriptedShell {
            incoming,
            written: written_tx,
        },
        DeviceSide {
            to_shell,
            written: written_rx,
        },
    )
}
