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

//! A scripted Huawei OLT CLI for tests: tracks the mode staircase
//! (`config` / `interface gpon` / `quit`), echoes commands, answers from a
//! canned response table and renders the right prompt for its current mode.
//! Unknown commands succeed with empty output, exactly like a display
//! command that has nothing to report.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use olt_shell::prompt::PromptGrammar;
use olt_shell::state::ShellMode;
use olt_shell::stream::{ShellStream, StreamClosed};
use olt_shell::ShellSession;
use tokio::sync::mpsc;

struct MockStream {
    incoming: mpsc::UnboundedReceiver<Vec<u8>>,
    written: mpsc::UnboundedSender<Vec<u8>>,
}

impl ShellStream for MockStream {
    async fn read(&mut self) -> Option<Vec<u8>> {
        self.incoming.recv().await
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), StreamClosed> {
        self.written.send(data.to_vec()).map_err(|_| StreamClosed)
    }
}

pub struct MockOlt {
    hostname: String,
    responses: HashMap<String, String>,
    initial_vlan_capture: Option<String>,
}

/// A live mock session: the shell handle under test plus the log of every
/// command the dispatcher sent to the "device".
pub struct MockSession {
    pub session: ShellSession,
    commands: CommandLog,
}

impl MockSession {
    pub fn commands(&self) -> Vec<String> {
        self.commands.all()
    }

    /// Split into the session (to hand to a manager) and the command log.
    pub fn into_parts(self) -> (ShellSession, CommandLog) {
        (self.session, self.commands)
    }
}

/// Shared view of every command line the dispatcher wrote to the device.
#[derive(Clone)]
pub struct CommandLog(Arc<Mutex<Vec<String>>>);

impl CommandLog {
    pub fn all(&self) -> Vec<String> {
        self.0.lock().expect("BUG: command log mutex poisoned").clone()
    }

    pub fn count_matching(&self, needle: &str) -> usize {
        self.all().iter().filter(|c| c.contains(needle)).count()
    }
}

impl MockOlt {
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            responses: HashMap::new(),
            initial_vlan_capture: None,
        }
    }

    /// Canned body returned for an exact command string.
    pub fn with_response(mut self, command: &str, body: &str) -> Self {
        self.responses.insert(command.to_string(), body.to_string());
        self
    }

    /// Pretend the dialer captured this `display vlan all` output during
    /// login.
    pub fn with_initial_vlan_capture(mut self, text: &str) -> Self {
        self.initial_vlan_capture = Some(text.to_string());
        self
    }

    /// Spawn the device emulation plus a dispatcher session over it. The
    /// device starts in `config` mode, as a freshly dialed shell would.
    pub fn spawn_session(self) -> MockSession {
        let (to_shell_tx, to_shell_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        let (written_tx, mut written_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        let commands = CommandLog(Arc::new(Mutex::new(Vec::new())));

        let stream = MockStream {
            incoming: to_shell_rx,
            written: written_tx,
        };
        let session = ShellSession::over_stream(
            stream,
            PromptGrammar::new(&self.hostname),
            ShellMode::Config,
            self.initial_vlan_capture.clone(),
        );

        let hostname = self.hostname;
        let responses = self.responses;
        let log = commands.0.clone();
        tokio::spawn(async move {
            let mut mode = MockMode::Config;
            while let Some(bytes) = written_rx.recv().await {
                let text = String::from_utf8_lossy(&bytes);
                let command = text.trim().to_string();
                if command.is_empty() {
                    // Pager SPACE or sub-prompt newline; this device emits
                    // neither, so there is nothing to answer.
                    continue;
                }
                log.lock()
                    .expect("BUG: command log mutex poisoned")
                    .push(command.clone());
                mode.apply(&command);

                let mut reply = format!("{command}\r\n");
                if let Some(body) = responses.get(&command) {
                    reply.push_str(body);
                    if !body.ends_with('\n') {
                        reply.push_str("\r\n");
                    }
                }
                reply.push_str(&mode.prompt(&hostname));
                if to_shell_tx.send(reply.into_bytes()).is_err() {
                    break;
                }
            }
        });

        MockSession { session, commands }
    }
}

enum MockMode {
    Privileged,
    Config,
    Interface(String),
}

impl MockMode {
    fn apply(&mut self, command: &str) {
        if command == "config" {
            if matches!(self, MockMode::Privileged) {
                *self = MockMode::Config;
            }
        } else if command == "quit" {
            *self = match self {
                MockMode::Interface(_) => MockMode::Config,
                _ => MockMode::Privileged,
            };
        } else if let Some(interface) = command.strip_prefix("interface gpon ") {
            *self = MockMode::Interface(interface.to_string());
        }
    }

    fn prompt(&self, hostname: &str) -> String {
        match self {
            MockMode::Privileged => format!("{hostname}# "),
            MockMode::Config => format!("{hostname}(config)# "),
            MockMode::Interface(interface) => {
                format!("{hostname}(config-if-gpon-{interface})# ")
            }
        }
    }
}
