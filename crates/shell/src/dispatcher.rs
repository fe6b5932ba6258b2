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

//! The command dispatcher: one actor owns the interactive shell and drains a
//! FIFO of commands against it. Completion is decided by the prompt grammar;
//! pager and parameter sub-prompts are answered in-line and never reach the
//! caller.

use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::prompt::{
    PromptGrammar, scrub_artifacts, strip_pager_markers, strip_trailing_param_prompt,
};
use crate::state::{SessionState, ShellMode};
use crate::stream::ShellStream;

/// A command with no new output for this long is declared timed out and its
/// partial text delivered. The shell itself survives.
pub const COMMAND_IDLE_TIMEOUT: Duration = Duration::from_secs(15);

/// After a clean prompt is seen, wait this long for trailing output before
/// delivering. Some firmware paths print after the prompt.
pub const SETTLE_WINDOW: Duration = Duration::from_millis(800);

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellError {
    #[error("command cancelled: shell shutting down")]
    Cancelled,
    #[error("shell disconnected")]
    Disconnected,
}

/// Output of one executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    /// The prompt never appeared; `text` is whatever accumulated.
    pub timed_out: bool,
}

pub(crate) struct ExecuteRequest {
    command: String,
    mode: ShellMode,
    reply: oneshot::Sender<Result<CommandOutput, ShellError>>,
}

/// Handle to a spawned shell session. Cloning is not offered; share it in an
/// `Arc`. Dropping the last handle shuts the dispatcher down.
pub struct ShellSession {
    tx: mpsc::UnboundedSender<ExecuteRequest>,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    state_rx: watch::Receiver<SessionState>,
    join_handle: Mutex<Option<JoinHandle<()>>>,
    hostname: String,
    initial_vlan_capture: Mutex<Option<String>>,
}

impl ShellSession {
    /// Spawn the dispatcher over an arbitrary byte stream. This is the seam
    /// the connection path and the scripted-device tests share.
    pub fn over_stream<S: ShellStream>(
        stream: S,
        grammar: PromptGrammar,
        mode: ShellMode,
        initial_vlan_capture: Option<String>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (state_tx, state_rx) = watch::channel(SessionState::Ready);
        let hostname = grammar.hostname().to_string();
        let join_handle = tokio::spawn(run_shell(stream, grammar, mode, rx, shutdown_rx, state_tx));
        Self {
            tx,
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            state_rx,
            join_handle: Mutex::new(Some(join_handle)),
            hostname,
            initial_vlan_capture: Mutex::new(initial_vlan_capture),
        }
    }

    /// Run a command in `config` mode, the home of every data-fetch command.
    pub async fn execute(&self, command: &str) -> Result<CommandOutput, ShellError> {
        self.execute_in(ShellMode::Config, command).await
    }

    /// Run a command, first steering the shell into `mode` if it is not
    /// already there.
    pub async fn execute_in(
        &self,
        mode: ShellMode,
        command: &str,
    ) -> Result<CommandOutput, ShellError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(ExecuteRequest {
                command: command.to_string(),
                mode,
                reply: reply_tx,
            })
            .map_err(|_| ShellError::Disconnected)?;
        reply_rx.await.map_err(|_| ShellError::Cancelled)?
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The `display vlan all` output captured during the login staircase,
    /// available exactly once.
    pub fn take_initial_vlan_capture(&self) -> Option<String> {
        self.initial_vlan_capture
            .lock()
            .expect("BUG: vlan capture mutex poisoned")
            .take()
    }

    pub fn is_connected(&self) -> bool {
        *self.state_rx.borrow() == SessionState::Ready
    }

    /// Watch for the session closing, e.g. to flip a credential's
    /// `is_connected` flag.
    pub fn state_receiver(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// Tear the session down. All in-flight and queued commands resolve with
    /// `Cancelled`.
    pub fn shutdown(&self) {
        if let Some(tx) = self
            .shutdown_tx
            .lock()
            .expect("BUG: shutdown mutex poisoned")
            .take()
        {
            let _ = tx.send(());
        }
    }

    /// The dispatcher task's join handle, available exactly once.
    pub fn take_join_handle(&self) -> Option<JoinHandle<()>> {
        self.join_handle
            .lock()
            .expect("BUG: join handle mutex poisoned")
            .take()
    }
}

pub(crate) enum ReadOutcome {
    Prompt {
        output: String,
        mode: Option<ShellMode>,
    },
    TimedOut {
        output: String,
    },
    Closed {
        output: String,
    },
}

/// Accumulate output until a clean prompt survives the settle window,
/// answering pager and parameter sub-prompts along the way.
pub(crate) async fn read_until_prompt<S: ShellStream>(
    stream: &mut S,
    grammar: &PromptGrammar,
    settle: Duration,
) -> ReadOutcome {
    let mut buf = String::new();
    loop {
        let wait = if grammar.clean_prompt(&buf).is_some() {
            settle
        } else {
            COMMAND_IDLE_TIMEOUT
        };
        match tokio::time::timeout(wait, stream.read()).await {
            Err(_elapsed) => {
                return match grammar.clean_prompt(&buf) {
                    Some(m) => {
                        let mode = m.mode();
                        let output = scrub_artifacts(&buf[..m.start]);
                        ReadOutcome::Prompt { output, mode }
                    }
                    None => ReadOutcome::TimedOut {
                        output: scrub_artifacts(&buf),
                    },
                };
            }
            Ok(None) => {
                return ReadOutcome::Closed {
                    output: scrub_artifacts(&buf),
                };
            }
            Ok(Some(data)) => {
                buf.push_str(&String::from_utf8_lossy(&data));
                let pagers = strip_pager_markers(&mut buf);
                for _ in 0..pagers {
                    if stream.write(b" ").await.is_err() {
                        return ReadOutcome::Closed {
                            output: scrub_artifacts(&buf),
                        };
                    }
                }
                while strip_trailing_param_prompt(&mut buf) {
                    if stream.write(b"\n").await.is_err() {
                        return ReadOutcome::Closed {
                            output: scrub_artifacts(&buf),
                        };
                    }
                }
            }
        }
    }
}

async fn run_command<S: ShellStream>(
    stream: &mut S,
    grammar: &PromptGrammar,
    command: &str,
    settle: Duration,
) -> ReadOutcome {
    if stream.write(format!("{command}\n").as_bytes()).await.is_err() {
        return ReadOutcome::Closed {
            output: String::new(),
        };
    }
    read_until_prompt(stream, grammar, settle).await
}

/// Everything between the command echo and the prompt. Output has already
/// been scrubbed, so the echo is the first `\n`-terminated line.
fn strip_command_echo(output: &str, command: &str) -> String {
    let trimmed = output.trim_start_matches('\n');
    match trimmed.strip_prefix(command.trim()) {
        Some(rest) => rest.trim_start_matches('\n').to_string(),
        None => trimmed.to_string(),
    }
}

/// Handle one request. Returns false when the shell turned out to be closed.
async fn handle_request<S: ShellStream>(
    stream: &mut S,
    grammar: &PromptGrammar,
    mode: &mut ShellMode,
    req: ExecuteRequest,
) -> bool {
    for transition in mode.transition_to(&req.mode) {
        match run_command(stream, grammar, &transition, SETTLE_WINDOW).await {
            ReadOutcome::Prompt {
                mode: Some(observed),
                ..
            } => *mode = observed,
            ReadOutcome::Prompt { mode: None, .. } => {}
            ReadOutcome::TimedOut { .. } => {
                tracing::warn!(command = %transition, "mode transition saw no prompt");
                *mode = req.mode.clone();
            }
            ReadOutcome::Closed { .. } => {
                let _ = req.reply.send(Err(ShellError::Disconnected));
                return false;
            }
        }
    }

    match run_command(stream, grammar, &req.command, SETTLE_WINDOW).await {
        ReadOutcome::Prompt {
            output,
            mode: observed,
        } => {
            if let Some(observed) = observed {
                *mode = observed;
            }
            let text = strip_command_echo(&output, &req.command);
            let _ = req.reply.send(Ok(CommandOutput {
                text,
                timed_out: false,
            }));
            true
        }
        ReadOutcome::TimedOut { output } => {
            tracing::warn!(
                command = %req.command,
                timeout = %humantime::format_duration(COMMAND_IDLE_TIMEOUT),
                "timeout waiting for CLI prompt, delivering partial output"
            );
            let text = strip_command_echo(&output, &req.command);
            let _ = req.reply.send(Ok(CommandOutput {
                text,
                timed_out: true,
            }));
            true
        }
        ReadOutcome::Closed { .. } => {
            let _ = req.reply.send(Err(ShellError::Disconnected));
            false
        }
    }
}

async fn run_shell<S: ShellStream>(
    mut stream: S,
    grammar: PromptGrammar,
    mut mode: ShellMode,
    mut rx: mpsc::UnboundedReceiver<ExecuteRequest>,
    mut shutdown_rx: oneshot::Receiver<()>,
    state_tx: watch::Sender<SessionState>,
) {
    let disconnected = loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                tracing::info!("shell dispatcher shutting down");
                break false;
            }
            maybe_req = rx.recv() => {
                let Some(req) = maybe_req else { break false };
                // Racing the request against shutdown makes teardown cancel
                // the in-flight command too: dropping the request drops its
                // reply sender, which the caller observes as Cancelled.
                tokio::select! {
                    ok = handle_request(&mut stream, &grammar, &mut mode, req) => {
                        if !ok {
                            tracing::warn!("shell closed mid-command");
                            break true;
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("shell dispatcher shutting down mid-command");
                        break false;
                    }
                }
            }
            unsolicited = stream.read() => match unsolicited {
                Some(data) => {
                    tracing::debug!(bytes = data.len(), "discarding unsolicited shell output");
                }
                None => {
                    tracing::warn!("shell closed while idle");
                    break true;
                }
            },
        }
    };

    // Drain the queue: everything still pending resolves now.
    rx.close();
    let error = if disconnected {
        ShellError::Disconnected
    } else {
        ShellError::Cancelled
    };
    while let Ok(req) = rx.try_recv() {
        let _ = req.reply.send(Err(error));
    }
    let _ = state_tx.send(SessionState::Closed);
}
