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

//! Walks a fresh PTY through the Huawei login staircase:
//! banner → `enable` → opportunistic `display vlan all` → `config`.
//!
//! The VLAN capture happens here because `display vlan all` refuses to run
//! inside `config` mode on some firmwares; grabbing it before entering
//! `config` costs nothing and saves the first refresh a mode round-trip.

use std::time::Duration;

use crate::dispatcher::{ReadOutcome, read_until_prompt};
use crate::prompt::{self, PromptGrammar};
use crate::state::ShellMode;
use crate::stream::ShellStream;

/// Settling pause between staircase steps.
pub const MODE_SETTLE: Duration = Duration::from_secs(2);
const FIRST_PROMPT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(thiserror::Error, Debug)]
pub enum DialError {
    #[error("no CLI prompt within {}", humantime::format_duration(FIRST_PROMPT_TIMEOUT))]
    NoPrompt,
    #[error("shell closed during login staircase")]
    Closed,
}

pub struct DialedShell {
    pub grammar: PromptGrammar,
    pub mode: ShellMode,
    pub vlan_capture: String,
}

/// Detect readiness and climb to `config` mode. On success the dispatcher
/// takes ownership of the stream.
pub async fn dial<S: ShellStream>(stream: &mut S) -> Result<DialedShell, DialError> {
    let deadline = tokio::time::Instant::now() + FIRST_PROMPT_TIMEOUT;
    let mut banner = String::new();
    let (hostname, privileged) = loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            return Err(DialError::NoPrompt);
        }
        match tokio::time::timeout(remaining, stream.read()).await {
            Err(_elapsed) => return Err(DialError::NoPrompt),
            Ok(None) => return Err(DialError::Closed),
            Ok(Some(data)) => {
                banner.push_str(&String::from_utf8_lossy(&data));
                if let Some(found) = prompt::first_prompt(&banner) {
                    break found;
                }
            }
        }
    };
    let grammar = PromptGrammar::new(&hostname);
    tracing::debug!(%hostname, privileged, "device prompt detected");

    if !privileged {
        match step(stream, &grammar, "enable").await? {
            ReadOutcome::Prompt { .. } | ReadOutcome::TimedOut { .. } => {}
            ReadOutcome::Closed { .. } => return Err(DialError::Closed),
        }
    }

    let vlan_capture = match step(stream, &grammar, "display vlan all").await? {
        ReadOutcome::Prompt { output, .. } => output,
        ReadOutcome::TimedOut { output } => {
            tracing::warn!("initial `display vlan all` capture never saw a prompt");
            output
        }
        ReadOutcome::Closed { .. } => return Err(DialError::Closed),
    };

    let mode = match step(stream, &grammar, "config").await? {
        ReadOutcome::Prompt { mode, .. } => mode.unwrap_or(ShellMode::Config),
        ReadOutcome::TimedOut { .. } => {
            tracing::warn!("`config` transition saw no prompt, assuming config mode");
            ShellMode::Config
        }
        ReadOutcome::Closed { .. } => return Err(DialError::Closed),
    };

    Ok(DialedShell {
        grammar,
        mode,
        vlan_capture,
    })
}

async fn step<S: ShellStream>(
    stream: &mut S,
    grammar: &PromptGrammar,
    command: &str,
) -> Result<ReadOutcome, DialError> {
    stream
        .write(format!("{command}\n").as_bytes())
        .await
        .map_err(|_| DialError::Closed)?;
    Ok(read_until_prompt(stream, grammar, MODE_SETTLE).await)
}
