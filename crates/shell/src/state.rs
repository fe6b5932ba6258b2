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

/// Which CLI mode the shell prompt is currently in. The device prompt is the
/// source of truth: the dispatcher re-derives the mode from every prompt it
/// matches, so a missed transition self-corrects on the next command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellMode {
    /// `hostname#`: after `enable`, outside `config`.
    Privileged,
    /// `hostname(config)#`
    Config,
    /// `hostname(config-if-gpon-0/1)#`; the payload is the `frame/slot` pair.
    Interface(String),
}

impl ShellMode {
    /// Derive the mode from a matched prompt: its parenthesized suffix (if
    /// any) and whether the sigil was `#`. Returns `None` for prompts that
    /// do not map to a dispatcher mode (e.g. the pre-`enable` `>` prompt).
    pub fn from_prompt(suffix: Option<&str>, privileged: bool) -> Option<Self> {
        if !privileged {
            return None;
        }
        match suffix {
            None => Some(ShellMode::Privileged),
            Some("config") => Some(ShellMode::Config),
            Some(s) => match s.strip_prefix("config-if-gpon-") {
                Some(interface) => Some(ShellMode::Interface(interface.to_string())),
                // Some other config sub-mode we do not drive; treat as config
                // so `quit` paths still line up.
                None if s.starts_with("config") => Some(ShellMode::Config),
                None => None,
            },
        }
    }

    /// The command sequence taking the shell from `self` to `target`.
    pub fn transition_to(&self, target: &ShellMode) -> Vec<String> {
        use ShellMode::*;
        match (self, target) {
            (a, b) if a == b => vec![],
            (Privileged, Config) => vec!["config".to_string()],
            (Privileged, Interface(i)) => {
                vec!["config".to_string(), format!("interface gpon {i}")]
            }
            (Config, Privileged) => vec!["quit".to_string()],
            (Config, Interface(i)) => vec![format!("interface gpon {i}")],
            (Interface(_), Config) => vec!["quit".to_string()],
            (Interface(_), Privileged) => vec!["quit".to_string(), "quit".to_string()],
            (Interface(_), Interface(i)) => {
                vec!["quit".to_string(), format!("interface gpon {i}")]
            }
            // Unreachable: all identical pairs are handled by the guard.
            _ => vec![],
        }
    }
}

impl Display for ShellMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellMode::Privileged => f.write_str("privileged"),
            ShellMode::Config => f.write_str("config"),
            ShellMode::Interface(i) => write!(f, "interface gpon {i}"),
        }
    }
}

/// Lifecycle of a spawned shell session, published through a watch channel
/// so the connection manager can mark credentials disconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mode_derivation() {
        assert_eq!(
            ShellMode::from_prompt(None, true),
            Some(ShellMode::Privileged)
        );
        assert_eq!(ShellMode::from_prompt(None, false), None);
        assert_eq!(
            ShellMode::from_prompt(Some("config"), true),
            Some(ShellMode::Config)
        );
        assert_eq!(
            ShellMode::from_prompt(Some("config-if-gpon-0/1"), true),
            Some(ShellMode::Interface("0/1".to_string()))
        );
        assert_eq!(
            ShellMode::from_prompt(Some("config-if-eth-0/9"), true),
            Some(ShellMode::Config)
        );
    }

    #[test]
    fn transitions() {
        let iface = |s: &str| ShellMode::Interface(s.to_string());
        assert!(ShellMode::Config.transition_to(&ShellMode::Config).is_empty());
        assert_eq!(
            ShellMode::Config.transition_to(&iface("0/1")),
            vec!["interface gpon 0/1"]
        );
        assert_eq!(iface("0/1").transition_to(&ShellMode::Config), vec!["quit"]);
        assert_eq!(
            iface("0/1").transition_to(&iface("0/2")),
            vec!["quit", "interface gpon 0/2"]
        );
        assert_eq!(
            ShellMode::Privileged.transition_to(&iface("0/1")),
            vec!["config", "interface gpon 0/1"]
        );
        assert_eq!(
            iface("0/1").transition_to(&ShellMode::Privileged),
            vec!["quit", "quit"]
        );
        assert_eq!(
            ShellMode::Config.transition_to(&ShellMode::Privileged),
            vec!["quit"]
        );
    }
}
