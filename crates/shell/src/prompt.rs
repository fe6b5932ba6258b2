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

//! Prompt grammar for the Huawei CLI. Pure string scanning, independent of
//! the dispatcher, so the whole completion logic is unit-testable against
//! recorded output.

use lazy_static::lazy_static;
use regex::Regex;

use crate::state::ShellMode;

lazy_static! {
    /// The pre-login / first-contact prompt: some hostname followed by `>`
    /// or `#` at the end of the stream. Used once to learn the hostname.
    static ref ANY_PROMPT_RE: Regex =
        Regex::new(r"(?:^|[\r\n])([A-Za-z0-9._-]+)(\([^)]*\))?([#>])[ \t]*$")
            .expect("BUG: static prompt regex must be valid");

    /// Parameter-completion sub-prompt, e.g. `{ <cr>||<K> }:` or
    /// `{ <cr>|ont-lineprofile<K> }:`. Never a completion signal.
    static ref PARAM_PROMPT_RE: Regex =
        Regex::new(r"\{[^{}]*<cr>[^{}]*\}:[ \t]*$")
            .expect("BUG: static sub-prompt regex must be valid");

    /// vt100 control sequences the PTY sprinkles around pager redraws.
    static ref ANSI_RE: Regex =
        Regex::new(r"\x1b\[[0-9;?]*[0-9A-Za-z]")
            .expect("BUG: static ansi regex must be valid");
}

const PAGER_MARKERS: [&str; 2] = ["---- More", "--More--"];

/// A clean prompt matched at the end of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMatch {
    /// Byte offset where the prompt line begins; everything before it is
    /// command output.
    pub start: usize,
    /// Parenthesized mode suffix, e.g. `config` or `config-if-gpon-0/1`.
    pub mode_suffix: Option<String>,
    /// `#` (true) vs `>` (false).
    pub privileged: bool,
}

impl PromptMatch {
    pub fn mode(&self) -> Option<ShellMode> {
        ShellMode::from_prompt(self.mode_suffix.as_deref(), self.privileged)
    }
}

/// Completion grammar bound to one device hostname.
#[derive(Debug, Clone)]
pub struct PromptGrammar {
    hostname: String,
    prompt_re: Regex,
}

impl PromptGrammar {
    pub fn new(hostname: &str) -> Self {
        let pattern = format!(
            r"(?:^|[\r\n])({}(?:\(([^)]*)\))?([#>]))[ \t]*$",
            regex::escape(hostname)
        );
        Self {
            hostname: hostname.to_string(),
            prompt_re: Regex::new(&pattern).expect("BUG: escaped hostname regex must be valid"),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// A line is a clean prompt iff it matches the prompt pattern at the end
    /// of the buffer and is not trailed by a parameter sub-prompt.
    pub fn clean_prompt(&self, buf: &str) -> Option<PromptMatch> {
        if PARAM_PROMPT_RE.is_match(buf) {
            return None;
        }
        let caps = self.prompt_re.captures(buf)?;
        let whole = caps.get(1).expect("BUG: prompt regex has group 1");
        Some(PromptMatch {
            start: whole.start(),
            mode_suffix: caps.get(2).map(|m| m.as_str().to_string()),
            privileged: caps.get(3).is_some_and(|m| m.as_str() == "#"),
        })
    }
}

/// Detect the first prompt of a fresh connection and learn the hostname.
pub fn first_prompt(buf: &str) -> Option<(String, bool)> {
    let caps = ANY_PROMPT_RE.captures(buf)?;
    let hostname = caps.get(1)?.as_str().to_string();
    let privileged = caps.get(3).is_some_and(|m| m.as_str() == "#");
    Some((hostname, privileged))
}

/// Remove every pager marker line from the buffer, returning how many were
/// removed. The caller answers each removal with a SPACE keystroke.
pub fn strip_pager_markers(buf: &mut String) -> usize {
    let mut stripped = 0;
    loop {
        let Some(pos) = PAGER_MARKERS.iter().filter_map(|m| buf.find(m)).min() else {
            return stripped;
        };
        let line_start = buf[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = buf[pos..]
            .find('\n')
            .map(|i| pos + i + 1)
            .unwrap_or(buf.len());
        buf.replace_range(line_start..line_end, "");
        stripped += 1;
    }
}

/// If the buffer currently ends in a parameter-completion sub-prompt, remove
/// it and return true. The caller answers with a single newline; removal
/// guarantees exactly one answer per occurrence.
pub fn strip_trailing_param_prompt(buf: &mut String) -> bool {
    let Some(m) = PARAM_PROMPT_RE.find(buf) else {
        return false;
    };
    let range = m.range();
    buf.replace_range(range, "");
    true
}

/// Strip terminal control artifacts (ANSI sequences, backspace erasures) and
/// normalize line endings.
pub fn scrub_artifacts(text: &str) -> String {
    let without_ansi = ANSI_RE.replace_all(text, "");
    let mut out = String::with_capacity(without_ansi.len());
    for c in without_ansi.chars() {
        match c {
            '\u{8}' => {
                out.pop();
            }
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_plain_and_mode_prompts() {
        let g = PromptGrammar::new("MA5801");
        let m = g.clean_prompt("some output\r\nMA5801# ").unwrap();
        assert_eq!(m.mode_suffix, None);
        assert!(m.privileged);
        assert_eq!(m.mode(), Some(ShellMode::Privileged));

        let m = g.clean_prompt("ok\r\nMA5801(config)# ").unwrap();
        assert_eq!(m.mode_suffix.as_deref(), Some("config"));
        assert_eq!(m.mode(), Some(ShellMode::Config));

        let m = g.clean_prompt("ok\r\nMA5801(config-if-gpon-0/1)#").unwrap();
        assert_eq!(
            m.mode(),
            Some(ShellMode::Interface("0/1".to_string()))
        );
    }

    #[test]
    fn prompt_must_terminate_buffer() {
        let g = PromptGrammar::new("MA5801");
        assert!(g.clean_prompt("MA5801# \r\nstill printing").is_none());
    }

    #[test]
    fn hostname_is_escaped() {
        let g = PromptGrammar::new("olt.pop1");
        assert!(g.clean_prompt("x\r\nolt.pop1(config)# ").is_some());
        // A dot must not act as a regex wildcard.
        assert!(g.clean_prompt("x\r\noltXpop1(config)# ").is_none());
    }

    #[test]
    fn param_subprompt_suppresses_completion() {
        let g = PromptGrammar::new("MA5801");
        let buf = "MA5801(config)# { <cr>||<K> }:";
        assert!(g.clean_prompt(buf).is_none());
    }

    #[test]
    fn param_subprompt_stripped_once() {
        let mut buf = "partial output { <cr>||<K> }:".to_string();
        assert!(strip_trailing_param_prompt(&mut buf));
        assert_eq!(buf, "partial output ");
        assert!(!strip_trailing_param_prompt(&mut buf));
    }

    #[test]
    fn pager_lines_removed() {
        let mut buf =
            "line 1\r\nline 2\r\n---- More ( Press 'Q' to break ) ----\r\nline 3\r\n".to_string();
        assert_eq!(strip_pager_markers(&mut buf), 1);
        assert_eq!(buf, "line 1\r\nline 2\r\nline 3\r\n");

        let mut buf = "a\n--More--\nb\n--More--\nc\n".to_string();
        assert_eq!(strip_pager_markers(&mut buf), 2);
        assert_eq!(buf, "a\nb\nc\n");
        assert!(!buf.contains("More"));
    }

    #[test]
    fn pager_marker_without_trailing_newline() {
        let mut buf = "row\r\n---- More ----".to_string();
        assert_eq!(strip_pager_markers(&mut buf), 1);
        assert_eq!(buf, "row\r\n");
    }

    #[test]
    fn first_prompt_learns_hostname() {
        let banner = "\r\nUser last login: ...\r\n\r\nMA5801-GP08> ";
        let (hostname, privileged) = first_prompt(banner).unwrap();
        assert_eq!(hostname, "MA5801-GP08");
        assert!(!privileged);
    }

    #[test]
    fn scrub_removes_control_artifacts() {
        let raw = "abc\u{8}\u{8}xy\r\n\x1b[42Dnext\r\n";
        assert_eq!(scrub_artifacts(raw), "axy\nnext\n");
    }
}
