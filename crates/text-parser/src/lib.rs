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

//! Pure parsers from Huawei CLI text to typed records.
//!
//! Every parser is a total function: rows it cannot interpret are skipped,
//! never propagated as errors. Whether the device rejected the command
//! outright is a separate question answered by [`find_cli_error`]; the fetch
//! orchestrator asks it before parsing.
//!
//! The device loves inserting whitespace inside `F/S/P` triples (`0/ 1/0`);
//! all parsers normalize through [`model::port::GponPort`].

pub mod autofind;
pub mod board;
pub mod detail;
pub mod ont_info;
pub mod optical;
pub mod profile;
pub mod version;
pub mod vlan;

pub use autofind::{AutofindOnu, parse_autofind};
pub use board::parse_board_ports;
pub use detail::{OntDetail, parse_ont_details};
pub use ont_info::{OntInfoRow, parse_ont_info};
pub use optical::{OpticalRow, parse_optical_info};
pub use profile::{parse_line_profiles, parse_service_profiles, parse_tr069_profiles};
pub use version::{VersionInfo, parse_display_version};
pub use vlan::parse_vlans;

/// Device-level rejection strings. A hit means the whole command failed and
/// its output is not worth parsing.
const CLI_ERROR_MARKERS: [&str; 5] = [
    "Unknown command",
    "Error:",
    "% Parameter error",
    "Failure:",
    "Command is not supported",
];

/// Scan command output for a CLI rejection, returning the offending line.
pub fn find_cli_error(text: &str) -> Option<String> {
    text.lines()
        .find(|line| CLI_ERROR_MARKERS.iter().any(|marker| line.contains(marker)))
        .map(|line| line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_rejections() {
        assert_eq!(
            find_cli_error("  Unknown command, the error locates at '^'").as_deref(),
            Some("Unknown command, the error locates at '^'")
        );
        assert_eq!(
            find_cli_error("ok line\n  Error: The ONT does not exist").as_deref(),
            Some("Error: The ONT does not exist")
        );
        assert!(find_cli_error("  all good\n  1 row in set").is_none());
    }
}
