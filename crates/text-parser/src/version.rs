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

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PRODUCT_RE: Regex =
        Regex::new(r"MA\d+[A-Z0-9-]+").expect("BUG: static product regex must be valid");
    static ref VERSION_RE: Regex =
        Regex::new(r"V\d+R\d+C\d+").expect("BUG: static version regex must be valid");
    static ref PATCH_RE: Regex =
        Regex::new(r"SPC\d+").expect("BUG: static patch regex must be valid");
    static ref UPTIME_RE: Regex = Regex::new(r"(?i)uptime is\s+(.+?)\s*$")
        .expect("BUG: static uptime regex must be valid");
    static ref RUNTIME_RE: Regex =
        Regex::new(r"Run\s*time\s*:\s*(.+?)\s*$").expect("BUG: static runtime regex must be valid");
}

/// Identity block from `display version`. Fields the device did not report
/// fall back to `Unknown` / `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub product: String,
    pub version: String,
    pub patch: String,
    pub uptime: String,
}

pub fn parse_display_version(text: &str) -> VersionInfo {
    // Prefer the PRODUCT line: the VERSION line often embeds the product
    // prefix (`MA5801V100R021C00`) and would shadow the real model string.
    let product = text
        .lines()
        .filter(|line| line.to_ascii_uppercase().contains("PRODUCT"))
        .find_map(|line| PRODUCT_RE.find(line))
        .or_else(|| PRODUCT_RE.find(text))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let version = VERSION_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let patch = PATCH_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "-".to_string());

    let uptime = text
        .lines()
        .find_map(|line| {
            UPTIME_RE
                .captures(line)
                .or_else(|| RUNTIME_RE.captures(line))
        })
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "-".to_string());

    VersionInfo {
        product,
        version,
        patch,
        uptime,
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn full_banner() {
        let text = indoc! {"
            Huawei Integrated Access Software.
            VERSION : MA5801V100R021C00
            PATCH   : SPC100 SPH101
            PRODUCT : MA5801-GP08
            Uptime is 32 day(s), 11 hour(s), 26 minute(s)
        "};
        let info = parse_display_version(text);
        assert_eq!(info.product, "MA5801-GP08");
        assert_eq!(info.version, "V100R021C00");
        assert_eq!(info.patch, "SPC100");
        assert_eq!(info.uptime, "32 day(s), 11 hour(s), 26 minute(s)");
    }

    #[test]
    fn run_time_variant() {
        let text = "PRODUCT : MA5801-GP16\nRun time: 4 days 3 hours\n";
        let info = parse_display_version(text);
        assert_eq!(info.uptime, "4 days 3 hours");
    }

    #[test]
    fn missing_fields_default() {
        let info = parse_display_version("nothing recognizable here\n");
        assert_eq!(info.product, "Unknown");
        assert_eq!(info.version, "Unknown");
        assert_eq!(info.patch, "-");
        assert_eq!(info.uptime, "-");
    }
}
