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
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A GPON Frame/Slot/Port triple, e.g. `0/1/0`.
///
/// The device sometimes inserts spaces inside the triple (`0/ 1/0`);
/// parsing normalizes those away so every port string leaving the system
/// matches `\d+/\d+/\d+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GponPort {
    pub frame: u8,
    pub slot: u8,
    pub port: u8,
}

impl GponPort {
    pub fn new(frame: u8, slot: u8, port: u8) -> Self {
        Self { frame, slot, port }
    }

    /// The `frame/slot` pair as used by `interface gpon <frame/slot>`.
    pub fn interface(&self) -> String {
        format!("{}/{}", self.frame, self.slot)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid F/S/P port string: {0:?}")]
pub struct PortParseError(pub String);

impl FromStr for GponPort {
    type Err = PortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let mut parts = compact.split('/');
        let (Some(frame), Some(slot), Some(port), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(PortParseError(s.to_string()));
        };
        let parse = |p: &str| p.parse::<u8>().map_err(|_| PortParseError(s.to_string()));
        Ok(Self {
            frame: parse(frame)?,
            slot: parse(slot)?,
            port: parse(port)?,
        })
    }
}

impl Display for GponPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.frame, self.slot, self.port)
    }
}

impl Serialize for GponPort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GponPort {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes() {
        assert_eq!("0/1/0".parse::<GponPort>().unwrap(), GponPort::new(0, 1, 0));
        assert_eq!(
            "0/ 1/0".parse::<GponPort>().unwrap(),
            GponPort::new(0, 1, 0)
        );
        assert_eq!(
            " 0 / 12 / 7 ".parse::<GponPort>().unwrap(),
            GponPort::new(0, 12, 7)
        );
        assert_eq!(GponPort::new(0, 12, 7).to_string(), "0/12/7");
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<GponPort>().is_err());
        assert!("0/1".parse::<GponPort>().is_err());
        assert!("0/1/2/3".parse::<GponPort>().is_err());
        assert!("a/b/c".parse::<GponPort>().is_err());
        assert!("0/1/300".parse::<GponPort>().is_err());
    }

    #[test]
    fn interface_is_frame_slot() {
        assert_eq!(GponPort::new(0, 1, 0).interface(), "0/1");
    }
}
