// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Host platform version, used for capability gating.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Major/minor version of the platform hosting the health store.
///
/// Patch components are accepted when parsing but ignored, since no
/// capability is gated on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlatformVersion {
    pub major: u16,
    pub minor: u16,
}

impl PlatformVersion {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for PlatformVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError(s.to_string()));
        }

        let mut parts = trimmed.split('.');
        let parse_part = |part: Option<&str>| -> Result<u16, VersionParseError> {
            match part {
                None => Ok(0),
                Some(p) => p.parse().map_err(|_| VersionParseError(s.to_string())),
            }
        };

        let major = parse_part(parts.next())?;
        let minor = parse_part(parts.next())?;
        // Patch is validated but dropped
        parse_part(parts.next())?;

        if parts.next().is_some() {
            return Err(VersionParseError(s.to_string()));
        }

        Ok(Self { major, minor })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid platform version: {0:?}")]
pub struct VersionParseError(pub String);
