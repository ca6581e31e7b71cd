//! Per-call options and the protocol version value type.
//!
//! [`Options`] travels with every send call. The delegating client reads only
//! [`Options::protocol_version`]; everything else is adapter-specific and is
//! forwarded untouched.

use std::fmt;
use std::str::FromStr;

use http::Version;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Protocol version
// ---------------------------------------------------------------------------

/// HTTP protocol version used when building a request.
///
/// Wraps [`http::Version`] so it can be parsed from and rendered as the plain
/// strings used in configuration (`"1.0"`, `"1.1"`, `"2"`, `"3"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolVersion(Version);

impl ProtocolVersion {
    /// HTTP/1.0
    pub const HTTP_10: Self = Self(Version::HTTP_10);
    /// HTTP/1.1, the default.
    pub const HTTP_11: Self = Self(Version::HTTP_11);
    /// HTTP/2
    pub const HTTP_2: Self = Self(Version::HTTP_2);
    /// HTTP/3
    pub const HTTP_3: Self = Self(Version::HTTP_3);

    /// Returns the underlying [`http::Version`].
    pub fn as_version(self) -> Version {
        self.0
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::HTTP_11
    }
}

impl From<ProtocolVersion> for Version {
    fn from(value: ProtocolVersion) -> Self {
        value.0
    }
}

/// The string is not a supported HTTP protocol version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported protocol version '{0}'")]
pub struct ParseProtocolVersionError(pub String);

impl FromStr for ProtocolVersion {
    type Err = ParseProtocolVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.strip_prefix("HTTP/").unwrap_or(trimmed) {
            "1.0" => Ok(Self::HTTP_10),
            "1.1" => Ok(Self::HTTP_11),
            "2" | "2.0" => Ok(Self::HTTP_2),
            "3" | "3.0" => Ok(Self::HTTP_3),
            _ => Err(ParseProtocolVersionError(s.to_string())),
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = if self.0 == Version::HTTP_09 {
            "0.9"
        } else if self.0 == Version::HTTP_10 {
            "1.0"
        } else if self.0 == Version::HTTP_2 {
            "2.0"
        } else if self.0 == Version::HTTP_3 {
            "3.0"
        } else {
            "1.1"
        };
        f.write_str(s)
    }
}

impl Serialize for ProtocolVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProtocolVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options accompanying a send call.
///
/// Unknown keys are collected into [`Options::extra`] so adapter-specific
/// settings survive a round trip through configuration files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Protocol version for requests built by `send`. `None` means HTTP/1.1.
    #[serde(default, alias = "protocolVersion", skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<ProtocolVersion>,

    /// Adapter-specific options, forwarded verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Options {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the protocol version.
    pub fn with_protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.protocol_version = Some(version);
        self
    }

    /// Adds an adapter-specific option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Returns the configured protocol version, or HTTP/1.1.
    pub fn protocol_version_or_default(&self) -> ProtocolVersion {
        self.protocol_version.unwrap_or_default()
    }

    /// Returns an adapter-specific option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
