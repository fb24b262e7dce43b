/*
 * Copyright Cedar Contributors
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *      https://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Conversions between textual addresses and [`BinaryAddress`] /
//! [`IpPrefix`] values, plus display helpers for prefix entries.

use crate::err::{AddressError, Result};
use crate::lsdb::{PrefixForwardingType, PrefixType};
use crate::types::{ip_from_packed, BinaryAddress, IpPrefix, PrefixEntry};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Maximum prefix size for IpV4 addresses
pub const PREFIX_MAX_LEN_V4: u8 = 32;
/// Maximum prefix size for IpV6 addresses
pub const PREFIX_MAX_LEN_V6: u8 = 128;

/// IP protocol version of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IpVersion {
    /// IPv4
    V4,
    /// IPv6
    V6,
}

impl IpVersion {
    /// Version of the given address
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => Self::V4,
            IpAddr::V6(_) => Self::V6,
        }
    }

    /// `4` or `6`
    pub fn number(self) -> u8 {
        match self {
            Self::V4 => 4,
            Self::V6 => 6,
        }
    }

    /// Number of bits in an address of this version
    pub fn max_prefix_len(self) -> u8 {
        match self {
            Self::V4 => PREFIX_MAX_LEN_V4,
            Self::V6 => PREFIX_MAX_LEN_V6,
        }
    }
}

impl From<IpVersion> for u8 {
    fn from(version: IpVersion) -> Self {
        version.number()
    }
}

impl std::fmt::Display for IpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Binary address -> canonical text.
///
/// An unset (empty) address prints as the empty string.
pub fn sprint_addr(addr: &BinaryAddress) -> Result<String> {
    if addr.is_unset() {
        return Ok(String::new());
    }
    Ok(addr.to_ip_addr()?.to_string())
}

/// Prefix -> `addr/len`. The length is printed as is, even if it is out of
/// range for the address family.
pub fn sprint_prefix(prefix: &IpPrefix) -> Result<String> {
    Ok(format!(
        "{}/{}",
        sprint_addr(&prefix.prefix_address)?,
        prefix.prefix_length
    ))
}

/// Parse an IP literal, trying dotted-quad IPv4 before IPv6
pub(crate) fn parse_ip(text: &str) -> Result<IpAddr> {
    match text.parse::<Ipv4Addr>() {
        Ok(v4) => return Ok(IpAddr::V4(v4)),
        Err(err) => tracing::trace!(text, %err, "not an IPv4 literal, trying IPv6"),
    }
    text.parse::<Ipv6Addr>()
        .map(IpAddr::V6)
        .map_err(|_| AddressError::InvalidAddressFormat {
            src: text.to_owned(),
        })
}

/// Text -> binary address. Accepts any IPv4 or IPv6 literal.
pub fn ip_str_to_addr(text: &str) -> Result<BinaryAddress> {
    parse_ip(text).map(BinaryAddress::from)
}

/// Text of the form `addr/len` -> prefix.
///
/// Exactly one `/` is required. The length must be a base-10 integer but is
/// not range checked against the address family, so `10.0.0.0/64` parses.
/// Lengths that don't fit the `i16` field (e.g. `10.0.0.0/40000`) fail with
/// `InvalidPrefixLength`.
pub fn ip_str_to_prefix(text: &str) -> Result<IpPrefix> {
    let (addr_str, len_str) = match text.split_once('/') {
        Some((addr_str, len_str)) if !len_str.contains('/') => (addr_str, len_str),
        _ => {
            return Err(AddressError::MalformedPrefix {
                src: text.to_owned(),
            })
        }
    };
    let prefix_address = ip_str_to_addr(addr_str)?;
    let prefix_length = len_str
        .parse()
        .map_err(|source| AddressError::InvalidPrefixLength {
            src: len_str.to_owned(),
            source,
        })?;
    Ok(IpPrefix {
        prefix_address,
        prefix_length,
    })
}

/// Name of a prefix type, or `None` if the code is unknown
pub fn sprint_prefix_type(prefix_type: impl Into<PrefixType>) -> Option<&'static str> {
    prefix_type.into().name()
}

/// Name of a forwarding type, or `None` if the code is unknown
pub fn sprint_prefix_forwarding_type(
    forwarding_type: impl Into<PrefixForwardingType>,
) -> Option<&'static str> {
    forwarding_type.into().name()
}

/// `"True"` or `"False"` for display. An entry without the field is not
/// ephemeral.
pub fn sprint_prefix_is_ephemeral(entry: &PrefixEntry) -> &'static str {
    match entry.ephemeral {
        Some(true) => "True",
        Some(false) | None => "False",
    }
}

/// An address in either of the forms [`ip_version`] accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressInput<'a> {
    /// IP literal, e.g. `"10.0.0.1"`
    Text(&'a str),
    /// Packed bytes in network order
    Packed(&'a [u8]),
}

impl<'a> From<&'a str> for AddressInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for AddressInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a [u8]> for AddressInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Packed(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for AddressInput<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::Packed(bytes)
    }
}

impl<'a> From<&'a BinaryAddress> for AddressInput<'a> {
    fn from(addr: &'a BinaryAddress) -> Self {
        Self::Packed(addr.as_bytes())
    }
}

/// IP version of a textual or packed address.
///
/// Text that is no IP literal fails with `InvalidAddressFormat`; packed
/// bytes that are not 4 or 16 long (an unset address included) fail with
/// `InvalidAddressLength`.
pub fn ip_version<'a>(addr: impl Into<AddressInput<'a>>) -> Result<IpVersion> {
    let addr = match addr.into() {
        AddressInput::Text(text) => parse_ip(text)?,
        AddressInput::Packed(bytes) => ip_from_packed(bytes)?,
    };
    Ok(IpVersion::of(&addr))
}
