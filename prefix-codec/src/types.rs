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

//! Network address structures shared with the routing daemon.
//!
//! The JSON form of these types uses the daemon's camelCase field names.
//! Binary addresses are written as their canonical text, so a prefix entry
//! reads as `{"prefix": {"prefixAddress": {"addr": "10.0.0.0"}, "prefixLength": 24}, "type": 3}`.

use crate::codec::{ip_str_to_addr, sprint_addr};
use crate::err::{AddressError, Result};
use crate::lsdb::{PrefixForwardingType, PrefixType};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Length in bytes of a packed IPv4 address
pub const V4_ADDR_LEN: usize = 4;
/// Length in bytes of a packed IPv6 address
pub const V6_ADDR_LEN: usize = 16;

/// An IP address in network byte order.
///
/// `addr` is empty when the address is unset, and otherwise 4 (IPv4) or 16
/// (IPv6) bytes long. Other lengths can be constructed but are rejected by
/// every conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "BinaryAddressRepr")]
pub struct BinaryAddress {
    /// Packed address bytes
    pub addr: Vec<u8>,
    /// Interface the address is scoped to, if any
    pub if_name: Option<SmolStr>,
}

impl BinaryAddress {
    /// Wrap packed address bytes without validating their length
    pub fn new(addr: impl Into<Vec<u8>>) -> Self {
        Self {
            addr: addr.into(),
            if_name: None,
        }
    }

    /// Attach an interface name
    pub fn with_if_name(mut self, if_name: impl Into<SmolStr>) -> Self {
        self.if_name = Some(if_name.into());
        self
    }

    /// The packed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.addr
    }

    /// Return true if no address is set
    pub fn is_unset(&self) -> bool {
        self.addr.is_empty()
    }

    /// Decode the packed bytes. An unset address has no `IpAddr` and fails
    /// like any other bad length.
    pub fn to_ip_addr(&self) -> Result<IpAddr> {
        ip_from_packed(&self.addr)
    }
}

/// Decode 4 or 16 packed bytes
pub(crate) fn ip_from_packed(bytes: &[u8]) -> Result<IpAddr> {
    if let Ok(octets) = <[u8; V4_ADDR_LEN]>::try_from(bytes) {
        return Ok(IpAddr::V4(Ipv4Addr::from(octets)));
    }
    if let Ok(octets) = <[u8; V6_ADDR_LEN]>::try_from(bytes) {
        return Ok(IpAddr::V6(Ipv6Addr::from(octets)));
    }
    Err(AddressError::InvalidAddressLength { len: bytes.len() })
}

impl From<IpAddr> for BinaryAddress {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl From<Ipv4Addr> for BinaryAddress {
    fn from(addr: Ipv4Addr) -> Self {
        Self::new(addr.octets())
    }
}

impl From<Ipv6Addr> for BinaryAddress {
    fn from(addr: Ipv6Addr) -> Self {
        Self::new(addr.octets())
    }
}

/// Serde form of [`BinaryAddress`]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinaryAddressRepr {
    addr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    if_name: Option<SmolStr>,
}

impl TryFrom<BinaryAddressRepr> for BinaryAddress {
    type Error = AddressError;

    fn try_from(repr: BinaryAddressRepr) -> Result<Self> {
        let addr = if repr.addr.is_empty() {
            Self::default()
        } else {
            ip_str_to_addr(&repr.addr)?
        };
        Ok(Self {
            if_name: repr.if_name,
            ..addr
        })
    }
}

// Serialization can fail on a bad byte length, so this can't go through
// `#[serde(into = ...)]`.
impl Serialize for BinaryAddress {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        BinaryAddressRepr {
            addr: sprint_addr(self).map_err(serde::ser::Error::custom)?,
            if_name: self.if_name.clone(),
        }
        .serialize(serializer)
    }
}

/// A CIDR prefix. The length is not checked against the address family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpPrefix {
    /// Address part of the prefix
    pub prefix_address: BinaryAddress,
    /// Number of leading bits of `prefix_address` that are significant
    pub prefix_length: i16,
}

impl IpPrefix {
    /// Build a prefix from its parts
    pub fn new(prefix_address: impl Into<BinaryAddress>, prefix_length: i16) -> Self {
        Self {
            prefix_address: prefix_address.into(),
            prefix_length,
        }
    }
}

/// A prefix advertised into the link-state database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefixEntry {
    /// The advertised prefix
    pub prefix: IpPrefix,
    /// Who originated the advertisement
    #[serde(rename = "type")]
    pub prefix_type: PrefixType,
    /// Opaque payload attached by the originator
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
    /// How traffic to the prefix is forwarded
    #[serde(default)]
    pub forwarding_type: PrefixForwardingType,
    /// Ephemeral entries are not persisted across restarts.
    /// Absent means the same as `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeral: Option<bool>,
}

impl PrefixEntry {
    /// A persistent, IP-forwarded entry with no payload
    pub fn new(prefix: IpPrefix, prefix_type: PrefixType) -> Self {
        Self {
            prefix,
            prefix_type,
            data: Vec::new(),
            forwarding_type: PrefixForwardingType::default(),
            ephemeral: None,
        }
    }

    /// Return true if this entry survives a restart
    pub fn is_persistent(&self) -> bool {
        !self.ephemeral.unwrap_or(false)
    }
}
