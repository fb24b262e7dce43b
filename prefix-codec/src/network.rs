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

//! IP networks and the subnet checks built on them.

use crate::codec::{parse_ip, IpVersion, PREFIX_MAX_LEN_V4, PREFIX_MAX_LEN_V6};
use crate::err::{AddressError, Result};
use crate::types::IpPrefix;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// IPv4 link-local range, 169.254.0.0/16
const LINK_LOCAL_V4: IpNetwork = IpNetwork {
    addr: IpAddr::V4(Ipv4Addr::new(169, 254, 0, 0)),
    prefix: 16,
};

/// IPv6 link-local range, fe80::/10
const LINK_LOCAL_V6: IpNetwork = IpNetwork {
    addr: IpAddr::V6(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 0)),
    prefix: 10,
};

/// An IP network: a base address with every bit past the prefix length
/// cleared, and a prefix length no larger than the address has bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IpNetwork {
    /// the network address, host bits zero
    addr: IpAddr,
    /// Prefix -- the part after the `/` in CIDR.
    /// A single address will have `32` here (in the IPv4 case) or `128` (in the IPv6 case).
    prefix: u8,
}

fn netmask_v4(prefix: u8) -> u32 {
    u32::MAX
        .checked_shl((PREFIX_MAX_LEN_V4 - prefix).into())
        .unwrap_or(0)
}

fn netmask_v6(prefix: u8) -> u128 {
    u128::MAX
        .checked_shl((PREFIX_MAX_LEN_V6 - prefix).into())
        .unwrap_or(0)
}

fn hostmask_v4(prefix: u8) -> u32 {
    u32::MAX.checked_shr(prefix.into()).unwrap_or(0)
}

fn hostmask_v6(prefix: u8) -> u128 {
    u128::MAX.checked_shr(prefix.into()).unwrap_or(0)
}

/// Clear the host bits of `addr`. `prefix` must be in range for the family.
fn truncate(addr: IpAddr, prefix: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => IpAddr::V4(Ipv4Addr::from(u32::from(v4) & netmask_v4(prefix))),
        IpAddr::V6(v6) => IpAddr::V6(Ipv6Addr::from(u128::from(v6) & netmask_v6(prefix))),
    }
}

/// Check `prefix` against the family of `addr`
fn check_prefix_len(addr: &IpAddr, prefix: i64) -> Result<u8> {
    let max = IpVersion::of(addr).max_prefix_len();
    match u8::try_from(prefix) {
        Ok(len) if len <= max => Ok(len),
        _ => Err(AddressError::PrefixLengthOutOfRange { len: prefix, max }),
    }
}

impl IpNetwork {
    /// Network of `addr` with the given prefix length. Fails if `addr` has
    /// bits set past the prefix length.
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self> {
        let prefix = check_prefix_len(&addr, prefix.into())?;
        if truncate(addr, prefix) != addr {
            return Err(AddressError::HostBitsSet {
                src: format!("{addr}/{prefix}"),
            });
        }
        Ok(Self { addr, prefix })
    }

    /// Network containing `addr` at the given prefix length; host bits of
    /// `addr` are masked off.
    pub fn new_truncating(addr: IpAddr, prefix: u8) -> Result<Self> {
        let prefix = check_prefix_len(&addr, prefix.into())?;
        Ok(Self {
            addr: truncate(addr, prefix),
            prefix,
        })
    }

    /// The single-address network of `addr` (a /32 or /128)
    pub fn host(addr: IpAddr) -> Self {
        Self {
            addr,
            prefix: IpVersion::of(&addr).max_prefix_len(),
        }
    }

    /// Base address of the network
    pub fn network_address(&self) -> IpAddr {
        self.addr
    }

    /// Number of network bits
    pub fn prefix_len(&self) -> u8 {
        self.prefix
    }

    /// Version of the network address
    pub fn version(&self) -> IpVersion {
        IpVersion::of(&self.addr)
    }

    /// Number of bits in an address of this network's family
    pub fn max_prefix_len(&self) -> u8 {
        self.version().max_prefix_len()
    }

    /// Return true if `addr` lies in this network
    pub fn contains(&self, addr: &IpAddr) -> bool {
        Self::host(*addr).is_in_range(self)
    }

    /// Return true if every address of `self` lies in `other`.
    /// Networks of different families are never in range of each other.
    pub fn is_in_range(&self, other: &Self) -> bool {
        match (&self.addr, &other.addr) {
            (IpAddr::V4(self_v4), IpAddr::V4(other_v4)) => {
                let self_network = u32::from(*self_v4) & netmask_v4(self.prefix);
                let other_network = u32::from(*other_v4) & netmask_v4(other.prefix);
                let self_broadcast = u32::from(*self_v4) | hostmask_v4(self.prefix);
                let other_broadcast = u32::from(*other_v4) | hostmask_v4(other.prefix);
                other_network <= self_network && self_broadcast <= other_broadcast
            }
            (IpAddr::V6(self_v6), IpAddr::V6(other_v6)) => {
                let self_network = u128::from(*self_v6) & netmask_v6(self.prefix);
                let other_network = u128::from(*other_v6) & netmask_v6(other.prefix);
                let self_broadcast = u128::from(*self_v6) | hostmask_v6(self.prefix);
                let other_broadcast = u128::from(*other_v6) | hostmask_v6(other.prefix);
                other_network <= self_network && self_broadcast <= other_broadcast
            }
            (_, _) => false,
        }
    }

    /// Return true if the whole network is link-local
    /// (169.254.0.0/16 for IPv4, fe80::/10 for IPv6)
    pub fn is_link_local(&self) -> bool {
        match self.version() {
            IpVersion::V4 => self.is_in_range(&LINK_LOCAL_V4),
            IpVersion::V6 => self.is_in_range(&LINK_LOCAL_V6),
        }
    }
}

impl std::str::FromStr for IpNetwork {
    type Err = AddressError;

    /// Parse `addr` (a single-address network) or `addr/len`. Host bits must
    /// be clear.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((addr_str, prefix_str)) => {
                if prefix_str.contains('/') {
                    return Err(AddressError::MalformedPrefix { src: s.to_owned() });
                }
                let addr = parse_ip(addr_str)?;
                let prefix = prefix_str
                    .parse()
                    .map_err(|source| AddressError::InvalidPrefixLength {
                        src: prefix_str.to_owned(),
                        source,
                    })?;
                Self::new(addr, prefix)
            }
            None => parse_ip(s).map(Self::host),
        }
    }
}

impl std::fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

impl TryFrom<&IpPrefix> for IpNetwork {
    type Error = AddressError;

    /// Host bits of the prefix address are masked off, since advertised
    /// prefixes are not always normalized.
    fn try_from(prefix: &IpPrefix) -> Result<Self> {
        let addr = prefix.prefix_address.to_ip_addr()?;
        let len = check_prefix_len(&addr, prefix.prefix_length.into())?;
        let network = Self::new_truncating(addr, len)?;
        if network.addr != addr {
            tracing::debug!(%addr, len, "masked host bits of advertised prefix");
        }
        Ok(network)
    }
}

impl From<&IpNetwork> for IpPrefix {
    fn from(network: &IpNetwork) -> Self {
        IpPrefix::new(network.addr, network.prefix.into())
    }
}

/// Return true if `addr1` and `addr2` are in the same network of length
/// `subnet_length`. Addresses of different families never are.
pub fn is_same_subnet(addr1: IpAddr, addr2: IpAddr, subnet_length: u8) -> Result<bool> {
    let net1 = IpNetwork::new_truncating(addr1, subnet_length)?;
    let net2 = IpNetwork::new_truncating(addr2, subnet_length)?;
    Ok(net1 == net2)
}

/// Return true if `addr` is a link-local address
pub fn is_link_local(addr: IpAddr) -> bool {
    IpNetwork::host(addr).is_link_local()
}

/// Return true if `a` has the same base address as `b` and is at least as
/// long.
///
/// This is narrower than range containment: `10.0.1.0/24` is inside
/// `10.0.0.0/16` but is not a subnet of it here, because the base
/// addresses differ. Use [`IpNetwork::is_in_range`] for containment.
pub fn is_subnet_of(a: &IpNetwork, b: &IpNetwork) -> bool {
    if a.network_address() != b.network_address() {
        return false;
    }
    a.prefix_len() >= b.prefix_len()
}

/// Return true if `prefix` [`is_subnet_of`] at least one of `candidates`.
/// No candidate list at all means no restriction, so the answer is `true`.
pub fn contain_any_prefix(prefix: &IpNetwork, candidates: Option<&[IpNetwork]>) -> bool {
    match candidates {
        None => true,
        Some(candidates) => candidates.iter().any(|net| is_subnet_of(prefix, net)),
    }
}
