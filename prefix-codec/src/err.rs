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

//! Errors raised while converting addresses and prefixes.

use miette::Diagnostic;
use std::num::ParseIntError;
use thiserror::Error;

/// Potential errors when converting between textual and binary addresses,
/// or when forming a network from an address and a prefix length.
#[derive(Debug, Clone, PartialEq, Eq, Diagnostic, Error)]
#[non_exhaustive]
pub enum AddressError {
    /// A binary address was neither 4 (IPv4) nor 16 (IPv6) bytes long
    #[error("binary address has invalid length {len}")]
    #[diagnostic(help("a binary address is 4 bytes (IPv4) or 16 bytes (IPv6) long"))]
    InvalidAddressLength {
        /// Length of the offending byte sequence
        len: usize,
    },

    /// The text is neither an IPv4 nor an IPv6 literal
    #[error("`{src}` is not a valid IPv4 or IPv6 address")]
    InvalidAddressFormat {
        /// The text that failed to parse
        src: String,
    },

    /// The text is not of the form `addr/len`
    #[error("`{src}` is not a well-formed prefix")]
    #[diagnostic(help("a prefix is written as `<address>/<length>`, e.g. `10.0.0.0/24`"))]
    MalformedPrefix {
        /// The text that failed to parse
        src: String,
    },

    /// The part after the `/` is not an integer
    #[error("invalid prefix length `{src}`: {source}")]
    InvalidPrefixLength {
        /// The length text that failed to parse
        src: String,
        /// Underlying integer parse error
        source: ParseIntError,
    },

    /// A network cannot have more prefix bits than its address has
    #[error("prefix length {len} is larger than the limit {max}")]
    PrefixLengthOutOfRange {
        /// Requested prefix length
        len: i64,
        /// Maximum for the address family (32 or 128)
        max: u8,
    },

    /// A network was written with bits set below its prefix length
    #[error("`{src}` has host bits set")]
    #[diagnostic(help("use the network address, or truncate the host bits explicitly"))]
    HostBitsSet {
        /// Textual form of the offending network
        src: String,
    },
}

/// Type alias for convenience
pub type Result<T> = std::result::Result<T, AddressError>;
