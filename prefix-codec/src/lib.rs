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

//! Conversions between textual IP addresses/prefixes and the binary address
//! structures of a link-state routing daemon, along with the subnet checks
//! its tooling needs.
//!
//! ```
//! use prefix_codec::{ip_str_to_prefix, sprint_prefix, IpNetwork, is_subnet_of};
//!
//! let prefix = ip_str_to_prefix("2001:DB8::/32").unwrap();
//! assert_eq!(sprint_prefix(&prefix).unwrap(), "2001:db8::/32");
//!
//! let a: IpNetwork = "10.0.0.0/24".parse().unwrap();
//! let b: IpNetwork = "10.0.0.0/16".parse().unwrap();
//! assert!(is_subnet_of(&a, &b));
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod codec;
pub use codec::*;
pub mod err;
pub use err::AddressError;
pub mod lsdb;
pub use lsdb::{PrefixForwardingType, PrefixType};
pub mod network;
pub use network::*;
pub mod types;
pub use types::{BinaryAddress, IpPrefix, PrefixEntry};
