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

//! Integer enumerations from the link-state database schema.
//!
//! These are open enumerations: any `i32` is a representable value, since
//! peers running newer software may advertise codes we don't know yet.
//! Only the known codes have a name.

use serde::{Deserialize, Serialize};

/// Declares an open integer enumeration: a newtype over `i32` with one
/// associated constant per known value and a name table next to it.
macro_rules! lsdb_enum {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            $( $(#[$vmeta])* pub const $variant: Self = Self($value); )+

            /// Map from every known code to its name
            pub fn values_to_names() -> &'static std::collections::HashMap<i32, &'static str> {
                lazy_static::lazy_static! {
                    static ref VALUES_TO_NAMES: std::collections::HashMap<i32, &'static str> =
                        std::collections::HashMap::from([
                            $( ($value, stringify!($variant)), )+
                        ]);
                }
                &VALUES_TO_NAMES
            }

            /// Name of this value, or `None` if the code is unknown
            pub fn name(self) -> Option<&'static str> {
                Self::values_to_names().get(&self.0).copied()
            }

            /// Look a value up by its exact name
            pub fn from_name(name: &str) -> Option<Self> {
                Self::values_to_names()
                    .iter()
                    .find(|(_, n)| **n == name)
                    .map(|(code, _)| Self(*code))
            }
        }

        impl From<i32> for $name {
            fn from(code: i32) -> Self {
                Self(code)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self.name() {
                    Some(name) => write!(f, "{name}"),
                    None => write!(f, "{}", self.0),
                }
            }
        }
    };
}

lsdb_enum! {
    /// Origin of an advertised prefix
    pub struct PrefixType {
        /// Node loopback address
        LOOPBACK = 1,
        /// Default route originated by this node
        DEFAULT = 2,
        /// Learned from BGP
        BGP = 3,
        /// Assigned by the prefix allocator
        PREFIX_ALLOCATOR = 4,
        /// Injected from the operator CLI
        BREEZE = 5,
        /// Redistributed from the local RIB
        RIB = 6,
        /// Reserved for site-specific use
        TYPE_1 = 21,
        #[allow(missing_docs)]
        TYPE_2 = 22,
        #[allow(missing_docs)]
        TYPE_3 = 23,
        #[allow(missing_docs)]
        TYPE_4 = 24,
        #[allow(missing_docs)]
        TYPE_5 = 25,
    }
}

lsdb_enum! {
    /// How traffic towards a prefix is forwarded
    pub struct PrefixForwardingType {
        /// Plain IP next-hops
        IP = 0,
        /// Segment routing over MPLS labels
        SR_MPLS = 1,
    }
}

impl Default for PrefixForwardingType {
    fn default() -> Self {
        Self::IP
    }
}

// PANIC SAFETY: Unit Test Code
#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names() {
        assert_eq!(PrefixType::LOOPBACK.name(), Some("LOOPBACK"));
        assert_eq!(PrefixType::BGP.name(), Some("BGP"));
        assert_eq!(PrefixType(25).name(), Some("TYPE_5"));
        assert_eq!(PrefixForwardingType::SR_MPLS.name(), Some("SR_MPLS"));
        assert_eq!(PrefixForwardingType::default(), PrefixForwardingType::IP);
    }

    #[test]
    fn unknown_codes_have_no_name() {
        assert_eq!(PrefixType(0).name(), None);
        assert_eq!(PrefixType(7).name(), None);
        assert_eq!(PrefixForwardingType(-1).name(), None);
        assert_eq!(PrefixType(42).to_string(), "42");
        assert_eq!(PrefixType::RIB.to_string(), "RIB");
    }

    #[test]
    fn from_name() {
        assert_eq!(
            PrefixType::from_name("PREFIX_ALLOCATOR"),
            Some(PrefixType::PREFIX_ALLOCATOR)
        );
        assert_eq!(PrefixType::from_name("prefix_allocator"), None);
        assert_eq!(
            PrefixForwardingType::from_name("IP"),
            Some(PrefixForwardingType::IP)
        );
    }

    #[test]
    fn tables_are_complete() {
        assert_eq!(PrefixType::values_to_names().len(), 11);
        assert_eq!(PrefixForwardingType::values_to_names().len(), 2);
    }

    #[test]
    fn serializes_as_code() {
        let json = serde_json::to_string(&PrefixType::BREEZE).unwrap();
        assert_eq!(json, "5");
        let parsed: PrefixForwardingType = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, PrefixForwardingType::SR_MPLS);
    }
}
