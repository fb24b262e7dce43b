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

// PANIC SAFETY tests
#![allow(clippy::expect_used)]
// PANIC SAFETY tests
#![allow(clippy::unwrap_used)]

use cool_asserts::assert_matches;
use prefix_codec::{IpNetwork, PrefixType};
use prefix_codec_cli::{
    addr, contains, entries, format_addr, link_local, load_entries, parse_hex, prefix,
    render_entries, same_subnet, AddrArgs, ContainsArgs, EntriesArgs, EntriesError, EntryFilter,
    FormatAddrArgs, HexError, LinkLocalArgs, PrefixArgs, PrefixctlExitCode, SameSubnetArgs,
};

const SAMPLE_ENTRIES: &str = "sample-data/entries.json";

fn net(text: &str) -> IpNetwork {
    text.parse().expect("should be a valid network")
}

#[test]
fn test_addr() {
    let run = |address: &str| {
        addr(&AddrArgs {
            address: address.into(),
        })
    };
    assert_eq!(run("10.0.0.1"), PrefixctlExitCode::Success);
    assert_eq!(run("fe80::1"), PrefixctlExitCode::Success);
    assert_eq!(run("10.0.0.256"), PrefixctlExitCode::Failure);
    assert_eq!(run("10.0.0.0/8"), PrefixctlExitCode::Failure);
}

#[test]
fn test_format_addr() {
    let run = |hex: &str| format_addr(&FormatAddrArgs { hex: hex.into() });
    assert_eq!(run("0a000001"), PrefixctlExitCode::Success);
    assert_eq!(run("0xfe800000000000000000000000000001"), PrefixctlExitCode::Success);
    // the unset address prints as an empty line
    assert_eq!(run(""), PrefixctlExitCode::Success);
    assert_eq!(run("0a0000"), PrefixctlExitCode::Failure);
    assert_eq!(run("0a00000"), PrefixctlExitCode::Failure);
    assert_eq!(run("zz000001"), PrefixctlExitCode::Failure);
}

#[test]
fn test_parse_hex() {
    assert_eq!(parse_hex("0a000001").unwrap(), vec![10, 0, 0, 1]);
    assert_eq!(parse_hex("0xFF").unwrap(), vec![255]);
    assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
    assert_matches!(parse_hex("abc"), Err(HexError::OddLength { len: 3 }));
    assert_matches!(parse_hex("+f"), Err(HexError::InvalidDigit { .. }));
    assert_matches!(parse_hex("0x0x01"), Err(HexError::InvalidDigit { .. }));
    assert_matches!(
        parse_hex("0a0000g1"),
        Err(HexError::InvalidDigit { src, source: hex::FromHexError::InvalidHexCharacter { c: 'g', index: 6 } }) => assert_eq!(src, "0a0000g1")
    );
    // the odd length counts digits after the `0x`
    assert_matches!(parse_hex("0xabc"), Err(HexError::OddLength { len: 3 }));
}

#[test]
fn test_load_entries_errors() {
    assert_matches!(
        load_entries("sample-data/bad-address.json"),
        Err(EntriesError::Parse { path, .. }) => assert_eq!(path, "sample-data/bad-address.json")
    );
    assert_matches!(
        load_entries("sample-data/does-not-exist.json"),
        Err(EntriesError::ReadFile { source, .. }) => assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
    );
}

#[test]
fn test_prefix() {
    let run = |text: &str| prefix(&PrefixArgs {
        prefix: text.into(),
    });
    assert_eq!(run("10.0.0.0/24"), PrefixctlExitCode::Success);
    assert_eq!(run("2001:DB8::/32"), PrefixctlExitCode::Success);
    // out of range lengths still parse; they just don't form a network
    assert_eq!(run("10.0.0.0/64"), PrefixctlExitCode::Success);
    assert_eq!(run("bad"), PrefixctlExitCode::Failure);
    assert_eq!(run("10.0.0.0/x"), PrefixctlExitCode::Failure);
}

#[test]
fn test_same_subnet() {
    let run = |first: &str, second: &str, length: u8| {
        same_subnet(&SameSubnetArgs {
            first: first.parse().unwrap(),
            second: second.parse().unwrap(),
            length,
        })
    };
    assert_eq!(run("10.0.0.1", "10.0.0.254", 24), PrefixctlExitCode::Success);
    assert_eq!(run("10.0.0.1", "10.1.0.1", 24), PrefixctlExitCode::Negative);
    assert_eq!(run("10.0.0.1", "10.1.0.1", 40), PrefixctlExitCode::Failure);
}

#[test]
fn test_link_local() {
    let run = |address: &str| {
        link_local(&LinkLocalArgs {
            address: address.parse().unwrap(),
        })
    };
    assert_eq!(run("169.254.1.1"), PrefixctlExitCode::Success);
    assert_eq!(run("fe80::1"), PrefixctlExitCode::Success);
    assert_eq!(run("10.0.0.1"), PrefixctlExitCode::Negative);
}

#[test]
fn test_contains() {
    let run = |network: &str, within: &[&str]| {
        contains(&ContainsArgs {
            network: net(network),
            within: within.iter().map(|n| net(n)).collect(),
        })
    };
    assert_eq!(run("10.0.0.0/24", &[]), PrefixctlExitCode::Success);
    assert_eq!(run("10.0.0.0/24", &["10.0.0.0/16"]), PrefixctlExitCode::Success);
    assert_eq!(
        run("10.0.0.0/24", &["192.168.0.0/16"]),
        PrefixctlExitCode::Negative
    );
    assert_eq!(
        run("10.0.1.0/24", &["10.0.0.0/16"]),
        PrefixctlExitCode::Negative
    );
}

#[test]
fn test_render_all_entries() {
    let loaded = load_entries(SAMPLE_ENTRIES).unwrap();
    assert_eq!(loaded.len(), 4);
    let table = render_entries(&loaded, &EntryFilter::default()).unwrap();
    let expected = "\
Prefix          Type              Forwarding  Ephemeral
10.0.0.0/24     LOOPBACK          IP          False
10.0.1.0/24     BGP               SR_MPLS     False
fc00:cafe::/64  PREFIX_ALLOCATOR  IP          True
192.168.0.0/16  UNKNOWN(99)       UNKNOWN(7)  False";
    assert_eq!(table, expected);
}

#[test]
fn test_render_filtered_entries() {
    let loaded = load_entries(SAMPLE_ENTRIES).unwrap();
    let within = [net("10.0.0.0/8")];
    let filter = EntryFilter {
        within: Some(&within),
        ..EntryFilter::default()
    };
    assert_eq!(
        render_entries(&loaded, &filter).unwrap(),
        "Prefix       Type      Forwarding  Ephemeral\n10.0.0.0/24  LOOPBACK  IP          False"
    );

    let filter = EntryFilter {
        persistent_only: true,
        ..EntryFilter::default()
    };
    let table = render_entries(&loaded, &filter).unwrap();
    assert_eq!(table.lines().count(), 4);
    assert!(!table.contains("fc00:cafe::/64"));

    let filter = EntryFilter {
        prefix_type: Some(PrefixType::BGP),
        ..EntryFilter::default()
    };
    let table = render_entries(&loaded, &filter).unwrap();
    assert_eq!(table.lines().count(), 2);
    assert!(table.contains("10.0.1.0/24"));

    let filter = EntryFilter {
        prefix_type: Some(PrefixType::RIB),
        ..EntryFilter::default()
    };
    assert_eq!(
        render_entries(&loaded, &filter).unwrap(),
        "Prefix  Type  Forwarding  Ephemeral"
    );
}

#[test]
fn test_entries() {
    let run = |file: &str, within: &[&str]| {
        entries(&EntriesArgs {
            entries_file: file.into(),
            within: within.iter().map(|n| net(n)).collect(),
            prefix_type: None,
            persistent_only: false,
        })
    };
    assert_eq!(run(SAMPLE_ENTRIES, &[]), PrefixctlExitCode::Success);
    assert_eq!(run(SAMPLE_ENTRIES, &["fc00:cafe::/48"]), PrefixctlExitCode::Success);
    assert_eq!(
        run("sample-data/bad-address.json", &[]),
        PrefixctlExitCode::Failure
    );
    assert_eq!(
        run("sample-data/does-not-exist.json", &[]),
        PrefixctlExitCode::Failure
    );
}
