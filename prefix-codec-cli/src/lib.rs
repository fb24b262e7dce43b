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

// This modules makes use of `return` to exit early with a particular exit code.
// For consistency, it also uses `return` in some places where it could be
// omitted.
#![allow(clippy::needless_return)]

mod err;

use clap::{ArgAction, Args, Parser, Subcommand};
use itertools::Itertools;
use miette::{Result, WrapErr};
use std::{
    net::IpAddr,
    path::Path,
    process::{ExitCode, Termination},
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use prefix_codec::{
    contain_any_prefix, ip_str_to_addr, ip_str_to_prefix, ip_version, is_link_local,
    is_same_subnet, sprint_addr, sprint_prefix, sprint_prefix_forwarding_type,
    sprint_prefix_is_ephemeral, sprint_prefix_type, AddressError, BinaryAddress, IpNetwork,
    PrefixEntry, PrefixType,
};

pub use err::{EntriesError, HexError};

/// Inspect IP addresses, prefixes and prefix entries
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Pull from `Cargo.toml`
pub struct Cli {
    #[command(flatten)]
    pub logging: LoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse an address and show its canonical form, version and packed bytes
    Addr(AddrArgs),
    /// Print the address held in packed bytes, given as hex
    FormatAddr(FormatAddrArgs),
    /// Parse a prefix written as `addr/len` and print it canonically
    Prefix(PrefixArgs),
    /// Check whether two addresses share a subnet of the given length
    SameSubnet(SameSubnetArgs),
    /// Check whether an address is link-local
    LinkLocal(LinkLocalArgs),
    /// Check whether a network is a subnet of any of the given networks
    Contains(ContainsArgs),
    /// Print a table of prefix entries read from a JSON file
    Entries(EntriesArgs),
}

/// Log verbosity. Nothing below `warn` is logged unless asked for.
#[derive(Args, Debug, Default)]
pub struct LoggingArgs {
    /// More verbose logging on stderr (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Log filter directives, e.g. `prefix_codec=trace`. Overrides --verbose.
    #[arg(long = "log", env = "PREFIXCTL_LOG", value_name = "FILTER", global = true)]
    pub filter: Option<String>,
}

impl LoggingArgs {
    /// The filter these arguments ask for
    pub fn env_filter(&self) -> EnvFilter {
        if let Some(directives) = &self.filter {
            match EnvFilter::try_new(directives) {
                Ok(filter) => return filter,
                Err(e) => eprintln!("ignoring invalid log filter `{directives}`: {e}"),
            }
        }
        let level = match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::new(level)
    }
}

#[derive(Args, Debug)]
pub struct AddrArgs {
    /// IPv4 or IPv6 address, e.g. 10.0.0.1 or fe80::1
    #[arg(value_name = "ADDRESS")]
    pub address: String,
}

#[derive(Args, Debug)]
pub struct FormatAddrArgs {
    /// Packed address as hex, e.g. 0a000001. An empty string is the unset address.
    #[arg(value_name = "HEX")]
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct PrefixArgs {
    /// Prefix, e.g. 10.0.0.0/24
    #[arg(value_name = "PREFIX")]
    pub prefix: String,
}

#[derive(Args, Debug)]
pub struct SameSubnetArgs {
    /// First address
    #[arg(value_name = "ADDRESS", value_parser = parse_addr)]
    pub first: IpAddr,
    /// Second address
    #[arg(value_name = "ADDRESS", value_parser = parse_addr)]
    pub second: IpAddr,
    /// Subnet length to compare at
    #[arg(short, long, value_name = "LEN")]
    pub length: u8,
}

#[derive(Args, Debug)]
pub struct LinkLocalArgs {
    /// Address to check
    #[arg(value_name = "ADDRESS", value_parser = parse_addr)]
    pub address: IpAddr,
}

#[derive(Args, Debug)]
pub struct ContainsArgs {
    /// Network to check, e.g. 10.0.0.0/24
    #[arg(value_name = "NETWORK")]
    pub network: IpNetwork,
    /// Candidate network; may be repeated. Without any, every network matches.
    #[arg(short, long, value_name = "NETWORK")]
    pub within: Vec<IpNetwork>,
}

#[derive(Args, Debug)]
pub struct EntriesArgs {
    /// JSON file holding an array of prefix entries. Use `-` for stdin.
    #[arg(value_name = "FILE")]
    pub entries_file: String,
    /// Only show entries that are subnets of this network; may be repeated
    #[arg(short, long, value_name = "NETWORK")]
    pub within: Vec<IpNetwork>,
    /// Only show entries of this prefix type, e.g. BGP
    #[arg(short = 't', long = "type", value_name = "TYPE", value_parser = parse_prefix_type)]
    pub prefix_type: Option<PrefixType>,
    /// Hide ephemeral entries
    #[arg(long)]
    pub persistent_only: bool,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum PrefixctlExitCode {
    // The command completed successfully, and any check it made held.
    Success,
    // The command failed to complete successfully.
    Failure,
    // The command completed successfully, but the check it made did not hold.
    Negative,
}

impl Termination for PrefixctlExitCode {
    fn report(self) -> ExitCode {
        match self {
            PrefixctlExitCode::Success => ExitCode::SUCCESS,
            PrefixctlExitCode::Failure => ExitCode::FAILURE,
            PrefixctlExitCode::Negative => ExitCode::from(2),
        }
    }
}

impl From<bool> for PrefixctlExitCode {
    fn from(holds: bool) -> Self {
        if holds {
            PrefixctlExitCode::Success
        } else {
            PrefixctlExitCode::Negative
        }
    }
}

fn parse_addr(s: &str) -> Result<IpAddr, AddressError> {
    ip_str_to_addr(s)?.to_ip_addr()
}

fn parse_prefix_type(s: &str) -> Result<PrefixType, String> {
    if let Some(prefix_type) = PrefixType::from_name(s) {
        return Ok(prefix_type);
    }
    // accept bare codes too, so types we have no name for can be selected
    s.parse::<i32>().map(PrefixType).map_err(|_| {
        let known = PrefixType::values_to_names()
            .iter()
            .sorted()
            .map(|(_, name)| name)
            .join(", ");
        format!("unknown prefix type `{s}`; expected a code or one of {known}")
    })
}

/// Parse packed address bytes written as hex, with an optional `0x`
pub fn parse_hex(text: &str) -> Result<Vec<u8>, HexError> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).map_err(|err| match err {
        hex::FromHexError::OddLength => HexError::OddLength { len: digits.len() },
        source => HexError::InvalidDigit {
            src: text.to_owned(),
            source,
        },
    })
}

fn report_failure(e: &miette::Report) -> PrefixctlExitCode {
    eprintln!("{e:?}");
    PrefixctlExitCode::Failure
}

fn addr_inner(args: &AddrArgs) -> Result<()> {
    let binary = ip_str_to_addr(&args.address)
        .wrap_err_with(|| format!("failed to parse address `{}`", args.address))?;
    println!("address: {}", sprint_addr(&binary)?);
    println!("version: {}", ip_version(&binary)?);
    println!("packed: {}", hex::encode(binary.as_bytes()));
    Ok(())
}

pub fn addr(args: &AddrArgs) -> PrefixctlExitCode {
    match addr_inner(args) {
        Ok(()) => PrefixctlExitCode::Success,
        Err(e) => report_failure(&e),
    }
}

fn format_addr_inner(args: &FormatAddrArgs) -> Result<()> {
    let bytes = parse_hex(&args.hex)?;
    debug!(len = bytes.len(), "decoded packed address");
    let text = sprint_addr(&BinaryAddress::new(bytes))
        .wrap_err_with(|| format!("`{}` is not a packed address", args.hex))?;
    println!("{text}");
    Ok(())
}

pub fn format_addr(args: &FormatAddrArgs) -> PrefixctlExitCode {
    match format_addr_inner(args) {
        Ok(()) => PrefixctlExitCode::Success,
        Err(e) => report_failure(&e),
    }
}

fn prefix_inner(args: &PrefixArgs) -> Result<()> {
    let prefix = ip_str_to_prefix(&args.prefix)
        .wrap_err_with(|| format!("failed to parse prefix `{}`", args.prefix))?;
    println!("prefix: {}", sprint_prefix(&prefix)?);
    println!("version: {}", ip_version(&prefix.prefix_address)?);
    match IpNetwork::try_from(&prefix) {
        Ok(network) => {
            println!("network: {network}");
            println!("link-local: {}", network.is_link_local());
        }
        Err(e) => {
            warn!(prefix = %args.prefix, "prefix does not form a network: {e}");
            println!("network: -");
        }
    }
    Ok(())
}

pub fn prefix(args: &PrefixArgs) -> PrefixctlExitCode {
    match prefix_inner(args) {
        Ok(()) => PrefixctlExitCode::Success,
        Err(e) => report_failure(&e),
    }
}

pub fn same_subnet(args: &SameSubnetArgs) -> PrefixctlExitCode {
    match is_same_subnet(args.first, args.second, args.length) {
        Ok(same) => {
            println!("{same}");
            return same.into();
        }
        Err(e) => {
            return report_failure(&miette::Report::new(e));
        }
    }
}

pub fn link_local(args: &LinkLocalArgs) -> PrefixctlExitCode {
    let link_local = is_link_local(args.address);
    println!("{link_local}");
    link_local.into()
}

/// An empty list of candidate networks means "no restriction"
fn restriction(within: &[IpNetwork]) -> Option<&[IpNetwork]> {
    if within.is_empty() {
        None
    } else {
        Some(within)
    }
}

pub fn contains(args: &ContainsArgs) -> PrefixctlExitCode {
    let contained = contain_any_prefix(&args.network, restriction(&args.within));
    println!("{contained}");
    contained.into()
}

/// Filters applied to the rows of `entries`
#[derive(Debug, Default, Clone)]
pub struct EntryFilter<'a> {
    /// Keep entries that are subnets of one of these; `None` keeps all
    pub within: Option<&'a [IpNetwork]>,
    /// Keep entries of this type only
    pub prefix_type: Option<PrefixType>,
    /// Drop ephemeral entries
    pub persistent_only: bool,
}

impl EntryFilter<'_> {
    fn keeps(&self, entry: &PrefixEntry) -> bool {
        if self.prefix_type.is_some_and(|t| t != entry.prefix_type) {
            return false;
        }
        if self.persistent_only && !entry.is_persistent() {
            return false;
        }
        if self.within.is_none() {
            return true;
        }
        match IpNetwork::try_from(&entry.prefix) {
            Ok(network) => contain_any_prefix(&network, self.within),
            Err(e) => {
                warn!("skipping entry whose prefix is not a network: {e}");
                false
            }
        }
    }
}

/// Render prefix entries as a table, one row per entry kept by `filter`
pub fn render_entries(entries: &[PrefixEntry], filter: &EntryFilter<'_>) -> Result<String> {
    let header = ["Prefix", "Type", "Forwarding", "Ephemeral"].map(str::to_owned);
    let mut rows = vec![header];
    for entry in entries.iter().filter(|entry| filter.keeps(entry)) {
        let prefix_type = sprint_prefix_type(entry.prefix_type)
            .map_or_else(|| format!("UNKNOWN({})", entry.prefix_type.0), str::to_owned);
        let forwarding = sprint_prefix_forwarding_type(entry.forwarding_type)
            .map_or_else(|| format!("UNKNOWN({})", entry.forwarding_type.0), str::to_owned);
        rows.push([
            sprint_prefix(&entry.prefix)?,
            prefix_type,
            forwarding,
            sprint_prefix_is_ephemeral(entry).to_owned(),
        ]);
    }
    debug!(shown = rows.len() - 1, total = entries.len(), "rendered prefix entries");

    let mut widths = [0usize; 4];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }
    Ok(rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .join("  ")
                .trim_end()
                .to_owned()
        })
        .join("\n"))
}

fn read_from_file_or_stdin(filename: &str) -> Result<String, EntriesError> {
    if filename == "-" {
        let mut src = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut src)
            .map_err(EntriesError::ReadStdin)?;
        return Ok(src);
    }
    std::fs::read_to_string(Path::new(filename)).map_err(|source| EntriesError::ReadFile {
        path: filename.to_owned(),
        source,
    })
}

/// Load prefix entries from a JSON file (or stdin for `-`)
pub fn load_entries(filename: &str) -> Result<Vec<PrefixEntry>, EntriesError> {
    let src = read_from_file_or_stdin(filename)?;
    let entries: Vec<PrefixEntry> =
        serde_json::from_str(&src).map_err(|source| EntriesError::Parse {
            path: filename.to_owned(),
            source,
        })?;
    debug!(count = entries.len(), path = filename, "loaded prefix entries");
    Ok(entries)
}

fn entries_inner(args: &EntriesArgs) -> Result<()> {
    let entries = load_entries(&args.entries_file)?;
    let filter = EntryFilter {
        within: restriction(&args.within),
        prefix_type: args.prefix_type,
        persistent_only: args.persistent_only,
    };
    println!("{}", render_entries(&entries, &filter)?);
    Ok(())
}

pub fn entries(args: &EntriesArgs) -> PrefixctlExitCode {
    match entries_inner(args) {
        Ok(()) => PrefixctlExitCode::Success,
        Err(e) => report_failure(&e),
    }
}
