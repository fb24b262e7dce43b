#![forbid(unsafe_code)]

use prefix_codec_cli::{
    addr, contains, entries, format_addr, link_local, prefix, same_subnet, Cli, Commands,
    PrefixctlExitCode,
};

use clap::Parser;

fn main() -> PrefixctlExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(cli.logging.env_filter())
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Addr(args) => addr(args),
        Commands::FormatAddr(args) => format_addr(args),
        Commands::Prefix(args) => prefix(args),
        Commands::SameSubnet(args) => same_subnet(args),
        Commands::LinkLocal(args) => link_local(args),
        Commands::Contains(args) => contains(args),
        Commands::Entries(args) => entries(args),
    }
}
