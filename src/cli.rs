// SPDX-License-Identifier: MIT

//! Command line options.
use clap::{ArgAction, Parser};

/// Generic name under which the kernel registers its default DRNG.
pub const DEFAULT_RNG: &str = "stdrng";

/// Kernel Crypto API Random Number Gatherer
#[derive(Debug, Parser)]
#[command(
    name = "kcapi-rng",
    version,
    after_help = "Data provided at stdin is used to seed the DRNG"
)]
pub struct Cli {
    /// Number of bytes to generate
    #[arg(
        short,
        long,
        value_name = "BYTES",
        value_parser = clap::value_parser!(u64).range(1..u64::MAX)
    )]
    pub bytes: u64,

    /// DRNG name as advertised in /proc/crypto
    #[arg(short, long, value_name = "RNGNAME", default_value = DEFAULT_RNG)]
    pub name: String,

    /// Verbose logging, multiple options increase verbosity
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
