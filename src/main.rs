// SPDX-License-Identifier: MIT

use clap::Parser;
use kcapi_rng::{
    cli::Cli, entropy::OsEntropy, gather::GatherBuilder, kcapi::AfAlgRng, logger, Error,
};
use std::{
    io::{self, IsTerminal, Write},
    process::ExitCode,
};

/// Allocate the kernel DRNG named in `cli`, seed it from the OS and
/// from standard input when that is not a terminal, then write the
/// requested bytes to standard output.
fn run(cli: &Cli) -> Result<(), Error> {
    let drng = AfAlgRng::new(&cli.name)?;
    let mut gatherer = GatherBuilder::new(drng, OsEntropy::new()).build()?;

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        let report = gatherer.seed_from_reader(&mut stdin.lock());
        log::info!(
            "stdin seed: {} chunks ({} bytes) accepted, {} rejected",
            report.accepted,
            report.bytes,
            report.rejected
        );
    }

    let mut out = io::stdout().lock();
    gatherer.generate_to(cli.bytes, &mut out)?;
    out.flush().map_err(Error::Output)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
