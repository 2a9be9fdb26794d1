// SPDX-License-Identifier: MIT

//! Crate-wide error type.
use crate::entropy;
use std::io;
use thiserror::Error;

/// Errors that abort random number gathering.
#[derive(Debug, Error)]
pub enum Error {
    /// The operating system entropy source failed.
    #[error(transparent)]
    Entropy(#[from] entropy::Error),
    /// The kernel could not allocate the requested DRNG.
    #[error("cannot allocate DRNG {name}: {source}")]
    Allocate { name: String, source: io::Error },
    /// The DRNG rejected a seed.
    #[error("DRNG rejected seed of {len} bytes: {source}")]
    Seed { len: usize, source: io::Error },
    /// The generate operation failed.
    #[error("DRNG generate failed: {0}")]
    Generate(#[source] io::Error),
    /// The generate operation succeeded but produced nothing.
    #[error("DRNG returned no data")]
    NoData,
    /// Writing random bytes to the output failed.
    #[error("cannot write output: {0}")]
    Output(#[source] io::Error),
}
