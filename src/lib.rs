// SPDX-License-Identifier: MIT

//! Gather random bytes from a DRNG living in the Linux Kernel Crypto
//! API.
//!
//! The kernel exposes its random number generators through `AF_ALG`
//! sockets of type `rng`. This crate opens such a socket with
//! [`AfAlgRng`](kcapi::AfAlgRng), seeds it from the operating system
//! entropy source (and optionally from caller supplied data) and
//! drains it in chunks of at most
//! [`RNG_BUFSIZE`](gather::RNG_BUFSIZE) bytes.
//!
//! # Quick Example
//!
//! ```no_run
//! use kcapi_rng::{entropy::OsEntropy, gather::GatherBuilder, kcapi::AfAlgRng};
//!
//! # fn main() -> Result<(), kcapi_rng::Error> {
//! let drng = AfAlgRng::new("stdrng")?;
//! let mut gatherer = GatherBuilder::new(drng, OsEntropy::default()).build()?;
//!
//! let mut out = Vec::new();
//! gatherer.generate_to(64, &mut out)?;
//! assert_eq!(out.len(), 64);
//! # Ok(())
//! # }
//! ```
//!
//! The `kcapi-rng` binary wraps the same pipeline behind a command
//! line interface and writes to standard output.
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(target_os = "linux"))]
compile_error!("kcapi-rng talks to the Linux Kernel Crypto API and only builds on Linux");

pub mod cli;
pub mod entropy;
pub mod error;
pub mod gather;
pub mod kcapi;
pub mod logger;
pub mod proc_crypto;

pub use error::Error;
