//
// Copyright (c) 2023 Daniel Ottavio
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE
//
//! Seeding and draining of a DRNG.
//!
//! A [`Gatherer`] is created with [`GatherBuilder`], which seeds the
//! DRNG from an [`Entropy`] source before handing it out. Additional
//! seed material may then be fed from any reader, after which random
//! bytes are pulled in chunks of at most [`RNG_BUFSIZE`].
use crate::{
    entropy::{read_complete, Entropy},
    error::Error,
    kcapi::Drng,
};

use std::io::{Read, Write};
use zeroize::Zeroizing;

/// Largest request handed to the DRNG. Matches the per-call limit of
/// the kernel's `algif_rng`.
pub const RNG_BUFSIZE: usize = 128;

/// Smallest seed fed from the entropy source: 256 bits.
pub const MIN_SEED_SIZE: usize = 32;

/// Builder for [`Gatherer`] instances.
///
/// # Example
/// ```
/// use kcapi_rng::{entropy::OsEntropy, gather::GatherBuilder, kcapi::Drng, Error};
///
/// // A stand-in DRNG that counts upwards.
/// struct Counter(u8);
///
/// impl Drng for Counter {
///     fn seed_size(&self) -> usize { 0 }
///     fn seed(&mut self, _: &[u8]) -> Result<(), Error> { Ok(()) }
///     fn generate(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
///         for b in buf.iter_mut() {
///             *b = self.0;
///             self.0 = self.0.wrapping_add(1);
///         }
///         Ok(buf.len())
///     }
/// }
///
/// # fn main() -> Result<(), Error> {
/// let mut gatherer = GatherBuilder::new(Counter(0), OsEntropy::default())
///     .min_seed_size(64)
///     .build()?;
/// assert_eq!(64, gatherer.seed_size());
///
/// let mut out = Vec::new();
/// gatherer.generate_to(300, &mut out)?;
/// assert_eq!(300, out.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GatherBuilder<D, E> {
    drng: D,
    entropy: E,
    min_seed_size: usize,
}

/// A seeded DRNG ready to produce output.
#[derive(Debug)]
pub struct Gatherer<D> {
    drng: D,
    seed_size: usize,
}

/// Outcome of feeding caller supplied seed data to the DRNG.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// Chunks the DRNG accepted.
    pub accepted: usize,
    /// Chunks the DRNG refused.
    pub rejected: usize,
    /// Bytes contained in accepted chunks.
    pub bytes: usize,
}

impl<D, E> GatherBuilder<D, E>
where
    D: Drng,
    E: Entropy,
{
    pub fn new(drng: D, entropy: E) -> Self {
        Self {
            drng,
            entropy,
            min_seed_size: MIN_SEED_SIZE,
        }
    }

    /// Lower bound for the seed length, used when the DRNG advertises
    /// a smaller seed size or none at all.
    ///
    /// By default, this value is [`MIN_SEED_SIZE`].
    ///
    /// # Panics
    ///
    /// Panics if `len` is smaller than [`MIN_SEED_SIZE`].
    pub fn min_seed_size(mut self, len: usize) -> Self {
        if len < MIN_SEED_SIZE {
            panic!("GatherBuilder: seed size below 256 bits")
        }
        self.min_seed_size = len;
        self
    }

    /// Seed the DRNG from the entropy source and return the
    /// [`Gatherer`].
    ///
    /// The seed is the larger of the DRNG's advertised seed size and
    /// the configured minimum.
    ///
    /// # Error
    ///
    /// Returns an error when the entropy source fails or the DRNG
    /// rejects the seed.
    pub fn build(mut self) -> Result<Gatherer<D>, Error> {
        let seed_size = self.drng.seed_size().max(self.min_seed_size);
        let mut seed = Zeroizing::new(vec![0u8; seed_size]);
        self.entropy.fill_bytes(&mut seed)?;
        self.drng.seed(&seed)?;
        log::debug!("seeded DRNG with {} bytes of OS entropy", seed_size);

        Ok(Gatherer {
            drng: self.drng,
            seed_size,
        })
    }
}

impl<D> Gatherer<D>
where
    D: Drng,
{
    /// Length of the seed used at build time, also the chunk length
    /// for [`seed_from_reader`](Self::seed_from_reader).
    pub fn seed_size(&self) -> usize {
        self.seed_size
    }

    /// Feed everything `reader` yields to the DRNG, one
    /// [`seed_size`](Self::seed_size) chunk at a time. The last chunk
    /// may be shorter.
    ///
    /// Rejected chunks and read errors are logged and never abort the
    /// caller: this data supplements the OS entropy the DRNG already
    /// holds. A read error ends the input.
    pub fn seed_from_reader<R: Read>(&mut self, reader: &mut R) -> SeedReport {
        let mut chunk = Zeroizing::new(vec![0u8; self.seed_size]);
        let mut report = SeedReport::default();
        loop {
            let len = match read_complete(reader, &mut chunk) {
                Ok(0) => break,
                Ok(len) => len,
                Err(e) => {
                    log::warn!("cannot read seed input: {}", e);
                    break;
                }
            };
            match self.drng.seed(&chunk[..len]) {
                Ok(()) => {
                    report.accepted += 1;
                    report.bytes += len;
                }
                Err(e) => {
                    log::warn!("user-provided seed of {} bytes not accepted: {}", len, e);
                    report.rejected += 1;
                }
            }
            if len < chunk.len() {
                break;
            }
        }
        report
    }

    /// Write exactly `len` random bytes to `out`.
    ///
    /// Requests to the DRNG never exceed [`RNG_BUFSIZE`] bytes; short
    /// results are written as-is and the remainder requested again.
    ///
    /// # Error
    ///
    /// Fails when the DRNG reports an error or returns no data, or
    /// when `out` cannot be written.
    pub fn generate_to<W: Write>(&mut self, len: u64, out: &mut W) -> Result<(), Error> {
        let mut buf = Zeroizing::new([0u8; RNG_BUFSIZE]);
        let mut remaining = len;
        while remaining > 0 {
            let todo = remaining.min(RNG_BUFSIZE as u64) as usize;
            let got = self.drng.generate(&mut buf[..todo])?.min(todo);
            if got == 0 {
                return Err(Error::NoData);
            }
            out.write_all(&buf[..got]).map_err(Error::Output)?;
            remaining -= got as u64;
        }
        log::debug!("generated {} bytes", len);
        Ok(())
    }

    pub fn into_inner(self) -> D {
        self.drng
    }
}
