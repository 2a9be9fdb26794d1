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
//! Sources of seed material for the kernel DRNG.
use std::{
    fmt,
    fmt::{Debug, Display, Formatter},
    io,
    io::{ErrorKind, Read},
};

/// Error type for entropy source failures.
#[derive(Debug)]
pub struct Error {
    inner: String,
}

/// A source of cryptographically secure random data used to seed a
/// DRNG before any output is requested from it.
pub trait Entropy {
    /// Fill all of `bytes` with random data from the entropy source.
    ///
    /// # Error
    ///
    /// Returns an error if the underlying source cannot deliver the
    /// full amount.
    fn fill_bytes(&mut self, bytes: &mut [u8]) -> Result<(), Error>;
}

impl<E> Entropy for &mut E
where
    E: Entropy + ?Sized,
{
    fn fill_bytes(&mut self, bytes: &mut [u8]) -> Result<(), Error> {
        (**self).fill_bytes(bytes)
    }
}

impl Error {
    /// Wrap an error reported by an underlying entropy source.
    ///
    /// # Example
    /// ```
    /// use kcapi_rng::entropy::Error;
    ///
    /// fn fill_bytes(bytes: &mut [u8]) -> Result<(), Error> {
    ///    getrandom::getrandom(bytes).map_err(Error::new)
    /// }
    /// ```
    pub fn new<E>(error: E) -> Self
    where
        E: Display + Debug,
    {
        Self {
            inner: error.to_string(),
        }
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "entropy error: {}", self.inner)
    }
}

/// Entropy drawn from the host operating system.
///
/// On Linux this is the `getrandom(2)` system call, with
/// `/dev/urandom` used on kernels that predate it. Partial reads and
/// interrupted calls are retried until the buffer is full.
///
/// ```
/// use kcapi_rng::entropy::{OsEntropy, Entropy};
///
/// # use kcapi_rng::entropy::Error;
/// #
/// # fn main() -> Result<(),Error> {
/// #
/// let mut entropy = OsEntropy::default();
/// let mut seed = [0u8; 32];
/// entropy.fill_bytes(&mut seed)?;
/// #
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct OsEntropy {}

impl OsEntropy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Entropy for OsEntropy {
    fn fill_bytes(&mut self, bytes: &mut [u8]) -> Result<(), Error> {
        getrandom::getrandom(bytes).map_err(Error::new)
    }
}

/// Read from `reader` until `buf` is full or end of file is reached,
/// returning the number of bytes stored.
///
/// Interrupted reads are retried. A return value smaller than
/// `buf.len()` means the reader is exhausted.
pub fn read_complete<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::{read_complete, Entropy, Error, OsEntropy};
    use std::io::{self, ErrorKind, Read};

    /// Hands out at most `step` bytes per call and fails with
    /// `Interrupted` every other call.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
        interrupt: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            let n = buf.len().min(self.step).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn os_entropy_fills_buffer() -> Result<(), Error> {
        let mut entropy = OsEntropy::new();
        let mut buf = [0u8; 64];
        entropy.fill_bytes(&mut buf)?;
        assert_ne!([0u8; 64], buf);
        Ok(())
    }

    #[test]
    fn read_complete_joins_short_reads() {
        let data: Vec<u8> = (0..100).collect();
        let mut reader = Trickle {
            data: data.clone(),
            pos: 0,
            step: 7,
            interrupt: false,
        };
        let mut buf = [0u8; 40];
        assert_eq!(40, read_complete(&mut reader, &mut buf).unwrap());
        assert_eq!(&data[..40], &buf[..]);
    }

    #[test]
    fn read_complete_stops_at_eof() {
        let mut reader = &b"short"[..];
        let mut buf = [0u8; 32];
        assert_eq!(5, read_complete(&mut reader, &mut buf).unwrap());
        assert_eq!(b"short", &buf[..5]);
        assert_eq!(0, read_complete(&mut reader, &mut buf).unwrap());
    }

    #[test]
    fn read_complete_propagates_errors() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::from(ErrorKind::BrokenPipe))
            }
        }
        let mut buf = [0u8; 8];
        let err = read_complete(&mut Broken, &mut buf).unwrap_err();
        assert_eq!(ErrorKind::BrokenPipe, err.kind());
    }
}
