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
//! Handle to a random number generator of the Linux Kernel Crypto
//! API.
//!
//! The kernel exposes an RNG through two sockets. The transform
//! socket is bound to the algorithm and accepts the seed through
//! `setsockopt(ALG_SET_KEY)`. The operation socket is obtained with
//! `accept(2)` on the transform socket and yields random bytes on
//! `read(2)`, at most 128 per call.
use crate::{error::Error, proc_crypto};

use std::{
    io,
    io::ErrorKind,
    mem,
    os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd},
};

const RNG_TYPE: &[u8] = b"rng";

/// The operations a DRNG offers to its caller. Allocation is left to
/// the implementing type's constructor.
pub trait Drng {
    /// Seed length the DRNG asks for, in bytes. Zero means the DRNG
    /// does not advertise one.
    fn seed_size(&self) -> usize;

    /// Feed `seed` into the DRNG state.
    fn seed(&mut self, seed: &[u8]) -> Result<(), Error>;

    /// Fill a prefix of `buf` with random bytes and return its length.
    /// The DRNG may return fewer bytes than requested.
    fn generate(&mut self, buf: &mut [u8]) -> Result<usize, Error>;
}

/// A kernel DRNG reached through an `AF_ALG` socket.
///
/// # Example
///
/// ```no_run
/// use kcapi_rng::kcapi::{AfAlgRng, Drng};
///
/// # fn main() -> Result<(), kcapi_rng::Error> {
/// let mut rng = AfAlgRng::new("stdrng")?;
/// rng.seed(&[0x5a; 32])?;
///
/// let mut buf = [0u8; 128];
/// let len = rng.generate(&mut buf)?;
/// assert!(len <= buf.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AfAlgRng {
    name: String,
    seed_size: usize,
    tfm: OwnedFd,
    op: Option<OwnedFd>,
}

fn cvt(ret: libc::c_int) -> io::Result<libc::c_int> {
    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(ret)
    }
}

/// Build the address binding a transform socket to the RNG `name`.
fn rng_sockaddr(name: &str) -> io::Result<libc::sockaddr_alg> {
    // SAFETY: sockaddr_alg is plain old data; all-zero is a valid value.
    let mut addr: libc::sockaddr_alg = unsafe { mem::zeroed() };
    if name.is_empty() || name.len() >= addr.salg_name.len() || name.contains('\0') {
        return Err(io::Error::new(
            ErrorKind::InvalidInput,
            "DRNG name must be 1 to 63 bytes without NUL",
        ));
    }
    addr.salg_family = libc::AF_ALG as libc::sa_family_t;
    addr.salg_type[..RNG_TYPE.len()].copy_from_slice(RNG_TYPE);
    addr.salg_name[..name.len()].copy_from_slice(name.as_bytes());
    Ok(addr)
}

impl AfAlgRng {
    /// Allocate the kernel RNG advertised as `name` in `/proc/crypto`.
    ///
    /// # Error
    ///
    /// Returns [`Error::Allocate`] when the name is malformed, the
    /// kernel lacks `AF_ALG` support or no such RNG is registered.
    pub fn new(name: &str) -> Result<Self, Error> {
        let alloc = |source| Error::Allocate {
            name: name.to_string(),
            source,
        };
        let addr = rng_sockaddr(name).map_err(alloc)?;

        // SAFETY: plain syscall; the returned descriptor is owned below.
        let fd = cvt(unsafe {
            libc::socket(
                libc::AF_ALG,
                libc::SOCK_SEQPACKET | libc::SOCK_CLOEXEC,
                0,
            )
        })
        .map_err(alloc)?;
        // SAFETY: fd was just returned by socket(2) and is not shared.
        let tfm = unsafe { OwnedFd::from_raw_fd(fd) };

        // SAFETY: addr outlives the call and the length matches its type.
        cvt(unsafe {
            libc::bind(
                tfm.as_raw_fd(),
                (&addr as *const libc::sockaddr_alg).cast(),
                mem::size_of::<libc::sockaddr_alg>() as libc::socklen_t,
            )
        })
        .map_err(alloc)?;

        let seed_size = match proc_crypto::rng_seed_size(name) {
            Ok(Some(size)) => size,
            Ok(None) => {
                log::debug!("no seed size advertised for {}", name);
                0
            }
            Err(e) => {
                log::debug!("cannot read {}: {}", proc_crypto::PROC_CRYPTO, e);
                0
            }
        };
        log::info!("allocated DRNG {} (seed size {})", name, seed_size);

        Ok(Self {
            name: name.to_string(),
            seed_size,
            tfm,
            op: None,
        })
    }

    /// Name the handle was allocated with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operation socket, accepted on first use.
    fn op_fd(&mut self) -> io::Result<RawFd> {
        if let Some(op) = &self.op {
            return Ok(op.as_raw_fd());
        }
        // SAFETY: tfm is a bound AF_ALG socket; no peer address is requested.
        let fd = cvt(unsafe {
            libc::accept4(
                self.tfm.as_raw_fd(),
                core::ptr::null_mut(),
                core::ptr::null_mut(),
                libc::SOCK_CLOEXEC,
            )
        })?;
        // SAFETY: fd was just returned by accept4(2) and is not shared.
        let op = unsafe { OwnedFd::from_raw_fd(fd) };
        let raw = op.as_raw_fd();
        self.op = Some(op);
        Ok(raw)
    }
}

impl Drng for AfAlgRng {
    fn seed_size(&self) -> usize {
        self.seed_size
    }

    fn seed(&mut self, seed: &[u8]) -> Result<(), Error> {
        let rejected = |source| Error::Seed {
            len: seed.len(),
            source,
        };
        // SAFETY: seed is a live slice and its length is passed alongside.
        cvt(unsafe {
            libc::setsockopt(
                self.tfm.as_raw_fd(),
                libc::SOL_ALG,
                libc::ALG_SET_KEY,
                seed.as_ptr().cast(),
                seed.len() as libc::socklen_t,
            )
        })
        .map_err(rejected)?;
        self.op_fd().map_err(rejected)?;
        log::trace!("seeded {} with {} bytes", self.name, seed.len());
        Ok(())
    }

    fn generate(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let fd = self.op_fd().map_err(Error::Generate)?;
        loop {
            // SAFETY: buf is a live, writable slice of buf.len() bytes.
            let ret = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
            if ret >= 0 {
                return Ok(ret as usize);
            }
            let e = io::Error::last_os_error();
            if e.kind() != ErrorKind::Interrupted {
                return Err(Error::Generate(e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{rng_sockaddr, AfAlgRng, Drng};
    use crate::error::Error;
    use std::io::ErrorKind;

    #[test]
    fn sockaddr_layout() {
        let addr = rng_sockaddr("stdrng").unwrap();
        assert_eq!(libc::AF_ALG as libc::sa_family_t, addr.salg_family);
        assert_eq!(b"rng\0", &addr.salg_type[..4]);
        assert_eq!(b"stdrng\0", &addr.salg_name[..7]);
    }

    #[test]
    fn sockaddr_rejects_bad_names() {
        for name in ["", "a\0b"] {
            let err = rng_sockaddr(name).unwrap_err();
            assert_eq!(ErrorKind::InvalidInput, err.kind());
        }
        let long = "x".repeat(64);
        assert!(rng_sockaddr(&long).is_err());
        assert!(rng_sockaddr(&long[..63]).is_ok());
    }

    #[test]
    fn unknown_rng_fails_to_allocate() {
        let err = AfAlgRng::new("no_such_drng_registered").unwrap_err();
        assert!(matches!(err, Error::Allocate { ref name, .. } if name == "no_such_drng_registered"));
    }

    #[test]
    fn kernel_stdrng_generates() -> Result<(), Error> {
        let mut rng = match AfAlgRng::new("stdrng") {
            Ok(rng) => rng,
            // No AF_ALG in this environment.
            Err(_) => return Ok(()),
        };
        assert_eq!("stdrng", rng.name());
        rng.seed(&[0x42u8; 32])?;

        let mut a = [0u8; 128];
        let mut b = [0u8; 128];
        let len = rng.generate(&mut a)?;
        assert!(len > 0 && len <= a.len());
        rng.generate(&mut b)?;
        assert_ne!(a, b);
        Ok(())
    }
}
