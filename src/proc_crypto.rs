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
//! Lookup of algorithm metadata in `/proc/crypto`.
//!
//! The file is a list of records separated by blank lines. Every
//! record is a sequence of `key : value` lines, for example:
//!
//! ```text
//! name         : stdrng
//! driver       : drbg_nopr_hmac_sha512
//! module       : kernel
//! priority     : 221
//! refcnt       : 2
//! selftest     : passed
//! internal     : no
//! type         : rng
//! seedsize     : 0
//! ```
use std::{fs, io};

pub const PROC_CRYPTO: &str = "/proc/crypto";

const RNG_TYPE: &str = "rng";

/// One record of `/proc/crypto`. Only the fields needed to resolve a
/// DRNG are retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlgEntry {
    pub name: String,
    pub driver: String,
    pub module: String,
    pub priority: i32,
    pub kind: String,
    pub seed_size: Option<usize>,
}

impl AlgEntry {
    fn matches(&self, name: &str) -> bool {
        self.name == name || self.driver == name
    }
}

/// Parse the contents of `/proc/crypto`.
///
/// Unknown keys are ignored and malformed lines are skipped. Records
/// without a name are dropped.
pub fn parse(text: &str) -> Vec<AlgEntry> {
    let mut entries = Vec::new();
    let mut cur = AlgEntry::default();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !cur.name.is_empty() {
                entries.push(core::mem::take(&mut cur));
            } else {
                cur = AlgEntry::default();
            }
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "name" => cur.name = value.to_string(),
            "driver" => cur.driver = value.to_string(),
            "module" => cur.module = value.to_string(),
            "priority" => cur.priority = value.parse().unwrap_or_default(),
            "type" => cur.kind = value.to_string(),
            "seedsize" => cur.seed_size = value.parse().ok(),
            _ => {}
        }
    }
    if !cur.name.is_empty() {
        entries.push(cur);
    }
    entries
}

/// Find the RNG the kernel would hand out for `name`.
///
/// `name` may be a generic name such as `stdrng` or a driver name such
/// as `drbg_nopr_hmac_sha512`. When several entries match, the one with
/// the highest priority wins.
pub fn find_rng<'a>(entries: &'a [AlgEntry], name: &str) -> Option<&'a AlgEntry> {
    entries
        .iter()
        .filter(|e| e.kind == RNG_TYPE && e.matches(name))
        .max_by_key(|e| e.priority)
}

/// Read `/proc/crypto` and return the seed size of the RNG resolved
/// for `name`, if any.
pub fn rng_seed_size(name: &str) -> io::Result<Option<usize>> {
    let text = fs::read_to_string(PROC_CRYPTO)?;
    let entries = parse(&text);
    let entry = find_rng(&entries, name);
    if let Some(e) = entry {
        log::debug!(
            "{} resolves to driver {} (module {}, priority {})",
            name,
            e.driver,
            e.module,
            e.priority
        );
    }
    Ok(entry.and_then(|e| e.seed_size))
}
