//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use crate::{CompressError, CompressResult, Decompressor, Progress};
use flate2::{Decompress, FlushDecompress, Status};
use std::fmt;
use tracing::trace;

const SCRATCH_SIZE: usize = 8192;

/// Zlib (RFC 1950) inflater backing MCCP2.
///
/// Keeps a persistent [`Decompress`] context because the server sends one continuous zlib stream
/// split across reads.
pub struct ZlibInflater {
    inner: Decompress,
    scratch: Box<[u8]>,
    finished: bool,
}

impl ZlibInflater {
    /// Creates an inflater expecting a zlib header.
    pub fn new() -> Self {
        Self {
            inner: Decompress::new(true),
            scratch: vec![0; SCRATCH_SIZE].into_boxed_slice(),
            finished: false,
        }
    }
}

impl Default for ZlibInflater {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ZlibInflater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZlibInflater")
            .field("total_in", &self.inner.total_in())
            .field("total_out", &self.inner.total_out())
            .field("finished", &self.finished)
            .finish()
    }
}

impl Decompressor for ZlibInflater {
    fn write(&mut self, input: &[u8], sink: &mut dyn FnMut(&[u8])) -> CompressResult<Progress> {
        if input.is_empty() {
            return Ok(Progress {
                consumed: 0,
                finished: self.finished,
            });
        }
        if self.finished {
            return Err(CompressError::Finished { name: self.name() });
        }
        let mut consumed = 0usize;
        loop {
            let before_in = self.inner.total_in();
            let before_out = self.inner.total_out();
            let status =
                self.inner
                    .decompress(&input[consumed..], &mut self.scratch, FlushDecompress::Sync)?;
            let read = (self.inner.total_in() - before_in) as usize;
            let produced = (self.inner.total_out() - before_out) as usize;
            consumed += read;
            if produced > 0 {
                sink(&self.scratch[..produced]);
            }
            if status == Status::StreamEnd {
                trace!(consumed, "zlib stream finished");
                self.finished = true;
                return Ok(Progress {
                    consumed,
                    finished: true,
                });
            }
            // A full scratch buffer may still leave output buffered inside the inflater.
            if produced == self.scratch.len() {
                continue;
            }
            if consumed >= input.len() || (read == 0 && produced == 0) {
                break;
            }
        }
        Ok(Progress {
            consumed,
            finished: false,
        })
    }

    fn reset(&mut self) {
        self.inner.reset(true);
        self.finished = false;
    }

    fn name(&self) -> &'static str {
        "zlib"
    }
}

/// Identity stage delivering its input unchanged.
///
/// Useful when exercising compression routing without producing real zlib data.
#[derive(Debug, Default)]
pub struct Passthrough {
    total: u64,
}

impl Passthrough {
    /// Bytes passed through since creation or the last reset.
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Decompressor for Passthrough {
    fn write(&mut self, input: &[u8], sink: &mut dyn FnMut(&[u8])) -> CompressResult<Progress> {
        if !input.is_empty() {
            sink(input);
        }
        self.total += input.len() as u64;
        Ok(Progress {
            consumed: input.len(),
            finished: false,
        })
    }

    fn reset(&mut self) {
        self.total = 0;
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}
