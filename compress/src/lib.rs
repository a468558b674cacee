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

//! # Decompression Stage
//!
//! This crate provides the streaming decompressor a game connection switches to once the server
//! activates MCCP2 (MUD Client Compression Protocol, telnet option 86). From that point every
//! byte the server sends is part of a single zlib stream, split across reads at arbitrary
//! offsets, so the decompressor keeps its inflate state between calls.
//!
//! ## Features
//!
//! - **Push based**: compressed input is fed with [`Decompressor::write`]; decompressed output is
//!   handed to a sink callback as soon as it is available
//! - **Resettable**: [`Decompressor::reset`] prepares the stage for a new compressed stream on the
//!   same connection after the previous one ended
//! - **Pluggable**: the decoder only talks to the [`Decompressor`] trait, so tests can swap in
//!   [`Passthrough`]
//!
//! ## Basic Usage
//!
//! ```rust
//! use mudgate_compress::{Decompressor, ZlibInflater};
//! # use flate2::{Compression, write::ZlibEncoder};
//! # use std::io::Write;
//! # let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
//! # encoder.write_all(b"You are standing in a dark room.").unwrap();
//! # encoder.flush().unwrap();
//! # let compressed = encoder.get_ref().clone();
//!
//! let mut inflater = ZlibInflater::new();
//! let mut text = Vec::new();
//! inflater
//!     .write(&compressed, &mut |bytes| text.extend_from_slice(bytes))
//!     .unwrap();
//! assert_eq!(text, b"You are standing in a dark room.");
//! ```
//!
//! ## Stream End
//!
//! MCCP2 servers may end compression by finishing the zlib stream. [`Progress::finished`] reports
//! this; [`Progress::consumed`] then tells the caller where the uncompressed bytes resume.
//!
//! ## Thread Safety
//!
//! Decompressors are `Send` but hold per-connection state and must never be shared between
//! connections.

mod inflate;
mod result;

pub use self::inflate::{Passthrough, ZlibInflater};
pub use self::result::{CompressError, CompressResult};

/// Outcome of a single [`Decompressor::write`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Number of input bytes the decompressor took ownership of.
    ///
    /// Always equal to the input length unless `finished` is set.
    pub consumed: usize,
    /// `true` when the compressed stream reached its end marker during this call.
    ///
    /// Bytes after `consumed` are not part of the compressed stream.
    pub finished: bool,
}

/// A resettable streaming decompressor.
///
/// Implementations receive compressed bytes in arbitrary chunk sizes and report decompressed
/// output to the `sink` callback. The mapping between input chunks and sink calls is not 1:1; a
/// call may produce no output, or several sink invocations.
pub trait Decompressor: Send {
    /// Feeds compressed bytes into the stage.
    ///
    /// # Errors
    ///
    /// Returns [`CompressError`] when the input is not a valid compressed stream. The error is
    /// fatal for the owning connection; the stage must not be fed again until [`reset`].
    ///
    /// [`reset`]: Decompressor::reset
    fn write(&mut self, input: &[u8], sink: &mut dyn FnMut(&[u8])) -> CompressResult<Progress>;

    /// Discards all inflate state so the stage can accept a fresh compressed stream.
    fn reset(&mut self);

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}

/// Constructor used by the decoder to create its stage lazily on first activation.
pub type DecompressorFactory = fn() -> Box<dyn Decompressor>;

/// Default factory producing a [`ZlibInflater`].
pub fn zlib_factory() -> Box<dyn Decompressor> {
    Box::new(ZlibInflater::new())
}

/// Factory producing a [`Passthrough`] stage.
pub fn passthrough_factory() -> Box<dyn Decompressor> {
    Box::new(Passthrough::default())
}
