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

use crate::consts::{self, option};
use crate::gmcp;
use crate::{CodecResult, DecoderConfig, StreamEvent};
use bytes::{Bytes, BytesMut};
use mudgate_compress::{Decompressor, DecompressorFactory, zlib_factory};
use std::fmt;
use tracing::{debug, trace};

/// Reply sent once to the first compression offer
pub const COMPRESS_ACKNOWLEDGE: [u8; 3] = [consts::IAC, consts::DO, option::COMPRESS2];

/// Largest unterminated subnegotiation held between chunks, header included
pub const MAX_SUBNEGOTIATION: usize = 64 * 1024;

///
/// Per-connection decoder state.
///
/// Everything the decoder needs to resume between chunks lives here and is threaded explicitly
/// through [`decode`]. One value belongs to exactly one game connection and is dropped with it.
///
pub struct DecoderState {
    config: DecoderConfig,
    factory: DecompressorFactory,
    compression_enabled: bool,
    inflater: Option<Box<dyn Decompressor>>,
    /// Tail of a chunk that ended inside a control sequence, starting at its IAC.
    pending: Option<BytesMut>,
    /// Offset in `pending` where the search for the closing IAC SE resumes.
    resume: usize,
    /// Undecoded body bytes. Between calls this holds at most an incomplete UTF-8 sequence.
    utf8_tail: Vec<u8>,
    extension_acknowledged: bool,
    compression_acknowledged: bool,
}

impl DecoderState {
    /// Creates a state with the default configuration and a zlib decompression stage.
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Creates a state with the given negotiation settings.
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            factory: zlib_factory,
            compression_enabled: false,
            inflater: None,
            pending: None,
            resume: 0,
            utf8_tail: Vec::new(),
            extension_acknowledged: false,
            compression_acknowledged: false,
        }
    }

    /// Replaces the constructor used for the decompression stage.
    ///
    /// Must be called before compression is first activated to have any effect.
    pub fn with_factory(mut self, factory: DecompressorFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Negotiation settings
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// `true` once the game activated compression and until the compressed stream ends
    pub fn is_compressing(&self) -> bool {
        self.compression_enabled
    }

    /// `true` while a partial control sequence is waiting for more bytes
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Scans uncompressed telnet bytes, returning how many bytes of `input` were consumed.
    ///
    /// Scanning stops right after a compression start so the caller can route the remaining
    /// bytes through the decompression stage. Every other return consumes all of `input`.
    fn scan(&mut self, input: &[u8], events: &mut Vec<StreamEvent>) -> usize {
        let joined;
        let (buf, offset): (&[u8], usize) = match self.pending.take() {
            Some(mut pending) => {
                let offset = pending.len();
                pending.extend_from_slice(input);
                joined = pending;
                (&joined[..], offset)
            }
            None => (input, 0),
        };
        let resume = std::mem::take(&mut self.resume);

        let mut i = 0;
        while i < buf.len() {
            if buf[i] != consts::IAC {
                let end = buf[i..]
                    .iter()
                    .position(|&b| b == consts::IAC)
                    .map_or(buf.len(), |p| i + p);
                self.utf8_tail.extend_from_slice(&buf[i..end]);
                i = end;
                continue;
            }

            let Some(&verb) = buf.get(i + 1) else {
                self.hold(&buf[i..]);
                return input.len();
            };
            match verb {
                consts::IAC => {
                    self.utf8_tail.push(consts::IAC);
                    i += 2;
                }
                consts::WILL | consts::WONT | consts::DO | consts::DONT => {
                    let Some(&opt) = buf.get(i + 2) else {
                        self.hold(&buf[i..]);
                        return input.len();
                    };
                    if verb == consts::WILL {
                        self.offered(opt, events);
                    } else {
                        trace!(verb, option = opt, "ignoring negotiation");
                    }
                    i += 3;
                }
                consts::SB => {
                    // Only a held subnegotiation starts at 0 with a saved resume point.
                    let start = if i == 0 { resume.max(3) } else { i + 3 };
                    let end = match find_subnegotiation_end(buf, start) {
                        Ok(end) => end,
                        Err(_) if buf.len() - i > MAX_SUBNEGOTIATION => {
                            debug!(
                                option = ?buf.get(i + 2),
                                len = buf.len() - i,
                                "dropping oversized subnegotiation"
                            );
                            return input.len();
                        }
                        Err(stopped) => {
                            self.hold(&buf[i..]);
                            self.resume = stopped - i;
                            return input.len();
                        }
                    };
                    let opt = buf[i + 2];
                    let payload = unescape(&buf[i + 3..end]);
                    i = end + 2;
                    match opt {
                        option::COMPRESS2 if self.compression_enabled => {
                            trace!("compression already active");
                        }
                        option::COMPRESS2 => {
                            self.flush_text(events, true);
                            self.compression_enabled = true;
                            if self.inflater.is_none() {
                                self.inflater = Some((self.factory)());
                            }
                            debug!("compression activated");
                            events.push(StreamEvent::Compress(true));
                            return i.saturating_sub(offset);
                        }
                        option::GMCP => {
                            self.flush_text(events, true);
                            trace!(len = payload.len(), "extension subnegotiation");
                            events.push(StreamEvent::Extension(payload));
                        }
                        other => {
                            debug!(option = other, len = payload.len(), "dropping subnegotiation");
                        }
                    }
                }
                other => {
                    trace!(command = other, "skipping command");
                    i += 2;
                }
            }
        }
        input.len()
    }

    fn hold(&mut self, tail: &[u8]) {
        trace!(len = tail.len(), "holding partial sequence");
        self.pending = Some(BytesMut::from(tail));
    }

    fn offered(&mut self, opt: u8, events: &mut Vec<StreamEvent>) {
        let reply: Option<&'static [u8]> = match opt {
            option::GMCP if self.config.accept_extension && !self.extension_acknowledged => {
                self.extension_acknowledged = true;
                Some(&gmcp::ACKNOWLEDGE)
            }
            option::COMPRESS2
                if self.config.accept_compression && !self.compression_acknowledged =>
            {
                self.compression_acknowledged = true;
                Some(&COMPRESS_ACKNOWLEDGE)
            }
            _ => None,
        };
        match reply {
            Some(reply) => {
                self.flush_text(events, true);
                debug!(option = opt, "acknowledging offer");
                events.push(StreamEvent::Negotiate(Bytes::from_static(reply)));
            }
            None => trace!(option = opt, "ignoring offer"),
        }
    }

    /// Emits buffered body bytes as text.
    ///
    /// With `complete` unset an incomplete trailing UTF-8 sequence stays buffered for the next
    /// chunk; otherwise it is replaced by U+FFFD.
    fn flush_text(&mut self, events: &mut Vec<StreamEvent>, complete: bool) {
        if self.utf8_tail.is_empty() {
            return;
        }
        let bytes = std::mem::take(&mut self.utf8_tail);
        let mut text = String::with_capacity(bytes.len());
        let mut rest = &bytes[..];
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    text.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None if complete => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            break;
                        }
                        None => {
                            self.utf8_tail.extend_from_slice(after);
                            break;
                        }
                    }
                }
            }
        }
        if !text.is_empty() {
            events.push(StreamEvent::Text(text));
        }
    }
}

impl Default for DecoderState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DecoderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderState")
            .field("config", &self.config)
            .field("compression_enabled", &self.compression_enabled)
            .field("inflater", &self.inflater.as_ref().map(|i| i.name()))
            .field("pending", &self.pending)
            .field("resume", &self.resume)
            .field("utf8_tail", &self.utf8_tail)
            .field("extension_acknowledged", &self.extension_acknowledged)
            .field("compression_acknowledged", &self.compression_acknowledged)
            .finish()
    }
}

///
/// Decodes one chunk of the game stream.
///
/// Control sequences split across chunks are resumed from `state` on the next call, and once the
/// game activates compression every later byte is inflated before it is scanned. Events are
/// returned in stream order.
///
/// # Errors
///
/// Returns [`CodecError::Decompress`](crate::CodecError::Decompress) when compressed input is
/// corrupt. The state must not be used again afterwards.
///
/// # Example
///
/// ```
/// use mudgate_telnetcodec::{DecoderState, StreamEvent, decode};
///
/// let mut state = DecoderState::new();
/// let mut events = decode(&mut state, b"Hello\xff").unwrap();
/// events.extend(decode(&mut state, b"\xfb\xc9 world").unwrap());
/// assert_eq!(events[0], StreamEvent::Text("Hello".into()));
/// assert_eq!(events[1], StreamEvent::Negotiate(vec![255, 253, 201].into()));
/// assert_eq!(events[2], StreamEvent::Text(" world".into()));
/// ```
pub fn decode(state: &mut DecoderState, chunk: &[u8]) -> CodecResult<Vec<StreamEvent>> {
    let mut events = Vec::new();
    let mut raw = chunk;
    while !raw.is_empty() {
        if !state.compression_enabled {
            let consumed = state.scan(raw, &mut events);
            raw = &raw[consumed.min(raw.len())..];
            continue;
        }

        let factory = state.factory;
        let inflater = state.inflater.get_or_insert_with(factory);
        let mut inflated = Vec::new();
        let progress = inflater.write(raw, &mut |bytes| inflated.extend_from_slice(bytes))?;
        trace!(
            input = raw.len(),
            output = inflated.len(),
            "inflated chunk"
        );
        state.scan(&inflated, &mut events);
        if progress.finished {
            raw = &raw[progress.consumed.min(raw.len())..];
            state.compression_enabled = false;
            if let Some(inflater) = state.inflater.as_mut() {
                inflater.reset();
            }
            state.flush_text(&mut events, true);
            debug!(remaining = raw.len(), "compressed stream ended");
            events.push(StreamEvent::Compress(false));
        } else {
            raw = &[];
        }
    }
    state.flush_text(&mut events, false);
    Ok(events)
}

/// Finds the IAC SE closing a subnegotiation, searching from `start`.
///
/// `start` must not fall between the two bytes of an escaped IAC. When no close is found the
/// error holds the offset where a later search over a longer buffer can resume.
fn find_subnegotiation_end(buf: &[u8], start: usize) -> Result<usize, usize> {
    let mut j = start;
    while j + 1 < buf.len() {
        if buf[j] == consts::IAC {
            match buf[j + 1] {
                consts::SE => return Ok(j),
                consts::IAC => j += 2,
                _ => j += 1,
            }
        } else {
            j += 1;
        }
    }
    Err(j)
}

/// Collapses IAC IAC into a single 255 byte.
fn unescape(payload: &[u8]) -> Bytes {
    if !payload.windows(2).any(|w| w == [consts::IAC, consts::IAC]) {
        return Bytes::copy_from_slice(payload);
    }
    let mut out = BytesMut::with_capacity(payload.len());
    let mut i = 0;
    while i < payload.len() {
        out.extend_from_slice(&payload[i..=i]);
        if payload[i] == consts::IAC && payload.get(i + 1) == Some(&consts::IAC) {
            i += 2;
        } else {
            i += 1;
        }
    }
    out.freeze()
}
