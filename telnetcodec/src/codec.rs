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

use crate::decoder::{DecoderState, decode};
use crate::input::DEFAULT_LINE_ENDING;
use crate::{CodecError, DecoderConfig, GameInput, StreamEvent};
use bytes::BytesMut;
use mudgate_compress::DecompressorFactory;
use tokio_util::codec::{Decoder, Encoder};

/// A codec pairing the game stream decoder with the outbound encoder.
///
/// `MudCodec` owns the [`DecoderState`] of one game connection, so a socket can be read through
/// `FramedRead` or `Framed`. Each decoded item is the batch of events produced by whatever bytes
/// were buffered when the codec was polled; an empty batch is never yielded.
///
/// # Example
/// ```
/// use bytes::BytesMut;
/// use mudgate_telnetcodec::{MudCodec, StreamEvent};
/// use tokio_util::codec::Decoder;
///
/// let mut codec = MudCodec::new();
/// let mut src = BytesMut::from(&b"Welcome!\r\n"[..]);
/// let events = codec.decode(&mut src).unwrap().unwrap();
/// assert_eq!(events, vec![StreamEvent::Text("Welcome!\r\n".into())]);
/// assert!(src.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MudCodec {
    state: DecoderState,
    line_ending: Option<String>,
}

impl MudCodec {
    /// Creates a codec with the default decoder configuration.
    pub fn new() -> MudCodec {
        MudCodec::default()
    }

    /// Creates a codec with the given negotiation settings.
    pub fn with_config(config: DecoderConfig) -> MudCodec {
        MudCodec {
            state: DecoderState::with_config(config),
            line_ending: None,
        }
    }

    /// Replaces the decompression stage constructor.
    pub fn with_factory(mut self, factory: DecompressorFactory) -> MudCodec {
        self.state = self.state.with_factory(factory);
        self
    }

    /// Sets the terminator appended to outbound lines.
    pub fn with_line_ending<S: Into<String>>(mut self, line_ending: S) -> MudCodec {
        self.line_ending = Some(line_ending.into());
        self
    }

    /// The decoder state of this connection
    pub fn state(&self) -> &DecoderState {
        &self.state
    }
}

impl Decoder for MudCodec {
    type Item = Vec<StreamEvent>;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        let chunk = src.split();
        let events = decode(&mut self.state, &chunk)?;
        Ok((!events.is_empty()).then_some(events))
    }
}

impl Encoder<GameInput> for MudCodec {
    type Error = CodecError;

    fn encode(&mut self, item: GameInput, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line_ending = self.line_ending.as_deref().unwrap_or(DEFAULT_LINE_ENDING);
        item.encode_into(dst, line_ending);
        Ok(())
    }
}
