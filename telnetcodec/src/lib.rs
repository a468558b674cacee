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

//! # MUD Game Stream Codec
//!
//! This crate turns the raw byte stream of a MUD (multi-user dungeon) server into typed events,
//! and encodes player input back into the game's wire format. The stream mixes plain text with
//! inline telnet control sequences, GMCP extension messages, and, once the server activates
//! MCCP2, a zlib compressed segment that lasts for the rest of the connection.
//!
//! ## Overview
//!
//! Chunks arrive in arbitrary sizes, so every part of the decoder is resumable:
//!
//! - **Control sequences**: a chunk ending inside `IAC ...` or `IAC SB ... IAC SE` is held in
//!   the decoder state and completed by the next chunk
//! - **Text**: body bytes are decoded as UTF-8, with an incomplete trailing character carried
//!   over
//! - **Compression**: `IAC SB 86 IAC SE` switches every later byte through a persistent inflate
//!   stage, whose output is scanned by the same telnet scanner
//! - **Negotiation**: only GMCP (201) and MCCP2 (86) offers are acknowledged, each at most once
//!   per connection
//!
//! ## Core Components
//!
//! ### [`decode`] and [`DecoderState`]
//!
//! The decoder is a plain function over an explicit per-connection state value. It returns the
//! [`StreamEvent`]s a chunk produced, in stream order.
//!
//! ### [`MudCodec`]
//!
//! Implements `tokio_util::codec::Decoder` and `Encoder<GameInput>` on top of [`decode`].
//!
//! ### [`parse_extension`]
//!
//! Parses a GMCP payload into an [`ExtensionMessage`], inferring the payload type.
//!
//! ## Usage Example
//!
//! ```rust
//! use mudgate_telnetcodec::{DecoderState, StreamEvent, decode, parse_extension};
//!
//! let mut state = DecoderState::new();
//! let chunk = b"You wake up.\r\n\xff\xfa\xc9Char.Vitals {\"hp\"";
//! let mut events = decode(&mut state, chunk).unwrap();
//! events.extend(decode(&mut state, b":42}\xff\xf0").unwrap());
//!
//! assert_eq!(events[0], StreamEvent::Text("You wake up.\r\n".into()));
//! let StreamEvent::Extension(payload) = &events[1] else { panic!() };
//! let message = parse_extension(payload);
//! assert_eq!(message.package, "Char.Vitals");
//! ```
//!
//! ## Error Handling
//!
//! Malformed control sequences are skipped and never produce an error. The only failure is a
//! corrupt compressed stream, reported as [`CodecError::Decompress`]; it is fatal for the
//! connection that produced it.

mod codec;
pub mod consts;
mod config;
mod decoder;
mod event;
pub mod gmcp;
mod input;
mod result;

pub use self::codec::MudCodec;
pub use self::config::DecoderConfig;
pub use self::decoder::{COMPRESS_ACKNOWLEDGE, DecoderState, MAX_SUBNEGOTIATION, decode};
pub use self::event::StreamEvent;
pub use self::gmcp::{ExtensionMessage, parse_extension};
pub use self::input::{DEFAULT_LINE_ENDING, GameInput, mode_toggle};
pub use self::result::{CodecError, CodecResult};
