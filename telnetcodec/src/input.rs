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

use crate::ExtensionMessage;
use crate::consts::{self, option};
use bytes::{BufMut, Bytes, BytesMut};

/// Terminator appended to outbound lines unless configured otherwise
pub const DEFAULT_LINE_ENDING: &str = "\r\n";

///
/// `GameInput` is an outbound message to the game connection.
///
#[derive(Clone, Debug, PartialEq)]
pub enum GameInput {
    /// A command line typed by the player; the line terminator is added on encode
    Line(String),
    /// Bytes written unchanged, such as negotiation replies
    Raw(Bytes),
    /// A GMCP message sent as a subnegotiation
    Extension(ExtensionMessage),
    /// The legacy option 102 XML mode toggle
    ModeToggle(bool),
}

impl GameInput {
    /// Appends the wire form of this input to `dst`.
    ///
    /// Any IAC byte in a line is doubled so the game reads it as data.
    pub fn encode_into(&self, dst: &mut BytesMut, line_ending: &str) {
        match self {
            GameInput::Line(line) => {
                dst.reserve(line.len() + line_ending.len());
                put_escaped(dst, line.as_bytes());
                dst.extend_from_slice(line_ending.as_bytes());
            }
            GameInput::Raw(bytes) => dst.extend_from_slice(bytes),
            GameInput::Extension(message) => {
                dst.extend_from_slice(&message.encode_subnegotiation())
            }
            GameInput::ModeToggle(enabled) => dst.extend_from_slice(&mode_toggle(*enabled)),
        }
    }
}

/// Builds `IAC SB 102 "~$#EX2\n<state>\n" IAC SE`, where `<state>` is `1` or `0`.
///
/// The length after `EX` counts the data line, `<state>` and its newline.
///
/// # Example
///
/// ```
/// use mudgate_telnetcodec::mode_toggle;
///
/// let bytes = mode_toggle(true);
/// assert_eq!(&bytes[3..bytes.len() - 2], b"~$#EX2\n1\n");
/// ```
pub fn mode_toggle(enabled: bool) -> Bytes {
    let data = if enabled { "1\n" } else { "0\n" };
    let payload = format!("~$#EX{}\n{}", data.len(), data);
    let mut bytes = BytesMut::with_capacity(payload.len() + 5);
    bytes.extend_from_slice(&[consts::IAC, consts::SB, option::MPI]);
    bytes.extend_from_slice(payload.as_bytes());
    bytes.extend_from_slice(&[consts::IAC, consts::SE]);
    bytes.freeze()
}

fn put_escaped(dst: &mut BytesMut, data: &[u8]) {
    for &byte in data {
        if byte == consts::IAC {
            dst.put_u8(consts::IAC);
        }
        dst.put_u8(byte);
    }
}
