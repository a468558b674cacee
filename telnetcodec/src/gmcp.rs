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
use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// `IAC DO GMCP`, the reply to the game's extension offer.
pub const ACKNOWLEDGE: [u8; 3] = [consts::IAC, consts::DO, option::GMCP];

///
/// GMCP (Generic Mud Communication Protocol) Message
///
/// Each message consists of a package name and an optional payload, separated by the first space
/// of the subnegotiation body.
///
/// Format: `<package.subpackage.command> <data>`
///
/// # Examples
///
/// ```text
/// Core.Hello {"client": "mudgate", "version": "1.0"}
/// Char.Vitals {"hp": 100, "maxhp": 120}
/// Comm.Channel.Text "Gandalf says hi"
/// ```
///
/// The payload is kept as a [`Value`]: JSON when it parses as JSON, otherwise the trimmed raw
/// text as a string.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtensionMessage {
    /// The package name (e.g., "Core.Hello", "Char.Vitals")
    pub package: String,

    /// Optional payload; `None` when the body had no space
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ExtensionMessage {
    /// Creates a message with a package name and optional payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use mudgate_telnetcodec::ExtensionMessage;
    /// use serde_json::json;
    ///
    /// let msg = ExtensionMessage::new("Core.Hello", Some(json!({"client": "mudgate"})));
    /// assert_eq!(msg.encode(), br#"Core.Hello {"client":"mudgate"}"#.as_slice());
    /// ```
    pub fn new<S: Into<String>>(package: S, data: Option<Value>) -> Self {
        Self {
            package: package.into(),
            data,
        }
    }

    /// Creates a message without payload.
    pub fn command<S: Into<String>>(package: S) -> Self {
        Self::new(package, None)
    }

    /// Renders the message body as `<package> <json>`.
    pub fn encode(&self) -> Bytes {
        let mut bytes = BytesMut::with_capacity(self.package.len());
        bytes.extend_from_slice(self.package.as_bytes());
        if let Some(data) = &self.data {
            bytes.put_u8(b' ');
            bytes.extend_from_slice(data.to_string().as_bytes());
        }
        bytes.freeze()
    }

    /// Wraps the body in `IAC SB GMCP ... IAC SE`, doubling any IAC inside it.
    pub fn encode_subnegotiation(&self) -> Bytes {
        let body = self.encode();
        let mut bytes = BytesMut::with_capacity(body.len() + 5);
        bytes.extend_from_slice(&[consts::IAC, consts::SB, option::GMCP]);
        for &byte in body.iter() {
            if byte == consts::IAC {
                bytes.put_u8(consts::IAC);
            }
            bytes.put_u8(byte);
        }
        bytes.extend_from_slice(&[consts::IAC, consts::SE]);
        bytes.freeze()
    }
}

impl fmt::Display for ExtensionMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(data) => write!(f, "{} {}", self.package, data),
            None => write!(f, "{}", self.package),
        }
    }
}

/// Parses a GMCP subnegotiation payload.
///
/// The body is split on its first space; both halves are trimmed. The payload type is inferred
/// from its first character, and anything that fails to parse is kept as the raw string. Never
/// fails.
///
/// # Examples
///
/// ```
/// use mudgate_telnetcodec::parse_extension;
/// use serde_json::json;
///
/// let msg = parse_extension(br#"Char.Vitals {"hp":100,"maxhp":120}"#);
/// assert_eq!(msg.package, "Char.Vitals");
/// assert_eq!(msg.data, Some(json!({"hp": 100, "maxhp": 120})));
///
/// let msg = parse_extension(b"Core.Ping");
/// assert_eq!(msg.data, None);
/// ```
pub fn parse_extension(bytes: &[u8]) -> ExtensionMessage {
    let text = String::from_utf8_lossy(bytes);
    let Some((package, data)) = text.split_once(' ') else {
        return ExtensionMessage::command(text.trim());
    };
    let data = data.trim();
    ExtensionMessage::new(package.trim(), Some(classify(data)))
}

fn classify(data: &str) -> Value {
    let looks_like_json = match data.as_bytes().first() {
        Some(b'{' | b'[' | b'"') => true,
        _ => matches!(data, "null" | "true" | "false") || is_numeric_literal(data),
    };
    if !looks_like_json {
        return Value::String(data.to_string());
    }
    match serde_json::from_str(data) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "extension payload is not valid JSON, keeping raw text");
            Value::String(data.to_string())
        }
    }
}

/// Matches `-?\d+(\.\d+)?([eE][+-]?\d+)?` against the whole input.
fn is_numeric_literal(s: &str) -> bool {
    fn digits(b: &[u8], mut i: usize) -> usize {
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        i
    }

    let b = s.as_bytes();
    let mut i = usize::from(b.first() == Some(&b'-'));
    let end = digits(b, i);
    if end == i {
        return false;
    }
    i = end;
    if b.get(i) == Some(&b'.') {
        let end = digits(b, i + 1);
        if end == i + 1 {
            return false;
        }
        i = end;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let end = digits(b, i);
        if end == i {
            return false;
        }
        i = end;
    }
    i == b.len()
}

/// Checks for `IAC WILL GMCP` at `index`.
pub fn is_negotiation(buffer: &[u8], index: usize) -> bool {
    buffer.get(index..index.saturating_add(3))
        == Some([consts::IAC, consts::WILL, option::GMCP].as_slice())
}

/// Checks for `IAC SB GMCP` at `index`.
pub fn is_subnegotiation(buffer: &[u8], index: usize) -> bool {
    buffer.get(index..index.saturating_add(3))
        == Some([consts::IAC, consts::SB, option::GMCP].as_slice())
}
