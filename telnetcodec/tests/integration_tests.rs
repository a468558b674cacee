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

//! Integration tests for mudgate-telnetcodec
//!
//! These tests drive the decoder with realistic game streams, including compressed segments, and
//! check that chunking never changes what comes out.

use bytes::{Bytes, BytesMut};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use futures::StreamExt;
use mudgate_compress::passthrough_factory;
use mudgate_telnetcodec::consts::{IAC, SB, SE, WILL, option};
use mudgate_telnetcodec::{
    CodecError, DecoderState, ExtensionMessage, GameInput, MudCodec, StreamEvent, decode,
    parse_extension,
};
use proptest::prelude::*;
use serde_json::json;
use std::io::Write;
use tokio_util::codec::{Encoder, FramedRead};

// ============================================================================
// Helper Functions
// ============================================================================

/// Merges adjacent `Text` events, which carry no meaning of their own.
fn canonicalise(events: Vec<StreamEvent>) -> Vec<StreamEvent> {
    let mut out: Vec<StreamEvent> = Vec::with_capacity(events.len());
    for event in events {
        match (out.last_mut(), event) {
            (Some(StreamEvent::Text(prev)), StreamEvent::Text(next)) => prev.push_str(&next),
            (_, event) => out.push(event),
        }
    }
    out
}

fn decode_chunks(mut state: DecoderState, chunks: &[&[u8]]) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    for chunk in chunks {
        events.extend(decode(&mut state, chunk).unwrap());
    }
    canonicalise(events)
}

fn split_at_points<'a>(stream: &'a [u8], points: &[usize]) -> Vec<&'a [u8]> {
    let mut points: Vec<usize> = points.iter().map(|p| p % (stream.len() + 1)).collect();
    points.sort_unstable();
    let mut chunks = Vec::new();
    let mut start = 0;
    for point in points {
        chunks.push(&stream[start..point]);
        start = point;
    }
    chunks.push(&stream[start..]);
    chunks
}

fn subnegotiation(opt: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![IAC, SB, opt];
    out.extend_from_slice(payload);
    out.extend_from_slice(&[IAC, SE]);
    out
}

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Output compressed with a sync flush after each piece and never finished, as an MCCP2 server
/// sends it during a long session.
fn zlib_flushed(pieces: &[&[u8]]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    for piece in pieces {
        encoder.write_all(piece).unwrap();
        encoder.flush().unwrap();
    }
    encoder.get_ref().clone()
}

/// A session as a server would send it: greeting, offers, an extension message, compression for
/// a while, then uncompressed output after the compressed stream ends.
fn game_stream() -> Vec<u8> {
    let mut stream = b"Welcome to Middle-earth!\r\n".to_vec();
    stream.extend_from_slice(&[IAC, WILL, option::GMCP, IAC, WILL, option::COMPRESS2]);
    stream.extend_from_slice(&subnegotiation(option::GMCP, br#"Core.Hello {"name":"Arda"}"#));
    stream.extend_from_slice("Barad-dûr looms. ".as_bytes());
    stream.extend_from_slice(&subnegotiation(option::COMPRESS2, b""));

    let mut inner = b"<room><name>East Fork</name>Exits: east, west.</room>\r\n".to_vec();
    inner.extend_from_slice(&subnegotiation(option::GMCP, b"Char.Vitals {\"hp\":42}"));
    inner.extend_from_slice("Éowyn rides.\r\n".as_bytes());
    stream.extend_from_slice(&zlib(&inner));

    stream.extend_from_slice(b"Back to plain text.\r\n");
    stream
}

fn expected_game_events() -> Vec<StreamEvent> {
    vec![
        StreamEvent::Text("Welcome to Middle-earth!\r\n".into()),
        StreamEvent::Negotiate(Bytes::from_static(&[255, 253, 201])),
        StreamEvent::Negotiate(Bytes::from_static(&[255, 253, 86])),
        StreamEvent::Extension(Bytes::from_static(br#"Core.Hello {"name":"Arda"}"#)),
        StreamEvent::Text("Barad-dûr looms. ".into()),
        StreamEvent::Compress(true),
        StreamEvent::Text("<room><name>East Fork</name>Exits: east, west.</room>\r\n".into()),
        StreamEvent::Extension(Bytes::from_static(b"Char.Vitals {\"hp\":42}")),
        StreamEvent::Text("Éowyn rides.\r\n".into()),
        StreamEvent::Compress(false),
        StreamEvent::Text("Back to plain text.\r\n".into()),
    ]
}

// ============================================================================
// Whole Stream Tests
// ============================================================================

#[test]
fn game_stream_in_one_chunk() {
    let stream = game_stream();
    let events = decode_chunks(DecoderState::new(), &[&stream]);
    assert_eq!(events, expected_game_events());
}

#[test]
fn game_stream_byte_at_a_time() {
    let stream = game_stream();
    let chunks: Vec<&[u8]> = stream.chunks(1).collect();
    let events = decode_chunks(DecoderState::new(), &chunks);
    assert_eq!(events, expected_game_events());
}

#[test]
fn extension_payloads_parse() {
    let events = decode_chunks(DecoderState::new(), &[&game_stream()]);
    let messages: Vec<ExtensionMessage> = events
        .iter()
        .filter_map(|event| match event {
            StreamEvent::Extension(payload) => Some(parse_extension(payload)),
            _ => None,
        })
        .collect();
    assert_eq!(
        messages,
        vec![
            ExtensionMessage::new("Core.Hello", Some(json!({"name": "Arda"}))),
            ExtensionMessage::new("Char.Vitals", Some(json!({"hp": 42}))),
        ]
    );
}

// ============================================================================
// Compression Tests
// ============================================================================

#[test]
fn compression_activation_split_from_payload() {
    let mut first = b"Greetings. ".to_vec();
    first.extend_from_slice(&subnegotiation(option::COMPRESS2, b""));
    let compressed = zlib_flushed(&[b"You are in a compressed world.\r\n"]);
    let (head, tail) = compressed.split_at(3);
    first.extend_from_slice(head);

    let mut state = DecoderState::new();
    let mut events = decode(&mut state, &first).unwrap();
    assert!(state.is_compressing());
    events.extend(decode(&mut state, tail).unwrap());
    assert_eq!(
        canonicalise(events),
        vec![
            StreamEvent::Text("Greetings. ".into()),
            StreamEvent::Compress(true),
            StreamEvent::Text("You are in a compressed world.\r\n".into()),
        ]
    );
}

#[test]
fn compression_start_split_inside_sequence() {
    let compressed = zlib_flushed(&[b"inflated"]);
    let mut state = DecoderState::new();
    let mut events = decode(&mut state, &[IAC, SB, option::COMPRESS2]).unwrap();
    assert!(!state.is_compressing());
    let mut rest = vec![IAC, SE];
    rest.extend_from_slice(&compressed);
    events.extend(decode(&mut state, &rest).unwrap());
    assert_eq!(
        canonicalise(events),
        vec![StreamEvent::Compress(true), StreamEvent::Text("inflated".into())]
    );
}

#[test]
fn passthrough_stage_routes_bytes_after_activation() {
    let mut stream = b"a".to_vec();
    stream.extend_from_slice(&subnegotiation(option::COMPRESS2, b""));
    stream.extend_from_slice(b"b");
    stream.extend_from_slice(&subnegotiation(option::GMCP, b"Core.Ping"));
    stream.extend_from_slice(b"c");
    let state = DecoderState::new().with_factory(passthrough_factory);
    let events = decode_chunks(state, &[&stream[..5], &stream[5..]]);
    assert_eq!(
        events,
        vec![
            StreamEvent::Text("a".into()),
            StreamEvent::Compress(true),
            StreamEvent::Text("b".into()),
            StreamEvent::Extension(Bytes::from_static(b"Core.Ping")),
            StreamEvent::Text("c".into()),
        ]
    );
}

#[test]
fn compression_restarts_after_stream_end() {
    let mut stream = subnegotiation(option::COMPRESS2, b"");
    stream.extend_from_slice(&zlib(b"one "));
    stream.extend_from_slice(&subnegotiation(option::COMPRESS2, b""));
    stream.extend_from_slice(&zlib(b"two"));
    let events = decode_chunks(DecoderState::new(), &[&stream]);
    assert_eq!(
        events,
        vec![
            StreamEvent::Compress(true),
            StreamEvent::Text("one ".into()),
            StreamEvent::Compress(false),
            StreamEvent::Compress(true),
            StreamEvent::Text("two".into()),
            StreamEvent::Compress(false),
        ]
    );
}

#[test]
fn corrupt_compressed_data_is_an_error() {
    let mut stream = subnegotiation(option::COMPRESS2, b"");
    stream.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    let mut state = DecoderState::new();
    let result = decode(&mut state, &stream);
    assert!(matches!(result, Err(CodecError::Decompress(_))));
}

// ============================================================================
// Codec Tests
// ============================================================================

#[tokio::test]
async fn framed_read_decodes_game_stream() {
    let stream = game_stream();
    let mut framed = FramedRead::new(&stream[..], MudCodec::new());
    let mut events = Vec::new();
    while let Some(batch) = framed.next().await {
        events.extend(batch.unwrap());
    }
    assert_eq!(canonicalise(events), expected_game_events());
}

#[test]
fn encoder_writes_outbound_inputs() {
    let mut codec = MudCodec::new();
    let mut dst = BytesMut::new();
    codec.encode(GameInput::Line("look".into()), &mut dst).unwrap();
    codec
        .encode(
            GameInput::Extension(ExtensionMessage::new(
                "Core.Hello",
                Some(json!({"client": "mudgate"})),
            )),
            &mut dst,
        )
        .unwrap();
    let mut expected = b"look\r\n".to_vec();
    expected.extend_from_slice(&subnegotiation(
        option::GMCP,
        br#"Core.Hello {"client":"mudgate"}"#,
    ));
    assert_eq!(dst, expected[..]);
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn chunking_does_not_change_events(points in prop::collection::vec(any::<usize>(), 0..12)) {
        let stream = game_stream();
        let chunks = split_at_points(&stream, &points);
        prop_assert_eq!(decode_chunks(DecoderState::new(), &chunks), expected_game_events());
    }

    #[test]
    fn chunking_plain_text_with_escapes(
        text in "[a-zA-Z0-9 äöüßñ€<>/]{0,64}",
        points in prop::collection::vec(any::<usize>(), 0..6),
    ) {
        let mut stream = Vec::new();
        for (i, piece) in text.split(' ').enumerate() {
            if i > 0 {
                stream.extend_from_slice(&[IAC, 241]);
                stream.push(b' ');
            }
            stream.extend_from_slice(piece.as_bytes());
        }
        let whole = decode_chunks(DecoderState::new(), &[&stream]);
        let split = decode_chunks(DecoderState::new(), &split_at_points(&stream, &points));
        prop_assert_eq!(&split, &whole);
        let expected = if text.is_empty() {
            vec![]
        } else {
            vec![StreamEvent::Text(text.clone())]
        };
        prop_assert_eq!(whole, expected);
    }

    #[test]
    fn extension_round_trip(
        package in "[A-Z][a-z]{1,8}(\\.[A-Z][a-z]{1,8}){0,2}",
        hp in 0u32..100_000,
        name in "[a-zA-Z ]{0,16}",
    ) {
        let message = ExtensionMessage::new(package, Some(json!({"hp": hp, "name": name})));
        let mut state = DecoderState::new();
        let events = decode(&mut state, &message.encode_subnegotiation()).unwrap();
        let [StreamEvent::Extension(payload)] = events.as_slice() else {
            panic!("expected a single extension event, got {events:?}");
        };
        prop_assert_eq!(parse_extension(payload), message);
    }
}
