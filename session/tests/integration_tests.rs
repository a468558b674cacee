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

use flate2::write::ZlibEncoder;
use flate2::Compression;
use mudgate_session::{
    COMPRESSION_ENABLED, CONNECTED_PLAIN, DISCONNECTED, Envelope, GameLink, LinkConfig, LinkError,
    SessionConfig, XML_ENABLED,
};
use mudgate_telnetcodec::{CodecError, ExtensionMessage, mode_toggle};
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};

const IAC: u8 = 255;
const SB: u8 = 250;
const SE: u8 = 240;
const WILL: u8 = 251;
const DO: u8 = 253;
const COMPRESS2: u8 = 86;
const GMCP: u8 = 201;

const WAIT: Duration = Duration::from_secs(5);

fn start(config: LinkConfig) -> (GameLink, DuplexStream) {
    let (client, server) = duplex(4096);
    (GameLink::spawn(client, config), server)
}

async fn next(link: &mut GameLink) -> Option<Envelope> {
    tokio::time::timeout(WAIT, link.recv())
        .await
        .expect("timed out waiting for an envelope")
}

async fn read_exactly(server: &mut DuplexStream, len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    tokio::time::timeout(WAIT, server.read_exact(&mut buf))
        .await
        .expect("timed out waiting for game input")
        .unwrap();
    buf
}

fn zlib_flushed(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.flush().unwrap();
    encoder.get_ref().clone()
}

#[tokio::test]
async fn test_plain_session_round_trip() {
    let (mut link, mut server) = start(LinkConfig::default());
    assert_eq!(next(&mut link).await, Some(Envelope::info(CONNECTED_PLAIN)));

    server
        .write_all(
            b"\x1b[32mWelcome to Middle-earth!\x1b[0m\r\n\r\n\
              By what name shall we know you?\r\n",
        )
        .await
        .unwrap();
    assert_eq!(
        next(&mut link).await,
        Some(Envelope::mud("Welcome to Middle-earth!"))
    );
    assert_eq!(
        next(&mut link).await,
        Some(Envelope::mud("By what name shall we know you?"))
    );

    link.send("Bilbo").await.unwrap();
    assert_eq!(read_exactly(&mut server, 7).await, b"Bilbo\r\n");

    drop(server);
    assert_eq!(next(&mut link).await, Some(Envelope::info(DISCONNECTED)));
    assert_eq!(next(&mut link).await, None);
    link.close().await.unwrap();
}

#[tokio::test]
async fn test_extension_negotiation_and_messages() {
    let (mut link, mut server) = start(LinkConfig::default());
    assert_eq!(next(&mut link).await, Some(Envelope::info(CONNECTED_PLAIN)));

    server.write_all(&[IAC, WILL, GMCP]).await.unwrap();
    assert_eq!(read_exactly(&mut server, 3).await, [IAC, DO, GMCP]);

    let mut frame = vec![IAC, SB, GMCP];
    frame.extend_from_slice(br#"Char.Vitals {"hp": 87, "maxhp": 120}"#);
    frame.extend_from_slice(&[IAC, SE]);
    server.write_all(&frame).await.unwrap();
    assert_eq!(
        next(&mut link).await,
        Some(Envelope::gmcp(ExtensionMessage::new(
            "Char.Vitals",
            Some(json!({"hp": 87, "maxhp": 120}))
        )))
    );
    link.close().await.unwrap();
}

#[tokio::test]
async fn test_compressed_stream() {
    let (mut link, mut server) = start(LinkConfig::default());
    assert_eq!(next(&mut link).await, Some(Envelope::info(CONNECTED_PLAIN)));

    server.write_all(&[IAC, WILL, COMPRESS2]).await.unwrap();
    assert_eq!(read_exactly(&mut server, 3).await, [IAC, DO, COMPRESS2]);

    let mut frame = vec![IAC, SB, COMPRESS2, IAC, SE];
    frame.extend_from_slice(&zlib_flushed(b"The gates of Moria open.\r\n"));
    server.write_all(&frame).await.unwrap();
    assert_eq!(
        next(&mut link).await,
        Some(Envelope::info(COMPRESSION_ENABLED))
    );
    assert_eq!(
        next(&mut link).await,
        Some(Envelope::mud("The gates of Moria open."))
    );
    link.close().await.unwrap();
}

#[tokio::test]
async fn test_corrupt_compressed_stream_closes_link() {
    let (mut link, mut server) = start(LinkConfig::default());
    server
        .write_all(&[IAC, SB, COMPRESS2, IAC, SE, 0x12, 0x34, 0x56, 0x78, 0x9a])
        .await
        .unwrap();

    let mut envelopes = Vec::new();
    while let Some(envelope) = next(&mut link).await {
        envelopes.push(envelope);
    }
    let Some(Envelope::Error { error }) = envelopes.last() else {
        panic!("expected a trailing error, got {envelopes:?}");
    };
    assert!(error.starts_with("decompression failed"), "{error}");

    let (_, _, task) = link.into_parts();
    let result = task.await.unwrap();
    assert!(matches!(
        result,
        Err(LinkError::Codec(CodecError::Decompress(_)))
    ));
}

#[tokio::test]
async fn test_xml_mode_toggle() {
    let config =
        LinkConfig::default().with_session(SessionConfig::default().with_mode_toggle(true));
    let (mut link, mut server) = start(config);
    assert_eq!(next(&mut link).await, Some(Envelope::info(CONNECTED_PLAIN)));

    link.send("/xml on").await.unwrap();
    assert_eq!(next(&mut link).await, Some(Envelope::info(XML_ENABLED)));
    let toggle = mode_toggle(true);
    assert_eq!(read_exactly(&mut server, toggle.len()).await, toggle);

    server
        .write_all(b"<prompt>oO CW&gt;</prompt>")
        .await
        .unwrap();
    assert_eq!(next(&mut link).await, Some(Envelope::mud("oO CW>")));
    link.close().await.unwrap();
}

#[tokio::test]
async fn test_custom_line_ending() {
    let config =
        LinkConfig::default().with_session(SessionConfig::default().with_line_ending("\n"));
    let (mut link, mut server) = start(config);
    assert_eq!(next(&mut link).await, Some(Envelope::info(CONNECTED_PLAIN)));
    link.send("north").await.unwrap();
    link.send("look").await.unwrap();
    assert_eq!(read_exactly(&mut server, 11).await, b"north\nlook\n");
    link.close().await.unwrap();
}

#[tokio::test]
async fn test_connect_timeout_config() {
    let config = LinkConfig::new("127.0.0.1", 1).with_connect_timeout(Duration::from_millis(500));
    match GameLink::connect(config).await {
        Err(LinkError::Io(_)) | Err(LinkError::Timeout { .. }) => {}
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}
