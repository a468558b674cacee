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

//! Async game link: one task per game connection

use crate::{Action, Envelope, LinkConfig, LinkError, LinkResult, Session};
use futures::{SinkExt, StreamExt};
use mudgate_telnetcodec::{GameInput, MudCodec};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::codec::Framed;
use tracing::{debug, error, info, trace};

///
/// A running game connection.
///
/// The link owns a background task that reads the game stream through a [`MudCodec`], feeds the
/// decoded events to a [`Session`] and performs the resulting actions. Client lines go in through
/// [`send`](GameLink::send); envelopes for the client come out of [`recv`](GameLink::recv).
///
/// Dropping the command side ends the task and closes the game connection.
///
pub struct GameLink {
    commands: mpsc::Sender<String>,
    envelopes: mpsc::Receiver<Envelope>,
    task: JoinHandle<LinkResult<()>>,
}

impl GameLink {
    /// Dial the configured game server and start the link task.
    pub async fn connect(config: LinkConfig) -> LinkResult<GameLink> {
        let address = config.address();
        info!("Connecting to {}...", address);

        let stream = match timeout(config.connect_timeout, TcpStream::connect(&address)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => return Err(err.into()),
            Err(_) => {
                return Err(LinkError::Timeout {
                    address,
                    timeout: config.connect_timeout,
                });
            }
        };

        info!("Connected to {}", stream.peer_addr()?);
        Ok(GameLink::spawn(stream, config))
    }

    /// Start the link task over an already open connection.
    pub fn spawn<S>(stream: S, config: LinkConfig) -> GameLink
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let capacity = config.channel_capacity.max(1);
        let (command_tx, command_rx) = mpsc::channel(capacity);
        let (envelope_tx, envelope_rx) = mpsc::channel(capacity);
        let pump = Pump::new(stream, config, command_rx, envelope_tx);
        GameLink {
            commands: command_tx,
            envelopes: envelope_rx,
            task: tokio::spawn(pump.run()),
        }
    }

    /// Queue one client line for the session.
    pub async fn send(&self, line: impl Into<String>) -> LinkResult<()> {
        self.commands
            .send(line.into())
            .await
            .map_err(|_| LinkError::Closed)
    }

    /// Next envelope for the client, or `None` once the link has finished.
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.envelopes.recv().await
    }

    /// A second handle for queueing client lines
    pub fn commands(&self) -> mpsc::Sender<String> {
        self.commands.clone()
    }

    /// Split into the command sender, the envelope receiver and the task handle.
    pub fn into_parts(
        self,
    ) -> (
        mpsc::Sender<String>,
        mpsc::Receiver<Envelope>,
        JoinHandle<LinkResult<()>>,
    ) {
        (self.commands, self.envelopes, self.task)
    }

    /// Stop accepting commands and wait for the task to finish.
    ///
    /// Envelopes still queued are discarded.
    pub async fn close(self) -> LinkResult<()> {
        let GameLink {
            commands,
            envelopes,
            task,
        } = self;
        drop(commands);
        drop(envelopes);
        task.await?
    }
}

struct Pump<S> {
    session: Session,
    game: Framed<S, MudCodec>,
    commands: mpsc::Receiver<String>,
    envelopes: mpsc::Sender<Envelope>,
}

impl<S> Pump<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    fn new(
        stream: S,
        config: LinkConfig,
        commands: mpsc::Receiver<String>,
        envelopes: mpsc::Sender<Envelope>,
    ) -> Pump<S> {
        let codec = MudCodec::with_config(config.decoder)
            .with_line_ending(config.session.line_ending.clone());
        Pump {
            session: Session::new(config.session),
            game: Framed::with_capacity(stream, codec, config.buffer_size),
            commands,
            envelopes,
        }
    }

    async fn run(mut self) -> LinkResult<()> {
        let result = self.pump().await;
        let actions = match &result {
            Ok(()) => Vec::new(),
            Err(err) => {
                if err.is_protocol_error() {
                    error!("Game stream could not be decoded: {}", err);
                } else {
                    error!("Game link error: {}", err);
                }
                self.session.failed(err)
            }
        };
        if let Err(err) = self.apply(actions).await {
            debug!(error = %err, "failure notice not delivered");
        }
        result
    }

    async fn pump(&mut self) -> LinkResult<()> {
        let actions = self.session.connected();
        let mut closing = self.apply(actions).await?;
        while !closing {
            let actions = tokio::select! {
                batch = self.game.next() => match batch {
                    Some(events) => self.session.receive(events?),
                    None => {
                        info!("Server closed connection");
                        self.session.disconnected()
                    }
                },
                command = self.commands.recv() => match command {
                    Some(line) => self.session.command(&line),
                    None => {
                        info!("Client command channel closed");
                        break;
                    }
                },
            };
            closing = self.apply(actions).await?;
        }
        if let Err(err) = SinkExt::<GameInput>::close(&mut self.game).await {
            debug!(error = %err, "closing game connection");
        }
        Ok(())
    }

    /// Performs `actions` in order; returns true once the link should close.
    async fn apply(&mut self, actions: Vec<Action>) -> LinkResult<bool> {
        let mut closing = false;
        for action in actions {
            match action {
                Action::Client(envelope) => {
                    trace!(?envelope, "to client");
                    if self.envelopes.send(envelope).await.is_err() {
                        info!("Client went away");
                        closing = true;
                    }
                }
                Action::Game(input) => {
                    trace!(?input, "to game");
                    self.game.send(input).await?;
                }
                Action::Record(structured) => {
                    trace!(plain = %structured.plain, "record delivered");
                }
                Action::Close => closing = true,
            }
        }
        Ok(closing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};
    use tracing_test::traced_test;

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let result = GameLink::connect(LinkConfig::new("127.0.0.1", port)).await;
        assert!(matches!(result, Err(LinkError::Io(_))));
    }

    #[tokio::test]
    async fn test_send_after_close_fails() {
        let (client, _server) = duplex(64);
        let link = GameLink::spawn(client, LinkConfig::default());
        let (commands, envelopes, task) = link.into_parts();
        drop(envelopes);
        task.abort();
        let _ = task.await;
        assert!(commands.send("look".into()).await.is_err());
    }

    #[tokio::test]
    async fn test_forwards_and_closes() {
        let (client, mut server) = duplex(1024);
        let mut link = GameLink::spawn(client, LinkConfig::default());
        assert_eq!(
            link.recv().await,
            Some(Envelope::info(crate::session::CONNECTED_PLAIN))
        );
        link.send("look").await.unwrap();
        let mut buf = [0u8; 6];
        tokio::time::timeout(Duration::from_secs(5), server.read_exact(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&buf, b"look\r\n");

        server.write_all(b"A hobbit waves.\r\n").await.unwrap();
        assert_eq!(link.recv().await, Some(Envelope::mud("A hobbit waves.")));
        link.close().await.unwrap();
    }

    #[tokio::test]
    #[traced_test]
    async fn test_corrupt_stream_is_logged_as_decode_failure() {
        let (client, mut server) = duplex(1024);
        server
            .write_all(&[255, 250, 86, 255, 240, 0x12, 0x34, 0x56, 0x78, 0x9a])
            .await
            .unwrap();
        let (_commands, command_rx) = mpsc::channel(4);
        let (envelope_tx, mut envelopes) = mpsc::channel(4);
        let pump = Pump::new(client, LinkConfig::default(), command_rx, envelope_tx);

        let err = pump.run().await.unwrap_err();
        assert!(err.is_protocol_error());
        assert!(logs_contain("Game stream could not be decoded"));

        let mut last = None;
        while let Some(envelope) = envelopes.recv().await {
            last = Some(envelope);
        }
        assert!(matches!(last, Some(Envelope::Error { .. })));
    }
}
