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

use crate::{Command, Envelope, LinkError, SessionConfig};
use mudgate_markup::{Structured, strip_ansi_codes, structure};
use mudgate_telnetcodec::{GameInput, StreamEvent, parse_extension};
use tracing::{debug, info, trace};

pub const CONNECTED_PLAIN: &str = "Connected to MUD server (plain text mode)";
pub const CONNECTED_XML: &str = "Connected to MUD server (XML mode)";
pub const DISCONNECTED: &str = "Disconnected from MUD server";
pub const XML_ENABLED: &str = "XML mode enabled";
pub const XML_DISABLED: &str = "XML mode disabled";
pub const COMPRESSION_ENABLED: &str = "MCCP compression enabled";

/// Something the owner of a [`Session`] has to carry out.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Deliver an envelope to the browser client
    Client(Envelope),
    /// Write to the game connection
    Game(GameInput),
    /// A structured record recognised in XML mode
    Record(Structured),
    /// Tear down both connections
    Close,
}

///
/// The bridge logic for one browser connection and its game connection.
///
/// A `Session` does no I/O. It turns decoded game events and client command lines into
/// [`Action`]s, which the caller performs in order. [`GameLink`](crate::GameLink) drives one over
/// a socket; tests and other transports can drive it directly.
///
#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    closed: bool,
}

impl Session {
    pub fn new(config: SessionConfig) -> Session {
        Session {
            config,
            closed: false,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether game output currently goes through the structurer
    pub fn xml_mode(&self) -> bool {
        self.config.xml_mode
    }

    /// Whether the session has already asked for the connections to close
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The game connection is open.
    pub fn connected(&mut self) -> Vec<Action> {
        info!(xml_mode = self.config.xml_mode, "game connection established");
        let message = if self.config.xml_mode {
            CONNECTED_XML
        } else {
            CONNECTED_PLAIN
        };
        vec![Action::Client(Envelope::info(message))]
    }

    /// Handles one batch of decoded game events.
    ///
    /// Adjacent text events are joined before being split into lines, so a line interrupted by
    /// a dropped control sequence is still delivered whole.
    pub fn receive<I>(&mut self, events: I) -> Vec<Action>
    where
        I: IntoIterator<Item = StreamEvent>,
    {
        let mut actions = Vec::new();
        if self.closed {
            return actions;
        }
        let mut block = String::new();
        for event in events {
            if let StreamEvent::Text(text) = &event {
                block.push_str(text);
                continue;
            }
            self.output(&block, &mut actions);
            block.clear();
            self.event(event, &mut actions);
        }
        self.output(&block, &mut actions);
        actions
    }

    /// Handles one line typed in the browser client.
    pub fn command(&mut self, line: &str) -> Vec<Action> {
        if self.closed {
            return Vec::new();
        }
        match Command::parse(line) {
            Command::XmlMode(enabled) => {
                self.config.xml_mode = enabled;
                info!(enabled, "XML mode toggled");
                let mut actions = Vec::with_capacity(2);
                if self.config.send_mode_toggle {
                    actions.push(Action::Game(GameInput::ModeToggle(enabled)));
                }
                let message = if enabled { XML_ENABLED } else { XML_DISABLED };
                actions.push(Action::Client(Envelope::info(message)));
                actions
            }
            Command::Forward(line) => {
                trace!(%line, "forwarding command");
                vec![Action::Game(GameInput::Line(line))]
            }
        }
    }

    /// The game server closed the connection.
    pub fn disconnected(&mut self) -> Vec<Action> {
        if std::mem::replace(&mut self.closed, true) {
            return Vec::new();
        }
        info!("game connection closed");
        vec![Action::Client(Envelope::info(DISCONNECTED)), Action::Close]
    }

    /// The game connection failed.
    pub fn failed(&mut self, error: &LinkError) -> Vec<Action> {
        if std::mem::replace(&mut self.closed, true) {
            return Vec::new();
        }
        vec![
            Action::Client(Envelope::error(error.to_string())),
            Action::Close,
        ]
    }

    fn event(&self, event: StreamEvent, actions: &mut Vec<Action>) {
        match event {
            StreamEvent::Text(text) => self.output(&text, actions),
            StreamEvent::Compress(true) => {
                info!("{}", COMPRESSION_ENABLED);
                actions.push(Action::Client(Envelope::info(COMPRESSION_ENABLED)));
            }
            StreamEvent::Compress(false) => debug!("compressed stream ended"),
            StreamEvent::Negotiate(reply) => {
                trace!(?reply, "negotiation reply");
                actions.push(Action::Game(GameInput::Raw(reply)));
            }
            StreamEvent::Extension(payload) => {
                let message = parse_extension(&payload);
                trace!(package = %message.package, "extension message");
                actions.push(Action::Client(Envelope::gmcp(message)));
            }
        }
    }

    fn output(&self, text: &str, actions: &mut Vec<Action>) {
        if text.is_empty() {
            return;
        }
        if !self.config.xml_mode {
            let text = strip_ansi_codes(text);
            actions.extend(display_lines(&text).map(|line| Action::Client(Envelope::mud(line))));
            return;
        }
        let structured = structure(text);
        let lines: Vec<Action> = display_lines(&structured.plain)
            .map(|line| Action::Client(Envelope::mud(line)))
            .collect();
        if let Some(record) = &structured.record {
            debug!(kind = record.kind(), record = %structured.to_json(), "structured record");
        }
        if structured.record.is_some() {
            actions.push(Action::Record(structured));
        }
        actions.extend(lines);
    }
}

/// Non-blank lines of `text`, with carriage returns at either end removed.
fn display_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.trim_matches('\r'))
        .filter(|line| !line.trim().is_empty())
}
