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

//! Session and link configuration

use mudgate_telnetcodec::{DEFAULT_LINE_ENDING, DecoderConfig};
use std::time::Duration;

/// Per-connection behaviour of a [`Session`](crate::Session)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Run game output through the structurer before splitting it into lines
    pub xml_mode: bool,

    /// Also send the option 102 mode toggle to the game when `/xml on` or `/xml off` is used
    pub send_mode_toggle: bool,

    /// Terminator appended to every command forwarded to the game
    pub line_ending: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            xml_mode: false,
            send_mode_toggle: false,
            line_ending: DEFAULT_LINE_ENDING.to_string(),
        }
    }
}

impl SessionConfig {
    /// Start in XML mode
    pub fn with_xml_mode(mut self, enabled: bool) -> Self {
        self.xml_mode = enabled;
        self
    }

    /// Forward mode toggles to the game
    pub fn with_mode_toggle(mut self, enabled: bool) -> Self {
        self.send_mode_toggle = enabled;
        self
    }

    /// Set the outbound line terminator
    pub fn with_line_ending(mut self, line_ending: impl Into<String>) -> Self {
        self.line_ending = line_ending.into();
        self
    }
}

/// Game link configuration
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Game server hostname or IP address
    pub host: String,

    /// Game server port
    pub port: u16,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Initial capacity of the read and write buffers
    pub buffer_size: usize,

    /// Capacity of the command and envelope channels
    pub channel_capacity: usize,

    /// Negotiation settings for the game stream decoder
    pub decoder: DecoderConfig,

    /// Session behaviour
    pub session: SessionConfig,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 4000,
            connect_timeout: Duration::from_secs(10),
            buffer_size: 8192,
            channel_capacity: 64,
            decoder: DecoderConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl LinkConfig {
    /// Create a new configuration for the given game server
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set buffer size
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Set channel capacity
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Set decoder configuration
    pub fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }

    /// Set session configuration
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Get the game server address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
