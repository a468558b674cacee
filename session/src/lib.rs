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

//! # MUD Session Bridge
//!
//! Joins one browser client to one game server connection. Game output is decoded by
//! [`mudgate_telnetcodec`], optionally structured by [`mudgate_markup`], and delivered to the
//! client as JSON [`Envelope`]s; client lines are forwarded to the game.
//!
//! ## Core Components
//!
//! - [`Session`]: the I/O free bridge logic, turning events and commands into [`Action`]s
//! - [`GameLink`]: a tokio task driving a `Session` over a game connection
//! - [`Envelope`]: the client wire messages (`info`, `error`, `mud`, `gmcp`)
//! - [`Command`]: client line classification, including the `/xml on` and `/xml off` toggles
//!
//! ## Quick Start
//!
//! ```no_run
//! use mudgate_session::{GameLink, LinkConfig, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LinkConfig::new("localhost", 4000)
//!         .with_session(SessionConfig::default().with_xml_mode(true));
//!
//!     let mut link = GameLink::connect(config).await?;
//!     link.send("look").await?;
//!     while let Some(envelope) = link.recv().await {
//!         println!("{}", envelope.to_json()?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Driving a Session Directly
//!
//! ```
//! use mudgate_session::{Action, Envelope, Session};
//! use mudgate_telnetcodec::StreamEvent;
//!
//! let mut session = Session::default();
//! let actions = session.receive([StreamEvent::Text("\x1b[1mHello\x1b[0m\r\n".into())]);
//! assert_eq!(actions, vec![Action::Client(Envelope::mud("Hello"))]);
//! ```

mod command;
mod config;
mod envelope;
mod error;
mod link;
mod session;

pub use self::command::{Command, XML_OFF, XML_ON};
pub use self::config::{LinkConfig, SessionConfig};
pub use self::envelope::Envelope;
pub use self::error::{LinkError, LinkResult};
pub use self::link::GameLink;
pub use self::session::{
    Action, COMPRESSION_ENABLED, CONNECTED_PLAIN, CONNECTED_XML, DISCONNECTED, Session,
    XML_DISABLED, XML_ENABLED,
};
