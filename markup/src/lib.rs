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

//! # MUD Output Structurer
//!
//! Game servers in markup mode wrap their output in XML-like tags: rooms, prompts, combat
//! messages, status values. The markup is not well formed, so this crate parses it leniently and
//! matches the result against the output patterns the web client knows how to display.
//!
//! ## Core Components
//!
//! - [`structure`]: one block of text in, a [`Structured`] record and display text out
//! - [`dom`]: the lenient parser behind it, usable on its own
//! - [`strip_ansi_codes`], [`strip_tags`], [`decode_entities`]: the text clean-up steps
//!
//! ## Usage Example
//!
//! ```rust
//! use mudgate_markup::{Entry, Record, structure};
//!
//! let block = r#"<room id=54237 area="Dol Guldur" terrain=building><name>In the Pits of Lugburz</name>
//! A <object>mailbox</object> stands here.
//! <exits from=54237>Exits: <exit dir=east id=7158160>east</exit>.</exits></room>"#;
//!
//! let structured = structure(block);
//! let Some(Record::Markup(entries)) = &structured.record else { panic!() };
//! let Entry::Room(room) = &entries[0] else { panic!() };
//! assert_eq!(room.name.as_deref(), Some("In the Pits of Lugburz"));
//! assert_eq!(room.exits["east"], "7158160");
//! assert_eq!(
//!     structured.raw.as_deref(),
//!     Some("In the Pits of Lugburz A mailbox stands here. Exits: east.")
//! );
//! ```
//!
//! ## Failure Handling
//!
//! Nothing here returns an error. Input that matches no pattern yields `record: None` and still
//! produces plain text.

mod ansi;
pub mod dom;
mod entities;
mod record;
mod structure;

pub use self::ansi::strip_ansi_codes;
pub use self::entities::{collapse_whitespace, decode_entities, plain_text, strip_tags};
pub use self::record::{
    Damage, Entry, Gauge, GroupMember, Hit, Record, Room, Score, StatValue, Stats, Structured,
};
pub use self::structure::structure;
