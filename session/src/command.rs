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

/// Reserved command switching XML mode on
pub const XML_ON: &str = "/xml on";

/// Reserved command switching XML mode off
pub const XML_OFF: &str = "/xml off";

/// A line typed in the browser client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `/xml on` or `/xml off`, handled locally and never sent to the game
    XmlMode(bool),
    /// Anything else, forwarded to the game as typed
    Forward(String),
}

impl Command {
    /// Classifies one client line.
    ///
    /// Reserved commands are recognised after trimming surrounding whitespace. Other lines keep
    /// their content; only a trailing line terminator sent by the client is removed, since the
    /// game link appends its own.
    ///
    /// ```
    /// use mudgate_session::Command;
    ///
    /// assert_eq!(Command::parse(" /xml on \n"), Command::XmlMode(true));
    /// assert_eq!(Command::parse("  say hi\r\n"), Command::Forward("  say hi".into()));
    /// ```
    pub fn parse(line: &str) -> Command {
        match line.trim() {
            XML_ON => Command::XmlMode(true),
            XML_OFF => Command::XmlMode(false),
            _ => Command::Forward(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}
