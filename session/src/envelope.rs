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

use mudgate_telnetcodec::ExtensionMessage;
use serde::Serialize;

///
/// A message for the browser client.
///
/// Envelopes serialize as JSON objects tagged by `type`:
///
/// ```text
/// {"type":"info","message":"XML mode enabled"}
/// {"type":"error","error":"Connection closed"}
/// {"type":"mud","data":"You are standing in a meadow."}
/// {"type":"gmcp","data":{"package":"Char.Vitals","data":{"hp":100}}}
/// ```
///
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    /// A lifecycle notice
    Info { message: String },
    /// A per-message or fatal error
    Error { error: String },
    /// One line of display-ready game text
    Mud { data: String },
    /// One extension message
    Gmcp { data: ExtensionMessage },
}

impl Envelope {
    pub fn info(message: impl Into<String>) -> Envelope {
        Envelope::Info {
            message: message.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Envelope {
        Envelope::Error {
            error: error.into(),
        }
    }

    pub fn mud(data: impl Into<String>) -> Envelope {
        Envelope::Mud { data: data.into() }
    }

    pub fn gmcp(data: ExtensionMessage) -> Envelope {
        Envelope::Gmcp { data }
    }

    /// Serializes the envelope for the client transport.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
