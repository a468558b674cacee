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

use bytes::Bytes;

///
/// `StreamEvent` is one decoded unit of the game stream.
///
/// Events are returned in stream order. Adjacent `Text` events carry no meaning of their own; a
/// chunk boundary may split one run of text into several events.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    /// Body text between control sequences, decoded as UTF-8
    Text(String),
    /// Compression was switched on (`true`) or the compressed stream ended (`false`)
    Compress(bool),
    /// Bytes to write back to the game in answer to an option offer
    Negotiate(Bytes),
    /// Raw GMCP subnegotiation payload with IAC escaping removed
    Extension(Bytes),
}
