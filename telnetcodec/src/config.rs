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

/// Decoder negotiation settings.
///
/// Only the two options the gateway actually uses are ever acknowledged; every other offer from
/// the game is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Reply `IAC DO COMPRESS2` to the first compression offer
    pub accept_compression: bool,

    /// Reply `IAC DO GMCP` to the first extension offer
    pub accept_extension: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            accept_compression: true,
            accept_extension: true,
        }
    }
}

impl DecoderConfig {
    /// Create a configuration accepting both compression and extension offers
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable acknowledging compression offers
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.accept_compression = enabled;
        self
    }

    /// Enable or disable acknowledging extension offers
    pub fn with_extension(mut self, enabled: bool) -> Self {
        self.accept_extension = enabled;
        self
    }
}
