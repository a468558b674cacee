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

//! Error types for the game link

use mudgate_telnetcodec::CodecError;
use std::time::Duration;
use thiserror::Error;

/// Result type for link operations
pub type LinkResult<T> = Result<T, LinkError>;

/// Game link error types
#[derive(Debug, Error)]
pub enum LinkError {
    /// I/O error from the game connection
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The game stream could not be decoded
    #[error("{0}")]
    Codec(#[from] CodecError),

    /// The game server did not accept the connection in time
    #[error("Connection to {address} timed out after {timeout:?}")]
    Timeout {
        /// Address that was dialled
        address: String,
        /// Configured connect timeout
        timeout: Duration,
    },

    /// The link has shut down
    #[error("Connection closed")]
    Closed,

    /// The link task panicked or was cancelled
    #[error("Link task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl LinkError {
    /// Check if the error came from decoding the game stream
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, LinkError::Codec(CodecError::Decompress(_)))
    }
}
