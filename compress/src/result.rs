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

use thiserror::Error;

/// Result type for decompression operations
pub type CompressResult<T> = Result<T, CompressError>;

/// Decompression stage error types
#[derive(Debug, Error)]
pub enum CompressError {
    /// The compressed stream is corrupt or uses an unsupported format
    #[error("inflate failed: {0}")]
    Inflate(#[from] flate2::DecompressError),

    /// Input was written after the stream ended without a reset in between
    #[error("{name} stream already finished")]
    Finished {
        /// Name of the decompressor that rejected the input
        name: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_display() {
        let err = CompressError::Finished { name: "zlib" };
        assert_eq!(err.to_string(), "zlib stream already finished");
    }
}
