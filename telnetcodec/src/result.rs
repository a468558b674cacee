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

use mudgate_compress::CompressError;
use thiserror::Error;

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Represents possible errors that can occur while decoding the game stream.
///
/// Malformed telnet sequences never produce an error; they are skipped. Only failures that leave
/// the stream undecodable are reported.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An I/O error occurred while reading from or writing to the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The compressed stream could not be inflated.
    #[error("decompression failed: {0}")]
    Decompress(#[from] CompressError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CodecError::Decompress(CompressError::Finished { name: "zlib" });
        assert_eq!(
            err.to_string(),
            "decompression failed: zlib stream already finished"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let err: CodecError = std::io::Error::from(std::io::ErrorKind::ConnectionReset).into();
        assert!(matches!(err, CodecError::Io(_)));
    }
}
