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

use std::borrow::Cow;

/// Removes ANSI escape sequences from a string.
///
/// Strips Control Sequence Introducer (CSI) codes: the escape character (`\x1b`) followed by `[`,
/// its parameters, and the terminating letter. Game servers color their output with these even
/// when markup mode is on.
///
/// If the input contains no escape character a borrowed reference is returned.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
/// use mudgate_markup::strip_ansi_codes;
///
/// let colored = "\x1b[1;31mA snaga orc\x1b[0m arrives.";
/// assert_eq!(strip_ansi_codes(colored), "A snaga orc arrives.");
///
/// let plain = "Plain Text";
/// assert!(matches!(strip_ansi_codes(plain), Cow::Borrowed(_)));
/// ```
///
/// # Limitations
///
/// Only CSI sequences are removed. OSC (`ESC ]`) and other escapes pass through unchanged.
pub fn strip_ansi_codes(str: &str) -> Cow<'_, str> {
    if !str.contains('\x1b') {
        return Cow::Borrowed(str);
    }

    let mut result = String::with_capacity(str.len());
    let mut chars = str.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Parameters run until the final letter
            for ch in chars.by_ref() {
                if ch.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    Cow::Owned(result)
}
