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

/// Longest entity body recognized between `&` and `;`.
const MAX_ENTITY_LEN: usize = 10;

/// Decodes the character entities game servers emit.
///
/// Recognizes `&amp; &lt; &gt; &quot; &#39; &apos;` and numeric references (`&#65;`, `&#x41;`).
/// Decoding is a single pass, so `&amp;lt;` becomes `&lt;`, never `<`. Anything unrecognized is
/// left as written.
///
/// ```
/// use mudgate_markup::decode_entities;
///
/// assert_eq!(decode_entities("oO CW&gt;"), "oO CW>");
/// assert_eq!(decode_entities("Tom &amp; Jerry &#x263A;"), "Tom & Jerry \u{263A}");
/// ```
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .char_indices()
            .take(MAX_ENTITY_LEN + 1)
            .find(|&(_, ch)| ch == ';')
            .and_then(|(end, _)| entity(&after[..end]).map(|ch| (ch, end)));
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Removes every `<...>` tag.
///
/// A `<` with no later `>` is kept as text, as is everything after it.
///
/// ```
/// use mudgate_markup::strip_tags;
///
/// assert_eq!(strip_tags("A <object>mailbox</object> stands here."), "A mailbox stands here.");
/// assert_eq!(strip_tags("3 < 4"), "3 < 4");
/// ```
pub fn strip_tags(text: &str) -> Cow<'_, str> {
    if !text.contains('<') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        out.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Display text of a block: tags stripped, surrounding whitespace trimmed, entities decoded.
///
/// Line breaks and indentation inside the block are preserved.
pub fn plain_text(text: &str) -> String {
    decode_entities(strip_tags(text).trim()).into_owned()
}

/// Replaces each run of whitespace with a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(
            decode_entities("&lt;a href=&quot;x&quot;&gt; &#39;q&apos;"),
            "<a href=\"x\"> 'q'"
        );
    }

    #[test]
    fn test_decode_single_pass() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_decode_numeric() {
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("&#xD800;"), "&#xD800;");
        assert_eq!(decode_entities("&#;"), "&#;");
    }

    #[test]
    fn test_decode_unknown_left_alone() {
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
        assert_eq!(decode_entities("&nbsp;"), "&nbsp;");
        assert_eq!(decode_entities("a &amp"), "a &amp");
        assert_eq!(decode_entities("&&amp;"), "&&");
    }

    #[test]
    fn test_decode_multibyte_neighbours() {
        assert_eq!(decode_entities("Éowyn &amp; Théoden;"), "Éowyn & Théoden;");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<a>b</a><c/>"), "b");
        assert_eq!(strip_tags("x <unclosed"), "x <unclosed");
        assert_eq!(strip_tags("<>empty"), "empty");
    }

    #[test]
    fn test_plain_text_preserves_lines() {
        let block = "<room>\n  <name>East Fork</name>\n  A warg &amp; an orc.\n</room>";
        assert_eq!(plain_text(block), "East Fork\n  A warg & an orc.");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  c "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
