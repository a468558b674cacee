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

//! Lenient markup parser for game output.
//!
//! Game servers emit something that looks like XML but is not: attribute values are often
//! unquoted, tags are left open, and close tags appear without a matching open. The parser here
//! never fails. It produces a best-effort tree and leaves text exactly as written, with entities
//! still encoded.

use std::collections::BTreeMap;

/// A node of the parsed tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// An element with its attributes and children
    Element(Element),
    /// Raw text between tags, entities not decoded
    Text(String),
}

impl Node {
    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Node::Text(text) if text.trim().is_empty())
    }
}

/// An element of the parsed tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written
    pub name: String,
    /// Attribute values as written, entities not decoded
    pub attributes: BTreeMap<String, String>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|element| element.name == name)
    }

    /// Child nodes that are not whitespace-only text.
    pub fn significant_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|node| !node.is_blank())
    }

    /// The element's text when its only significant child is a text node.
    ///
    /// ```
    /// use mudgate_markup::dom::parse;
    ///
    /// let nodes = parse("<name>East Fork</name><tell><b>x</b> y</tell>");
    /// let name = nodes[0].as_element().unwrap();
    /// let tell = nodes[1].as_element().unwrap();
    /// assert_eq!(name.sole_text(), Some("East Fork"));
    /// assert_eq!(tell.sole_text(), None);
    /// ```
    pub fn sole_text(&self) -> Option<&str> {
        let mut significant = self.significant_children();
        match (significant.next(), significant.next()) {
            (Some(Node::Text(text)), None) => Some(text),
            _ => None,
        }
    }

    /// All descendant text concatenated in document order.
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }
}

/// Parses a block of game markup into a forest of nodes.
///
/// Unquoted attribute values end at whitespace, `"`, `>` or `/`. Unclosed elements are closed at
/// the end of input, a close tag closes every element opened after its match, and close tags
/// without a match are ignored. Comments and `<!`/`<?` declarations are skipped. A `<` that does
/// not start a tag is kept as text.
///
/// ```
/// use mudgate_markup::dom::{Node, parse};
///
/// let nodes = parse("<movement dir=west/><room id=1>Hall");
/// assert_eq!(nodes.len(), 2);
/// let room = nodes[1].as_element().unwrap();
/// assert_eq!(room.attributes["id"], "1");
/// assert_eq!(room.children, vec![Node::Text("Hall".into())]);
/// ```
pub fn parse(input: &str) -> Vec<Node> {
    let mut builder = TreeBuilder::default();
    let bytes = input.as_bytes();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        let Some((token, end)) = tokenize_tag(input, i) else {
            i += 1;
            continue;
        };
        builder.text(&input[text_start..i]);
        match token {
            Tag::Open {
                name,
                attributes,
                self_closing,
            } => builder.open(name, attributes, self_closing),
            Tag::Close(name) => builder.close(name),
            Tag::Skip => {}
        }
        i = end;
        text_start = end;
    }
    builder.text(&input[text_start..]);
    builder.finish()
}

/// Extracts standalone fragments from mixed text and parses each one.
///
/// A fragment is either an open tag, text without `<`, and the matching close tag
/// (`<character>snaga orc</character>`), or a self-closing tag (`<movement dir=south/>`). Text
/// between fragments is discarded. Returns the elements in document order.
///
/// ```
/// use mudgate_markup::dom::parse_fragments;
///
/// let elements = parse_fragments("Some text <tag>content</tag> more text <selfclosing/>");
/// let names: Vec<_> = elements.iter().map(|e| e.name.as_str()).collect();
/// assert_eq!(names, ["tag", "selfclosing"]);
/// ```
pub fn parse_fragments(input: &str) -> Vec<Element> {
    let mut fragments = Vec::new();
    let mut i = 0;
    while let Some(offset) = input[i..].find('<') {
        let start = i + offset;
        match fragment_end(input, start) {
            Some(end) => {
                fragments.extend(parse(&input[start..end]).into_iter().filter_map(|node| {
                    match node {
                        Node::Element(element) => Some(element),
                        Node::Text(_) => None,
                    }
                }));
                i = end;
            }
            None => i = start + 1,
        }
    }
    fragments
}

/// End offset of the fragment starting at `start`, if one starts there.
fn fragment_end(input: &str, start: usize) -> Option<usize> {
    let open_len = input[start + 1..].find('>')?;
    if open_len == 0 {
        return None;
    }
    let open = &input[start + 1..start + 1 + open_len];
    let after_open = start + open_len + 2;
    if open.starts_with(['/', '!', '?']) {
        return None;
    }
    if open.len() > 1 && open.ends_with('/') {
        return Some(after_open);
    }

    let name = open.split(|c: char| c.is_whitespace() || c == '/').next()?;
    let text_len = input[after_open..].find('<').unwrap_or(input.len() - after_open);
    let close_start = after_open + text_len;
    let close = input[close_start..].strip_prefix("</")?;
    let close_len = close.find('>')?;
    if close[..close_len].trim() != name {
        return None;
    }
    Some(close_start + 2 + close_len + 1)
}

enum Tag<'a> {
    Open {
        name: &'a str,
        attributes: BTreeMap<String, String>,
        self_closing: bool,
    },
    Close(&'a str),
    Skip,
}

/// Reads the tag starting at `start`, returning it with the offset just past its end.
fn tokenize_tag(input: &str, start: usize) -> Option<(Tag<'_>, usize)> {
    let rest = &input[start..];
    if let Some(comment) = rest.strip_prefix("<!--") {
        let end = comment.find("-->").map_or(input.len(), |p| start + 4 + p + 3);
        return Some((Tag::Skip, end));
    }
    if rest.starts_with("<!") || rest.starts_with("<?") {
        let end = rest.find('>')?;
        return Some((Tag::Skip, start + end + 1));
    }
    if let Some(close) = rest.strip_prefix("</") {
        let end = close.find('>')?;
        let name = close[..end].trim();
        return Some((Tag::Close(name), start + 2 + end + 1));
    }

    let body = &rest[1..];
    let first = body.chars().next()?;
    if !(first.is_alphabetic() || first == '_' || first == ':') {
        return None;
    }
    let name_len = body
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(body.len());
    let name = &body[..name_len];

    let bytes = body.as_bytes();
    let mut attributes = BTreeMap::new();
    let mut i = name_len;
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i) {
            None => return None,
            Some(b'>') => {
                return Some((open_tag(name, attributes, false), start + 1 + i + 1));
            }
            Some(b'/') if bytes.get(i + 1) == Some(&b'>') => {
                return Some((open_tag(name, attributes, true), start + 1 + i + 2));
            }
            Some(b'/' | b'"' | b'\'' | b'=') => {
                i += 1;
                continue;
            }
            Some(_) => {}
        }

        let key_start = i;
        while i < bytes.len()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
            && !bytes[i].is_ascii_whitespace()
        {
            i += 1;
        }
        let key = &body[key_start..i];
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            attributes.insert(key.to_string(), String::new());
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let value = match bytes.get(i) {
            Some(&quote @ (b'"' | b'\'')) => {
                let value_start = i + 1;
                let value_len = body[value_start..].find(quote as char)?;
                i = value_start + value_len + 1;
                &body[value_start..value_start + value_len]
            }
            _ => {
                let value_start = i;
                while i < bytes.len()
                    && !matches!(bytes[i], b'"' | b'>' | b'/')
                    && !bytes[i].is_ascii_whitespace()
                {
                    i += 1;
                }
                &body[value_start..i]
            }
        };
        attributes.insert(key.to_string(), value.to_string());
    }
}

fn open_tag(name: &str, attributes: BTreeMap<String, String>, self_closing: bool) -> Tag<'_> {
    Tag::Open {
        name,
        attributes,
        self_closing,
    }
}

#[derive(Default)]
struct TreeBuilder {
    roots: Vec<Node>,
    stack: Vec<Element>,
}

impl TreeBuilder {
    fn children(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let children = self.children();
        match children.last_mut() {
            Some(Node::Text(previous)) => previous.push_str(text),
            _ => children.push(Node::Text(text.to_string())),
        }
    }

    fn open(&mut self, name: &str, attributes: BTreeMap<String, String>, self_closing: bool) {
        let element = Element {
            name: name.to_string(),
            attributes,
            children: Vec::new(),
        };
        if self_closing {
            self.children().push(Node::Element(element));
        } else {
            self.stack.push(element);
        }
    }

    fn close(&mut self, name: &str) {
        let Some(depth) = self.stack.iter().rposition(|element| element.name == name) else {
            return;
        };
        while self.stack.len() > depth {
            self.pop();
        }
    }

    fn pop(&mut self) {
        if let Some(element) = self.stack.pop() {
            self.children().push(Node::Element(element));
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.stack.is_empty() {
            self.pop();
        }
        self.roots
    }
}
