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

use crate::ansi::strip_ansi_codes;
use crate::dom::{self, Element, Node};
use crate::entities::{collapse_whitespace, decode_entities, plain_text};
use crate::record::{
    Damage, Entry, Gauge, GroupMember, Hit, Record, Room, Score, StatValue, Stats, Structured,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, trace};

const GROUP_HEADER: &str = "Group Member";
const STATUS_OPEN: &str = "<status>";
const STATUS_CLOSE: &str = "</status>";

/// Turns one block of game output into a structured record and display text.
///
/// Color escapes are removed first. The block is then parsed as markup, as a whole when it looks
/// like one element sequence and otherwise as standalone fragments, and the elements are matched
/// against the known output patterns in a fixed order. The first pattern that matches wins:
///
/// 1. group roster (a `header` containing "Group Member" followed by member lines)
/// 2. stats (ten or more `status` values)
/// 3. score (six or more numeric `status` values)
/// 4. character names (`character` or `player` elements)
/// 5. hit or damage (a `hit`/`damage` element wrapping a `character`)
/// 6. any remaining elements as rooms, movement, prompts, headers and generic subtrees
///
/// The plain text is produced for every block, matched or not.
///
/// # Examples
///
/// ```
/// use mudgate_markup::{Record, structure};
///
/// let structured = structure(
///     "<status>429</status>/<status>430</status> hits, <status>62</status>/<status>63</status> \
///      mana, and <status>130</status>/<status>131</status> moves",
/// );
/// let Some(Record::Score(score)) = &structured.record else { panic!() };
/// assert_eq!(score.hits.current, 429);
/// assert_eq!(structured.raw.as_deref(), Some("429/430 hits, 62/63 mana, and 130/131 moves."));
/// ```
pub fn structure(text: &str) -> Structured {
    let clean = strip_ansi_codes(text);
    let clean = clean.as_ref();
    let plain = plain_text(clean);
    let elements = parse_block(clean);

    let (record, raw) = match classify(&elements, clean, &plain) {
        Some((record, raw)) => {
            debug!(kind = record.kind(), elements = elements.len(), "structured block");
            (Some(record), raw)
        }
        None => {
            trace!(elements = elements.len(), "no pattern matched");
            (None, None)
        }
    };
    Structured { record, raw, plain }
}

/// Parses the block as a whole when it is shaped like markup, falling back to fragments.
fn parse_block(text: &str) -> Vec<Element> {
    let trimmed = text.trim();
    if trimmed.starts_with('<') && trimmed.ends_with('>') {
        let elements: Vec<Element> = dom::parse(text)
            .into_iter()
            .filter_map(|node| match node {
                Node::Element(element) => Some(element),
                Node::Text(_) => None,
            })
            .collect();
        if !elements.is_empty() {
            return elements;
        }
    }
    dom::parse_fragments(text)
}

fn classify(elements: &[Element], text: &str, plain: &str) -> Option<(Record, Option<String>)> {
    if elements.is_empty() {
        return None;
    }
    if let Some(members) = group(elements, text) {
        return Some((Record::Group(members), None));
    }
    if let Some(stats) = stats(elements) {
        return Some((Record::Stats(stats), Some(collapse_whitespace(plain))));
    }
    if let Some(score) = score(elements) {
        let raw = score.summary();
        return Some((Record::Score(score), Some(raw)));
    }
    if let Some((names, raw)) = characters(elements, text) {
        return Some((Record::Characters(names), Some(raw)));
    }
    if let Some(target) = attack(elements, "hit") {
        return Some((Record::Hit(Hit { target }), Some(plain.to_string())));
    }
    if let Some(source) = attack(elements, "damage") {
        return Some((Record::Damage(Damage { source }), Some(plain.to_string())));
    }
    let (entries, raw) = markup(elements, plain);
    Some((Record::Markup(entries), Some(raw)))
}

// ============================================================================
// Group Roster
// ============================================================================

fn group(elements: &[Element], text: &str) -> Option<BTreeMap<String, GroupMember>> {
    let header = elements.iter().find(|element| element.name == "header")?;
    if !header.inner_text().contains(GROUP_HEADER) {
        return None;
    }
    let body = text
        .split_once("</header>")
        .map_or(text, |(_, body)| body);
    let members: BTreeMap<String, GroupMember> = body.lines().filter_map(group_member).collect();
    (!members.is_empty()).then_some(members)
}

/// Parses `Name <status>h</status>/<status>H</status> ... Room` positionally.
fn group_member(line: &str) -> Option<(String, GroupMember)> {
    let name = line.split_whitespace().next()?;
    if name.starts_with('<') {
        return None;
    }
    let mut values = Vec::with_capacity(6);
    let mut end = 0;
    let mut rest = line;
    let mut offset = 0;
    while values.len() < 6 {
        let open = rest.find(STATUS_OPEN)?;
        let content_start = open + STATUS_OPEN.len();
        let close = rest[content_start..].find(STATUS_CLOSE)?;
        let content = &rest[content_start..content_start + close];
        let consumed = content_start + close + STATUS_CLOSE.len();
        if !content.is_empty() && content.bytes().all(|b| b.is_ascii_digit()) {
            values.push(content.parse::<i64>().ok()?);
            end = offset + consumed;
        }
        rest = &rest[consumed..];
        offset += consumed;
    }
    let member = GroupMember {
        hits: values[0],
        mana: values[2],
        moves: values[4],
        room: plain_text(&line[end..]),
    };
    Some((name.to_string(), member))
}

// ============================================================================
// Status Values
// ============================================================================

fn status_texts(elements: &[Element]) -> impl Iterator<Item = &str> {
    elements
        .iter()
        .filter(|element| element.name == "status")
        .filter_map(Element::sole_text)
}

fn stats(elements: &[Element]) -> Option<Stats> {
    let values: Vec<StatValue> = status_texts(elements)
        .map(|text| match parse_leading_int(&text.replace(',', "")) {
            Some(number) => StatValue::Number(number),
            None => StatValue::Text(text.to_string()),
        })
        .collect();
    let [ob, db, pb, armour, wimpy, mood, xp, tp, gold, alert, ..] = values.as_slice() else {
        return None;
    };
    Some(Stats {
        ob: ob.clone(),
        db: db.clone(),
        pb: pb.clone(),
        armour: armour.clone(),
        wimpy: wimpy.clone(),
        mood: mood.clone(),
        xp: xp.clone(),
        tp: tp.clone(),
        gold: gold.clone(),
        alert: alert.clone(),
    })
}

fn score(elements: &[Element]) -> Option<Score> {
    let values: Vec<i64> = status_texts(elements).filter_map(parse_leading_int).collect();
    let &[hits, hits_max, mana, mana_max, moves, moves_max, ..] = values.as_slice() else {
        return None;
    };
    Some(Score {
        hits: Gauge {
            current: hits,
            max: hits_max,
        },
        mana: Gauge {
            current: mana,
            max: mana_max,
        },
        moves: Gauge {
            current: moves,
            max: moves_max,
        },
    })
}

/// Reads an optionally signed integer prefix, ignoring leading whitespace and anything after
/// the digits.
fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    let sign_len = text.len() - unsigned.len();
    text[..sign_len + digits].parse().ok()
}

// ============================================================================
// Characters and Combat
// ============================================================================

fn characters(elements: &[Element], text: &str) -> Option<(Vec<String>, String)> {
    let mut names = Vec::new();
    let mut raw = text.to_string();
    for element in elements {
        let (name, written) = match element.name.as_str() {
            "character" => match element.sole_text() {
                Some(name) => (name, format!("<character>{name}</character>")),
                None => {
                    let player = element
                        .significant_children()
                        .next()
                        .and_then(Node::as_element)
                        .filter(|child| child.name == "player")
                        .and_then(Element::sole_text);
                    let Some(name) = player else { continue };
                    (name, format!("<character><player>{name}</player></character>"))
                }
            },
            "player" => match element.sole_text() {
                Some(name) => (name, format!("<character><player>{name}</player></character>")),
                None => continue,
            },
            _ => continue,
        };
        let decoded = decode_entities(name);
        raw = raw.replacen(&written, &decoded, 1);
        names.push(decoded.into_owned());
    }
    (!names.is_empty()).then_some((names, raw))
}

fn attack(elements: &[Element], tag: &str) -> Option<String> {
    elements
        .iter()
        .find(|element| element.name == tag)?
        .elements()
        .filter(|child| child.name == "character")
        .find_map(Element::sole_text)
        .map(|name| decode_entities(name).into_owned())
}

// ============================================================================
// Markup Entries
// ============================================================================

fn markup(elements: &[Element], plain: &str) -> (Vec<Entry>, String) {
    let entries: Vec<Entry> = elements.iter().map(entry).collect();
    let raw = match elements.first() {
        Some(first) if first.name == "room" => Some(room_text(first)),
        _ => None,
    };
    let raw = raw
        .filter(|raw| !raw.is_empty())
        .unwrap_or_else(|| plain.to_string());
    (entries, raw)
}

fn entry(element: &Element) -> Entry {
    match element.name.as_str() {
        "room" => Entry::Room(room(element)),
        "movement" => Entry::Movement(decoded_attributes(element)),
        "prompt" => Entry::Prompt(decode_entities(&element.inner_text()).into_owned()),
        "header" => Entry::Header(decode_entities(&element.inner_text()).into_owned()),
        tag => Entry::Generic {
            tag: tag.to_string(),
            subtree: clean_subtree(element),
        },
    }
}

fn decoded_attributes(element: &Element) -> BTreeMap<String, String> {
    element
        .attributes
        .iter()
        .map(|(key, value)| (key.clone(), decode_entities(value).into_owned()))
        .collect()
}

fn room(element: &Element) -> Room {
    let name = element
        .child("name")
        .and_then(Element::sole_text)
        .map(|name| decode_entities(name).into_owned());
    let exits = element
        .child("exits")
        .map(|exits| {
            exits
                .elements()
                .filter(|exit| exit.name == "exit")
                .filter_map(|exit| {
                    let dir = exit.attributes.get("dir")?;
                    let id = exit.attributes.get("id")?;
                    Some((decode_entities(dir).into_owned(), decode_entities(id).into_owned()))
                })
                .collect()
        })
        .unwrap_or_default();
    Room {
        attributes: decoded_attributes(element),
        name,
        exits,
    }
}

/// The room's own text on one line: name, description, objects, characters and exits.
fn room_text(room: &Element) -> String {
    let mut raw = String::new();
    for child in room.significant_children() {
        match child {
            Node::Text(text) => raw.push_str(&decode_entities(text)),
            Node::Element(element) => match element.name.as_str() {
                "name" => {
                    if let Some(name) = element.sole_text() {
                        raw.push(' ');
                        raw.push_str(&decode_entities(name));
                        raw.push(' ');
                    }
                }
                "object" | "character" => {
                    if let Some(text) = element.sole_text() {
                        raw.push_str(&decode_entities(text));
                    }
                }
                "exits" => {
                    raw.push(' ');
                    for exit in element.significant_children() {
                        match exit {
                            Node::Text(text) => raw.push_str(&decode_entities(text)),
                            Node::Element(exit) if exit.name == "exit" => {
                                if let Some(text) = exit.sole_text() {
                                    raw.push_str(&decode_entities(text));
                                }
                            }
                            Node::Element(_) => {}
                        }
                    }
                    raw.push(' ');
                }
                _ => {}
            },
        }
    }
    collapse_whitespace(&raw)
}

/// Attributes under `$`, sole text under `_`, and child elements keyed by tag. Text mixed with
/// elements is dropped.
fn clean_subtree(element: &Element) -> Value {
    let mut object = Map::new();
    if !element.attributes.is_empty() {
        let attributes = decoded_attributes(element)
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        object.insert("$".to_string(), Value::Object(attributes));
    }
    if let Some(text) = element.sole_text() {
        object.insert("_".to_string(), Value::String(decode_entities(text).into_owned()));
        return Value::Object(object);
    }
    for child in element.elements() {
        object.insert(child.name.clone(), clean_subtree(child));
    }
    Value::Object(object)
}
