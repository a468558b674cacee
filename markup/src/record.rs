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

use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// The result of structuring one block of game output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Structured {
    /// The recognized record, if any pattern matched
    pub record: Option<Record>,
    /// Record-specific rendering of the block's text
    pub raw: Option<String>,
    /// The block with markup stripped and entities decoded
    pub plain: String,
}

impl Structured {
    /// Renders the record in the shape the browser client expects.
    ///
    /// The record's keys sit at the top level next to `raw`; a block without a record renders
    /// as `null`.
    ///
    /// ```
    /// use mudgate_markup::structure;
    /// use serde_json::json;
    ///
    /// let structured = structure("<prompt>oO CW&gt;</prompt>");
    /// assert_eq!(
    ///     structured.to_json(),
    ///     json!({"prompt": {"text": "oO CW>"}, "raw": "oO CW>"})
    /// );
    /// assert_eq!(structure("plain words").to_json(), json!(null));
    /// ```
    pub fn to_json(&self) -> Value {
        let Some(record) = &self.record else {
            return Value::Null;
        };
        let mut object = record.to_json();
        if let Some(raw) = &self.raw {
            object.insert("raw".to_string(), Value::String(raw.clone()));
        }
        Value::Object(object)
    }
}

/// A recognized pattern of game output. Exactly one per block.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    /// Group roster keyed by member name
    Group(BTreeMap<String, GroupMember>),
    /// Character statistics
    Stats(Stats),
    /// Current and maximum hits, mana and moves
    Score(Score),
    /// Names of the characters mentioned, in order
    Characters(Vec<String>),
    /// An attack by the player
    Hit(Hit),
    /// An attack on the player
    Damage(Damage),
    /// Room, movement, prompt, header and other elements in document order
    Markup(Vec<Entry>),
}

impl Record {
    /// Short name used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Record::Group(_) => "group",
            Record::Stats(_) => "stats",
            Record::Score(_) => "score",
            Record::Characters(_) => "characters",
            Record::Hit(_) => "hit",
            Record::Damage(_) => "damage",
            Record::Markup(_) => "markup",
        }
    }

    fn to_json(&self) -> Map<String, Value> {
        let mut object = Map::new();
        match self {
            Record::Group(members) => {
                object.insert("group".into(), to_value(members));
            }
            Record::Stats(stats) => {
                object.insert("stats".into(), to_value(stats));
            }
            Record::Score(score) => {
                object.insert("score".into(), to_value(score));
            }
            Record::Characters(names) => {
                object.insert("characters".into(), json!(names));
            }
            Record::Hit(hit) => {
                object.insert("hit".into(), to_value(hit));
            }
            Record::Damage(damage) => {
                object.insert("damage".into(), to_value(damage));
            }
            Record::Markup(entries) => {
                for entry in entries {
                    object.insert(entry.key().to_string(), entry.to_json());
                }
            }
        }
        object
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}

/// One top-level element of a markup block.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    /// Room description
    Room(Room),
    /// Movement notice; its attributes
    Movement(BTreeMap<String, String>),
    /// Prompt line
    Prompt(String),
    /// Section header
    Header(String),
    /// Any other element as a cleaned subtree
    Generic {
        /// Tag name
        tag: String,
        /// Attributes under `$`, sole text under `_`, child elements by tag
        subtree: Value,
    },
}

impl Entry {
    /// The key this entry renders under.
    pub fn key(&self) -> &str {
        match self {
            Entry::Room(_) => "room",
            Entry::Movement(_) => "movement",
            Entry::Prompt(_) => "prompt",
            Entry::Header(_) => "header",
            Entry::Generic { tag, .. } => tag,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Entry::Room(room) => to_value(room),
            Entry::Movement(attributes) => json!(attributes),
            Entry::Prompt(text) | Entry::Header(text) => json!({ "text": text }),
            Entry::Generic { subtree, .. } => subtree.clone(),
        }
    }
}

/// A room description.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Room {
    /// Element attributes such as `id`, `area` and `terrain`
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
    /// Room name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Exit direction to destination room id
    pub exits: BTreeMap<String, String>,
}

/// One line of a group roster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupMember {
    /// Current hit points
    pub hits: i64,
    /// Current mana
    pub mana: i64,
    /// Current movement points
    pub moves: i64,
    /// Room the member is in
    pub room: String,
}

/// A stat slot, numeric where the game printed a number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    /// A number, thousands separators removed
    Number(i64),
    /// Anything else, as written
    Text(String),
}

/// Character statistics, mapped by position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub ob: StatValue,
    pub db: StatValue,
    pub pb: StatValue,
    pub armour: StatValue,
    pub wimpy: StatValue,
    pub mood: StatValue,
    pub xp: StatValue,
    pub tp: StatValue,
    pub gold: StatValue,
    pub alert: StatValue,
}

/// A current/maximum pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Gauge {
    pub current: i64,
    pub max: i64,
}

/// Hits, mana and moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub hits: Gauge,
    pub mana: Gauge,
    pub moves: Gauge,
}

impl Score {
    /// The score line as the game prints it.
    pub fn summary(&self) -> String {
        format!(
            "{}/{} hits, {}/{} mana, and {}/{} moves.",
            self.hits.current,
            self.hits.max,
            self.mana.current,
            self.mana.max,
            self.moves.current,
            self.moves.max
        )
    }
}

/// The player hit someone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub target: String,
}

/// Someone damaged the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Damage {
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_json_flattens_attributes() {
        let room = Room {
            attributes: BTreeMap::from([("id".to_string(), "7".to_string())]),
            name: Some("Hall".to_string()),
            exits: BTreeMap::from([("north".to_string(), "8".to_string())]),
        };
        assert_eq!(
            to_value(&room),
            json!({"id": "7", "name": "Hall", "exits": {"north": "8"}})
        );
        let unnamed = Room::default();
        assert_eq!(to_value(&unnamed), json!({"exits": {}}));
    }

    #[test]
    fn test_stat_value_untagged() {
        assert_eq!(to_value(&StatValue::Number(5)), json!(5));
        assert_eq!(to_value(&StatValue::Text("normal".into())), json!("normal"));
    }

    #[test]
    fn test_score_summary() {
        let score = Score {
            hits: Gauge { current: 1, max: 2 },
            mana: Gauge { current: 3, max: 4 },
            moves: Gauge { current: 5, max: 6 },
        };
        assert_eq!(score.summary(), "1/2 hits, 3/4 mana, and 5/6 moves.");
    }

    #[test]
    fn test_structured_without_raw() {
        let structured = Structured {
            record: Some(Record::Characters(vec!["Azg".into()])),
            raw: None,
            plain: "Azg".into(),
        };
        assert_eq!(structured.to_json(), json!({"characters": ["Azg"]}));
    }

    #[test]
    fn test_markup_entries_share_one_object() {
        let record = Record::Markup(vec![
            Entry::Header("Allies".into()),
            Entry::Prompt("oO CW>".into()),
            Entry::Generic {
                tag: "selfclosing".into(),
                subtree: json!({}),
            },
        ]);
        assert_eq!(
            Value::Object(record.to_json()),
            json!({"header": {"text": "Allies"}, "prompt": {"text": "oO CW>"}, "selfclosing": {}})
        );
    }
}
