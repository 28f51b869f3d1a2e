// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequence data model.
//!
//! A sequence is stored as a JSON array: the first element is a free-form
//! header object, every following element is one beat of the timeline.
//!
//! ```json
//! [
//!   { "word": "AB", "author": "...", "level": 1 },
//!   { "beat": 1, "blue_attributes": { ... }, "red_attributes": { ... } }
//! ]
//! ```

use indexmap::IndexMap;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Kinematic regime of a prop during one beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionType {
    /// Prop spins with the direction of hand travel
    Pro,
    /// Prop spins against the direction of hand travel
    Anti,
    /// Prop keeps its grid orientation while the hand moves
    Static,
    /// Hand travels straight through the center
    Dash,
    /// No motion; also used for unrecognized codes
    #[default]
    #[serde(other)]
    None,
}

impl MotionType {
    /// Notation code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pro => "pro",
            Self::Anti => "anti",
            Self::Static => "static",
            Self::Dash => "dash",
            Self::None => "none",
        }
    }
}

/// Direction of the prop's own extra rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropRotDir {
    /// Clockwise (positive angles)
    Cw,
    /// Counter-clockwise (negative angles)
    Ccw,
    /// No extra rotation; also used for unrecognized codes
    #[serde(other)]
    NoRot,
}

impl PropRotDir {
    /// Sign applied to extra rotation: +1, -1, or 0
    pub fn sign(dir: Option<Self>) -> f32 {
        match dir {
            Some(Self::Cw) => 1.0,
            Some(Self::Ccw) => -1.0,
            Some(Self::NoRot) | None => 0.0,
        }
    }
}

/// Which of the two props
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prop {
    /// Blue prop
    Blue,
    /// Red prop
    Red,
}

/// Header record of a sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceMeta {
    /// Word spelled by the sequence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    /// Author name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Difficulty level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// Prop kind (e.g. "staff")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop_type: Option<String>,
    /// Grid layout (e.g. "diamond")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_mode: Option<String>,
    /// Any other header fields, in document order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// Motion of one prop during one beat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropAttributes {
    /// Location the hand starts at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_loc: Option<String>,
    /// Location the hand ends at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_loc: Option<String>,
    /// Prop orientation at the start of the beat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_ori: Option<String>,
    /// Prop orientation at the end of the beat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_ori: Option<String>,
    /// Direction of extra rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop_rot_dir: Option<PropRotDir>,
    /// Extra full revolutions; `"fl"` (float) reads as 0
    #[serde(
        default,
        deserialize_with = "turns_format::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub turns: Option<f32>,
    /// Kinematic regime
    #[serde(default)]
    pub motion_type: MotionType,
}

impl PropAttributes {
    /// Turn count with the missing case read as 0
    pub fn turn_count(&self) -> f32 {
        self.turns.unwrap_or(0.0)
    }
}

/// One beat of the timeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceStep {
    /// Beat ordinal
    pub beat: f32,
    /// Letter shown for this beat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
    /// Start position label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_pos: Option<String>,
    /// End position label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_pos: Option<String>,
    /// Blue prop motion
    pub blue_attributes: PropAttributes,
    /// Red prop motion
    pub red_attributes: PropAttributes,
    /// Any other step fields, in document order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl SequenceStep {
    /// Attributes of one prop
    pub fn attributes(&self, prop: Prop) -> &PropAttributes {
        match prop {
            Prop::Blue => &self.blue_attributes,
            Prop::Red => &self.red_attributes,
        }
    }

    /// Whether this is a leading start-position entry rather than a move
    pub fn is_start_position(&self) -> bool {
        self.beat == 0.0
    }
}

/// A complete sequence: header plus steps in beat order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceData {
    meta: SequenceMeta,
    steps: Vec<SequenceStep>,
}

impl SequenceData {
    /// Create a sequence from its header and steps
    pub fn new(meta: SequenceMeta, steps: Vec<SequenceStep>) -> Self {
        Self { meta, steps }
    }

    /// Parse the JSON array form
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Convert from an already parsed JSON value
    pub fn from_json_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Header record
    pub fn meta(&self) -> &SequenceMeta {
        &self.meta
    }

    /// Steps after the header
    pub fn steps(&self) -> &[SequenceStep] {
        &self.steps
    }

    /// Number of moves, not counting a leading start-position entry
    pub fn move_count(&self) -> usize {
        match self.steps.first() {
            Some(first) if first.is_start_position() => self.steps.len() - 1,
            _ => self.steps.len(),
        }
    }

    /// Split into header and steps
    pub fn into_parts(self) -> (SequenceMeta, Vec<SequenceStep>) {
        (self.meta, self.steps)
    }
}

impl Serialize for SequenceData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.steps.len() + 1))?;
        seq.serialize_element(&self.meta)?;
        for step in &self.steps {
            seq.serialize_element(step)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for SequenceData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SequenceVisitor;

        impl<'de> Visitor<'de> for SequenceVisitor {
            type Value = SequenceData;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an array of a sequence header followed by steps")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<SequenceData, A::Error> {
                let meta: SequenceMeta = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::custom("missing sequence header"))?;

                let mut steps = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(step) = seq.next_element::<SequenceStep>()? {
                    steps.push(step);
                }

                Ok(SequenceData { meta, steps })
            }
        }

        deserializer.deserialize_seq(SequenceVisitor)
    }
}

mod turns_format {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTurns {
        Count(f32),
        Code(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
        match Option::<RawTurns>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawTurns::Count(count)) => Ok(Some(count)),
            Some(RawTurns::Code(code)) if code.eq_ignore_ascii_case("fl") => Ok(Some(0.0)),
            Some(RawTurns::Code(code)) => code
                .trim()
                .parse::<f32>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid turn count: {code:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"word": "AB", "author": "tester", "level": 2, "prop_type": "staff", "grid_mode": "diamond", "is_circular": false},
        {"beat": 0, "sequence_start_position": "alpha",
         "blue_attributes": {"start_loc": "s", "end_loc": "s", "start_ori": "in", "end_ori": "in", "motion_type": "static"},
         "red_attributes": {"start_loc": "n", "end_loc": "n", "start_ori": "in", "end_ori": "in", "motion_type": "static"}},
        {"beat": 1, "letter": "A", "start_pos": "alpha1", "end_pos": "alpha3",
         "blue_attributes": {"start_loc": "s", "end_loc": "w", "start_ori": "in", "end_ori": "in", "prop_rot_dir": "cw", "turns": 0, "motion_type": "pro"},
         "red_attributes": {"start_loc": "n", "end_loc": "e", "start_ori": "in", "end_ori": "in", "prop_rot_dir": "cw", "turns": "fl", "motion_type": "pro"}}
    ]"#;

    #[test]
    fn test_parse_sample() {
        let data = SequenceData::from_json_str(SAMPLE).unwrap();
        assert_eq!(data.meta().word.as_deref(), Some("AB"));
        assert_eq!(data.meta().level, Some(2));
        assert_eq!(data.meta().extra["is_circular"], serde_json::Value::Bool(false));
        assert_eq!(data.steps().len(), 2);
        assert_eq!(data.move_count(), 1);

        let step = &data.steps()[1];
        assert_eq!(step.letter.as_deref(), Some("A"));
        assert_eq!(step.blue_attributes.motion_type, MotionType::Pro);
        assert_eq!(step.blue_attributes.prop_rot_dir, Some(PropRotDir::Cw));
        assert_eq!(step.red_attributes.turns, Some(0.0));
        assert_eq!(step.attributes(Prop::Red).end_loc.as_deref(), Some("e"));
        assert!(data.steps()[0].is_start_position());
        assert!(data.steps()[0].extra.contains_key("sequence_start_position"));
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        let attrs: PropAttributes = serde_json::from_str(
            r#"{"start_loc": "s", "motion_type": "float", "prop_rot_dir": "sideways"}"#,
        )
        .unwrap();
        assert_eq!(attrs.motion_type, MotionType::None);
        assert_eq!(attrs.prop_rot_dir, Some(PropRotDir::NoRot));
        assert_eq!(attrs.turns, None);
        assert_eq!(attrs.turn_count(), 0.0);

        let attrs: PropAttributes = serde_json::from_str(r#"{"turns": "1.5"}"#).unwrap();
        assert_eq!(attrs.turns, Some(1.5));
        assert!(serde_json::from_str::<PropAttributes>(r#"{"turns": "lots"}"#).is_err());
    }

    #[test]
    fn test_header_only_and_empty() {
        let data = SequenceData::from_json_str(r#"[{"word": "X"}]"#).unwrap();
        assert!(data.steps().is_empty());
        assert_eq!(data.move_count(), 0);

        let err = SequenceData::from_json_str("[]").unwrap_err();
        assert!(err.to_string().contains("missing sequence header"));
        assert!(SequenceData::from_json_str(r#"{"word": "X"}"#).is_err());
    }

    #[test]
    fn test_serialize_keeps_array_shape() {
        let data = SequenceData::from_json_str(SAMPLE).unwrap();
        let value = serde_json::to_value(&data).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array[0]["word"], "AB");
        assert_eq!(array[2]["blue_attributes"]["prop_rot_dir"], "cw");
        assert_eq!(SequenceData::from_json_value(value).unwrap(), data);
    }
}
