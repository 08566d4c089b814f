// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/parser.rs - Parser library for InteractiveHtmlBom board data.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * # `parser` Module
 *
 * This module provides functionality to parse decompressed InteractiveHtmlBom
 * board data into a JSON record.
 *
 * ## Usage Example
 *
 * ```no_run
 * use std::fs;
 *
 * use pcbdata::decoder::DecodedPcbData;
 * use pcbdata::parser::{ParsedPcbData, RecordKey};
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Read the report
 *     let html = fs::read_to_string("ibom.html")?;
 *
 *     // Decode the embedded board data
 *     let decoded = DecodedPcbData::from_html(&html)?;
 *
 *     // Parse the decoded data
 *     let parsed = ParsedPcbData::from_decoded(&decoded)?;
 *
 *     // Access parsed data
 *     if let Some(footprints) = parsed.sequence(RecordKey::Footprints) {
 *         println!("{} footprints", footprints.len());
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use serde_json::{Map, Value};

use crate::decoder::DecodedPcbData;
use crate::error::PcbDataError;

/// The JSON shape a recognized key is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A JSON object.
    Mapping,
    /// A JSON array.
    Sequence,
}

/// The top-level keys of the board record that are projected to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKey {
    /// Board drawings, grouped by kind (`silkscreen`, `fabrication`) and side.
    Drawings,
    /// Footprints with their pads and bounding boxes.
    Footprints,
    /// Board outline segments and arcs.
    Edges,
    /// Title, revision, company and date of the design.
    Metadata,
    /// Bill of materials tables.
    Bom,
    /// Bounding box of the board outline.
    EdgesBbox,
}

impl RecordKey {
    /// All recognized keys, in the order the response lists them.
    pub const ALL: [RecordKey; 6] = [
        RecordKey::Drawings,
        RecordKey::Footprints,
        RecordKey::Edges,
        RecordKey::Metadata,
        RecordKey::Bom,
        RecordKey::EdgesBbox,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RecordKey::Drawings => "drawings",
            RecordKey::Footprints => "footprints",
            RecordKey::Edges => "edges",
            RecordKey::Metadata => "metadata",
            RecordKey::Bom => "bom",
            RecordKey::EdgesBbox => "edges_bbox",
        }
    }

    pub fn shape(self) -> Shape {
        match self {
            RecordKey::Footprints | RecordKey::Edges => Shape::Sequence,
            _ => Shape::Mapping,
        }
    }
}

/// Name of a JSON value's type, for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The parsed board record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPcbData {
    /// Every top-level key of the record, in document order.
    pub record: Map<String, Value>,
}

impl ParsedPcbData {
    /// Parses decoded board data.
    ///
    /// # Arguments
    ///
    /// * `decoded` - The decompressed board data.
    ///
    /// # Returns
    ///
    /// A `Result` containing the parsed record or an error.
    pub fn from_decoded(decoded: &DecodedPcbData) -> Result<Self, PcbDataError> {
        let text = String::from_utf16(&decoded.content).map_err(|_| {
            let offset = unpaired_surrogate(&decoded.content).unwrap_or_default();
            PcbDataError::MalformedRecord(format!(
                "unpaired surrogate at code unit {}",
                offset
            ))
        })?;
        Self::from_text(&text)
    }

    /// Parses board data that is already a string.
    pub fn from_text(text: &str) -> Result<Self, PcbDataError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| PcbDataError::MalformedRecord(e.to_string()))?;

        let record = match value {
            Value::Object(record) => record,
            other => {
                return Err(PcbDataError::UnexpectedTopLevelShape {
                    found: type_name(&other),
                });
            }
        };

        log::debug!(
            "PCB keys: {:?}",
            record.keys().map(String::as_str).collect::<Vec<_>>()
        );
        if let Some(Value::Array(footprints)) = record.get(RecordKey::Footprints.name()) {
            log::trace!(
                "Footprints sample: {:?}",
                &footprints[..footprints.len().min(3)]
            );
        }

        Ok(Self { record })
    }

    /// Returns the value of a recognized key, whatever its shape.
    pub fn get(&self, key: RecordKey) -> Option<&Value> {
        self.record.get(key.name())
    }

    /// Returns the value of a mapping key, or `None` if it is absent or not an
    /// object.
    pub fn mapping(&self, key: RecordKey) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    /// Returns the value of a sequence key, or `None` if it is absent or not an
    /// array.
    pub fn sequence(&self, key: RecordKey) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }
}

fn unpaired_surrogate(units: &[u16]) -> Option<usize> {
    let mut offset = 0;
    for result in char::decode_utf16(units.iter().copied()) {
        match result {
            Ok(c) => offset += c.len_utf16(),
            Err(_) => return Some(offset),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn decoded(text: &str) -> DecodedPcbData {
        DecodedPcbData {
            content: text.encode_utf16().collect(),
        }
    }

    #[test]
    fn test_parse_object() {
        let parsed = ParsedPcbData::from_decoded(&decoded(
            r#"{"edges_bbox":{"minx":0},"footprints":[{"ref":"R1"}],"extra":true}"#,
        ))
        .unwrap();
        assert_eq!(
            parsed.record.keys().collect::<Vec<_>>(),
            ["edges_bbox", "footprints", "extra"]
        );
        assert_eq!(
            parsed.sequence(RecordKey::Footprints).unwrap(),
            &vec![json!({"ref": "R1"})]
        );
        assert_eq!(
            parsed.mapping(RecordKey::EdgesBbox).unwrap().get("minx"),
            Some(&json!(0))
        );
        assert!(parsed.get(RecordKey::Bom).is_none());
    }

    #[test]
    fn test_shape_checked_accessors() {
        let parsed =
            ParsedPcbData::from_text(r#"{"footprints":{"R1":{}},"bom":[],"edges":null}"#).unwrap();
        assert!(parsed.get(RecordKey::Footprints).is_some());
        assert!(parsed.sequence(RecordKey::Footprints).is_none());
        assert!(parsed.mapping(RecordKey::Bom).is_none());
        assert!(parsed.sequence(RecordKey::Edges).is_none());
    }

    #[test]
    fn test_malformed_record() {
        for text in [
            "",
            "{",
            r#"{"drawings":{}"#,
            r#"{"footprints":[1,2,]}"#,
            "{\"a\":NaN}",
            "{} trailing",
        ] {
            match ParsedPcbData::from_decoded(&decoded(text)) {
                Err(PcbDataError::MalformedRecord(message)) => {
                    assert!(message.contains("line"), "{message}");
                }
                other => panic!("unexpected result for {text:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_unpaired_surrogate() {
        let mut content: Vec<u16> = "{\"a\":\"".encode_utf16().collect();
        content.push(0xD800);
        content.extend("\"}".encode_utf16());
        match ParsedPcbData::from_decoded(&DecodedPcbData { content }) {
            Err(PcbDataError::MalformedRecord(message)) => {
                assert_eq!(message, "unpaired surrogate at code unit 6");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_unexpected_top_level_shape() {
        for (text, found) in [
            ("[1,2,3]", "array"),
            ("\"pcb\"", "string"),
            ("42", "number"),
            ("true", "boolean"),
            ("null", "null"),
        ] {
            match ParsedPcbData::from_text(text) {
                Err(PcbDataError::UnexpectedTopLevelShape { found: actual }) => {
                    assert_eq!(actual, found)
                }
                other => panic!("unexpected result for {text:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_record_keys() {
        let names: Vec<_> = RecordKey::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            ["drawings", "footprints", "edges", "metadata", "bom", "edges_bbox"]
        );
        assert_eq!(RecordKey::Footprints.shape(), Shape::Sequence);
        assert_eq!(RecordKey::EdgesBbox.shape(), Shape::Mapping);
    }
}
