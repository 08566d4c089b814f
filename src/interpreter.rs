// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/interpreter.rs - Interpreter library for InteractiveHtmlBom board data.
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
 * # `interpreter` Module
 *
 * This module projects a parsed board record onto the fixed set of fields
 * exposed to consumers, and computes the board extents a viewer needs.
 *
 * ## Usage Example
 *
 * ```no_run
 * use std::fs;
 *
 * use pcbdata::decoder::DecodedPcbData;
 * use pcbdata::parser::ParsedPcbData;
 * use pcbdata::interpreter::InterpretedPcbData;
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
 *     // Interpret the parsed data
 *     let interpreted = InterpretedPcbData::from_parsed(&parsed);
 *
 *     // Access the board extents
 *     let extents = interpreted.extents();
 *     println!("Board spans ({}, {}) to ({}, {})",
 *         extents.min_x, extents.min_y, extents.max_x, extents.max_y);
 *
 *     Ok(())
 * }
 * ```
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::parser::{ParsedPcbData, RecordKey};

/// The board data handed to consumers.
///
/// Every field is always present. A field whose key is missing from the
/// record, or holds the wrong kind of JSON value, is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpretedPcbData {
    pub drawings: Map<String, Value>,
    pub footprints: Vec<Value>,
    pub edges: Vec<Value>,
    pub metadata: Map<String, Value>,
    pub bom: Map<String, Value>,
    pub edges_bbox: Map<String, Value>,
}

fn take_mapping(record: &mut Map<String, Value>, key: RecordKey) -> Map<String, Value> {
    match record.remove(key.name()) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn take_sequence(record: &mut Map<String, Value>, key: RecordKey) -> Vec<Value> {
    match record.remove(key.name()) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

impl From<ParsedPcbData> for InterpretedPcbData {
    /// Moves the projected fields out of the record without copying them.
    fn from(parsed: ParsedPcbData) -> Self {
        let mut record = parsed.record;
        Self {
            drawings: take_mapping(&mut record, RecordKey::Drawings),
            footprints: take_sequence(&mut record, RecordKey::Footprints),
            edges: take_sequence(&mut record, RecordKey::Edges),
            metadata: take_mapping(&mut record, RecordKey::Metadata),
            bom: take_mapping(&mut record, RecordKey::Bom),
            edges_bbox: take_mapping(&mut record, RecordKey::EdgesBbox),
        }
    }
}

/// An axis-aligned bounding box in board units (millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extents {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// An SVG-style view box: origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Extents {
    /// Extents used when the board has no usable coordinates.
    pub const DEFAULT: Extents = Extents {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 100.0,
        max_y: 100.0,
    };

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// The extents grown on every side by 5% of their width plus height.
    pub fn view_box(&self) -> ViewBox {
        let margin = (self.width() + self.height()) * 0.05;
        ViewBox {
            x: self.min_x - margin,
            y: self.min_y - margin,
            width: self.width() + 2.0 * margin,
            height: self.height() + 2.0 * margin,
        }
    }
}

impl Default for Extents {
    fn default() -> Self {
        Self::DEFAULT
    }
}

struct ExtentsBuilder {
    extents: Option<Extents>,
}

impl ExtentsBuilder {
    fn add(&mut self, x: f64, y: f64) {
        let e = self.extents.get_or_insert(Extents {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        });
        e.min_x = e.min_x.min(x);
        e.min_y = e.min_y.min(y);
        e.max_x = e.max_x.max(x);
        e.max_y = e.max_y.max(y);
    }

    fn add_point(&mut self, value: Option<&Value>) {
        if let Some((x, y)) = value.and_then(point) {
            self.add(x, y);
        }
    }

    fn add_item(&mut self, item: &Value) {
        let field = |name: &str| item.get(name).filter(|v| !v.is_null());

        if let (Some(start), Some(end)) = (field("start"), field("end")) {
            self.add_point(Some(start));
            self.add_point(Some(end));
        }
        self.add_point(field("center"));
        self.add_point(field("pos"));
        self.add_point(item.pointer("/bbox/pos"));
        if let Some(polygon) = item.pointer("/polygons/0").and_then(Value::as_array) {
            for vertex in polygon {
                self.add_point(Some(vertex));
            }
        }

        let radius = field("radius").and_then(Value::as_f64).filter(|r| *r != 0.0);
        if let Some(r) = radius {
            let center = field("center")
                .or_else(|| field("pos"))
                .or_else(|| field("start"))
                .and_then(point);
            if let Some((cx, cy)) = center {
                self.add(cx + r, cy + r);
                self.add(cx - r, cy - r);
            }
        }

        if let Some(pads) = field("pads").and_then(Value::as_array) {
            for pad in pads {
                let pos = pad.get("pos").and_then(point);
                let size = pad.get("size").and_then(point);
                if let Some((x, y)) = pos {
                    self.add(x, y);
                    if let Some((w, h)) = size {
                        self.add(x + w / 2.0, y + h / 2.0);
                        self.add(x - w / 2.0, y - h / 2.0);
                    }
                }
            }
        }
    }
}

/// Reads `[x, y, ...]` as a point; anything else is ignored.
fn point(value: &Value) -> Option<(f64, f64)> {
    match value.as_array()?.as_slice() {
        [x, y, ..] => Some((x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}

impl InterpretedPcbData {
    /// Projects a parsed record, copying the fields it keeps.
    ///
    /// # Arguments
    ///
    /// * `parsed` - The parsed board record.
    ///
    /// # Returns
    ///
    /// The projected board data. Projection cannot fail.
    pub fn from_parsed(parsed: &ParsedPcbData) -> Self {
        let mapping = |key| parsed.mapping(key).cloned().unwrap_or_default();
        let sequence = |key| parsed.sequence(key).cloned().unwrap_or_default();

        Self {
            drawings: mapping(RecordKey::Drawings),
            footprints: sequence(RecordKey::Footprints),
            edges: sequence(RecordKey::Edges),
            metadata: mapping(RecordKey::Metadata),
            bom: mapping(RecordKey::Bom),
            edges_bbox: mapping(RecordKey::EdgesBbox),
        }
    }

    /// Returns the drawing items at `drawings.<group>.<side>`, such as
    /// `drawings.silkscreen.F`, or nothing if that path is not a list.
    pub fn drawing_layer(&self, group: &str, side: &str) -> &[Value] {
        self.drawings
            .get(group)
            .and_then(|g| g.get(side))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn fabrication_front(&self) -> &[Value] {
        self.drawing_layer("fabrication", "F")
    }

    pub fn silkscreen_front(&self) -> &[Value] {
        self.drawing_layer("silkscreen", "F")
    }

    /// Computes the bounding box of the front fabrication and silkscreen
    /// drawings, the footprints and the board edges.
    ///
    /// Falls back to [`Extents::DEFAULT`] when nothing has coordinates.
    pub fn extents(&self) -> Extents {
        let mut builder = ExtentsBuilder { extents: None };

        let items = self
            .fabrication_front()
            .iter()
            .chain(self.silkscreen_front())
            .chain(&self.footprints)
            .chain(&self.edges);
        for item in items {
            builder.add_item(item);
        }

        builder.extents.unwrap_or_default()
    }
}
