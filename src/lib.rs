// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Extraction library for InteractiveHtmlBom board data.
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
 * # `pcbdata` Crate
 *
 * A library for extracting the board data embedded in InteractiveHtmlBom
 * HTML reports.
 *
 * The reports carry the whole board (drawings, footprints, edges, BOM) as an
 * LZ-String compressed JSON document inside a script tag. This crate provides
 * a full pipeline for getting it back out:
 *
 * 1. [locator]: Finds the compressed payload in the HTML.
 * 2. [decoder]: Decompresses the payload.
 * 3. [parser]: Parses the decompressed JSON and checks its shape.
 * 4. [interpreter]: Projects the fields consumers use, with defaults.
 *
 * [response] wraps the result for serving to a viewer.
 *
 * ## Usage Example
 *
 * ```no_run
 * use pcbdata::decoder::DecodedPcbData;
 * use pcbdata::parser::ParsedPcbData;
 * use pcbdata::interpreter::InterpretedPcbData;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Decode the file
 *     let decoded = DecodedPcbData::from_filename("ibom.html")?;
 *
 *     // Parse the decoded file
 *     let parsed = ParsedPcbData::from_decoded(&decoded)?;
 *
 *     // Interpret the parsed file
 *     let interpreted = InterpretedPcbData::from(parsed);
 *
 *     // Access footprints
 *     for footprint in &interpreted.footprints {
 *         println!("Footprint: {}", footprint["ref"]);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

pub mod decoder;
pub mod error;
pub mod interpreter;
pub mod locator;
pub mod parser;
pub mod response;

pub use error::PcbDataError;
pub use interpreter::InterpretedPcbData;
pub use response::Response;

use decoder::DecodedPcbData;
use parser::ParsedPcbData;

/// Runs the whole pipeline on the text of an HTML report.
pub fn extract(document: &str) -> Result<InterpretedPcbData, PcbDataError> {
    let decoded = DecodedPcbData::from_html(document)?;
    let parsed = ParsedPcbData::from_decoded(&decoded)?;
    Ok(InterpretedPcbData::from(parsed))
}

/// Runs the whole pipeline on an HTML report file.
///
/// The file name must end in `.html`.
pub fn extract_from_filename(filename: &str) -> Result<InterpretedPcbData, PcbDataError> {
    let decoded = DecodedPcbData::from_filename(filename)?;
    let parsed = ParsedPcbData::from_decoded(&decoded)?;
    Ok(InterpretedPcbData::from(parsed))
}
