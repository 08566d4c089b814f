// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/locator.rs - Payload locator for InteractiveHtmlBom HTML files.
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
 * # `locator` Module
 *
 * Finds the compressed board data embedded in an InteractiveHtmlBom report.
 * The report carries it as a single script statement:
 *
 * ```text
 * var pcbdata = JSON.parse(LZString.decompressFromBase64("N4IgJgTghg7g..."))
 * ```
 *
 * ## Usage Example
 *
 * ```
 * use pcbdata::locator::locate_payload;
 *
 * let html = r#"<script>var pcbdata = JSON.parse(LZString.decompressFromBase64("IZA="))</script>"#;
 * let literal = locate_payload(html).unwrap();
 * assert_eq!(literal.as_str(), "IZA=");
 * ```
 */

use std::fmt;

use crate::error::PcbDataError;

/// Name of the script variable the report assigns the board data to.
pub const PAYLOAD_VARIABLE: &str = "pcbdata";

const KEYWORD: &str = "var";
const CALL_PREFIX: &str = "JSON.parse(LZString.decompressFromBase64(\"";
const CALL_SUFFIX: &str = "\")";

/// The quoted argument of the `decompressFromBase64` call, without quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedLiteral<'a> {
    text: &'a str,
}

impl<'a> CompressedLiteral<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for CompressedLiteral<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

/// Why a candidate `var` did not start a payload assignment.
enum Mismatch {
    /// The statement text did not match, or the literal was empty or not
    /// followed by `")`.
    Statement,
    /// No closing quote follows the literal anywhere in the document.
    Unterminated,
}

struct Scanner<'a> {
    document: &'a str,
    position: usize,
}

impl<'a> Scanner<'a> {
    fn new(document: &'a str, position: usize) -> Self {
        Self { document, position }
    }

    fn rest(&self) -> &'a str {
        &self.document[self.position..]
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.position += token.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) -> usize {
        let rest = self.rest();
        let skipped = rest
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map_or(rest.len(), |(i, _)| i);
        self.position += skipped;
        skipped
    }

    /// Matches everything after `var` up to and including the closing `")`.
    fn assignment(&mut self) -> Result<&'a str, Mismatch> {
        if self.skip_whitespace() == 0 || !self.eat(PAYLOAD_VARIABLE) {
            return Err(Mismatch::Statement);
        }
        self.skip_whitespace();
        if !self.eat("=") {
            return Err(Mismatch::Statement);
        }
        self.skip_whitespace();
        if !self.eat(CALL_PREFIX) {
            return Err(Mismatch::Statement);
        }

        let start = self.position;
        let quote = match self.rest().find('"') {
            Some(i) => start + i,
            None => return Err(Mismatch::Unterminated),
        };
        self.position = quote;
        if quote == start || !self.eat(CALL_SUFFIX) {
            return Err(Mismatch::Statement);
        }
        Ok(&self.document[start..quote])
    }
}

/// Finds the compressed board data literal in an HTML document.
///
/// Returns the leftmost match. A document without one is an expected outcome,
/// reported as [`PcbDataError::PayloadNotFound`].
///
/// The scan is a single pass: the statement prefix contains no `var`, so
/// candidates never overlap, and each literal starts past the quote that
/// ended the previous candidate's literal.
pub fn locate_payload(document: &str) -> Result<CompressedLiteral<'_>, PcbDataError> {
    let mut search_from = 0;

    while let Some(found) = document[search_from..].find(KEYWORD) {
        let start = search_from + found;
        let mut scanner = Scanner::new(document, start + KEYWORD.len());
        match scanner.assignment() {
            Ok(text) => {
                log::debug!(
                    "Found {} payload at offset {} ({} bytes)",
                    PAYLOAD_VARIABLE,
                    start,
                    text.len()
                );
                return Ok(CompressedLiteral::new(text));
            }
            // Every later candidate would need a quote too.
            Err(Mismatch::Unterminated) => break,
            Err(Mismatch::Statement) => (),
        }
        search_from = start + 1;
    }

    Err(PcbDataError::PayloadNotFound)
}
