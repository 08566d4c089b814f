// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/decoder.rs - Decoder library for InteractiveHtmlBom board data.
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
 * # `decoder` Module
 *
 * Decompresses the LZ-String `compressToBase64` output that InteractiveHtmlBom
 * embeds in its reports.
 *
 * The compressed data is an LZW-style stream of variable-width codes packed
 * into base64 characters, six bits per character, most significant bit
 * first. Every code is assembled least significant bit first. Codes 0 and 1
 * introduce an 8-bit or 16-bit literal code unit, code 2 ends the stream, and
 * every other code refers to a dictionary entry. The code width starts at
 * three bits and grows by one each time the dictionary doubles.
 *
 * ## Usage Example
 *
 * ```
 * use pcbdata::decoder::decompress_from_base64;
 *
 * let text = decompress_from_base64("BIUwNmD2A0AEDukBOYAmQ===").unwrap();
 * assert_eq!(String::from_utf16(&text).unwrap(), "Hello, world");
 * ```
 */

use std::fs;

use crate::error::PcbDataError;
use crate::locator::{CompressedLiteral, locate_payload};

const BITS_PER_CHAR: usize = 6;
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const PAD: char = '=';
const INVALID: u8 = 0xFF;

const LITERAL_8: usize = 0;
const LITERAL_16: usize = 1;
const END_OF_STREAM: usize = 2;

const fn reverse_alphabet() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static REVERSE_ALPHABET: [u8; 256] = reverse_alphabet();

struct BitReader {
    values: Vec<u8>,
    position: usize,
}

impl BitReader {
    /// Maps every character to its 6-bit value up front, so an invalid
    /// character is reported before any decoding happens.
    fn new(literal: &str) -> Result<Self, PcbDataError> {
        // Trailing padding reads as zero bits.
        let padding_start = literal.trim_end_matches(PAD).len();

        let mut values = Vec::with_capacity(literal.len());
        for (offset, character) in literal.char_indices() {
            if offset >= padding_start {
                values.push(0);
                continue;
            }
            let value = u8::try_from(character)
                .map(|b| REVERSE_ALPHABET[usize::from(b)])
                .unwrap_or(INVALID);
            if value == INVALID {
                return Err(PcbDataError::InvalidAlphabetCharacter { character, offset });
            }
            values.push(value);
        }

        Ok(Self {
            values,
            position: 0,
        })
    }

    fn remaining(&self) -> usize {
        self.values.len() * BITS_PER_CHAR - self.position
    }

    fn read_bits(&mut self, count: u32) -> Result<usize, PcbDataError> {
        if self.remaining() < count as usize {
            return Err(PcbDataError::TruncatedStream {
                bits_read: self.position,
            });
        }

        let mut bits = 0;
        for power in 0..count {
            let value = self.values[self.position / BITS_PER_CHAR];
            let shift = BITS_PER_CHAR - 1 - self.position % BITS_PER_CHAR;
            bits |= usize::from((value >> shift) & 1) << power;
            self.position += 1;
        }
        Ok(bits)
    }
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    /// Placeholder for one of the three control codes.
    Control,
    Unit(u16),
    /// A span of the output. Every phrase is the previous emission plus the
    /// first unit of the one after it, which always sit next to each other.
    Phrase { start: usize, len: usize },
}

struct Decompressor {
    reader: BitReader,
    dictionary: Vec<Entry>,
    /// Entries left to add before the code width grows.
    enlarge_in: usize,
    num_bits: u32,
    output: Vec<u16>,
}

impl Decompressor {
    fn new(literal: &str) -> Result<Self, PcbDataError> {
        Ok(Self {
            reader: BitReader::new(literal)?,
            dictionary: vec![Entry::Control; 3],
            enlarge_in: 4,
            num_bits: 3,
            output: Vec::new(),
        })
    }

    fn corrupt(&self, index: usize) -> PcbDataError {
        PcbDataError::CorruptDictionaryReference {
            index,
            dictionary_size: self.dictionary.len(),
        }
    }

    fn read_literal(&mut self, code: usize) -> Result<u16, PcbDataError> {
        let width = if code == LITERAL_8 { 8 } else { 16 };
        // At most 16 bits were read.
        Ok(self.reader.read_bits(width)? as u16)
    }

    /// Must be called after every dictionary insertion to keep the code width
    /// in step with the compressor.
    fn count_entry(&mut self) {
        self.enlarge_in -= 1;
        if self.enlarge_in == 0 {
            self.enlarge_in = 1 << self.num_bits;
            self.num_bits += 1;
        }
    }

    fn emit(&mut self, index: usize, previous: (usize, usize)) -> Result<(), PcbDataError> {
        match self.dictionary.get(index).copied() {
            Some(Entry::Unit(unit)) => self.output.push(unit),
            Some(Entry::Phrase { start, len }) => {
                self.output.extend_from_within(start..start + len);
            }
            // The compressor may reference the entry it is about to create,
            // which can only be the previous emission plus its own first unit.
            None if index == self.dictionary.len() => {
                let (start, len) = previous;
                self.output.extend_from_within(start..start + len);
                let first = self.output[start];
                self.output.push(first);
            }
            Some(Entry::Control) | None => return Err(self.corrupt(index)),
        }
        Ok(())
    }

    fn decompress(&mut self) -> Result<Vec<u16>, PcbDataError> {
        let first = match self.reader.read_bits(2)? {
            END_OF_STREAM => return Ok(Vec::new()),
            code @ (LITERAL_8 | LITERAL_16) => self.read_literal(code)?,
            index => return Err(self.corrupt(index)),
        };
        self.dictionary.push(Entry::Unit(first));
        self.output.push(first);

        // (start, len) of the previous emission within the output.
        let mut previous = (0, 1);

        loop {
            let index = match self.reader.read_bits(self.num_bits)? {
                END_OF_STREAM => return Ok(std::mem::take(&mut self.output)),
                code @ (LITERAL_8 | LITERAL_16) => {
                    let unit = self.read_literal(code)?;
                    self.dictionary.push(Entry::Unit(unit));
                    self.count_entry();
                    self.dictionary.len() - 1
                }
                index => index,
            };

            let start = self.output.len();
            self.emit(index, previous)?;

            self.dictionary.push(Entry::Phrase {
                start: previous.0,
                len: previous.1 + 1,
            });
            self.count_entry();

            previous = (start, self.output.len() - start);
        }
    }
}

/// Decompresses LZ-String base64 data into UTF-16 code units.
///
/// # Arguments
///
/// * `literal` - The compressed data, as produced by `compressToBase64`.
///
/// # Returns
///
/// The decompressed code units, which are not guaranteed to be valid UTF-16.
pub fn decompress_from_base64(literal: &str) -> Result<Vec<u16>, PcbDataError> {
    Decompressor::new(literal)?.decompress()
}

/// Decompressed board data, still in UTF-16 code units.
#[derive(Debug)]
pub struct DecodedPcbData {
    pub content: Vec<u16>,
}

impl DecodedPcbData {
    /// Decompresses a literal previously found with [`locate_payload`].
    pub fn from_literal(literal: CompressedLiteral<'_>) -> Result<Self, PcbDataError> {
        let content = decompress_from_base64(literal.as_str())?;
        log::debug!(
            "Decompressed {} base64 characters into {} code units",
            literal.len(),
            content.len()
        );
        Ok(Self { content })
    }

    /// Locates and decompresses the board data in an HTML document.
    pub fn from_html(document: &str) -> Result<Self, PcbDataError> {
        Self::from_literal(locate_payload(document)?)
    }

    /// Reads an InteractiveHtmlBom report and decompresses its board data.
    ///
    /// Only file names ending in `.html` are accepted, and the file must be
    /// valid UTF-8.
    pub fn from_filename(filename: &str) -> Result<Self, PcbDataError> {
        if !filename.ends_with(".html") {
            return Err(PcbDataError::InvalidFileType(filename.to_string()));
        }
        let document = fs::read_to_string(filename)?;
        Self::from_html(&document)
    }
}

#[cfg(test)]
#[derive(Default)]
struct BitWriter {
    output: String,
    value: u8,
    position: usize,
}

#[cfg(test)]
impl BitWriter {
    fn write_bits(&mut self, mut value: usize, count: u32) {
        for _ in 0..count {
            self.value = (self.value << 1) | (value & 1) as u8;
            value >>= 1;
            if self.position == BITS_PER_CHAR - 1 {
                self.position = 0;
                self.output.push(char::from(ALPHABET[usize::from(self.value)]));
                self.value = 0;
            } else {
                self.position += 1;
            }
        }
    }

    fn finish(mut self) -> String {
        loop {
            self.value <<= 1;
            if self.position == BITS_PER_CHAR - 1 {
                self.output.push(char::from(ALPHABET[usize::from(self.value)]));
                break;
            }
            self.position += 1;
        }
        while self.output.len() % 4 != 0 {
            self.output.push(PAD);
        }
        self.output
    }
}

// LZ-String compressToBase64, for round-trip tests
#[cfg(test)]
fn compress_to_base64(units: &[u16]) -> String {
    use std::collections::{HashMap, HashSet};

    struct Compressor {
        dictionary: HashMap<Vec<u16>, usize>,
        pending: HashSet<u16>,
        enlarge_in: usize,
        num_bits: u32,
        writer: BitWriter,
    }

    impl Compressor {
        fn count_entry(&mut self) {
            self.enlarge_in -= 1;
            if self.enlarge_in == 0 {
                self.enlarge_in = 1 << self.num_bits;
                self.num_bits += 1;
            }
        }

        fn emit_phrase(&mut self, phrase: &[u16]) {
            if phrase.len() == 1 && self.pending.remove(&phrase[0]) {
                let unit = usize::from(phrase[0]);
                if unit < 256 {
                    self.writer.write_bits(LITERAL_8, self.num_bits);
                    self.writer.write_bits(unit, 8);
                } else {
                    self.writer.write_bits(LITERAL_16, self.num_bits);
                    self.writer.write_bits(unit, 16);
                }
                self.count_entry();
            } else {
                let code = self.dictionary[phrase];
                self.writer.write_bits(code, self.num_bits);
            }
            self.count_entry();
        }
    }

    let mut compressor = Compressor {
        dictionary: HashMap::new(),
        pending: HashSet::new(),
        enlarge_in: 2,
        num_bits: 2,
        writer: BitWriter::default(),
    };
    let mut dictionary_size = 3;
    let mut phrase: Vec<u16> = Vec::new();

    for &unit in units {
        if !compressor.dictionary.contains_key(&[unit][..]) {
            compressor.dictionary.insert(vec![unit], dictionary_size);
            dictionary_size += 1;
            compressor.pending.insert(unit);
        }

        let mut extended = phrase.clone();
        extended.push(unit);
        if compressor.dictionary.contains_key(&extended) {
            phrase = extended;
        } else {
            compressor.emit_phrase(&phrase);
            compressor.dictionary.insert(extended, dictionary_size);
            dictionary_size += 1;
            phrase = vec![unit];
        }
    }
    if !phrase.is_empty() {
        compressor.emit_phrase(&phrase);
    }

    compressor
        .writer
        .write_bits(END_OF_STREAM, compressor.num_bits);
    compressor.writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn utf16(text: &str) -> Vec<u16> {
        text.encode_utf16().collect()
    }

    #[test]
    fn test_known_literals() {
        let cases = [
            ("Q===", ""),
            ("IZA=", "a"),
            ("IZA", "a"),
            ("BIUwNmD2A0AEDukBOYAmQ===", "Hello, world"),
            ("BYUwNmD2AEoTcpA=", "hello hello hello"),
            ("IY18ZxA=", "aaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            ("P+GoJET2jq2ovBuAB7Q=", "ÿ€漢字😀"),
            ("NoRgNATGDMC6Q===", "[1,2,3]"),
        ];
        for (literal, expected) in cases {
            assert_eq!(
                decompress_from_base64(literal).unwrap(),
                utf16(expected),
                "literal {literal:?}"
            );
        }
    }

    #[test]
    fn test_dictionary_growth() {
        let literal = "C4CwpgBAjgrglgYwNYQEYCcD2B3AdhAM0wA8IArGAWwAcBnCTANzHQlEgBsBDALwE8IAE0wBzIA=";
        let mut decompressor = Decompressor::new(literal).unwrap();
        let output = decompressor.decompress().unwrap();
        assert_eq!(output, utf16("the quick brown fox jumps over the lazy dog"));
        // Widened at 8, 16, 32 and 64 entries.
        assert_eq!(decompressor.num_bits, 7);
        assert_eq!(decompressor.dictionary.len(), 70);
    }

    #[test]
    fn test_invalid_character() {
        assert!(matches!(
            decompress_from_base64("IZ A="),
            Err(PcbDataError::InvalidAlphabetCharacter {
                character: ' ',
                offset: 2
            })
        ));
        assert!(matches!(
            decompress_from_base64("I=ZA"),
            Err(PcbDataError::InvalidAlphabetCharacter {
                character: '=',
                offset: 1
            })
        ));
        assert!(matches!(
            decompress_from_base64("IZé="),
            Err(PcbDataError::InvalidAlphabetCharacter {
                character: 'é',
                offset: 2
            })
        ));
        assert!(matches!(
            decompress_from_base64("IZA-"),
            Err(PcbDataError::InvalidAlphabetCharacter {
                character: '-',
                offset: 3
            })
        ));
    }

    #[test]
    fn test_truncated() {
        assert!(matches!(
            decompress_from_base64(""),
            Err(PcbDataError::TruncatedStream { bits_read: 0 })
        ));
        assert!(matches!(
            decompress_from_base64("===="),
            Err(PcbDataError::TruncatedStream { .. })
        ));
        assert!(matches!(
            decompress_from_base64("IZ"),
            Err(PcbDataError::TruncatedStream { bits_read: 10 })
        ));
        assert!(matches!(
            decompress_from_base64("N4IgJgTghg7g"),
            Err(PcbDataError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn test_corrupt_first_token() {
        // "w" starts with the bits 1, 1: token 3 is neither a literal nor the
        // end of the stream.
        assert!(matches!(
            decompress_from_base64("w"),
            Err(PcbDataError::CorruptDictionaryReference {
                index: 3,
                dictionary_size: 3
            })
        ));
    }

    #[test]
    fn test_corrupt_reference() {
        let mut writer = BitWriter::default();
        writer.write_bits(LITERAL_8, 2);
        writer.write_bits(usize::from(b'a'), 8);
        // Entry 4 is the only allowed forward reference.
        writer.write_bits(5, 3);
        writer.write_bits(END_OF_STREAM, 3);
        assert!(matches!(
            decompress_from_base64(&writer.finish()),
            Err(PcbDataError::CorruptDictionaryReference {
                index: 5,
                dictionary_size: 4
            })
        ));
    }

    #[test]
    fn test_self_reference() {
        let mut writer = BitWriter::default();
        writer.write_bits(LITERAL_8, 2);
        writer.write_bits(usize::from(b'x'), 8);
        writer.write_bits(4, 3);
        writer.write_bits(END_OF_STREAM, 3);
        assert_eq!(
            decompress_from_base64(&writer.finish()).unwrap(),
            utf16("xxx")
        );
    }

    #[test]
    fn test_compressor_matches_known_literals() {
        assert_eq!(
            compress_to_base64(&utf16("Hello, world")),
            "BIUwNmD2A0AEDukBOYAmQ==="
        );
        assert_eq!(compress_to_base64(&[]), "Q===");
    }

    #[test]
    fn test_decoded_from_html() {
        let html = r#"<script>var pcbdata = JSON.parse(LZString.decompressFromBase64("NoRgNATGDMC6Q==="))</script>"#;
        let decoded = DecodedPcbData::from_html(html).unwrap();
        assert_eq!(decoded.content, utf16("[1,2,3]"));
    }

    #[test]
    fn test_from_filename_rejects_other_types() {
        assert!(matches!(
            DecodedPcbData::from_filename("board.kicad_pcb"),
            Err(PcbDataError::InvalidFileType(_))
        ));
        assert!(matches!(
            DecodedPcbData::from_filename("missing-report.html"),
            Err(PcbDataError::Io(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_round_trip_text(text in any::<String>()) {
            let units = utf16(&text);
            let literal = compress_to_base64(&units);
            prop_assert_eq!(decompress_from_base64(&literal).unwrap(), units);
        }

        #[test]
        fn prop_round_trip_code_units(units in proptest::collection::vec(any::<u16>(), 0..512)) {
            let literal = compress_to_base64(&units);
            prop_assert_eq!(decompress_from_base64(&literal).unwrap(), units);
        }

        #[test]
        fn prop_round_trip_repetitive(
            units in proptest::collection::vec(prop_oneof![Just(b'a' as u16), Just(b'b' as u16), Just(0x4e00)], 0..2048)
        ) {
            let literal = compress_to_base64(&units);
            prop_assert_eq!(decompress_from_base64(&literal).unwrap(), units);
        }

        #[test]
        fn prop_decoding_is_deterministic(literal in "[A-Za-z0-9+/]{0,64}={0,3}") {
            let first = decompress_from_base64(&literal).map_err(|e| e.to_string());
            let second = decompress_from_base64(&literal).map_err(|e| e.to_string());
            prop_assert_eq!(first, second);
        }
    }
}
