// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error type for InteractiveHtmlBom data extraction.
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

use thiserror::Error;

/// Every way extracting board data from a document can fail.
#[derive(Debug, Error)]
pub enum PcbDataError {
    /// The input file name does not end in `.html`.
    #[error("Invalid file type: {0:?} is not an .html file")]
    InvalidFileType(String),

    /// The document contains no `var pcbdata = JSON.parse(...)` assignment.
    #[error("pcbdata not found in file")]
    PayloadNotFound,

    /// The compressed literal contains a character outside the base64
    /// alphabet.
    #[error("Invalid base64 character {character:?} at offset {offset}")]
    InvalidAlphabetCharacter {
        /// The offending character.
        character: char,
        /// Byte offset of the character within the literal.
        offset: usize,
    },

    /// The bitstream ran out before the end-of-stream marker.
    #[error("Compressed stream truncated after {bits_read} bits")]
    TruncatedStream {
        /// Number of bits consumed before the stream ran out.
        bits_read: usize,
    },

    /// A back-reference pointed past the end of the dictionary.
    #[error("Corrupt dictionary reference {index} (dictionary size {dictionary_size})")]
    CorruptDictionaryReference {
        index: usize,
        dictionary_size: usize,
    },

    /// The decompressed text is not valid JSON.
    #[error("Error parsing JSON: {0}")]
    MalformedRecord(String),

    /// The decompressed JSON is valid but its top-level value is not an
    /// object.
    #[error("Unexpected top-level shape: expected an object, found {found}")]
    UnexpectedTopLevelShape { found: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PcbDataError {
    /// A stable, machine-readable name for the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            PcbDataError::InvalidFileType(_) => "invalid_file_type",
            PcbDataError::PayloadNotFound => "payload_not_found",
            PcbDataError::InvalidAlphabetCharacter { .. } => "invalid_alphabet_character",
            PcbDataError::TruncatedStream { .. } => "truncated_stream",
            PcbDataError::CorruptDictionaryReference { .. } => "corrupt_dictionary_reference",
            PcbDataError::MalformedRecord(_) => "malformed_record",
            PcbDataError::UnexpectedTopLevelShape { .. } => "unexpected_top_level_shape",
            PcbDataError::Io(_) => "io",
        }
    }

    /// Whether the error was caused by what the caller handed in, as opposed
    /// to a document whose payload could not be decoded.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PcbDataError::InvalidFileType(_) | PcbDataError::PayloadNotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert!(PcbDataError::PayloadNotFound.is_client_error());
        assert!(PcbDataError::InvalidFileType("board.txt".into()).is_client_error());
        assert!(!PcbDataError::TruncatedStream { bits_read: 12 }.is_client_error());
        assert!(!PcbDataError::MalformedRecord("EOF".into()).is_client_error());
        assert!(!PcbDataError::UnexpectedTopLevelShape { found: "array" }.is_client_error());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            PcbDataError::PayloadNotFound.to_string(),
            "pcbdata not found in file"
        );
        assert_eq!(
            PcbDataError::InvalidAlphabetCharacter {
                character: ' ',
                offset: 4
            }
            .to_string(),
            "Invalid base64 character ' ' at offset 4"
        );
        assert_eq!(
            PcbDataError::CorruptDictionaryReference {
                index: 9,
                dictionary_size: 5
            }
            .kind(),
            "corrupt_dictionary_reference"
        );
    }
}
