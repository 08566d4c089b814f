// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/response.rs - Response envelope for extracted board data.
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

use serde::Serialize;

use crate::error::PcbDataError;
use crate::interpreter::InterpretedPcbData;

/// The outcome of one extraction, in the shape served to viewers:
/// `{"status": "ok", "drawings": ..., ...}` or
/// `{"status": "error", "kind": ..., "message": ...}`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Ok(InterpretedPcbData),
    Error {
        kind: &'static str,
        message: String,
        #[serde(skip)]
        client_error: bool,
    },
}

impl Response {
    /// The HTTP status code a server should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Response::Ok(_) => 200,
            Response::Error {
                client_error: true, ..
            } => 400,
            Response::Error { .. } => 500,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok(_))
    }
}

impl From<PcbDataError> for Response {
    fn from(error: PcbDataError) -> Self {
        Response::Error {
            kind: error.kind(),
            message: error.to_string(),
            client_error: error.is_client_error(),
        }
    }
}

impl From<Result<InterpretedPcbData, PcbDataError>> for Response {
    fn from(result: Result<InterpretedPcbData, PcbDataError>) -> Self {
        match result {
            Ok(interpreted) => Response::Ok(interpreted),
            Err(error) => error.into(),
        }
    }
}
