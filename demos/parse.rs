// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  parse.rs - Parser demo for InteractiveHtmlBom HTML files.
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

use clap::Parser;

use pcbdata::decoder::*;
use pcbdata::interpreter::*;
use pcbdata::parser::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to read.
    file: String,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let decoded = match DecodedPcbData::from_filename(&args.file) {
        Ok(pd) => pd,
        Err(error) => {
            eprintln!("Error opening file {:?}: {:?}", &args.file, error);
            return;
        }
    };

    let parsed = match ParsedPcbData::from_decoded(&decoded) {
        Ok(pd) => pd,
        Err(error) => {
            eprintln!("Error parsing file {:?}: {:?}", &args.file, error);
            return;
        }
    };

    println!("Keys: {:?}", parsed.record.keys().collect::<Vec<_>>());
    for key in RecordKey::ALL {
        let summary = match (key.shape(), parsed.get(key)) {
            (_, None) => "missing".to_string(),
            (Shape::Mapping, Some(value)) if value.is_object() => {
                format!("{} keys", value.as_object().map_or(0, |m| m.len()))
            }
            (Shape::Sequence, Some(value)) if value.is_array() => {
                format!("{} items", value.as_array().map_or(0, |a| a.len()))
            }
            (_, Some(value)) => format!("unexpected {}", type_name(value)),
        };
        println!("  {}: {}", key.name(), summary);
    }

    let interpreted = InterpretedPcbData::from(parsed);
    let extents = interpreted.extents();
    println!(
        "Extents: ({}, {}) - ({}, {})",
        extents.min_x, extents.min_y, extents.max_x, extents.max_y
    );
}
