// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  extract.rs - Board data extraction demo for InteractiveHtmlBom HTML files.
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

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pcbdata::{Response, extract_from_filename};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to read.
    file: String,

    /// Write the response here instead of to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON.
    #[arg(short, long)]
    pretty: bool,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = extract_from_filename(&args.file);
    if let Ok(interpreted) = &result {
        let view_box = interpreted.extents().view_box();
        log::info!(
            "View box: {} {} {} {}",
            view_box.x,
            view_box.y,
            view_box.width,
            view_box.height
        );
    }

    let response = Response::from(result);
    let status = response.status_code();

    let json = if args.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    };
    let json = match json {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to serialize response: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, json) {
                eprintln!("Failed to write file {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
        None => println!("{}", json),
    }

    if status == 200 {
        ExitCode::SUCCESS
    } else {
        eprintln!("Extraction of {:?} failed with status {}", &args.file, status);
        ExitCode::FAILURE
    }
}
