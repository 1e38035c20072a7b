// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 The terramap developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! File import for `.kml` and `.kmz` uploads.
//!
//! Turns uploaded bytes into the KML text the parser works on. A KMZ is a
//! zip archive whose main document is conventionally named `doc.kml`; any
//! embedded images or models are not needed here and stay unread.

use std::io::{Cursor, Read};

use log::debug;

use crate::error::{Error, Result};

/// Upper bound on imported file size.
pub const MAX_IMPORT_SIZE: usize = 50 * 1024 * 1024;

/// Extracts the KML text from an uploaded file.
///
/// Dispatches on the file extension: `.kml` files are decoded as UTF-8,
/// `.kmz` archives are opened and their main KML entry extracted. Anything
/// else, oversized files, and empty documents are rejected.
///
/// # Examples
///
/// ```
/// let bytes = b"<kml><Placemark><coordinates>1,2</coordinates></Placemark></kml>";
/// let text = terramap::import::read_kml_text("sites.kml", bytes).unwrap();
/// assert!(text.starts_with("<kml>"));
/// ```
pub fn read_kml_text(file_name: &str, bytes: &[u8]) -> Result<String> {
    if bytes.len() > MAX_IMPORT_SIZE {
        return Err(Error::TooLarge {
            size: bytes.len(),
            limit: MAX_IMPORT_SIZE,
        });
    }

    let lower = file_name.to_lowercase();
    let text = if lower.ends_with(".kml") {
        String::from_utf8(bytes.to_vec())?
    } else if lower.ends_with(".kmz") {
        read_kmz(bytes)?
    } else {
        return Err(Error::UnsupportedFormat(file_name.to_string()));
    };

    if text.trim().is_empty() {
        return Err(Error::EmptyDocument);
    }

    Ok(text)
}

/// Extracts the main KML document from a KMZ archive.
///
/// Prefers an entry named `doc.kml` and falls back to the first `.kml`
/// entry in archive order.
fn read_kmz(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let mut kml_entries: Vec<String> = Vec::new();
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        if name.to_lowercase().ends_with(".kml") && !entry.is_dir() {
            kml_entries.push(name);
        }
    }

    if kml_entries.is_empty() {
        return Err(Error::NoKmlEntry);
    }

    let main = kml_entries
        .iter()
        .find(|name| name.to_lowercase().contains("doc.kml"))
        .unwrap_or(&kml_entries[0])
        .clone();

    debug!("reading KMZ entry {main}");

    let mut entry = archive.by_name(&main)?;
    let mut raw = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut raw)
        .map_err(|e| Error::Archive(e.to_string()))?;

    Ok(String::from_utf8(raw)?)
}
