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

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Error {
    /// The file exceeds the import size limit.
    TooLarge { size: usize, limit: usize },
    /// The file extension is neither `.kml` nor `.kmz`.
    UnsupportedFormat(String),
    /// The KMZ archive could not be read.
    Archive(String),
    /// A KMZ archive without any `.kml` entry.
    NoKmlEntry,
    /// KML text that is not valid UTF-8.
    NotUtf8(String),
    /// A `.kml` file or KMZ entry with no content.
    EmptyDocument,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { size, limit } => {
                write!(f, "file of {size} bytes exceeds the {limit} byte limit")
            }
            Self::UnsupportedFormat(name) => {
                write!(f, "unsupported file format: {name}")
            }
            Self::Archive(e) => write!(f, "archive error: {e}"),
            Self::NoKmlEntry => write!(f, "no KML file found in KMZ archive"),
            Self::NotUtf8(e) => write!(f, "KML text is not valid UTF-8: {e}"),
            Self::EmptyDocument => write!(f, "KML document is empty"),
        }
    }
}

impl std::error::Error for Error {}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Archive(e.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::NotUtf8(e.to_string())
    }
}
