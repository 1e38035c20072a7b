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

//! KML (Keyhole Markup Language) parser.
//!
//! This crate turns a KML document into flat [`Feature`] values: one per
//! `Placemark`, with the geometry classified, the coordinates parsed, and
//! the referenced [`StyleDefinition`] resolved. It is the data side of a map
//! editor; drawing the features is left to whoever consumes them.
//!
//! Parsing is deliberately forgiving. Real-world KML exports carry malformed
//! colors, stray coordinate tokens, and placemarks without geometry, and a
//! map that shows most of a file beats one that shows none of it. Bad values
//! degrade locally: a color falls back to opaque white, a token is dropped,
//! a placemark without usable coordinates is skipped.
//!
//! # Examples
//!
//! ```
//! let doc = r#"
//!   <kml xmlns="http://www.opengis.net/kml/2.2">
//!     <Document>
//!       <Style id="route">
//!         <LineStyle><color>ff49544b</color><width>3</width></LineStyle>
//!       </Style>
//!       <Placemark>
//!         <name>Beach trail</name>
//!         <styleUrl>#route</styleUrl>
//!         <LineString>
//!           <coordinates>-87.47,20.21,0 -87.46,20.22,0</coordinates>
//!         </LineString>
//!       </Placemark>
//!     </Document>
//!   </kml>"#;
//!
//! let document = kml::Document::parse(doc);
//!
//! assert_eq!(document.features.len(), 1);
//! assert_eq!(document.features[0].geometry_type, kml::GeometryType::LineString);
//! assert_eq!(document.features[0].style.line_width, Some(3.0));
//! ```

mod color;
mod error;
mod features;
mod parser;
mod style;
mod xml;

pub use color::{decode_color, DecodedColor};
pub use error::Error;
pub use features::{Coordinate, Feature, GeometryType};
pub use parser::{parse_features, Document, Placemarks};
pub use style::{extract_styles, StyleDefinition, StyleMap};
