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

//! Public feature types yielded by the [`Placemarks`](crate::Placemarks)
//! iterator.
//!
//! Each [`Feature`] is a flat representation of one KML `Placemark` with the
//! geometry already classified, the coordinates parsed into WGS-84 decimal
//! degrees, and any referenced [`StyleDefinition`] resolved. Callers never
//! deal with XML structure.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::style::StyleDefinition;

/// Coordinate value.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    /// Latitude in the range from -90° (south) to 90° (north).
    pub latitude: f64,

    /// Longitude in the range from -180° (west) to 180° (east).
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// The geometry class of a [`Feature`].
///
/// KML placemarks may omit an explicit geometry element, in which case the
/// type is inferred from the coordinate count: more than one coordinate reads
/// as a line, a single coordinate as a point.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
}

/// A parsed KML placemark.
///
/// # Examples
///
/// ```
/// let doc = r#"
///   <kml><Document>
///     <Placemark>
///       <name>Cenote</name>
///       <Point><coordinates>-87.4653,20.2114,0</coordinates></Point>
///     </Placemark>
///   </Document></kml>"#;
///
/// let features = kml::parse_features(doc, &Default::default());
///
/// assert_eq!(features.len(), 1);
/// assert_eq!(features[0].name, "Cenote");
/// assert_eq!(features[0].geometry_type, kml::GeometryType::Point);
/// ```
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Feature {
    /// Name from the placemark's `name` element, or `"Feature {n}"` with the
    /// 1-based placemark index when the document provides none.
    pub name: String,

    /// Text of the placemark's `description` element, empty when absent.
    pub description: String,

    /// Coordinates in document order. Altitudes from the source triplets are
    /// discarded.
    pub coordinates: Vec<Coordinate>,

    /// Classified geometry.
    pub geometry_type: GeometryType,

    /// Style resolved through the placemark's `styleUrl`, or the default
    /// (everything unset) when the reference is absent or dangling.
    pub style: StyleDefinition,
}
