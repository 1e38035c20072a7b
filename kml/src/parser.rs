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

use log::{debug, trace, warn};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Error;
use crate::features::{Coordinate, Feature, GeometryType};
use crate::style::{extract_styles, StyleMap};
use crate::xml;

/// Streaming iterator over the placemarks of a KML document.
///
/// Yields one [`Feature`] per `Placemark` element that carries usable
/// coordinates, in document order. Placemarks without coordinates are
/// silently skipped but still count towards the index used for default
/// names.
///
/// # Examples
///
/// ```
/// use kml::Placemarks;
///
/// let doc = r#"
///   <kml xmlns="http://www.opengis.net/kml/2.2">
///     <Document>
///       <Placemark>
///         <name>Trailhead</name>
///         <Point><coordinates>-87.46,20.21,12</coordinates></Point>
///       </Placemark>
///     </Document>
///   </kml>"#;
///
/// let styles = kml::extract_styles(doc);
/// let features: Vec<_> = Placemarks::new(doc, &styles)
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(features.len(), 1);
/// assert_eq!(features[0].name, "Trailhead");
/// ```
pub struct Placemarks<'a> {
    reader: Reader<&'a [u8]>,
    styles: &'a StyleMap,
    index: usize,
    buf: Vec<u8>,
}

impl<'a> Placemarks<'a> {
    /// Creates a new `Placemarks` iterator over a document, resolving style
    /// references against `styles`.
    pub fn new(document: &'a str, styles: &'a StyleMap) -> Self {
        let mut reader = Reader::from_reader(document.as_bytes());
        reader.config_mut().trim_text(true);
        Self {
            reader,
            styles,
            index: 0,
            buf: Vec::new(),
        }
    }
}

impl Iterator for Placemarks<'_> {
    type Item = Result<Feature, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(ref e))
                    if xml::local_name(e.name().as_ref()) == b"Placemark" =>
                {
                    let index = self.index;
                    self.index += 1;

                    match xml::read_placemark(&mut self.reader) {
                        Ok(x) => {
                            if let Some(feature) = build_feature(x, index, self.styles) {
                                return Some(Ok(feature));
                            }
                            trace!("placemark {index} has no usable coordinates");
                        }
                        Err(e) => return Some(Err(e)),
                    }
                }
                Ok(Event::Empty(ref e))
                    if xml::local_name(e.name().as_ref()) == b"Placemark" =>
                {
                    // Nothing to extract, but the index is consumed.
                    self.index += 1;
                }
                Ok(Event::Eof) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Converts raw placemark content into a [`Feature`].
///
/// Returns `None` when no coordinate token survives parsing.
fn build_feature(x: xml::PlacemarkXml, index: usize, styles: &StyleMap) -> Option<Feature> {
    let coordinates = parse_coordinates(x.coordinates.as_deref().unwrap_or_default());
    if coordinates.is_empty() {
        return None;
    }

    let geometry_type = if x.has_polygon {
        GeometryType::Polygon
    } else if x.has_line_string || coordinates.len() > 1 {
        GeometryType::LineString
    } else {
        GeometryType::Point
    };

    let name = x
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("Feature {}", index + 1));

    let style = x
        .style_url
        .as_deref()
        .and_then(|url| url.strip_prefix('#'))
        .and_then(|id| styles.get(id))
        .cloned()
        .unwrap_or_default();

    Some(Feature {
        name,
        description: x.description.unwrap_or_default(),
        coordinates,
        geometry_type,
        style,
    })
}

/// Parses a KML `coordinates` text into coordinate values.
///
/// Tokens are separated by whitespace runs; each token is a comma-separated
/// `longitude,latitude[,altitude]` triplet with the altitude discarded.
/// Tokens whose longitude or latitude is missing or not a finite number are
/// dropped individually.
fn parse_coordinates(text: &str) -> Vec<Coordinate> {
    text.split_whitespace()
        .filter_map(|token| {
            let mut fields = token.split(',');
            let longitude: f64 = fields.next()?.parse().ok()?;
            let latitude: f64 = fields.next()?.parse().ok()?;

            (latitude.is_finite() && longitude.is_finite()).then_some(Coordinate {
                latitude,
                longitude,
            })
        })
        .collect()
}

/// Parses all placemarks of a document against an already extracted style
/// map.
///
/// This is the defensive form of [`Placemarks`]: a reader error ends the
/// scan and everything parsed up to that point is returned, so a partially
/// damaged export still shows its intact placemarks.
pub fn parse_features(document: &str, styles: &StyleMap) -> Vec<Feature> {
    let mut features = Vec::new();

    for feature in Placemarks::new(document, styles) {
        match feature {
            Ok(f) => features.push(f),
            Err(e) => {
                warn!("placemark scan stopped: {e}");
                break;
            }
        }
    }

    debug!("parsed {} features", features.len());
    features
}

/// A fully parsed KML document: the named styles plus the placemark
/// features, with style references already resolved.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub styles: StyleMap,
    pub features: Vec<Feature>,
}

impl Document {
    /// Runs the whole pipeline over a document text.
    ///
    /// Equivalent to [`extract_styles`] followed by [`parse_features`]; the
    /// parse is pure and idempotent, so the same text always yields the same
    /// document.
    pub fn parse(text: &str) -> Self {
        let styles = extract_styles(text);
        let features = parse_features(text, &styles);
        Self { styles, features }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleDefinition;

    #[test]
    fn parse_point_placemark() {
        let doc = r#"
        <kml xmlns="http://www.opengis.net/kml/2.2">
          <Document>
            <Placemark>
              <name>Cenote Azul</name>
              <description>Freshwater sinkhole</description>
              <Point><coordinates>-87.4653,20.2114,0</coordinates></Point>
            </Placemark>
          </Document>
        </kml>"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features.len(), 1);

        let f = &features[0];
        assert_eq!(f.name, "Cenote Azul");
        assert_eq!(f.description, "Freshwater sinkhole");
        assert_eq!(f.geometry_type, GeometryType::Point);
        assert_eq!(f.coordinates.len(), 1);
        assert!((f.coordinates[0].latitude - 20.2114).abs() < 1e-9);
        assert!((f.coordinates[0].longitude - (-87.4653)).abs() < 1e-9);
    }

    #[test]
    fn single_coordinate_without_geometry_tag_is_a_point() {
        let doc = r#"
        <kml><Placemark>
          <coordinates>10.0,50.0</coordinates>
        </Placemark></kml>"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features[0].geometry_type, GeometryType::Point);
    }

    #[test]
    fn two_coordinates_without_geometry_tag_is_a_line() {
        let doc = r#"
        <kml><Placemark>
          <coordinates>10.0,50.0 10.5,50.5</coordinates>
        </Placemark></kml>"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features[0].geometry_type, GeometryType::LineString);
    }

    #[test]
    fn polygon_tag_wins_over_coordinate_count() {
        let doc = r#"
        <kml><Placemark>
          <Polygon>
            <outerBoundaryIs><LinearRing>
              <coordinates>10.0,50.0</coordinates>
            </LinearRing></outerBoundaryIs>
          </Polygon>
        </Placemark></kml>"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features[0].geometry_type, GeometryType::Polygon);
    }

    #[test]
    fn line_string_tag_wins_over_single_coordinate() {
        let doc = r#"
        <kml><Placemark>
          <LineString><coordinates>10.0,50.0</coordinates></LineString>
        </Placemark></kml>"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features[0].geometry_type, GeometryType::LineString);
    }

    #[test]
    fn unnamed_placemark_gets_indexed_default_name() {
        let doc = r#"
        <kml><Document>
          <Placemark><name>A</name><coordinates>1,2</coordinates></Placemark>
          <Placemark><name>B</name><coordinates>3,4</coordinates></Placemark>
          <Placemark><coordinates>5,6</coordinates></Placemark>
        </Document></kml>"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features[2].name, "Feature 3");
    }

    #[test]
    fn skipped_placemarks_still_consume_an_index() {
        let doc = r#"
        <kml><Document>
          <Placemark><name>A</name><coordinates>1,2</coordinates></Placemark>
          <Placemark><name>empty</name></Placemark>
          <Placemark><coordinates>5,6</coordinates></Placemark>
        </Document></kml>"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features.len(), 2);
        assert_eq!(features[1].name, "Feature 3");
    }

    #[test]
    fn bad_tokens_are_dropped_not_the_placemark() {
        let doc = r#"
        <kml><Placemark>
          <coordinates>
            10.0,50.0
            not,numbers
            10.5,NaN
            lonely
            10.5,50.5,123.4
          </coordinates>
        </Placemark></kml>"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].coordinates.len(), 2);
        assert_eq!(features[0].geometry_type, GeometryType::LineString);
    }

    #[test]
    fn placemark_with_only_bad_tokens_is_skipped() {
        let doc = r#"
        <kml><Document>
          <Placemark><coordinates>one,two three,four</coordinates></Placemark>
        </Document></kml>"#;

        assert!(parse_features(doc, &StyleMap::new()).is_empty());
    }

    #[test]
    fn style_reference_is_resolved() {
        let doc = r#"
        <kml><Document>
          <Style id="s1">
            <PolyStyle><color>7fc6c29a</color><fill>0</fill></PolyStyle>
          </Style>
          <Placemark>
            <styleUrl>#s1</styleUrl>
            <Polygon><outerBoundaryIs><LinearRing>
              <coordinates>1,2 3,4 5,6 1,2</coordinates>
            </LinearRing></outerBoundaryIs></Polygon>
          </Placemark>
        </Document></kml>"#;

        let document = Document::parse(doc);
        assert_eq!(document.features.len(), 1);

        let style = &document.features[0].style;
        assert_eq!(style.fill_color.as_deref(), Some("#9ac2c6"));
        assert!(!style.fill);
        assert!(style.outline);
    }

    #[test]
    fn dangling_style_reference_yields_default_style() {
        let doc = r#"
        <kml><Placemark>
          <styleUrl>#missing</styleUrl>
          <coordinates>1,2</coordinates>
        </Placemark></kml>"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features[0].style, StyleDefinition::default());
    }

    #[test]
    fn external_style_url_is_not_resolved() {
        let doc = r#"
        <kml><Placemark>
          <styleUrl>other.kml#s1</styleUrl>
          <coordinates>1,2</coordinates>
        </Placemark></kml>"#;

        let mut styles = StyleMap::new();
        styles.insert("s1".into(), StyleDefinition::default());

        let features = parse_features(doc, &styles);
        assert_eq!(features[0].style, StyleDefinition::default());
    }

    #[test]
    fn multi_geometry_keeps_first_coordinates() {
        let doc = r#"
        <kml><Placemark>
          <MultiGeometry>
            <Point><coordinates>1,2</coordinates></Point>
            <LineString><coordinates>3,4 5,6</coordinates></LineString>
          </MultiGeometry>
        </Placemark></kml>"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features.len(), 1);
        // First coordinates element wins, LineString still classifies it.
        assert_eq!(features[0].coordinates.len(), 1);
        assert_eq!(features[0].geometry_type, GeometryType::LineString);
    }

    #[test]
    fn folders_are_traversed_in_document_order() {
        let doc = r#"
        <kml><Document>
          <Folder>
            <name>North</name>
            <Placemark><name>P1</name><coordinates>1,2</coordinates></Placemark>
          </Folder>
          <Folder>
            <name>South</name>
            <Placemark><name>P2</name><coordinates>3,4</coordinates></Placemark>
          </Folder>
        </Document></kml>"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name, "P1");
        assert_eq!(features[1].name, "P2");
    }

    #[test]
    fn cdata_description_is_kept() {
        let doc = r#"
        <kml><Placemark>
          <description><![CDATA[<b>Reef</b> access]]></description>
          <coordinates>1,2</coordinates>
        </Placemark></kml>"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features[0].description, "<b>Reef</b> access");
    }

    #[test]
    fn whitespace_only_name_falls_back_to_default() {
        let doc = r#"
        <kml><Placemark>
          <name>   </name>
          <coordinates>1,2</coordinates>
        </Placemark></kml>"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features[0].name, "Feature 1");
    }

    #[test]
    fn parsing_is_idempotent() {
        let doc = r#"
        <kml><Document>
          <Style id="s1"><LineStyle><color>80c6c29a</color></LineStyle></Style>
          <Placemark>
            <styleUrl>#s1</styleUrl>
            <coordinates>1,2 3,4</coordinates>
          </Placemark>
        </Document></kml>"#;

        assert_eq!(Document::parse(doc), Document::parse(doc));
    }

    #[test]
    fn truncated_document_keeps_parsed_features() {
        let doc = r#"
        <kml><Document>
          <Placemark><name>A</name><coordinates>1,2</coordinates></Placemark>
          <Placemark><name>B</name><coordinates>3,4"#;

        let features = parse_features(doc, &StyleMap::new());
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "A");
    }
}
