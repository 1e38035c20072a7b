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

//! GeoJSON export of parsed layers.

use geo::BoundingRect;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use kml::GeometryType;

use crate::layer::{Layer, LayerKind, LayerStack};

fn rect_to_bbox(rect: geo::Rect<f64>) -> geojson::Bbox {
    vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y]
}

fn coords(feature: &kml::Feature) -> Vec<geo::Coord<f64>> {
    feature
        .coordinates
        .iter()
        .map(|c| geo::Coord {
            x: c.longitude,
            y: c.latitude,
        })
        .collect()
}

/// Converts one parsed feature into a GeoJSON feature.
///
/// The name and description travel along as properties so round-tripping
/// through another tool keeps the labels.
#[cfg_attr(docsrs, doc(cfg(feature = "geojson")))]
pub fn feature_to_geojson(feature: &kml::Feature) -> Feature {
    let (value, bbox) = match feature.geometry_type {
        GeometryType::Point => {
            let point = geo::Point::new(
                feature.coordinates[0].longitude,
                feature.coordinates[0].latitude,
            );
            (Value::from(&point), point.bounding_rect().map(rect_to_bbox))
        }
        GeometryType::LineString => {
            let line = geo::LineString::from(coords(feature));
            (Value::from(&line), line.bounding_rect().map(rect_to_bbox))
        }
        GeometryType::Polygon => {
            let polygon = geo::Polygon::new(geo::LineString::from(coords(feature)), vec![]);
            (
                Value::from(&polygon),
                polygon.bounding_rect().map(rect_to_bbox),
            )
        }
    };

    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), JsonValue::from(feature.name.clone()));
    if !feature.description.is_empty() {
        properties.insert(
            "description".to_string(),
            JsonValue::from(feature.description.clone()),
        );
    }

    Feature {
        bbox,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

impl Layer {
    /// Returns a KML layer's features as a GeoJSON feature collection.
    ///
    /// Drawing layers have no exportable features and return `None`.
    #[cfg_attr(docsrs, doc(cfg(feature = "geojson")))]
    pub fn to_geojson(&self) -> Option<FeatureCollection> {
        match self.kind() {
            LayerKind::Kml { document, .. } => Some(FeatureCollection {
                bbox: None,
                features: document.features.iter().map(feature_to_geojson).collect(),
                foreign_members: None,
            }),
            LayerKind::Drawing { .. } => None,
        }
    }
}

impl LayerStack {
    /// Exports the features of all visible KML layers, in stack order.
    #[cfg_attr(docsrs, doc(cfg(feature = "geojson")))]
    pub fn to_geojson(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self
                .iter()
                .filter(|layer| layer.visible())
                .filter_map(|layer| layer.to_geojson())
                .flat_map(|collection| collection.features)
                .collect(),
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
    <kml><Document>
      <Placemark>
        <name>Cenote</name>
        <description>Freshwater</description>
        <Point><coordinates>-87.4,20.2</coordinates></Point>
      </Placemark>
      <Placemark>
        <name>Trail</name>
        <coordinates>-87.4,20.2 -87.5,20.3</coordinates>
      </Placemark>
    </Document></kml>"#;

    #[test]
    fn exports_visible_kml_layers() {
        let mut stack = LayerStack::new();
        stack.add_kml("sites.kml", DOC);

        let collection = stack.to_geojson();
        assert_eq!(collection.features.len(), 2);

        let first = &collection.features[0];
        assert_eq!(
            first.properties.as_ref().unwrap()["name"],
            JsonValue::from("Cenote")
        );
        assert!(matches!(
            first.geometry.as_ref().unwrap().value,
            Value::Point(_)
        ));
    }

    #[test]
    fn hidden_layers_are_not_exported() {
        let mut stack = LayerStack::new();
        let id = stack.add_kml("sites.kml", DOC);
        stack.get_mut(id).unwrap().set_visible(false);

        assert!(stack.to_geojson().features.is_empty());
    }

    #[test]
    fn drawing_layers_have_no_geojson() {
        let mut stack = LayerStack::new();
        let id = stack.add_drawing("sketch");

        assert!(stack.get(id).unwrap().to_geojson().is_none());
    }

    #[test]
    fn line_feature_has_a_bbox() {
        let mut stack = LayerStack::new();
        stack.add_kml("sites.kml", DOC);

        let collection = stack.to_geojson();
        let bbox = collection.features[1].bbox.as_ref().unwrap();
        assert_eq!(bbox, &vec![-87.5, 20.2, -87.4, 20.3]);
    }
}
