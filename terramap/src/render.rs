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

//! Turns layers into concrete drawing instructions.
//!
//! The editor itself never talks to a map SDK. It resolves every feature
//! into an [`Overlay`] with all style fields filled in and hands those to a
//! [`MapSurface`], the injected boundary behind which the actual rendering
//! lives. Rendering a layer also reports the bounding rectangle of
//! everything drawn so the caller can move the viewport there.

use geo::BoundingRect;
use log::trace;

use kml::{Coordinate, Feature, GeometryType, StyleDefinition};

use crate::layer::{Layer, LayerId, LayerKind, LayerStack, Shape, ShapeKind};

/// Fallbacks for features whose style leaves fields unset.
const DEFAULT_MARKER_FILL: &str = "#ffff00";
const DEFAULT_MARKER_OUTLINE: &str = "#000000";
const DEFAULT_STROKE: &str = "#ffffff";
const DEFAULT_STROKE_WIDTH: f64 = 2.0;
const DEFAULT_FILL_OPACITY: f64 = 0.3;

/// Colors for shapes drawn by the user.
const DRAWING_FILL: &str = "#668969";
const DRAWING_STROKE: &str = "#344b49";
const DRAWING_STROKE_WIDTH: f64 = 2.0;
const DRAWING_LINE_WIDTH: f64 = 3.0;

/// Resolved marker appearance.
#[derive(Clone, PartialEq, Debug)]
pub struct MarkerStyle {
    pub color: String,
    pub opacity: f64,
    pub scale: f64,
    pub outline_color: String,
    /// Icon image to use instead of the default symbol, when the style
    /// referenced one.
    pub icon_href: Option<String>,
}

/// Resolved stroke appearance.
#[derive(Clone, PartialEq, Debug)]
pub struct StrokeStyle {
    pub color: String,
    pub opacity: f64,
    pub width: f64,
}

/// Resolved fill appearance.
#[derive(Clone, PartialEq, Debug)]
pub struct FillStyle {
    pub color: String,
    pub opacity: f64,
}

/// Resolved polygon appearance.
///
/// `stroke` and `fill` are `None` when the source style disabled the
/// outline or fill outright, which is different from falling back to the
/// defaults.
#[derive(Clone, PartialEq, Debug)]
pub struct PolygonStyle {
    pub stroke: Option<StrokeStyle>,
    pub fill: Option<FillStyle>,
}

/// Resolves the marker appearance of a point feature.
pub fn marker_style(style: &StyleDefinition) -> MarkerStyle {
    MarkerStyle {
        color: style
            .icon_color
            .clone()
            .unwrap_or_else(|| DEFAULT_MARKER_FILL.to_string()),
        opacity: style.icon_opacity.unwrap_or(1.0),
        scale: style.icon_scale.unwrap_or(1.0),
        outline_color: DEFAULT_MARKER_OUTLINE.to_string(),
        icon_href: style.icon_href.clone(),
    }
}

/// Resolves the stroke appearance of a line or polygon outline.
pub fn stroke_style(style: &StyleDefinition) -> StrokeStyle {
    StrokeStyle {
        color: style
            .line_color
            .clone()
            .unwrap_or_else(|| DEFAULT_STROKE.to_string()),
        opacity: style.line_opacity.unwrap_or(1.0),
        width: style.line_width.unwrap_or(DEFAULT_STROKE_WIDTH),
    }
}

/// Resolves the polygon appearance, honoring the `fill`/`outline` flags.
pub fn polygon_style(style: &StyleDefinition) -> PolygonStyle {
    PolygonStyle {
        stroke: style.outline.then(|| stroke_style(style)),
        fill: style.fill.then(|| FillStyle {
            color: style
                .fill_color
                .clone()
                .unwrap_or_else(|| DEFAULT_STROKE.to_string()),
            opacity: style.fill_opacity.unwrap_or(DEFAULT_FILL_OPACITY),
        }),
    }
}

/// One drawable primitive with its fully resolved style.
#[derive(Clone, PartialEq, Debug)]
pub enum Primitive {
    Marker {
        position: Coordinate,
        style: MarkerStyle,
    },
    Polyline {
        path: Vec<Coordinate>,
        style: StrokeStyle,
    },
    Polygon {
        ring: Vec<Coordinate>,
        style: PolygonStyle,
    },
    Circle {
        center: Coordinate,
        radius: f64,
        style: PolygonStyle,
    },
}

/// A primitive plus the texts shown in its info popup.
#[derive(Clone, PartialEq, Debug)]
pub struct Overlay {
    pub title: String,
    pub subtitle: String,
    pub primitive: Primitive,
}

/// The rendering collaborator.
///
/// Implementations wrap whatever actually puts pixels on a map. The editor
/// calls [`clear_layer`](Self::clear_layer) before redrawing a layer so
/// stale overlays never accumulate, then [`draw`](Self::draw) once per
/// overlay.
pub trait MapSurface {
    fn clear_layer(&mut self, layer: LayerId);
    fn draw(&mut self, layer: LayerId, overlay: Overlay);
}

/// Converts a feature into an overlay.
///
/// A polygon that collapsed to a single coordinate is drawn as a marker;
/// there is nothing to fill, but the location is still worth showing.
fn feature_overlay(feature: &Feature) -> Overlay {
    let primitive = match feature.geometry_type {
        GeometryType::Point => Primitive::Marker {
            position: feature.coordinates[0],
            style: marker_style(&feature.style),
        },
        GeometryType::Polygon if feature.coordinates.len() == 1 => Primitive::Marker {
            position: feature.coordinates[0],
            style: marker_style(&feature.style),
        },
        GeometryType::LineString => Primitive::Polyline {
            path: feature.coordinates.clone(),
            style: stroke_style(&feature.style),
        },
        GeometryType::Polygon => Primitive::Polygon {
            ring: feature.coordinates.clone(),
            style: polygon_style(&feature.style),
        },
    };

    Overlay {
        title: feature.name.clone(),
        subtitle: feature.description.clone(),
        primitive,
    }
}

/// Converts a drawn shape into an overlay with the drawing-tool colors.
fn shape_overlay(shape: &Shape) -> Option<Overlay> {
    let first = *shape.coordinates.first()?;

    let drawing_polygon = || PolygonStyle {
        stroke: Some(StrokeStyle {
            color: DRAWING_STROKE.to_string(),
            opacity: 1.0,
            width: DRAWING_STROKE_WIDTH,
        }),
        fill: Some(FillStyle {
            color: DRAWING_FILL.to_string(),
            opacity: DEFAULT_FILL_OPACITY,
        }),
    };

    let primitive = match shape.kind {
        ShapeKind::Marker => Primitive::Marker {
            position: first,
            style: MarkerStyle {
                color: DRAWING_FILL.to_string(),
                opacity: 1.0,
                scale: 1.0,
                outline_color: DRAWING_STROKE.to_string(),
                icon_href: None,
            },
        },
        ShapeKind::Polyline => Primitive::Polyline {
            path: shape.coordinates.clone(),
            style: StrokeStyle {
                color: DRAWING_STROKE.to_string(),
                opacity: 1.0,
                width: DRAWING_LINE_WIDTH,
            },
        },
        ShapeKind::Polygon => Primitive::Polygon {
            ring: shape.coordinates.clone(),
            style: drawing_polygon(),
        },
        ShapeKind::Circle => Primitive::Circle {
            center: first,
            radius: shape.radius.unwrap_or_default(),
            style: drawing_polygon(),
        },
    };

    Some(Overlay {
        title: String::new(),
        subtitle: String::new(),
        primitive,
    })
}

fn primitive_coordinates(primitive: &Primitive) -> Vec<Coordinate> {
    match primitive {
        Primitive::Marker { position, .. } => vec![*position],
        Primitive::Polyline { path, .. } => path.clone(),
        Primitive::Polygon { ring, .. } => ring.clone(),
        Primitive::Circle { center, .. } => vec![*center],
    }
}

/// Draws one layer onto the surface.
///
/// The layer's previous overlays are cleared first; a hidden layer is only
/// cleared. Returns the bounding rectangle of everything drawn.
pub fn render_layer(layer: &Layer, surface: &mut dyn MapSurface) -> Option<geo::Rect<f64>> {
    surface.clear_layer(layer.id());

    if !layer.visible() {
        trace!("layer {} hidden, cleared only", layer.name());
        return None;
    }

    let overlays: Vec<Overlay> = match layer.kind() {
        LayerKind::Kml { document, .. } => {
            document.features.iter().map(feature_overlay).collect()
        }
        LayerKind::Drawing { shapes } => {
            shapes.iter().filter_map(shape_overlay).collect()
        }
    };

    let mut coords: Vec<geo::Coord<f64>> = Vec::new();
    for overlay in overlays {
        coords.extend(
            primitive_coordinates(&overlay.primitive)
                .iter()
                .map(|c| geo::Coord {
                    x: c.longitude,
                    y: c.latitude,
                }),
        );
        surface.draw(layer.id(), overlay);
    }

    geo::LineString::from(coords).bounding_rect()
}

/// Draws every layer of the stack, bottom-up, and returns the union of
/// their bounds.
pub fn render_stack(stack: &LayerStack, surface: &mut dyn MapSurface) -> Option<geo::Rect<f64>> {
    let mut bounds: Option<geo::Rect<f64>> = None;

    for layer in stack.iter() {
        let Some(rect) = render_layer(layer, surface) else {
            continue;
        };
        bounds = Some(match bounds {
            None => rect,
            Some(b) => geo::Rect::new(
                geo::Coord {
                    x: b.min().x.min(rect.min().x),
                    y: b.min().y.min(rect.min().y),
                },
                geo::Coord {
                    x: b.max().x.max(rect.max().x),
                    y: b.max().y.max(rect.max().y),
                },
            ),
        });
    }

    bounds
}
