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

//! Map layers.
//!
//! A [`Layer`] is either an imported KML document or a set of drawn shapes.
//! KML layers keep the raw document text as the source of truth; the parsed
//! [`Feature`]s are a derived projection computed when the layer is created
//! and recomputed only when the raw content actually changes. The content
//! hash decides that, so re-assigning identical text is a no-op.

use std::hash::{DefaultHasher, Hash, Hasher};

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use kml::{Coordinate, Document, Feature};

/// Identifies a layer within a [`LayerStack`].
pub type LayerId = u64;

/// The kind of overlay a drawn [`Shape`] represents.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeKind {
    Marker,
    Polyline,
    Polygon,
    Circle,
}

/// A shape drawn by the user.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shape {
    pub kind: ShapeKind,

    /// Vertices for polylines and polygons, the position for markers, the
    /// center for circles.
    pub coordinates: Vec<Coordinate>,

    /// Circle radius in meters; unused for the other kinds.
    pub radius: Option<f64>,
}

/// The two sources a layer's content can come from.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LayerKind {
    /// An imported KML document with its derived features.
    Kml {
        raw: String,
        content_id: u64,
        document: Document,
    },
    /// Shapes drawn directly on the map.
    Drawing { shapes: Vec<Shape> },
}

/// One entry in the editor's layer list.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layer {
    id: LayerId,
    name: String,
    visible: bool,
    kind: LayerKind,
}

fn content_id(raw: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    raw.hash(&mut hasher);
    hasher.finish()
}

impl Layer {
    fn new_kml(id: LayerId, name: String, raw: String) -> Self {
        let document = Document::parse(&raw);
        debug!(
            "layer {name}: {} features, {} styles",
            document.features.len(),
            document.styles.len()
        );
        Self {
            id,
            name,
            visible: true,
            kind: LayerKind::Kml {
                content_id: content_id(&raw),
                document,
                raw,
            },
        }
    }

    fn new_drawing(id: LayerId, name: String) -> Self {
        Self {
            id,
            name,
            visible: true,
            kind: LayerKind::Drawing { shapes: Vec::new() },
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }

    /// The layer's parsed features; `None` for drawing layers.
    pub fn features(&self) -> Option<&[Feature]> {
        match &self.kind {
            LayerKind::Kml { document, .. } => Some(&document.features),
            LayerKind::Drawing { .. } => None,
        }
    }

    /// The layer's drawn shapes; `None` for KML layers.
    pub fn shapes(&self) -> Option<&[Shape]> {
        match &self.kind {
            LayerKind::Kml { .. } => None,
            LayerKind::Drawing { shapes } => Some(shapes),
        }
    }

    /// Replaces the raw KML text of a KML layer.
    ///
    /// The features are reparsed only when the new text differs from the
    /// current content. Returns `false` without touching anything when
    /// called on a drawing layer.
    pub fn set_raw(&mut self, text: impl Into<String>) -> bool {
        let LayerKind::Kml {
            raw, content_id: id, document,
        } = &mut self.kind
        else {
            return false;
        };

        let text = text.into();
        let new_id = content_id(&text);
        if *id == new_id {
            return true;
        }

        *document = Document::parse(&text);
        debug!(
            "layer {}: content changed, {} features",
            self.name,
            document.features.len()
        );
        *raw = text;
        *id = new_id;
        true
    }

    /// Appends a shape to a drawing layer. Returns `false` for KML layers.
    pub fn push_shape(&mut self, shape: Shape) -> bool {
        match &mut self.kind {
            LayerKind::Kml { .. } => false,
            LayerKind::Drawing { shapes } => {
                shapes.push(shape);
                true
            }
        }
    }
}

/// The ordered list of layers the editor works on.
///
/// Layers render bottom-up in insertion order. Identifiers are handed out
/// once and never reused, so a removed layer's id stays dangling instead of
/// silently pointing at a newcomer.
///
/// # Examples
///
/// ```
/// use terramap::LayerStack;
///
/// let mut stack = LayerStack::new();
/// let id = stack.add_kml("sites.kml", "<kml></kml>");
///
/// stack.get_mut(id).unwrap().set_visible(false);
/// assert!(!stack.get(id).unwrap().visible());
/// ```
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayerStack {
    layers: Vec<Layer>,
    next_id: LayerId,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> LayerId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Adds a KML layer, parsing its features once up front.
    pub fn add_kml(&mut self, name: impl Into<String>, raw: impl Into<String>) -> LayerId {
        let id = self.next_id();
        self.layers.push(Layer::new_kml(id, name.into(), raw.into()));
        id
    }

    /// Adds an empty drawing layer.
    pub fn add_drawing(&mut self, name: impl Into<String>) -> LayerId {
        let id = self.next_id();
        self.layers.push(Layer::new_drawing(id, name.into()));
        id
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Removes a layer, returning it when it existed.
    pub fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let index = self.layers.iter().position(|l| l.id == id)?;
        Some(self.layers.remove(index))
    }

    /// Flips a layer's visibility. Returns the new state, or `None` for an
    /// unknown id.
    pub fn toggle_visible(&mut self, id: LayerId) -> Option<bool> {
        let layer = self.get_mut(id)?;
        layer.visible = !layer.visible;
        Some(layer.visible)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
