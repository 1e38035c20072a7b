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

//! Map editor core.
//!
//! `terramap` manages the layers of a satellite-map editor: KML/KMZ files a
//! user imports and shapes they draw. The UI shell and the map SDK live
//! elsewhere; this crate owns everything in between — decoding uploads,
//! keeping the layer list with its parsed features, and resolving each
//! feature into a concrete drawing instruction for an injected
//! [`MapSurface`].
//!
//! # Examples
//!
//! Import a file, manage it as a layer, and render it:
//!
//! ```no_run
//! use terramap::{import, render_stack, LayerStack, MapSurface, Overlay};
//!
//! # struct Sdk;
//! # impl MapSurface for Sdk {
//! #     fn clear_layer(&mut self, _: terramap::LayerId) {}
//! #     fn draw(&mut self, _: terramap::LayerId, _: Overlay) {}
//! # }
//! # fn main() -> Result<(), terramap::Error> {
//! let bytes = std::fs::read("sites.kmz").expect("file should be readable");
//! let text = import::read_kml_text("sites.kmz", &bytes)?;
//!
//! let mut layers = LayerStack::new();
//! layers.add_kml("sites.kmz", text);
//!
//! let mut surface = Sdk;
//! if let Some(bounds) = render_stack(&layers, &mut surface) {
//!     // move the viewport to `bounds`
//! }
//! # Ok(())
//! # }
//! ```

mod error;
pub mod import;
mod layer;
mod render;

#[cfg(feature = "geojson")]
mod geojson;

pub use error::{Error, Result};
pub use layer::{Layer, LayerId, LayerKind, LayerStack, Shape, ShapeKind};
pub use render::{
    marker_style, polygon_style, render_layer, render_stack, stroke_style, FillStyle,
    MapSurface, MarkerStyle, Overlay, PolygonStyle, Primitive, StrokeStyle,
};

#[cfg(feature = "geojson")]
pub use geojson::feature_to_geojson;
