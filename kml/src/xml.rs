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

//! Internal subtree readers that mirror the raw KML structure.
//!
//! These walk the events of one `Style` or `Placemark` element and collect
//! the raw text of the sub-elements the pipeline cares about. The collected
//! values stay untyped strings here; decoding into the public types happens
//! in [`style`](crate::style) and [`parser`](crate::parser).

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Error;

/// Returns the local name of an XML element, stripping any namespace prefix.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .position(|&b| b == b':')
        .map_or(name, |pos| &name[pos + 1..])
}

/// Raw sub-element text of one `Style` element.
///
/// Each slot holds the text of the first occurrence; later duplicates are
/// ignored, as are the contents of a second `LineStyle`/`PolyStyle`/
/// `IconStyle` block.
#[derive(Debug, Default)]
pub(crate) struct StyleXml {
    pub line_color: Option<String>,
    pub line_width: Option<String>,
    pub poly_color: Option<String>,
    pub poly_fill: Option<String>,
    pub poly_outline: Option<String>,
    pub icon_color: Option<String>,
    pub icon_scale: Option<String>,
    pub icon_href: Option<String>,
}

/// Raw content of one `Placemark` element.
#[derive(Debug, Default)]
pub(crate) struct PlacemarkXml {
    pub name: Option<String>,
    pub description: Option<String>,
    pub style_url: Option<String>,
    pub coordinates: Option<String>,
    pub has_polygon: bool,
    pub has_line_string: bool,
}

/// Which style section the reader is currently inside.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Section {
    Line,
    Poly,
    Icon,
}

/// Reads the subtree of a `Style` element whose start tag was just consumed.
///
/// Only the first `LineStyle`, `PolyStyle`, and `IconStyle` children are
/// inspected; duplicate blocks are skipped wholesale.
pub(crate) fn read_style(reader: &mut Reader<&[u8]>) -> Result<StyleXml, Error> {
    #[derive(Copy, Clone, Eq, PartialEq, Debug)]
    enum Target {
        LineColor,
        LineWidth,
        PolyColor,
        PolyFill,
        PolyOutline,
        IconColor,
        IconScale,
        IconHref,
    }

    let mut style = StyleXml::default();

    let mut depth = 0usize;
    let mut section: Option<(Section, usize)> = None;
    let mut seen = (false, false, false); // (line, poly, icon)
    let mut skip_until: Option<usize> = None;
    let mut icon_depth: Option<usize> = None;
    let mut target: Option<(Target, usize)> = None;
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;
                if skip_until.is_some() {
                    continue;
                }

                let qname = e.name();
                let name = local_name(qname.as_ref());
                match section {
                    None => match name {
                        b"LineStyle" if !seen.0 => {
                            seen.0 = true;
                            section = Some((Section::Line, depth));
                        }
                        b"PolyStyle" if !seen.1 => {
                            seen.1 = true;
                            section = Some((Section::Poly, depth));
                        }
                        b"IconStyle" if !seen.2 => {
                            seen.2 = true;
                            section = Some((Section::Icon, depth));
                        }
                        b"LineStyle" | b"PolyStyle" | b"IconStyle" => {
                            skip_until = Some(depth);
                        }
                        _ => {}
                    },
                    Some((kind, _)) => {
                        let next = match (kind, name) {
                            (Section::Line, b"color") => Some(Target::LineColor),
                            (Section::Line, b"width") => Some(Target::LineWidth),
                            (Section::Poly, b"color") => Some(Target::PolyColor),
                            (Section::Poly, b"fill") => Some(Target::PolyFill),
                            (Section::Poly, b"outline") => Some(Target::PolyOutline),
                            (Section::Icon, b"color") => Some(Target::IconColor),
                            (Section::Icon, b"scale") => Some(Target::IconScale),
                            (Section::Icon, b"Icon") => {
                                icon_depth = Some(depth);
                                None
                            }
                            (Section::Icon, b"href") if icon_depth.is_some() => {
                                Some(Target::IconHref)
                            }
                            _ => None,
                        };
                        if let Some(t) = next {
                            if target.is_none() {
                                target = Some((t, depth));
                                text.clear();
                            }
                        }
                    }
                }
            }
            Event::Text(ref t) => {
                if target.is_some() {
                    text.push_str(&t.unescape()?);
                }
            }
            Event::CData(ref t) => {
                if target.is_some() {
                    text.push_str(&String::from_utf8_lossy(t.as_ref()));
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                if skip_until == Some(depth) {
                    skip_until = None;
                }
                if icon_depth == Some(depth) {
                    icon_depth = None;
                }
                if let Some((t, d)) = target {
                    if d == depth {
                        target = None;
                        let slot = match t {
                            Target::LineColor => &mut style.line_color,
                            Target::LineWidth => &mut style.line_width,
                            Target::PolyColor => &mut style.poly_color,
                            Target::PolyFill => &mut style.poly_fill,
                            Target::PolyOutline => &mut style.poly_outline,
                            Target::IconColor => &mut style.icon_color,
                            Target::IconScale => &mut style.icon_scale,
                            Target::IconHref => &mut style.icon_href,
                        };
                        if slot.is_none() {
                            *slot = Some(text.trim().to_string());
                        }
                    }
                }
                if let Some((_, d)) = section {
                    if d == depth {
                        section = None;
                    }
                }
                depth -= 1;
            }
            Event::Eof => return Err(Error::UnexpectedEof("Style")),
            _ => {}
        }
    }

    Ok(style)
}

/// Reads the subtree of a `Placemark` element whose start tag was just
/// consumed.
///
/// The first `name`, `description`, `styleUrl`, and `coordinates` descendants
/// win regardless of nesting depth, and any `Polygon` or `LineString`
/// descendant sets the corresponding geometry flag. That matches a
/// whole-subtree element search, so a `MultiGeometry` placemark keeps the
/// coordinates of its first geometry only.
pub(crate) fn read_placemark(reader: &mut Reader<&[u8]>) -> Result<PlacemarkXml, Error> {
    #[derive(Copy, Clone, Eq, PartialEq, Debug)]
    enum Target {
        Name,
        Description,
        StyleUrl,
        Coordinates,
    }

    let mut placemark = PlacemarkXml::default();

    let mut depth = 0usize;
    let mut target: Option<(Target, usize)> = None;
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;

                let next = match local_name(e.name().as_ref()) {
                    b"Polygon" => {
                        placemark.has_polygon = true;
                        None
                    }
                    b"LineString" => {
                        placemark.has_line_string = true;
                        None
                    }
                    b"name" if placemark.name.is_none() => Some(Target::Name),
                    b"description" if placemark.description.is_none() => {
                        Some(Target::Description)
                    }
                    b"styleUrl" if placemark.style_url.is_none() => Some(Target::StyleUrl),
                    b"coordinates" if placemark.coordinates.is_none() => {
                        Some(Target::Coordinates)
                    }
                    _ => None,
                };
                if let Some(t) = next {
                    if target.is_none() {
                        target = Some((t, depth));
                        text.clear();
                    }
                }
            }
            Event::Empty(ref e) => match local_name(e.name().as_ref()) {
                b"Polygon" => placemark.has_polygon = true,
                b"LineString" => placemark.has_line_string = true,
                _ => {}
            },
            Event::Text(ref t) => {
                if target.is_some() {
                    text.push_str(&t.unescape()?);
                }
            }
            Event::CData(ref t) => {
                if target.is_some() {
                    text.push_str(&String::from_utf8_lossy(t.as_ref()));
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                if let Some((t, d)) = target {
                    if d == depth {
                        target = None;
                        let slot = match t {
                            Target::Name => &mut placemark.name,
                            Target::Description => &mut placemark.description,
                            Target::StyleUrl => &mut placemark.style_url,
                            Target::Coordinates => &mut placemark.coordinates,
                        };
                        if slot.is_none() {
                            *slot = Some(text.trim().to_string());
                        }
                    }
                }
                depth -= 1;
            }
            Event::Eof => return Err(Error::UnexpectedEof("Placemark")),
            _ => {}
        }
    }

    Ok(placemark)
}
