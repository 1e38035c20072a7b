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

use std::collections::HashMap;

use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::Reader;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::decode_color;
use crate::xml;

/// Mapping from a style identifier to its definition.
pub type StyleMap = HashMap<String, StyleDefinition>;

/// Visual attributes declared by one KML `Style` element.
///
/// Every field mirrors a sub-element of `LineStyle`, `PolyStyle`, or
/// `IconStyle`. An unset field means the document did not specify it; it is
/// up to the renderer to substitute its own defaults. The two flags are the
/// exception: KML treats a missing `fill` or `outline` as enabled, and only
/// the literal text `0` disables them.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StyleDefinition {
    /// Stroke color as `#rrggbb`.
    pub line_color: Option<String>,
    /// Stroke opacity in `[0, 1]`.
    pub line_opacity: Option<f64>,
    /// Stroke width in pixels.
    pub line_width: Option<f64>,

    /// Fill color as `#rrggbb`.
    pub fill_color: Option<String>,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: Option<f64>,
    /// Whether polygons are filled.
    pub fill: bool,
    /// Whether polygons are outlined.
    pub outline: bool,

    /// Icon tint color as `#rrggbb`.
    pub icon_color: Option<String>,
    /// Icon tint opacity in `[0, 1]`.
    pub icon_opacity: Option<f64>,
    /// Icon scale factor.
    pub icon_scale: Option<f64>,
    /// Icon image reference from `Icon/href`.
    pub icon_href: Option<String>,
}

impl Default for StyleDefinition {
    fn default() -> Self {
        Self {
            line_color: None,
            line_opacity: None,
            line_width: None,
            fill_color: None,
            fill_opacity: None,
            fill: true,
            outline: true,
            icon_color: None,
            icon_opacity: None,
            icon_scale: None,
            icon_href: None,
        }
    }
}

impl From<xml::StyleXml> for StyleDefinition {
    fn from(x: xml::StyleXml) -> Self {
        let mut style = StyleDefinition::default();

        if let Some(color) = x.line_color {
            let c = decode_color(&color);
            style.line_color = Some(c.color);
            style.line_opacity = Some(c.opacity);
        }
        style.line_width = x.line_width.and_then(|w| w.parse().ok());

        if let Some(color) = x.poly_color {
            let c = decode_color(&color);
            style.fill_color = Some(c.color);
            style.fill_opacity = Some(c.opacity);
        }
        if let Some(fill) = x.poly_fill {
            style.fill = fill != "0";
        }
        if let Some(outline) = x.poly_outline {
            style.outline = outline != "0";
        }

        if let Some(color) = x.icon_color {
            let c = decode_color(&color);
            style.icon_color = Some(c.color);
            style.icon_opacity = Some(c.opacity);
        }
        style.icon_scale = x.icon_scale.and_then(|s| s.parse().ok());
        style.icon_href = x.icon_href;

        style
    }
}

/// Collects all named `Style` definitions of a KML document.
///
/// `Style` elements without an `id` attribute are skipped, as are inline
/// styles nested in placemarks (those carry no identifier to reference).
/// Unparsable numeric fields are left unset rather than reported; a reader
/// error ends the scan with whatever was collected up to that point.
///
/// # Examples
///
/// ```
/// let doc = r#"
///   <kml><Document>
///     <Style id="track">
///       <LineStyle><color>ff344b49</color><width>3</width></LineStyle>
///     </Style>
///   </Document></kml>"#;
///
/// let styles = kml::extract_styles(doc);
///
/// assert_eq!(styles["track"].line_color.as_deref(), Some("#494b34"));
/// assert_eq!(styles["track"].line_width, Some(3.0));
/// ```
pub fn extract_styles(document: &str) -> StyleMap {
    let mut reader = Reader::from_reader(document.as_bytes());
    reader.config_mut().trim_text(true);

    let mut styles = StyleMap::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if xml::local_name(e.name().as_ref()) == b"Style" => {
                let id = match style_id(e) {
                    Some(id) => id,
                    None => continue,
                };

                match xml::read_style(&mut reader) {
                    Ok(x) => {
                        styles.insert(id, x.into());
                    }
                    Err(e) => {
                        warn!("style scan stopped at {id}: {e}");
                        break;
                    }
                }
            }
            Ok(Event::Empty(ref e)) if xml::local_name(e.name().as_ref()) == b"Style" => {
                // A self-closing style still declares its identifier.
                if let Some(id) = style_id(e) {
                    styles.insert(id, StyleDefinition::default());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("style scan stopped: {e}");
                break;
            }
        }
    }

    debug!("extracted {} named styles", styles.len());
    styles
}

fn style_id(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    e.try_get_attribute("id")
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_line_poly_and_icon_attributes() {
        let kml = r#"
        <kml xmlns="http://www.opengis.net/kml/2.2">
          <Document>
            <Style id="s1">
              <LineStyle>
                <color>ff0000ff</color>
                <width>2.5</width>
              </LineStyle>
              <PolyStyle>
                <color>7f00ff00</color>
                <fill>1</fill>
                <outline>0</outline>
              </PolyStyle>
              <IconStyle>
                <color>ffffffff</color>
                <scale>1.2</scale>
                <Icon><href>http://example.com/pin.png</href></Icon>
              </IconStyle>
            </Style>
          </Document>
        </kml>"#;

        let styles = extract_styles(kml);
        assert_eq!(styles.len(), 1);

        let s = &styles["s1"];
        assert_eq!(s.line_color.as_deref(), Some("#ff0000"));
        assert_eq!(s.line_opacity, Some(1.0));
        assert_eq!(s.line_width, Some(2.5));
        assert_eq!(s.fill_color.as_deref(), Some("#00ff00"));
        assert!((s.fill_opacity.unwrap() - 127.0 / 255.0).abs() < 1e-9);
        assert!(s.fill);
        assert!(!s.outline);
        assert_eq!(s.icon_color.as_deref(), Some("#ffffff"));
        assert_eq!(s.icon_opacity, Some(1.0));
        assert_eq!(s.icon_scale, Some(1.2));
        assert_eq!(s.icon_href.as_deref(), Some("http://example.com/pin.png"));
    }

    #[test]
    fn skips_styles_without_id() {
        let kml = r#"
        <kml><Document>
          <Style>
            <LineStyle><color>ff0000ff</color></LineStyle>
          </Style>
          <Style id="named"/>
        </Document></kml>"#;

        let styles = extract_styles(kml);
        assert_eq!(styles.len(), 1);
        assert_eq!(styles["named"], StyleDefinition::default());
    }

    #[test]
    fn absent_flags_default_to_true() {
        let kml = r#"
        <kml><Document>
          <Style id="s1"><PolyStyle><color>ffffffff</color></PolyStyle></Style>
        </Document></kml>"#;

        let styles = extract_styles(kml);
        assert!(styles["s1"].fill);
        assert!(styles["s1"].outline);
    }

    #[test]
    fn nonzero_flag_text_means_true() {
        let kml = r#"
        <kml><Document>
          <Style id="s1">
            <PolyStyle><fill>true</fill><outline>no</outline></PolyStyle>
          </Style>
        </Document></kml>"#;

        let styles = extract_styles(kml);
        assert!(styles["s1"].fill);
        assert!(styles["s1"].outline);
    }

    #[test]
    fn unparsable_numbers_stay_unset() {
        let kml = r#"
        <kml><Document>
          <Style id="s1">
            <LineStyle><width>wide</width></LineStyle>
            <IconStyle><scale>big</scale></IconStyle>
          </Style>
        </Document></kml>"#;

        let styles = extract_styles(kml);
        assert_eq!(styles["s1"].line_width, None);
        assert_eq!(styles["s1"].icon_scale, None);
    }

    #[test]
    fn first_duplicate_block_wins() {
        let kml = r#"
        <kml><Document>
          <Style id="s1">
            <LineStyle><width>1</width></LineStyle>
            <LineStyle><width>9</width><color>ff000000</color></LineStyle>
          </Style>
        </Document></kml>"#;

        let styles = extract_styles(kml);
        assert_eq!(styles["s1"].line_width, Some(1.0));
        // The second block is skipped wholesale, color included.
        assert_eq!(styles["s1"].line_color, None);
    }

    #[test]
    fn malformed_color_decodes_to_white() {
        let kml = r#"
        <kml><Document>
          <Style id="s1"><LineStyle><color>nonsense</color></LineStyle></Style>
        </Document></kml>"#;

        let styles = extract_styles(kml);
        assert_eq!(styles["s1"].line_color.as_deref(), Some("#ffffff"));
        assert_eq!(styles["s1"].line_opacity, Some(1.0));
    }

    #[test]
    fn href_outside_icon_element_is_ignored() {
        let kml = r#"
        <kml><Document>
          <Style id="s1"><IconStyle><href>stray.png</href></IconStyle></Style>
        </Document></kml>"#;

        let styles = extract_styles(kml);
        assert_eq!(styles["s1"].icon_href, None);
    }
}
