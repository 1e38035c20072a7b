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

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A KML color translated into the usual web form.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecodedColor {
    /// Lowercase `#rrggbb` string.
    pub color: String,
    /// Alpha channel scaled to `[0, 1]`.
    pub opacity: f64,
}

impl Default for DecodedColor {
    fn default() -> Self {
        Self {
            color: String::from("#ffffff"),
            opacity: 1.0,
        }
    }
}

/// Decodes an 8-hex-digit KML color.
///
/// KML stores colors in `aabbggrr` byte order, so the channels come back out
/// reversed into `#rrggbb` with the alpha split off as an opacity. Anything
/// that is not exactly 8 hex digits decodes to opaque white; this never
/// fails. Real-world exports carry enough malformed colors that a missing
/// style beats a missing layer.
///
/// # Examples
///
/// ```
/// let c = kml::decode_color("80ff0000");
/// assert_eq!(c.color, "#0000ff");
/// assert!((c.opacity - 128.0 / 255.0).abs() < 1e-9);
/// ```
pub fn decode_color(value: &str) -> DecodedColor {
    let bytes = value.as_bytes();
    if bytes.len() != 8 || !bytes.iter().all(u8::is_ascii_hexdigit) {
        return DecodedColor::default();
    }

    let alpha = u8::from_str_radix(&value[0..2], 16).unwrap_or(u8::MAX);
    let blue = &value[2..4];
    let green = &value[4..6];
    let red = &value[6..8];

    DecodedColor {
        color: format!("#{red}{green}{blue}").to_lowercase(),
        opacity: f64::from(alpha) / 255.0,
    }
}
