// Copyright 2018 The GeoRust Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Colors and the linear scale used to fill sub-region features.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// An RGB color whose channels may leave `[0, 255]` while being
/// interpolated. Formatting clamps them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

const NAMED: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("blue", 0x0000ff),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("grey", 0x808080),
    ("orange", 0xffa500),
    ("purple", 0x800080),
    ("red", 0xff0000),
    ("white", 0xffffff),
    ("yellow", 0xffff00),
];

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Rgb { r, g, b }
    }

    fn from_hex(hex: u32) -> Self {
        Rgb::new(
            ((hex >> 16) & 0xff) as f64,
            ((hex >> 8) & 0xff) as f64,
            (hex & 0xff) as f64,
        )
    }

    /// Channel-wise `self + t * (other - self)`, without clamping `t`.
    pub fn lerp(&self, other: &Rgb, t: f64) -> Rgb {
        Rgb::new(
            self.r + t * (other.r - self.r),
            self.g + t * (other.g - self.g),
            self.b + t * (other.b - self.b),
        )
    }
}

impl FromStr for Rgb {
    type Err = Error;

    /// Accepts `#rgb`, `#rrggbb`, `rgb(r, g, b)` and a few color keywords.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidColor(s.to_owned());
        let text = s.trim().to_ascii_lowercase();
        if let Some(hex) = text.strip_prefix('#') {
            let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
            return match hex.len() {
                3 => {
                    let (r, g, b) = ((value >> 8) & 0xf, (value >> 4) & 0xf, value & 0xf);
                    Ok(Rgb::from_hex((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11))
                }
                6 => Ok(Rgb::from_hex(value)),
                _ => Err(invalid()),
            };
        }
        if let Some(body) = text.strip_prefix("rgb(").and_then(|t| t.strip_suffix(')')) {
            let channels = body
                .split(',')
                .map(|c| c.trim().parse::<f64>().map_err(|_| invalid()))
                .collect::<Result<Vec<_>, _>>()?;
            return match channels.as_slice() {
                [r, g, b] => Ok(Rgb::new(*r, *g, *b)),
                _ => Err(invalid()),
            };
        }
        NAMED
            .iter()
            .find(|(name, _)| *name == text)
            .map(|(_, hex)| Rgb::from_hex(*hex))
            .ok_or_else(invalid)
    }
}

/// Rounded and clamped to `[0, 255]`; NaN channels become 0.
fn channel(v: f64) -> u8 {
    if v.is_nan() {
        0
    } else {
        v.round().clamp(0.0, 255.0) as u8
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "rgb({}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

/// Linear map from a numeric domain onto a two-color range.
///
/// Inputs outside the domain are extrapolated, not clamped.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearColorScale {
    domain: [f64; 2],
    range: [Rgb; 2],
}

impl LinearColorScale {
    pub fn new(domain: [f64; 2], range: [Rgb; 2]) -> Self {
        LinearColorScale { domain, range }
    }

    /// The scale used for sub-region areas: `[1, 160000]` km² from red to blue.
    pub fn area() -> Self {
        LinearColorScale::new(
            [1.0, 160_000.0],
            [Rgb::new(255.0, 0.0, 0.0), Rgb::new(0.0, 0.0, 255.0)],
        )
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [Rgb; 2] {
        self.range
    }

    /// Position of `value` in the domain, `0` at the first bound and `1` at
    /// the second. A collapsed domain maps everything to the middle.
    pub fn normalize(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let span = d1 - d0;
        if span == 0.0 {
            0.5
        } else {
            (value - d0) / span
        }
    }

    pub fn interpolate(&self, value: f64) -> Rgb {
        self.range[0].lerp(&self.range[1], self.normalize(value))
    }

    /// CSS color for `value`.
    pub fn color(&self, value: f64) -> String {
        self.interpolate(value).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_forms() {
        assert_eq!("#ddd".parse::<Rgb>(), Ok(Rgb::new(221.0, 221.0, 221.0)));
        assert_eq!("#D1D1D1".parse::<Rgb>(), Ok(Rgb::new(209.0, 209.0, 209.0)));
        assert_eq!("red".parse::<Rgb>(), Ok(Rgb::new(255.0, 0.0, 0.0)));
        assert_eq!("rgb(1, 2, 3)".parse::<Rgb>(), Ok(Rgb::new(1.0, 2.0, 3.0)));
        assert_eq!(
            "#12345".parse::<Rgb>(),
            Err(Error::InvalidColor("#12345".to_string()))
        );
        assert!("chartreuse-ish".parse::<Rgb>().is_err());
    }

    #[test]
    fn endpoints_are_red_and_blue() {
        let scale = LinearColorScale::area();
        assert_eq!(scale.interpolate(1.0), "red".parse::<Rgb>().unwrap());
        assert_eq!(scale.interpolate(160_000.0), "blue".parse::<Rgb>().unwrap());
        assert_eq!(scale.color(1.0), "rgb(255, 0, 0)");
        assert_eq!(scale.color(160_000.0), "rgb(0, 0, 255)");
    }

    #[test]
    fn midpoint_is_purple_ish() {
        let scale = LinearColorScale::area();
        assert_eq!(scale.color(80_000.5), "rgb(128, 0, 128)");
    }

    #[test]
    fn values_outside_the_domain_extrapolate() {
        let scale = LinearColorScale::area();
        let below = scale.interpolate(0.0);
        assert_ne!(below, scale.interpolate(1.0));
        assert!(below.r > 255.0 && below.b < 0.0);

        let above = scale.interpolate(320_000.0);
        assert_ne!(above, scale.interpolate(160_000.0));
        assert!((above.r - (-255.0)).abs() < 0.01 && (above.b - 510.0).abs() < 0.01);
        // the CSS form saturates
        assert_eq!(scale.color(320_000.0), "rgb(0, 0, 255)");
    }

    #[test]
    fn missing_values_render_black() {
        assert_eq!(LinearColorScale::area().color(f64::NAN), "rgb(0, 0, 0)");
    }

    #[test]
    fn collapsed_domain_maps_to_middle() {
        let scale = LinearColorScale::new(
            [5.0, 5.0],
            [Rgb::new(0.0, 0.0, 0.0), Rgb::new(200.0, 100.0, 50.0)],
        );
        assert_eq!(scale.interpolate(-3.0), Rgb::new(100.0, 50.0, 25.0));
    }
}
