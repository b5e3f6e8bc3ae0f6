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

//! Rotated Mercator projection from longitude/latitude degrees to viewport
//! pixels, with the y axis pointing down.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use geojson::{FeatureCollection, Value as GeoJsonGeomValue};

use crate::Error;

/// Planar bounding box, `[[x0, y0], [x1, y1]]`.
pub type Bounds = [[f64; 2]; 2];

/// Scale used while measuring a geometry before fitting it.
const FIT_PROBE_SCALE: f64 = 150.0;

/// Latitudes this close to a pole (in radians) have no Mercator image.
const POLE_EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Rotation about the polar axis then about the y axis, in radians.
    delta_lambda: f64,
    delta_phi: f64,
    scale: f64,
    translate: [f64; 2],
}

impl Default for Projection {
    fn default() -> Self {
        Projection::mercator()
    }
}

fn wrap_longitude(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - TAU
    } else if lambda < -PI {
        lambda + TAU
    } else {
        lambda
    }
}

fn asin(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).asin()
}

impl Projection {
    /// Mercator projection with the usual defaults: no rotation, a scale that
    /// maps the world onto 961 pixels and the origin at `[480, 250]`.
    pub fn mercator() -> Self {
        Projection {
            delta_lambda: 0.0,
            delta_phi: 0.0,
            scale: 961.0 / TAU,
            translate: [480.0, 250.0],
        }
    }

    /// Rotate the sphere by `[λ, φ]` degrees before projecting. Rotating by
    /// the negation of a location brings that location to the origin.
    pub fn rotate(mut self, angles: [f64; 2]) -> Self {
        self.delta_lambda = (angles[0] % 360.0).to_radians();
        self.delta_phi = (angles[1] % 360.0).to_radians();
        self
    }

    pub fn scale(mut self, k: f64) -> Self {
        self.scale = k;
        self
    }

    pub fn translate(mut self, t: [f64; 2]) -> Self {
        self.translate = t;
        self
    }

    pub fn rotation(&self) -> [f64; 2] {
        [self.delta_lambda.to_degrees(), self.delta_phi.to_degrees()]
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale
    }

    pub fn translation(&self) -> [f64; 2] {
        self.translate
    }

    fn rotate_forward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let lambda = wrap_longitude(lambda + self.delta_lambda);
        if self.delta_phi == 0.0 {
            return (lambda, phi);
        }
        let (sin_dp, cos_dp) = self.delta_phi.sin_cos();
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * cos_dp + x * sin_dp;
        (y.atan2(x * cos_dp - z * sin_dp), asin(k))
    }

    fn rotate_backward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let (lambda, phi) = if self.delta_phi == 0.0 {
            (lambda, phi)
        } else {
            let (sin_dp, cos_dp) = self.delta_phi.sin_cos();
            let cos_phi = phi.cos();
            let x = lambda.cos() * cos_phi;
            let y = lambda.sin() * cos_phi;
            let z = phi.sin();
            (y.atan2(x * cos_dp + z * sin_dp), asin(z * cos_dp - x * sin_dp))
        };
        (wrap_longitude(lambda - self.delta_lambda), phi)
    }

    /// Project `[longitude, latitude]` in degrees to viewport coordinates.
    ///
    /// Returns `None` for locations without a finite image: the poles of the
    /// rotated sphere and non-finite input.
    pub fn project(&self, position: [f64; 2]) -> Option<[f64; 2]> {
        let (lambda, phi) =
            self.rotate_forward(position[0].to_radians(), position[1].to_radians());
        if phi.abs() >= FRAC_PI_2 - POLE_EPSILON {
            return None;
        }
        let x = lambda;
        let y = ((FRAC_PI_2 + phi) / 2.0).tan().ln();
        let out = [
            self.translate[0] + x * self.scale,
            self.translate[1] - y * self.scale,
        ];
        if out[0].is_finite() && out[1].is_finite() {
            Some(out)
        } else {
            None
        }
    }

    /// Inverse of [`Projection::project`].
    pub fn invert(&self, point: [f64; 2]) -> Option<[f64; 2]> {
        let x = (point[0] - self.translate[0]) / self.scale;
        let y = (self.translate[1] - point[1]) / self.scale;
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let (lambda, phi) = self.rotate_backward(x, 2.0 * y.exp().atan() - FRAC_PI_2);
        Some([lambda.to_degrees(), phi.to_degrees()])
    }

    /// Planar bounds of every projected vertex of `collection`.
    pub fn bounds(&self, collection: &FeatureCollection) -> Option<Bounds> {
        let mut acc = BoundsAccumulator::default();
        for feature in &collection.features {
            if let Some(ref geometry) = feature.geometry {
                self.accumulate(&geometry.value, &mut acc);
            }
        }
        acc.finish()
    }

    pub(crate) fn accumulate(&self, value: &GeoJsonGeomValue, acc: &mut BoundsAccumulator) {
        for_each_position(value, &mut |pos: &[f64]| {
            if let Some(p) = position(pos).and_then(|p| self.project(p)) {
                acc.add(p);
            }
        });
    }

    /// Set scale and translation so that `collection` fits in `extent`
    /// (`[[left, top], [right, bottom]]`), centered along the slack axis.
    pub fn fit_extent(self, extent: Bounds, collection: &FeatureCollection) -> Result<Self, Error> {
        let probe = self.scale(FIT_PROBE_SCALE).translate([0.0, 0.0]);
        let [[x0, y0], [x1, y1]] = probe.bounds(collection).ok_or(Error::DegenerateExtent)?;
        let w = extent[1][0] - extent[0][0];
        let h = extent[1][1] - extent[0][1];
        let k = (w / (x1 - x0)).min(h / (y1 - y0));
        if !k.is_finite() || k <= 0.0 {
            return Err(Error::DegenerateExtent);
        }
        let x = extent[0][0] + (w - k * (x1 + x0)) / 2.0;
        let y = extent[0][1] + (h - k * (y1 + y0)) / 2.0;
        Ok(probe.scale(FIT_PROBE_SCALE * k).translate([x, y]))
    }
}

fn position(pos: &[f64]) -> Option<[f64; 2]> {
    match pos {
        [lon, lat, ..] => Some([*lon, *lat]),
        _ => None,
    }
}

/// Call `f` with every position of a GeoJSON geometry, in document order.
pub(crate) fn for_each_position<F>(value: &GeoJsonGeomValue, f: &mut F)
where
    F: FnMut(&[f64]),
{
    match value {
        GeoJsonGeomValue::Point(p) => f(p.as_slice()),
        GeoJsonGeomValue::MultiPoint(ps) | GeoJsonGeomValue::LineString(ps) => {
            ps.iter().for_each(|p| f(p.as_slice()))
        }
        GeoJsonGeomValue::MultiLineString(lines) | GeoJsonGeomValue::Polygon(lines) => lines
            .iter()
            .flatten()
            .for_each(|p| f(p.as_slice())),
        GeoJsonGeomValue::MultiPolygon(polygons) => polygons
            .iter()
            .flatten()
            .flatten()
            .for_each(|p| f(p.as_slice())),
        GeoJsonGeomValue::GeometryCollection(geoms) => {
            for g in geoms {
                for_each_position(&g.value, f);
            }
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct BoundsAccumulator {
    bounds: Option<Bounds>,
}

impl BoundsAccumulator {
    pub(crate) fn add(&mut self, p: [f64; 2]) {
        self.bounds = Some(match self.bounds {
            None => [p, p],
            Some([[x0, y0], [x1, y1]]) => [
                [x0.min(p[0]), y0.min(p[1])],
                [x1.max(p[0]), y1.max(p[1])],
            ],
        });
    }

    pub(crate) fn finish(self) -> Option<Bounds> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{feature_collection, fixtures, TopoJson};
    use geojson::{Feature, Geometry};

    const FOCUS: [f64; 2] = [133.15399233370441, -24.656909465155994];
    const EPSILON: f64 = 1e-6;

    fn australia() -> FeatureCollection {
        let topo = fixtures::AUSTRALIA
            .parse::<TopoJson>()
            .unwrap()
            .into_topology()
            .unwrap();
        feature_collection(&topo).unwrap()
    }

    fn collection(value: GeoJsonGeomValue) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: vec![Feature {
                bbox: None,
                geometry: Some(Geometry::new(value)),
                id: None,
                properties: None,
                foreign_members: None,
            }],
            foreign_members: None,
        }
    }

    fn close(a: [f64; 2], b: [f64; 2], eps: f64) -> bool {
        (a[0] - b[0]).abs() < eps && (a[1] - b[1]).abs() < eps
    }

    #[test]
    fn default_mercator_puts_null_island_at_translation() {
        let p = Projection::mercator().project([0.0, 0.0]).unwrap();
        assert!(close(p, [480.0, 250.0], EPSILON));
    }

    #[test]
    fn poles_are_not_projectable() {
        assert_eq!(Projection::mercator().project([10.0, 90.0]), None);
        assert_eq!(Projection::mercator().project([10.0, -90.0]), None);
        assert_eq!(Projection::mercator().project([-170.0, 89.99999999]), None);
        assert!(Projection::mercator().project([10.0, 89.0]).is_some());
    }

    #[test]
    fn rotation_by_negated_focus_centers_the_focus() {
        let projection = Projection::mercator().rotate([-FOCUS[0], -FOCUS[1]]);
        let p = projection.project(FOCUS).unwrap();
        assert!(close(p, [480.0, 250.0], EPSILON), "{:?}", p);
    }

    #[test]
    fn invert_undoes_project() {
        let projection = Projection::mercator()
            .rotate([-FOCUS[0], -FOCUS[1]])
            .scale(731.0)
            .translate([17.0, -40.0]);
        for lonlat in [[113.0, -22.0], [153.0, -29.0], [147.0, -43.6], FOCUS] {
            let p = projection.project(lonlat).unwrap();
            let back = projection.invert(p).unwrap();
            assert!(close(back, lonlat, 1e-9), "{:?} != {:?}", back, lonlat);
        }
    }

    #[test]
    fn fit_extent_is_tight_and_inside() {
        let geo = australia();
        for (width, height, margin) in [
            (800.0, 600.0, 64.0),
            (1280.0, 720.0, 10.0),
            (300.0, 900.0, 0.0),
            (500.0, 500.0, 249.0),
        ] {
            let projection = Projection::mercator()
                .rotate([-FOCUS[0], -FOCUS[1]])
                .fit_extent([[margin, margin], [width - margin, height - margin]], &geo)
                .unwrap();
            let [[x0, y0], [x1, y1]] = projection.bounds(&geo).unwrap();
            assert!(x0 >= margin - EPSILON && y0 >= margin - EPSILON);
            assert!(x1 <= width - margin + EPSILON && y1 <= height - margin + EPSILON);
            let touches_x = (x0 - margin).abs() < EPSILON && (x1 - (width - margin)).abs() < EPSILON;
            let touches_y = (y0 - margin).abs() < EPSILON && (y1 - (height - margin)).abs() < EPSILON;
            assert!(touches_x || touches_y, "not tight for {}x{}", width, height);
        }
    }

    #[test]
    fn symmetric_geometry_puts_focus_at_viewport_center() {
        // a square centered on the focus in the rotated plane
        let unit = Projection::mercator()
            .rotate([-FOCUS[0], -FOCUS[1]])
            .scale(1.0)
            .translate([0.0, 0.0]);
        let ring: Vec<Vec<f64>> = [[-0.2, -0.1], [0.2, -0.1], [0.2, 0.1], [-0.2, 0.1], [-0.2, -0.1]]
            .iter()
            .map(|p| unit.invert(*p).unwrap().to_vec())
            .collect();
        let geo = collection(GeoJsonGeomValue::Polygon(vec![ring]));

        let projection = unit
            .fit_extent([[64.0, 64.0], [800.0 - 64.0, 600.0 - 64.0]], &geo)
            .unwrap();
        let center = projection.project(FOCUS).unwrap();
        assert!(close(center, [400.0, 300.0], 1e-6), "{:?}", center);
    }

    #[test]
    fn fitting_a_point_is_degenerate() {
        let geo = collection(GeoJsonGeomValue::Point(vec![133.0, -25.0]));
        assert_eq!(
            Projection::mercator().fit_extent([[0.0, 0.0], [10.0, 10.0]], &geo),
            Err(Error::DegenerateExtent)
        );
        let empty = FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: None,
        };
        assert_eq!(
            Projection::mercator().fit_extent([[0.0, 0.0], [10.0, 10.0]], &empty),
            Err(Error::DegenerateExtent)
        );
    }
}
