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

use std::fmt::Write;

use geojson::{Feature, FeatureCollection, Value as GeoJsonGeomValue};

use crate::projection::{Bounds, BoundsAccumulator, Projection};

const DEFAULT_POINT_RADIUS: f64 = 4.5;

/// Turns GeoJSON features into SVG path data under a fixed projection.
#[derive(Clone, Debug, PartialEq)]
pub struct PathGenerator {
    projection: Projection,
    point_radius: f64,
}

impl PathGenerator {
    pub fn new(projection: Projection) -> Self {
        PathGenerator {
            projection,
            point_radius: DEFAULT_POINT_RADIUS,
        }
    }

    /// Radius of the circle drawn for Point and MultiPoint geometries.
    pub fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn point_radius(&self) -> f64 {
        self.point_radius
    }

    /// SVG path data for `feature`, or `None` when nothing is drawable.
    pub fn path(&self, feature: &Feature) -> Option<String> {
        let geometry = feature.geometry.as_ref()?;
        let mut d = String::new();
        self.write_value(&geometry.value, &mut d);
        if d.is_empty() {
            None
        } else {
            Some(d)
        }
    }

    /// Planar bounds of the projected vertices of `feature`.
    pub fn bounds(&self, feature: &Feature) -> Option<Bounds> {
        let mut acc = BoundsAccumulator::default();
        if let Some(ref geometry) = feature.geometry {
            self.projection.accumulate(&geometry.value, &mut acc);
        }
        acc.finish()
    }

    pub fn collection_bounds(&self, collection: &FeatureCollection) -> Option<Bounds> {
        self.projection.bounds(collection)
    }

    fn write_value(&self, value: &GeoJsonGeomValue, d: &mut String) {
        match value {
            GeoJsonGeomValue::Point(p) => self.write_point(p, d),
            GeoJsonGeomValue::MultiPoint(ps) => ps.iter().for_each(|p| self.write_point(p, d)),
            GeoJsonGeomValue::LineString(line) => self.write_line(line, false, d),
            GeoJsonGeomValue::MultiLineString(lines) => {
                lines.iter().for_each(|l| self.write_line(l, false, d))
            }
            GeoJsonGeomValue::Polygon(rings) => rings.iter().for_each(|r| self.write_line(r, true, d)),
            GeoJsonGeomValue::MultiPolygon(polygons) => polygons
                .iter()
                .flatten()
                .for_each(|r| self.write_line(r, true, d)),
            GeoJsonGeomValue::GeometryCollection(geoms) => {
                geoms.iter().for_each(|g| self.write_value(&g.value, d))
            }
        }
    }

    fn project(&self, pos: &[f64]) -> Option<[f64; 2]> {
        match pos {
            [lon, lat, ..] => self.projection.project([*lon, *lat]),
            _ => None,
        }
    }

    fn write_point(&self, pos: &[f64], d: &mut String) {
        let Some([x, y]) = self.project(pos) else {
            return;
        };
        let r = self.point_radius;
        let _ = write!(
            d,
            "M{},{}m0,{}a{},{} 0 1,1 0,{}a{},{} 0 1,1 0,{}z",
            num(x),
            num(y),
            num(r),
            num(r),
            num(r),
            num(-2.0 * r),
            num(r),
            num(r),
            num(2.0 * r)
        );
    }

    /// Rings repeat their first position at the end; the closing position is
    /// dropped in favour of `Z`.
    fn write_line(&self, positions: &[Vec<f64>], ring: bool, d: &mut String) {
        let positions = match (ring, positions) {
            (true, [rest @ .., _]) => rest,
            _ => positions,
        };
        let mut started = false;
        for pos in positions {
            let Some([x, y]) = self.project(pos) else {
                continue;
            };
            let _ = write!(d, "{}{},{}", if started { 'L' } else { 'M' }, num(x), num(y));
            started = true;
        }
        if ring && started {
            d.push('Z');
        }
    }
}

/// Coordinates are written with at most three decimals.
fn num(v: f64) -> f64 {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::Geometry;

    fn feature(value: GeoJsonGeomValue) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(value)),
            id: None,
            properties: None,
            foreign_members: None,
        }
    }

    /// Equator-centred Mercator where one degree of longitude is one pixel.
    fn flat() -> PathGenerator {
        PathGenerator::new(
            Projection::mercator()
                .scale(180.0 / std::f64::consts::PI)
                .translate([0.0, 0.0]),
        )
    }

    #[test]
    fn polygon_rings_are_closed_with_z() {
        let square = feature(GeoJsonGeomValue::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![10.0, 0.0],
            vec![10.0, -10.0],
            vec![0.0, -10.0],
            vec![0.0, 0.0],
        ]]));
        let d = flat().path(&square).unwrap();
        assert!(d.starts_with("M0,0L10,0L10,10.051L"), "{}", d);
        assert!(d.ends_with("L0,10.051Z"), "{}", d);
        assert_eq!(d.matches('M').count(), 1);
    }

    #[test]
    fn lines_stay_open() {
        let line = feature(GeoJsonGeomValue::LineString(vec![vec![1.0, 0.0], vec![2.0, 0.0]]));
        assert_eq!(flat().path(&line).unwrap(), "M1,0L2,0");
    }

    #[test]
    fn points_are_circles_of_the_point_radius() {
        let point = feature(GeoJsonGeomValue::Point(vec![3.0, 0.0]));
        assert_eq!(
            flat().with_point_radius(2.0).path(&point).unwrap(),
            "M3,0m0,2a2,2 0 1,1 0,-4a2,2 0 1,1 0,4z"
        );
    }

    #[test]
    fn feature_without_geometry_has_no_path() {
        let empty = Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: None,
            foreign_members: None,
        };
        assert_eq!(flat().path(&empty), None);
        assert_eq!(flat().bounds(&empty), None);
    }

    #[test]
    fn bounds_cover_projected_vertices() {
        let line = feature(GeoJsonGeomValue::LineString(vec![vec![-5.0, 0.0], vec![7.0, 0.0]]));
        let [[x0, y0], [x1, y1]] = flat().bounds(&line).unwrap();
        assert!((x0 + 5.0).abs() < 1e-9 && (x1 - 7.0).abs() < 1e-9);
        assert!(y0.abs() < 1e-9 && y1.abs() < 1e-9);
    }
}
