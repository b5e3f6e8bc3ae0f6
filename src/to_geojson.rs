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

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry as GeoJsonGeometry, Value as GeoJsonGeomValue};

use crate::json::JsonValue;
use crate::{Arc, Error, Geometry, Position, Topology, TransformParams, Value as TopoJsonGeomValue};

/// Arcs of a Topology together with the transform needed to decode them.
struct Arcs<'a> {
    arcs: &'a [Arc],
    transform: Option<TransformParams>,
}

impl<'a> Arcs<'a> {
    fn new(topo: &'a Topology) -> Self {
        Arcs {
            arcs: &topo.arcs,
            transform: topo.transform,
        }
    }

    fn point(&self, pos: &Position) -> Position {
        match self.transform {
            None => pos.clone(),
            Some(tr) => {
                let mut new_pos = pos.clone();
                if new_pos.len() >= 2 {
                    new_pos[0] = new_pos[0] * tr.scale[0] + tr.translate[0];
                    new_pos[1] = new_pos[1] * tr.scale[1] + tr.translate[1];
                }
                new_pos
            }
        }
    }

    /// Append arc `ix` to `points`. The first point of a following arc is the
    /// last point of the previous one, so it is only emitted once.
    fn push_arc(&self, ix: i32, points: &mut Vec<Position>) -> Result<(), Error> {
        let (offset, reverse) = if ix < 0 {
            ((!ix) as usize, true)
        } else {
            (ix as usize, false)
        };
        let arc = self.arcs.get(offset).ok_or(Error::ArcIndexOutOfRange(ix))?;
        points.pop();
        let start = points.len();
        let (mut x, mut y) = (0., 0.);
        for pt in arc {
            let mut new_pt = pt.clone();
            if let (Some(tr), true) = (self.transform, new_pt.len() >= 2) {
                // quantized arcs are delta-encoded
                x += new_pt[0];
                y += new_pt[1];
                new_pt[0] = x * tr.scale[0] + tr.translate[0];
                new_pt[1] = y * tr.scale[1] + tr.translate[1];
            }
            points.push(new_pt);
        }
        if reverse {
            points[start..].reverse();
        }
        Ok(())
    }

    fn line(&self, ixs: &[i32]) -> Result<Vec<Position>, Error> {
        let mut points = Vec::new();
        for ix in ixs {
            self.push_arc(*ix, &mut points)?;
        }
        if let [only] = points.as_slice() {
            points.push(only.clone());
        }
        Ok(points)
    }

    fn ring(&self, ixs: &[i32]) -> Result<Vec<Position>, Error> {
        let mut points = self.line(ixs)?;
        if let Some(first) = points.first().cloned() {
            while points.len() < 4 {
                points.push(first.clone());
            }
        }
        Ok(points)
    }

    fn polygon(&self, rings: &[Vec<i32>]) -> Result<Vec<Vec<Position>>, Error> {
        rings.iter().map(|ixs| self.ring(ixs)).collect()
    }

    fn geometry_value(&self, value: &TopoJsonGeomValue) -> Result<GeoJsonGeomValue, Error> {
        Ok(match value {
            TopoJsonGeomValue::Point(pos) => GeoJsonGeomValue::Point(self.point(pos)),
            TopoJsonGeomValue::MultiPoint(positions) => {
                GeoJsonGeomValue::MultiPoint(positions.iter().map(|p| self.point(p)).collect())
            }
            TopoJsonGeomValue::LineString(ixs) => GeoJsonGeomValue::LineString(self.line(ixs)?),
            TopoJsonGeomValue::MultiLineString(lines) => GeoJsonGeomValue::MultiLineString(
                lines
                    .iter()
                    .map(|ixs| self.line(ixs))
                    .collect::<Result<_, _>>()?,
            ),
            TopoJsonGeomValue::Polygon(rings) => GeoJsonGeomValue::Polygon(self.polygon(rings)?),
            TopoJsonGeomValue::MultiPolygon(polygons) => GeoJsonGeomValue::MultiPolygon(
                polygons
                    .iter()
                    .map(|rings| self.polygon(rings))
                    .collect::<Result<_, _>>()?,
            ),
            TopoJsonGeomValue::GeometryCollection(geoms) => GeoJsonGeomValue::GeometryCollection(
                geoms
                    .iter()
                    .map(|g| self.geometry_value(&g.value).map(GeoJsonGeometry::new))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    fn feature(&self, geom: &Geometry) -> Result<Feature, Error> {
        Ok(Feature {
            bbox: geom.bbox.clone(),
            geometry: Some(GeoJsonGeometry::new(self.geometry_value(&geom.value)?)),
            id: geom.id.as_ref().and_then(feature_id),
            properties: geom.properties.clone(),
            foreign_members: geom.foreign_members.clone(),
        })
    }
}

/// GeoJSON only allows string or numeric feature ids.
fn feature_id(id: &JsonValue) -> Option<Id> {
    match id {
        JsonValue::String(s) => Some(Id::String(s.clone())),
        JsonValue::Number(n) => Some(Id::Number(n.clone())),
        _ => None,
    }
}

fn convert_object(topo: &Topology, geom: &Geometry) -> Result<FeatureCollection, Error> {
    let arcs = Arcs::new(topo);
    let features = match &geom.value {
        // A collection at the top becomes one feature per member; a nested
        // collection stays a single feature with a GeometryCollection geometry.
        TopoJsonGeomValue::GeometryCollection(geoms) => geoms
            .iter()
            .map(|g| arcs.feature(g))
            .collect::<Result<Vec<_>, _>>()?,
        _ => vec![arcs.feature(geom)?],
    };
    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Convert the object named `key` of a Topology to a GeoJSON FeatureCollection.
///
/// Behaves like [topojson.feature](https://github.com/topojson/topojson-client#feature),
/// except that a single geometry is wrapped in a one-feature collection.
pub fn to_geojson(topo: &Topology, key: &str) -> Result<FeatureCollection, Error> {
    let named = topo
        .object(key)
        .ok_or_else(|| Error::TopoToGeoUnknownKey(key.to_owned()))?;
    convert_object(topo, &named.geometry)
}

/// Convert the first object of a Topology, whatever its name.
pub fn feature_collection(topo: &Topology) -> Result<FeatureCollection, Error> {
    let first = topo.first_object().ok_or(Error::TopologyHasNoObjects)?;
    convert_object(topo, &first.geometry)
}
