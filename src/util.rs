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

//! Helpers pulling typed members out of a decoded JSON object.
//!
//! Every `get_*` function removes the member it reads, so whatever is left in
//! the object once a Geometry or Topology is built is a foreign member.

use crate::json::{JsonObject, JsonValue};
use crate::{Arc, ArcIndexes, Bbox, Error, Geometry, NamedGeometry, Position, TransformParams};

pub fn expect_type(object: &mut JsonObject) -> Result<String, Error> {
    match take(object, "type")? {
        JsonValue::String(s) => Ok(s),
        _ => Err(Error::ExpectedStringValue),
    }
}

fn take(object: &mut JsonObject, name: &'static str) -> Result<JsonValue, Error> {
    object
        .remove(name)
        .ok_or_else(|| Error::ExpectedProperty(name.to_string()))
}

fn expect_f64(value: &JsonValue) -> Result<f64, Error> {
    value.as_f64().ok_or(Error::ExpectedF64Value)
}

fn expect_i32(value: &JsonValue) -> Result<i32, Error> {
    value
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or(Error::Expectedi32Value)
}

fn expect_array(value: &JsonValue) -> Result<&Vec<JsonValue>, Error> {
    value.as_array().ok_or(Error::ExpectedArrayValue)
}

/// Apply `item` to every element of a JSON array.
fn map_array<T, F>(value: &JsonValue, item: F) -> Result<Vec<T>, Error>
where
    F: Fn(&JsonValue) -> Result<T, Error>,
{
    expect_array(value)?.iter().map(item).collect()
}

/// Read a fixed-size numeric member such as `bbox`, `scale` or `translate`.
fn numbers(value: &JsonValue, not_array: Error, not_numeric: Error) -> Result<Vec<f64>, Error> {
    let array = value.as_array().ok_or(not_array)?;
    let mut out = Vec::with_capacity(array.len());
    for item in array {
        match item.as_f64() {
            Some(v) => out.push(v),
            None => return Err(not_numeric),
        }
    }
    Ok(out)
}

fn position(value: &JsonValue) -> Result<Position, Error> {
    map_array(value, expect_f64)
}

fn positions(value: &JsonValue) -> Result<Vec<Position>, Error> {
    map_array(value, position)
}

fn arc_indexes(value: &JsonValue) -> Result<ArcIndexes, Error> {
    map_array(value, expect_i32)
}

fn arc_indexes_1d(value: &JsonValue) -> Result<Vec<ArcIndexes>, Error> {
    map_array(value, arc_indexes)
}

/// Used by Value::Point
pub fn get_coords_one_pos(object: &mut JsonObject) -> Result<Position, Error> {
    position(&take(object, "coordinates")?)
}

/// Used by Value::MultiPoint
pub fn get_coords_1d_pos(object: &mut JsonObject) -> Result<Vec<Position>, Error> {
    positions(&take(object, "coordinates")?)
}

/// Used by Value::LineString
pub fn get_arc_ix(object: &mut JsonObject) -> Result<ArcIndexes, Error> {
    arc_indexes(&take(object, "arcs")?)
}

/// Used by Value::MultiLineString and Value::Polygon
pub fn get_arc_ix_1d(object: &mut JsonObject) -> Result<Vec<ArcIndexes>, Error> {
    arc_indexes_1d(&take(object, "arcs")?)
}

/// Used by Value::MultiPolygon
pub fn get_arc_ix_2d(object: &mut JsonObject) -> Result<Vec<Vec<ArcIndexes>>, Error> {
    map_array(&take(object, "arcs")?, arc_indexes_1d)
}

/// Retrieve the 'arcs' member of a Topology.
pub fn get_arcs_position(object: &mut JsonObject) -> Result<Vec<Arc>, Error> {
    match object.remove("arcs") {
        Some(a) => map_array(&a, positions),
        None => Err(Error::TopologyExpectedArcs),
    }
}

/// Used by Value::GeometryCollection
pub fn get_geometries(object: &mut JsonObject) -> Result<Vec<Geometry>, Error> {
    match take(object, "geometries")? {
        JsonValue::Array(items) => items
            .into_iter()
            .map(|item| Geometry::from_json_object(into_object(item)?))
            .collect(),
        _ => Err(Error::ExpectedArrayValue),
    }
}

pub fn get_id(object: &mut JsonObject) -> Option<JsonValue> {
    object.remove("id")
}

/// Used by Topology and Geometry
pub fn get_bbox(object: &mut JsonObject) -> Result<Option<Bbox>, Error> {
    match object.remove("bbox") {
        None => Ok(None),
        Some(b) => numbers(
            &b,
            Error::BboxExpectedArray,
            Error::BboxExpectedNumericValues,
        )
        .map(Some),
    }
}

/// Retrieve the quantization transform of a Topology, if any.
pub fn get_scale_translate(object: &mut JsonObject) -> Result<Option<TransformParams>, Error> {
    let transform = match object.remove("transform") {
        None => return Ok(None),
        Some(JsonValue::Object(t)) => t,
        Some(_) => return Err(Error::ExpectedObjectValue),
    };
    let scale = numbers(
        transform.get("scale").ok_or(Error::TransformExpectedScale)?,
        Error::ScaleExpectedArray,
        Error::ScaleExpectedNumericValues,
    )?;
    let translate = numbers(
        transform
            .get("translate")
            .ok_or(Error::TransformExpectedTranslate)?,
        Error::TranslateExpectedArray,
        Error::TranslateExpectedNumericValues,
    )?;
    match (scale.as_slice(), translate.as_slice()) {
        ([sx, sy, ..], [tx, ty, ..]) => Ok(Some(TransformParams {
            scale: [*sx, *sy],
            translate: [*tx, *ty],
        })),
        ([_, _, ..], _) => Err(Error::TranslateExpectedNumericValues),
        _ => Err(Error::ScaleExpectedNumericValues),
    }
}

/// Retrieve the 'properties' member of a Geometry if any.
pub fn get_properties(object: &mut JsonObject) -> Result<Option<JsonObject>, Error> {
    match object.remove("properties") {
        Some(JsonValue::Object(properties)) => Ok(Some(properties)),
        // null is read as a missing member
        Some(JsonValue::Null) | None => Ok(None),
        _ => Err(Error::PropertiesExpectedObjectOrNull),
    }
}

/// Retrieve the 'objects' member of a Topology, in document order.
pub fn get_objects(object: &mut JsonObject) -> Result<Vec<NamedGeometry>, Error> {
    match object.remove("objects") {
        Some(JsonValue::Object(objects)) => objects
            .into_iter()
            .map(|(name, value)| {
                Ok(NamedGeometry {
                    name,
                    geometry: Geometry::from_json_object(into_object(value)?)?,
                })
            })
            .collect(),
        Some(_) | None => Err(Error::TopologyExpectedObjects),
    }
}

pub fn get_foreign_members(object: JsonObject) -> Option<JsonObject> {
    if object.is_empty() {
        None
    } else {
        Some(object)
    }
}

fn into_object(value: JsonValue) -> Result<JsonObject, Error> {
    match value {
        JsonValue::Object(o) => Ok(o),
        _ => Err(Error::ExpectedObjectValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: JsonValue) -> JsonObject {
        match value {
            JsonValue::Object(o) => o,
            _ => unreachable!(),
        }
    }

    #[test]
    fn transform_needs_two_scale_values() {
        let mut topo = object(json!({"transform": {"scale": [1.0], "translate": [0, 0]}}));
        assert_eq!(
            get_scale_translate(&mut topo),
            Err(Error::ScaleExpectedNumericValues)
        );
    }

    #[test]
    fn transform_is_read() {
        let mut topo = object(json!({"transform": {"scale": [0.5, 0.25], "translate": [112, -44]}}));
        assert_eq!(
            get_scale_translate(&mut topo),
            Ok(Some(TransformParams {
                scale: [0.5, 0.25],
                translate: [112.0, -44.0],
            }))
        );
        assert!(topo.is_empty());
    }

    #[test]
    fn bbox_must_be_numeric() {
        let mut topo = object(json!({"bbox": [112, "south", 154, -10]}));
        assert_eq!(get_bbox(&mut topo), Err(Error::BboxExpectedNumericValues));
    }

    #[test]
    fn arc_index_overflow_is_rejected() {
        let mut geom = object(json!({"arcs": [4294967296i64]}));
        assert_eq!(get_arc_ix(&mut geom), Err(Error::Expectedi32Value));
    }

    #[test]
    fn objects_keep_document_order() {
        let mut topo = object(json!({
            "objects": {
                "zeta": {"type": "Point", "coordinates": [0, 0]},
                "alpha": {"type": "Point", "coordinates": [1, 1]}
            }
        }));
        let names: Vec<String> = get_objects(&mut topo)
            .unwrap()
            .into_iter()
            .map(|ng| ng.name)
            .collect();
        assert_eq!(names, vec!["zeta".to_string(), "alpha".to_string()]);
    }
}
