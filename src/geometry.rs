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

use crate::json::{Deserialize, Deserializer, JsonObject, JsonValue, Serialize, Serializer};
use crate::topojson::Type;
use crate::{util, ArcIndexes, Bbox, Error, Position};

/// The underlying Geometry value (which may contain Position or Arc indexes)
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// [TopoJSON Format Specification § 2.2.1](https://github.com/topojson/topojson-specification#221-point)
    Point(Position),

    /// [TopoJSON Format Specification § 2.2.2](https://github.com/topojson/topojson-specification#222-multipoint)
    MultiPoint(Vec<Position>),

    /// [TopoJSON Format Specification § 2.2.3](https://github.com/topojson/topojson-specification#223-linestring)
    LineString(ArcIndexes),

    /// [TopoJSON Format Specification § 2.2.4](https://github.com/topojson/topojson-specification#224-multilinestring)
    MultiLineString(Vec<ArcIndexes>),

    /// [TopoJSON Format Specification § 2.2.5](https://github.com/topojson/topojson-specification#225-polygon)
    Polygon(Vec<ArcIndexes>),

    /// [TopoJSON Format Specification § 2.2.6](https://github.com/topojson/topojson-specification#226-multipolygon)
    MultiPolygon(Vec<Vec<ArcIndexes>>),

    /// [TopoJSON Format Specification § 2.2.7](https://github.com/topojson/topojson-specification#227-geometry-collection)
    GeometryCollection(Vec<Geometry>),
}

impl Value {
    pub fn to_json_value(&self) -> JsonValue {
        match *self {
            Value::Point(ref x) => JsonValue::from(x.clone()),
            Value::MultiPoint(ref x) => JsonValue::from(x.clone()),
            Value::LineString(ref x) => JsonValue::from(x.clone()),
            Value::MultiLineString(ref x) => JsonValue::from(x.clone()),
            Value::Polygon(ref x) => JsonValue::from(x.clone()),
            Value::MultiPolygon(ref x) => JsonValue::from(x.clone()),
            Value::GeometryCollection(ref x) => JsonValue::Array(
                x.iter()
                    .map(|g| JsonValue::Object(JsonObject::from(g)))
                    .collect(),
            ),
        }
    }

    fn type_name(&self) -> &'static str {
        match *self {
            Value::Point(..) => "Point",
            Value::MultiPoint(..) => "MultiPoint",
            Value::LineString(..) => "LineString",
            Value::MultiLineString(..) => "MultiLineString",
            Value::Polygon(..) => "Polygon",
            Value::MultiPolygon(..) => "MultiPolygon",
            Value::GeometryCollection(..) => "GeometryCollection",
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json_value().serialize(serializer)
    }
}

/// Geometry Objects
///
/// [TopoJSON Format Specification § 2.2](https://github.com/topojson/topojson-specification#22-geometry-objects)
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub bbox: Option<Bbox>,
    pub value: Value,
    pub properties: Option<JsonObject>,
    pub id: Option<JsonValue>,
    /// Foreign Members
    ///
    /// [TopoJSON Format Specification](https://github.com/topojson/topojson-specification#22-geometry-objects)
    pub foreign_members: Option<JsonObject>,
}

impl Geometry {
    /// Returns a new `Geometry` with the specified `value`. Every other
    /// member is set to `None`.
    pub fn new(value: Value) -> Self {
        Geometry {
            bbox: None,
            id: None,
            value,
            properties: None,
            foreign_members: None,
        }
    }

    pub fn from_json_object(mut object: JsonObject) -> Result<Self, Error> {
        let type_ = util::expect_type(&mut object)?;
        let value = match Type::from_str(&type_).ok_or(Error::TopoJsonUnknownType)? {
            Type::Point => Value::Point(util::get_coords_one_pos(&mut object)?),
            Type::MultiPoint => Value::MultiPoint(util::get_coords_1d_pos(&mut object)?),
            Type::LineString => Value::LineString(util::get_arc_ix(&mut object)?),
            Type::MultiLineString => Value::MultiLineString(util::get_arc_ix_1d(&mut object)?),
            Type::Polygon => Value::Polygon(util::get_arc_ix_1d(&mut object)?),
            Type::MultiPolygon => Value::MultiPolygon(util::get_arc_ix_2d(&mut object)?),
            Type::GeometryCollection => {
                Value::GeometryCollection(util::get_geometries(&mut object)?)
            }
            Type::Topology => return Err(Error::GeometryUnknownType),
        };
        Ok(Geometry {
            value,
            bbox: util::get_bbox(&mut object)?,
            id: util::get_id(&mut object),
            properties: util::get_properties(&mut object)?,
            foreign_members: util::get_foreign_members(object),
        })
    }
}

impl<'a> From<&'a Geometry> for JsonObject {
    fn from(geometry: &'a Geometry) -> JsonObject {
        let mut map = JsonObject::new();
        if let Some(ref bbox) = geometry.bbox {
            map.insert(String::from("bbox"), JsonValue::from(bbox.clone()));
        }

        map.insert(
            String::from("type"),
            JsonValue::from(geometry.value.type_name()),
        );

        map.insert(
            String::from(match geometry.value {
                Value::GeometryCollection(..) => "geometries",
                Value::LineString(..)
                | Value::MultiLineString(..)
                | Value::Polygon(..)
                | Value::MultiPolygon(..) => "arcs",
                _ => "coordinates",
            }),
            geometry.value.to_json_value(),
        );

        if let Some(ref id) = geometry.id {
            map.insert(String::from("id"), id.clone());
        }

        if let Some(ref properties) = geometry.properties {
            map.insert(
                String::from("properties"),
                JsonValue::Object(properties.clone()),
            );
        }
        if let Some(ref foreign_members) = geometry.foreign_members {
            for (key, value) in foreign_members {
                map.insert(key.to_owned(), value.to_owned());
            }
        }
        map
    }
}

impl Serialize for Geometry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        JsonObject::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Geometry {
    fn deserialize<D>(deserializer: D) -> Result<Geometry, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error as SerdeError;

        let val = JsonObject::deserialize(deserializer)?;

        Geometry::from_json_object(val).map_err(D::Error::custom)
    }
}

/// One member of the 'objects' member of a Topology
///
/// [TopoJSON Format Specification § 2.1.5](https://github.com/topojson/topojson-specification#215-objects)
#[derive(Clone, Debug, PartialEq)]
pub struct NamedGeometry {
    pub name: String,
    pub geometry: Geometry,
}

#[cfg(test)]
mod tests {
    use crate::json::JsonObject;
    use crate::{Error, Geometry, TopoJson, Value};

    fn decode(json_string: &str) -> Geometry {
        match json_string.parse::<TopoJson>().unwrap() {
            TopoJson::Geometry(g) => g,
            _ => unreachable!(),
        }
    }

    #[test]
    fn decode_linestring_without_arcs() {
        let result = "{\"coordinates\":[0],\"type\":\"LineString\"}".parse::<TopoJson>();
        assert_eq!(result, Err(Error::ExpectedProperty(String::from("arcs"))));
    }

    #[test]
    fn decode_rejects_bad_properties() {
        let result = "{\"arcs\":[[0]],\"properties\":[1],\"type\":\"Polygon\"}".parse::<TopoJson>();
        assert_eq!(result, Err(Error::PropertiesExpectedObjectOrNull));
    }

    #[test]
    fn state_polygon_keeps_id_and_area() {
        let geometry = decode(
            "{\"arcs\":[[0,-2]],\"id\":\"QLD\",\"properties\":{\"Area_SqKm\":1730648.0},\"type\":\"Polygon\"}",
        );
        assert_eq!(geometry.value, Value::Polygon(vec![vec![0, -2]]));
        assert_eq!(geometry.id, Some(serde_json::json!("QLD")));
        let area = geometry
            .properties
            .as_ref()
            .and_then(|p| p.get("Area_SqKm"))
            .and_then(|v| v.as_f64());
        assert_eq!(area, Some(1730648.0));
        assert_eq!(geometry.foreign_members, None);
    }

    #[test]
    fn encode_geometry_collection_with_foreign_member() {
        let mut foreign_members = JsonObject::new();
        foreign_members.insert(String::from("source"), serde_json::json!("abs"));
        let mut inner = Geometry::new(Value::Point(vec![133.0, -24.5]));
        inner.properties = Some(JsonObject::new());
        let collection = Geometry {
            foreign_members: Some(foreign_members),
            ..Geometry::new(Value::GeometryCollection(vec![
                inner,
                Geometry::new(Value::MultiPolygon(vec![vec![vec![0]], vec![vec![-1]]])),
            ]))
        };

        let encoded = serde_json::to_string(&collection).unwrap();
        assert_eq!(
            encoded,
            "{\"type\":\"GeometryCollection\",\"geometries\":[{\"type\":\"Point\",\"coordinates\":[133.0,-24.5],\"properties\":{}},{\"type\":\"MultiPolygon\",\"arcs\":[[[0]],[[-1]]]}],\"source\":\"abs\"}"
        );
        assert_eq!(decode(&encoded), collection);
    }
}
