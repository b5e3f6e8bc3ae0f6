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
use crate::{util, Arc, Bbox, Error, NamedGeometry, TransformParams};

/// Topology object
///
/// [TopoJSON Format Specification § 2.1](https://github.com/topojson/topojson-specification#21-topology-objects)
#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    pub bbox: Option<Bbox>,
    /// Named objects, in the order they appear in the document.
    pub objects: Vec<NamedGeometry>,
    pub transform: Option<TransformParams>,
    pub arcs: Vec<Arc>,
    pub foreign_members: Option<JsonObject>,
}

impl Topology {
    pub fn from_json_object(mut object: JsonObject) -> Result<Self, Error> {
        match util::expect_type(&mut object)? {
            ref type_ if type_ == "Topology" => (),
            type_ => {
                return Err(Error::ExpectedType {
                    expected: "Topology".to_owned(),
                    actual: type_,
                })
            }
        }
        let transform = util::get_scale_translate(&mut object)?;
        let arcs = util::get_arcs_position(&mut object)?;
        let objects = util::get_objects(&mut object)?;
        Ok(Topology {
            bbox: util::get_bbox(&mut object)?,
            objects,
            transform,
            arcs,
            foreign_members: util::get_foreign_members(object),
        })
    }

    /// Look up a named object.
    pub fn object(&self, name: &str) -> Option<&NamedGeometry> {
        self.objects.iter().find(|ng| ng.name == name)
    }

    /// The first named object, whatever its name.
    pub fn first_object(&self) -> Option<&NamedGeometry> {
        self.objects.first()
    }

    pub fn list_names(&self) -> Vec<&str> {
        self.objects.iter().map(|ng| ng.name.as_str()).collect()
    }
}

impl<'a> From<&'a Topology> for JsonObject {
    fn from(topo: &'a Topology) -> JsonObject {
        let mut map = JsonObject::new();
        map.insert(String::from("type"), JsonValue::from("Topology"));
        if let Some(ref bbox) = topo.bbox {
            map.insert(String::from("bbox"), JsonValue::from(bbox.clone()));
        }
        if let Some(ref tr) = topo.transform {
            let mut transform = JsonObject::new();
            transform.insert(String::from("scale"), JsonValue::from(tr.scale.to_vec()));
            transform.insert(
                String::from("translate"),
                JsonValue::from(tr.translate.to_vec()),
            );
            map.insert(String::from("transform"), JsonValue::Object(transform));
        }
        let mut objects = JsonObject::new();
        for ng in &topo.objects {
            objects.insert(
                ng.name.clone(),
                JsonValue::Object(JsonObject::from(&ng.geometry)),
            );
        }
        map.insert(String::from("objects"), JsonValue::Object(objects));
        map.insert(String::from("arcs"), JsonValue::from(topo.arcs.clone()));
        if let Some(ref foreign_members) = topo.foreign_members {
            for (key, value) in foreign_members {
                map.insert(key.to_owned(), value.to_owned());
            }
        }
        map
    }
}

impl Serialize for Topology {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        JsonObject::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Topology {
    fn deserialize<D>(deserializer: D) -> Result<Topology, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error as SerdeError;

        let val = JsonObject::deserialize(deserializer)?;

        Topology::from_json_object(val).map_err(D::Error::custom)
    }
}
