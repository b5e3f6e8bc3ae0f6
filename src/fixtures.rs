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

//! Topologies shared by the unit tests.

use std::cell::Cell;

use tokio::sync::Notify;

use crate::{Error, MemoryLoader, ResourceLoader};

/// Quantized example of the TopoJSON specification, § 1.1.
pub const SPEC_QUANTIZED: &str = "{\"arcs\":[[[4000,0],[1999,9999],[2000,-9999],[2000,9999]],[[0,0],[0,9999],[2000,0],[0,-9999],[-2000,0]]],\"objects\":{\"example\":{\"geometries\":[{\"coordinates\":[4000,5000],\"properties\":{\"prop0\":\"value0\"},\"type\":\"Point\"},{\"arcs\":[0],\"properties\":{\"prop0\":\"value0\",\"prop1\":0},\"type\":\"LineString\"},{\"arcs\":[[1]],\"properties\":{\"prop0\":\"value0\",\"prop1\":{\"this\":\"that\"}},\"type\":\"Polygon\"}],\"type\":\"GeometryCollection\"}},\"type\":\"Topology\",\"transform\":{\"scale\":[0.0005000500050005,0.00010001000100010001],\"translate\":[100,0]}}";

pub const NO_OBJECTS: &str = r#"{"type":"Topology","objects":{},"arcs":[]}"#;

/// Coarse mainland outline plus Tasmania.
pub const AUSTRALIA: &str = r#"{
  "type": "Topology",
  "objects": {
    "australia": {
      "type": "GeometryCollection",
      "geometries": [
        {"type": "Polygon", "arcs": [[0]], "properties": {"name": "Mainland"}},
        {"type": "Polygon", "arcs": [[1]], "properties": {"name": "Tasmania"}}
      ]
    }
  },
  "arcs": [
    [[113,-22],[129,-14],[136,-12],[142,-11],[146,-19],[153,-25],[150,-37],[141,-38],[135,-35],[115,-34],[113,-22]],
    [[144.6,-40.7],[148.3,-40.9],[147.0,-43.6],[145.2,-42.5],[144.6,-40.7]]
  ]
}"#;

/// Two polygons sharing the arc along latitude -19.
pub const QLD: &str = r#"{
  "type": "Topology",
  "objects": {
    "qld": {
      "type": "GeometryCollection",
      "geometries": [
        {"type": "Polygon", "id": "north", "arcs": [[0, 1]], "properties": {"Area_SqKm": 160000}},
        {"type": "Polygon", "id": "south", "arcs": [[2, 0]], "properties": {"Area_SqKm": 1}}
      ]
    }
  },
  "arcs": [
    [[146,-19],[138,-19]],
    [[138,-19],[138,-11],[146,-11],[146,-19]],
    [[138,-19],[138,-29],[153,-29],[153,-19],[146,-19]]
  ]
}"#;

/// Quantized single polygon.
pub const NSW: &str = r#"{
  "type": "Topology",
  "transform": {"scale": [0.001, 0.001], "translate": [141, -37]},
  "objects": {
    "nsw": {"type": "Polygon", "arcs": [[0]], "properties": {"Area_SqKm": 80000}}
  },
  "arcs": [[[0,0],[12000,0],[0,8000],[-12000,0],[0,-8000]]]
}"#;

pub const TAS: &str = r#"{
  "type": "Topology",
  "objects": {
    "tas": {
      "type": "GeometryCollection",
      "geometries": [
        {"type": "Polygon", "arcs": [[0]], "properties": {"Area_SqKm": 68401}}
      ]
    }
  },
  "arcs": [[[144.6,-40.7],[148.3,-40.9],[147.0,-43.6],[145.2,-42.5],[144.6,-40.7]]]
}"#;

/// Rectangle topology with a single feature.
pub fn rectangle(name: &str, west: f64, south: f64, east: f64, north: f64, area: f64) -> String {
    format!(
        r#"{{"type":"Topology","objects":{{"{name}":{{"type":"GeometryCollection","geometries":[{{"type":"Polygon","arcs":[[0]],"properties":{{"Area_SqKm":{area}}}}}]}}}},"arcs":[[[{west},{south}],[{east},{south}],[{east},{north}],[{west},{north}],[{west},{south}]]]}}"#
    )
}

/// Every file the default map asks for.
pub fn loader() -> MemoryLoader {
    MemoryLoader::new()
        .with("./topo/australia.json", AUSTRALIA)
        .with("topo/qld.topo.json", QLD)
        .with("topo/nsw.topo.json", NSW)
        .with("topo/act.topo.json", rectangle("act", 148.8, -35.9, 149.4, -35.1, 2358.0))
        .with("topo/nt.topo.json", rectangle("nt", 129.0, -26.0, 138.0, -11.0, 1347791.0))
        .with("topo/sa.topo.json", rectangle("sa", 129.0, -38.0, 141.0, -26.0, 984321.0))
        .with("topo/tas.topo.json", TAS)
        .with("topo/vic.topo.json", rectangle("vic", 141.0, -39.0, 150.0, -34.0, 227444.0))
        .with("topo/wa.topo.json", rectangle("wa", 113.0, -35.0, 129.0, -14.0, 2527013.0))
}

/// Counts every fetch it serves.
pub struct CountingLoader {
    pub inner: MemoryLoader,
    pub fetches: Cell<usize>,
}

impl CountingLoader {
    pub fn new(inner: MemoryLoader) -> Self {
        CountingLoader {
            inner,
            fetches: Cell::new(0),
        }
    }
}

impl ResourceLoader for CountingLoader {
    async fn fetch(&self, location: &str) -> Result<String, Error> {
        self.fetches.set(self.fetches.get() + 1);
        self.inner.fetch(location).await
    }
}

/// Holds back one location until `open` is called.
pub struct GatedLoader {
    inner: MemoryLoader,
    gated: &'static str,
    gate: Notify,
}

impl GatedLoader {
    pub fn new(inner: MemoryLoader, gated: &'static str) -> Self {
        GatedLoader {
            inner,
            gated,
            gate: Notify::new(),
        }
    }

    pub fn open(&self) {
        self.gate.notify_one();
    }
}

impl ResourceLoader for GatedLoader {
    async fn fetch(&self, location: &str) -> Result<String, Error> {
        if location == self.gated {
            self.gate.notified().await;
        }
        self.inner.fetch(location).await
    }
}
